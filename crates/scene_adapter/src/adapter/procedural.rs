//! Deferred procedural geometry
//!
//! A procedural is declared eagerly (bounding volume plus a generator) but
//! expanded lazily by the backend, possibly much later and on a thread of
//! the backend's choosing. The descriptor defined here is the bridge: it
//! exclusively owns the generator and an isolated child session until the
//! backend asks for expansion, then serves harvest queries until the
//! backend releases it.
//!
//! State machine per instance:
//!
//! ```text
//! DECLARED --expand()--> EXPANDING --generator returns--> EXPANDED --cleanup()--> RELEASED
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::adapter::session::Session;
use crate::backend::{NodeHandle, ProceduralNode};
use crate::foundation::math::Aabb;

/// A lazily-invoked geometry generator
///
/// `bound` is called once at declaration time and must conservatively
/// bound everything `render` will later emit, in local space. `render` is
/// called at most once, at expansion time, against an isolated child
/// session that inherits the declaring scope's transform and attribute
/// state.
pub trait Procedural: Send {
    /// Local-space bound of the geometry this generator will produce
    fn bound(&self) -> Aabb;

    /// Emit the deferred geometry into the child session
    fn render(&self, session: &mut Session);
}

/// Bridges one declared procedural to its backend-driven expansion
///
/// Owns the generator (consumed by the first expansion) and the child
/// session (queried for harvested shapes afterwards). Both sit behind
/// mutexes because the backend may call the hooks from any thread; two
/// sibling descriptors share nothing, so unrelated expansions never
/// contend.
pub struct ProceduralDescriptor {
    generator: Mutex<Option<Box<dyn Procedural>>>,
    child: Mutex<Option<Session>>,
}

impl ProceduralDescriptor {
    /// Create a descriptor owning `generator` and the snapshot `child`
    pub(crate) fn new(generator: Box<dyn Procedural>, child: Session) -> Self {
        Self {
            generator: Mutex::new(Some(generator)),
            child: Mutex::new(Some(child)),
        }
    }

    // A generator that panicked on another thread must not wedge the
    // harvest queries.
    fn lock_generator(&self) -> MutexGuard<'_, Option<Box<dyn Procedural>>> {
        self.generator.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_child(&self) -> MutexGuard<'_, Option<Session>> {
        self.child.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProceduralNode for ProceduralDescriptor {
    fn expand(&self) {
        let Some(generator) = self.lock_generator().take() else {
            log::warn!("procedural expanded more than once; ignoring");
            return;
        };
        let mut child = self.lock_child();
        match child.as_mut() {
            Some(session) => generator.render(session),
            None => log::warn!("procedural expanded after cleanup; ignoring"),
        }
    }

    fn node_count(&self) -> usize {
        self.lock_child()
            .as_ref()
            .map_or(0, Session::shape_count)
    }

    fn node_at(&self, index: usize) -> Option<NodeHandle> {
        self.lock_child()
            .as_ref()
            .and_then(|session| session.shape_at(index))
    }

    fn cleanup(&self) {
        self.lock_generator().take();
        self.lock_child().take();
    }
}
