//! # Scene Adapter
//!
//! A retained-mode scene-construction adapter: clients describe a 3D scene
//! through an imperative, stack-scoped protocol (cameras, transforms,
//! shading attributes, primitives, nested procedurals, output
//! destinations) and the adapter incrementally builds an equivalent node
//! graph in a rendering backend, then triggers rendering or serialization.
//!
//! ## Architecture
//!
//! - **Session controller**: orchestrates the protocol, session modes and
//!   world begin/end finalization
//! - **Transform / attribute stacks**: scoped, inheritable state with
//!   guard frames that survive unmatched pops
//! - **Converters**: format-specific realization of primitives as backend
//!   nodes, pluggable per primitive kind
//! - **Procedurals**: deferred sub-scenes expanded lazily by the backend,
//!   each in an isolated child session
//! - **Backend interface**: the node-graph contract a backend implements,
//!   with a reference in-memory implementation
//!
//! ## Design Goals
//!
//! - **Best effort, never abort**: protocol features with no backend
//!   equivalent warn and skip; one unsupported primitive never loses the
//!   scene
//! - **Isolated expansion**: the backend may expand procedurals from any
//!   thread, at any time; sibling procedurals share no mutable state
//! - **Backend agnostic**: the adapter drives any [`backend::RenderBackend`]
//!   implementation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use scene_adapter::backend::memory::MemoryBackend;
//! use scene_adapter::{MeshPrimitive, ParamMap, Session};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = Arc::new(MemoryBackend::new());
//!     let mut session = Session::scene_export(backend, "scene.ron")?;
//!
//!     session.camera("main", ParamMap::new());
//!     session.display("beauty.exr", "driver_exr", "rgba", ParamMap::new());
//!     session.world_begin();
//!     session.mesh(MeshPrimitive::unit_quad());
//!     session.world_end()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod adapter;
pub mod backend;
pub mod foundation;
pub mod scene;

pub use adapter::{
    ConvertError, ConverterRegistry, Primitive, PrimitiveConverter, PrimitiveKind, Procedural,
    Session, SessionMode, PLUGIN_PATH_ENV,
};
pub use backend::{
    BackendError, BackendResult, NodeHandle, NodeMask, ProceduralNode, RenderBackend, RenderMode,
};
pub use scene::{
    CameraDescription, CurveBasis, CurvesPrimitive, MeshPrimitive, ParamMap, Value,
};

/// Common imports for adapter users
pub mod prelude {
    pub use crate::adapter::{Procedural, Session, SessionMode};
    pub use crate::backend::memory::MemoryBackend;
    pub use crate::backend::{NodeHandle, RenderBackend};
    pub use crate::foundation::math::{Aabb, Mat4, Vec2, Vec2i, Vec3};
    pub use crate::scene::{
        CameraDescription, CurveBasis, CurvesPrimitive, MeshPrimitive, ParamMap, Value,
    };
}
