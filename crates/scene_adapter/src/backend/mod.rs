//! Backend abstraction for the scene adapter
//!
//! This module defines the interface a node-graph rendering backend must
//! implement for the adapter to drive it, plus the callback contract the
//! backend uses to expand procedural geometry it deferred.
//!
//! ## Architecture
//!
//! The backend owns a single global node graph (options, cameras, shapes,
//! shaders, filters, output drivers). The adapter creates nodes, sets typed
//! parameters on them, and finally asks the backend to render or serialize.
//! All methods take `&self`: the backend may expand procedurals from
//! arbitrary threads of its own choosing, so implementations synchronize
//! internally.

pub mod memory;

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scene::value::Value;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Handle to a node stored in the backend's graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeHandle(pub u64);

/// Errors a backend can signal
///
/// The adapter itself degrades recoverable conditions to warnings; these
/// errors cover the backend-fatal paths (global initialization, rendering,
/// scene serialization).
#[derive(Debug, Error)]
pub enum BackendError {
    /// Backend global initialization failed
    #[error("backend initialization failed: {0}")]
    InitializationFailed(String),

    /// A render invocation failed
    #[error("render failed: {0}")]
    RenderFailed(String),

    /// Writing the scene to disk failed
    #[error("scene serialization failed: {0}")]
    SerializationFailed(String),

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// How a render invocation drives the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Render from the active camera
    Camera,
}

bitflags::bitflags! {
    /// Node categories selectable when serializing a scene
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct NodeMask: u32 {
        /// The global options singleton
        const OPTIONS = 1 << 0;
        /// Camera nodes
        const CAMERA = 1 << 1;
        /// Geometry nodes, including procedural placeholders
        const SHAPE = 1 << 2;
        /// Shader nodes
        const SHADER = 1 << 3;
        /// Pixel filter nodes
        const FILTER = 1 << 4;
        /// Output driver nodes
        const DRIVER = 1 << 5;
    }
}

/// Callback contract a deferred procedural exposes to the backend
///
/// The backend decides when (and on which thread) to expand a procedural
/// placeholder. Expansion runs the generator against an isolated child
/// session; afterwards the backend harvests the produced shape nodes
/// through the count/index queries, which must be idempotent and safe to
/// call repeatedly in any order. `cleanup` releases everything the
/// descriptor still owns; the backend drops its reference afterwards.
pub trait ProceduralNode: Send + Sync {
    /// Run the generator against the child session
    ///
    /// Generation happens at most once; later calls warn and do nothing.
    fn expand(&self);

    /// Number of shape nodes the child session holds after expansion
    fn node_count(&self) -> usize;

    /// Shape node at `index`, in registration order
    fn node_at(&self, index: usize) -> Option<NodeHandle>;

    /// Release the generator and the child session
    fn cleanup(&self);
}

/// Interface the adapter drives a rendering backend through
///
/// Implementations must be internally synchronized (`&self` methods,
/// `Send + Sync`): top-level sessions mutate global state single-threaded
/// during construction, but procedural expansion may touch the node store
/// from any thread the backend chooses.
pub trait RenderBackend: Send + Sync {
    /// Perform one-time global setup
    ///
    /// `plugin_paths` carries the search paths from the environment, if
    /// configured. Called once per top-level session.
    fn begin(&self, plugin_paths: Option<&str>) -> BackendResult<()>;

    /// Perform global teardown; the counterpart of [`begin`](Self::begin)
    fn end(&self);

    /// Create a node of the given type
    ///
    /// Returns `None` if the backend does not know the type; the caller
    /// decides whether that is a warning or an error.
    fn create_node(&self, type_name: &str) -> Option<NodeHandle>;

    /// The global options singleton
    fn options(&self) -> NodeHandle;

    /// Set a parameter on a node
    ///
    /// Unknown handles are ignored with a warning; parameter names are not
    /// validated here (arbitrary user parameters are legal).
    fn set_param(&self, node: NodeHandle, name: &str, value: Value);

    /// Read a parameter back from a node
    fn get_param(&self, node: NodeHandle, name: &str) -> Option<Value>;

    /// Whether the node's type declares a parameter of this name
    ///
    /// Distinguishes built-in parameters from arbitrary user data; option
    /// routing and driver `filename` handling depend on it.
    fn declares_parameter(&self, node: NodeHandle, name: &str) -> bool;

    /// The node's current name
    fn node_name(&self, node: NodeHandle) -> Option<String>;

    /// Attach a procedural descriptor to a placeholder node
    ///
    /// Ownership of the descriptor transfers to the backend until it calls
    /// [`ProceduralNode::cleanup`] and drops the reference.
    fn set_procedural(&self, node: NodeHandle, descriptor: Arc<dyn ProceduralNode>);

    /// Render the scene
    fn render(&self, mode: RenderMode) -> BackendResult<()>;

    /// Serialize the selected node categories to a scene file
    fn write_scene(&self, path: &Path, mask: NodeMask) -> BackendResult<()>;
}
