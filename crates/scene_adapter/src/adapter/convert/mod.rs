//! Primitive converters
//!
//! Format-specific converters realize backend nodes from protocol-side
//! primitive descriptions. The registry is keyed by primitive kind; a kind
//! with no registered converter is the adapter's "unsupported primitive"
//! case and is skipped with a warning by the emission pipeline, never a
//! hard failure.

pub mod camera;
pub mod curves;
pub mod mesh;

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::backend::{NodeHandle, RenderBackend};
use crate::scene::{CameraDescription, CurvesPrimitive, MeshPrimitive};

/// A primitive description awaiting conversion
#[derive(Debug, Clone)]
pub enum Primitive {
    /// Polygon mesh
    Mesh(MeshPrimitive),
    /// Parametric curve group
    Curves(CurvesPrimitive),
    /// Camera
    Camera(CameraDescription),
}

impl Primitive {
    /// The kind used to select a converter
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Mesh(_) => PrimitiveKind::Mesh,
            Self::Curves(_) => PrimitiveKind::Curves,
            Self::Camera(_) => PrimitiveKind::Camera,
        }
    }
}

/// Kinds of primitives a converter can be registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Polygon mesh
    Mesh,
    /// Parametric curve group
    Curves,
    /// Camera
    Camera,
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mesh => "mesh",
            Self::Curves => "curves",
            Self::Camera => "camera",
        };
        f.write_str(name)
    }
}

/// Errors a converter can produce
#[derive(Debug, Error)]
pub enum ConvertError {
    /// No converter is registered for the primitive kind
    #[error("no converter registered for {0} primitives")]
    NoConverter(PrimitiveKind),

    /// The primitive's data does not form a valid shape
    #[error("unsupported parameter shape: {0}")]
    InvalidTopology(String),

    /// The backend refused to create the target node type
    #[error("backend refused to create node type \"{0}\"")]
    NodeCreation(String),
}

/// A format-specific converter from one primitive kind to a backend node
pub trait PrimitiveConverter: Send + Sync {
    /// Realize a fully formed backend node from the primitive
    fn convert(
        &self,
        primitive: &Primitive,
        backend: &dyn RenderBackend,
    ) -> Result<NodeHandle, ConvertError>;
}

/// Registry of converters keyed by primitive kind
pub struct ConverterRegistry {
    converters: HashMap<PrimitiveKind, Box<dyn PrimitiveConverter>>,
}

impl ConverterRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// Create a registry with the built-in converters registered
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(PrimitiveKind::Mesh, Box::new(mesh::MeshConverter));
        registry.register(PrimitiveKind::Curves, Box::new(curves::CurvesConverter));
        registry.register(PrimitiveKind::Camera, Box::new(camera::CameraConverter));
        registry
    }

    /// Register (or replace) the converter for a kind
    pub fn register(&mut self, kind: PrimitiveKind, converter: Box<dyn PrimitiveConverter>) {
        self.converters.insert(kind, converter);
    }

    /// Convert a primitive with the converter registered for its kind
    pub fn convert(
        &self,
        primitive: &Primitive,
        backend: &dyn RenderBackend,
    ) -> Result<NodeHandle, ConvertError> {
        let kind = primitive.kind();
        let converter = self
            .converters
            .get(&kind)
            .ok_or(ConvertError::NoConverter(kind))?;
        converter.convert(primitive, backend)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
