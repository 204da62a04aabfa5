//! The scene-construction adapter
//!
//! Bridges the imperative, stack-scoped scene protocol onto a node-graph
//! backend. The session controller orchestrates; the two stacks carry the
//! hierarchical transform and shading state; converters realize primitives
//! as backend nodes; procedural descriptors defer sub-scene construction
//! until the backend asks for it.

pub mod attribute_stack;
pub mod convert;
pub mod procedural;
pub mod session;
pub mod transform_stack;

pub use attribute_stack::{AttributeStack, AttributeState};
pub use convert::{ConvertError, ConverterRegistry, Primitive, PrimitiveConverter, PrimitiveKind};
pub use procedural::{Procedural, ProceduralDescriptor};
pub use session::{Session, SessionMode, PLUGIN_PATH_ENV};
pub use transform_stack::TransformStack;
