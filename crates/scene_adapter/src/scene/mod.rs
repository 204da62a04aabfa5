//! Scene description data
//!
//! Protocol-side value and primitive types. These describe what a client
//! wants in the scene; the adapter's converters turn them into backend
//! nodes. Nothing in this module touches the backend directly.

pub mod camera;
pub mod curves;
pub mod mesh;
pub mod value;

pub use camera::CameraDescription;
pub use curves::{CurveBasis, CurvesPrimitive};
pub use mesh::MeshPrimitive;
pub use value::{ParamMap, Value};
