//! Typed attribute and parameter values
//!
//! `Value` is the single currency for option values, node parameters and
//! scoped attributes. Values are immutable once constructed; setting an
//! attribute or parameter always stores a fresh copy, which is what gives
//! attribute scopes their value semantics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::backend::NodeHandle;
use crate::foundation::math::{Vec2, Vec2i, Vec3};

/// A named parameter bundle as passed through the scene protocol
pub type ParamMap = HashMap<String, Value>;

/// A typed scene value
///
/// Covers the parameter types the backend node graph understands, including
/// node pointers (`Node`) used for shader assignment and camera selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Boolean flag
    Bool(bool),
    /// 32-bit signed integer
    Int(i32),
    /// 32-bit float
    Float(f32),
    /// UTF-8 string
    String(String),
    /// 2D float vector
    Vec2(Vec2),
    /// 2D integer vector (resolutions, raster coordinates)
    Vec2i(Vec2i),
    /// 3D float vector (points, colors)
    Vec3(Vec3),
    /// 4x4 matrix in the backend's row-major layout
    Matrix([[f32; 4]; 4]),
    /// Reference to another node in the graph
    Node(NodeHandle),
    /// Array of signed integers
    IntArray(Vec<i32>),
    /// Array of unsigned integers (topology index buffers)
    UIntArray(Vec<u32>),
    /// Array of floats
    FloatArray(Vec<f32>),
    /// Array of 3D vectors
    Vec3Array(Vec<Vec3>),
    /// Array of strings
    StringArray(Vec<String>),
    /// Array of node references
    NodeArray(Vec<NodeHandle>),
}

impl Value {
    /// Return the contained float, if this is a `Float`
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Return the contained integer, if this is an `Int`
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Return the contained string slice, if this is a `String`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Return the contained integer vector, if this is a `Vec2i`
    pub fn as_vec2i(&self) -> Option<Vec2i> {
        match self {
            Self::Vec2i(v) => Some(*v),
            _ => None,
        }
    }

    /// Return the contained float vector, if this is a `Vec2`
    pub fn as_vec2(&self) -> Option<Vec2> {
        match self {
            Self::Vec2(v) => Some(*v),
            _ => None,
        }
    }

    /// Return the contained node reference, if this is a `Node`
    pub fn as_node(&self) -> Option<NodeHandle> {
        match self {
            Self::Node(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec3> for Value {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v)
    }
}

impl From<NodeHandle> for Value {
    fn from(v: NodeHandle) -> Self {
        Self::Node(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_reject_wrong_variant() {
        let v = Value::Int(3);

        assert_eq!(v.as_int(), Some(3));
        assert_eq!(v.as_float(), None);
        assert_eq!(v.as_str(), None);
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(Value::from("rgba"), Value::String("rgba".to_string()));
        assert_eq!(Value::from(4), Value::Int(4));
        assert_eq!(Value::from(0.25), Value::Float(0.25));
    }
}
