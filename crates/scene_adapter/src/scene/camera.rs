//! Camera description

use crate::foundation::math::{Vec2, Vec2i};
use crate::scene::value::{ParamMap, Value};

/// A camera as described by the scene protocol
///
/// The description is a name plus free-form parameters; the camera
/// converter interprets the parameters it understands (`fov`, `near_clip`,
/// `far_clip`, `shutter`) and the session consumes `resolution` itself.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraDescription {
    /// Node name the realized camera will carry
    pub name: String,
    /// Free-form camera parameters
    pub params: ParamMap,
}

impl CameraDescription {
    /// Create a camera description
    pub fn new(name: impl Into<String>, params: ParamMap) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// The `resolution` parameter, if present
    pub fn resolution(&self) -> Option<Vec2i> {
        self.params.get("resolution").and_then(Value::as_vec2i)
    }

    /// The `shutter` open/close parameter, if present
    pub fn shutter(&self) -> Option<Vec2> {
        self.params.get("shutter").and_then(Value::as_vec2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_parameter() {
        let mut params = ParamMap::new();
        params.insert("resolution".to_string(), Value::Vec2i(Vec2i::new(800, 600)));

        let desc = CameraDescription::new("main", params);
        assert_eq!(desc.resolution(), Some(Vec2i::new(800, 600)));

        let bare = CameraDescription::new("bare", ParamMap::new());
        assert_eq!(bare.resolution(), None);
    }
}
