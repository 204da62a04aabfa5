//! Camera converter

use crate::adapter::convert::{ConvertError, Primitive, PrimitiveConverter};
use crate::backend::{NodeHandle, RenderBackend};
use crate::scene::value::Value;

/// Converts camera descriptions into backend `persp_camera` nodes
pub struct CameraConverter;

impl PrimitiveConverter for CameraConverter {
    fn convert(
        &self,
        primitive: &Primitive,
        backend: &dyn RenderBackend,
    ) -> Result<NodeHandle, ConvertError> {
        let Primitive::Camera(camera) = primitive else {
            return Err(ConvertError::InvalidTopology(
                "camera converter received a non-camera primitive".to_string(),
            ));
        };

        let node = backend
            .create_node("persp_camera")
            .ok_or_else(|| ConvertError::NodeCreation("persp_camera".to_string()))?;
        backend.set_param(node, "name", Value::from(camera.name.clone()));

        for param in ["fov", "near_clip", "far_clip"] {
            if let Some(value) = camera.params.get(param) {
                backend.set_param(node, param, value.clone());
            }
        }
        if let Some(shutter) = camera.shutter() {
            backend.set_param(node, "shutter_start", Value::Float(shutter.x));
            backend.set_param(node, "shutter_end", Value::Float(shutter.y));
        }

        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;
    use crate::foundation::math::Vec2;
    use crate::scene::{CameraDescription, ParamMap};

    #[test]
    fn test_shutter_parameter_splits() {
        let backend = MemoryBackend::new();
        let mut params = ParamMap::new();
        params.insert("shutter".to_string(), Value::Vec2(Vec2::new(0.25, 0.75)));
        params.insert("fov".to_string(), Value::Float(45.0));

        let node = CameraConverter
            .convert(
                &Primitive::Camera(CameraDescription::new("main", params)),
                &backend,
            )
            .unwrap();

        assert_eq!(
            backend.get_param(node, "shutter_start"),
            Some(Value::Float(0.25))
        );
        assert_eq!(
            backend.get_param(node, "shutter_end"),
            Some(Value::Float(0.75))
        );
        assert_eq!(backend.get_param(node, "fov"), Some(Value::Float(45.0)));
        assert_eq!(backend.node_name(node).as_deref(), Some("main"));
    }
}
