//! Polygon mesh converter

use crate::adapter::convert::{ConvertError, Primitive, PrimitiveConverter};
use crate::backend::{NodeHandle, RenderBackend};
use crate::scene::MeshPrimitive;
use crate::scene::value::Value;

/// Converts polygon meshes into backend `polymesh` nodes
pub struct MeshConverter;

impl MeshConverter {
    fn validate(mesh: &MeshPrimitive) -> Result<(), ConvertError> {
        let index_total: usize = mesh.verts_per_face.iter().map(|&n| n as usize).sum();
        if index_total != mesh.vert_ids.len() {
            return Err(ConvertError::InvalidTopology(format!(
                "face counts reference {} indices but {} were supplied",
                index_total,
                mesh.vert_ids.len()
            )));
        }
        if let Some(&out_of_range) = mesh
            .vert_ids
            .iter()
            .find(|&&id| id as usize >= mesh.positions.len())
        {
            return Err(ConvertError::InvalidTopology(format!(
                "vertex index {} exceeds {} positions",
                out_of_range,
                mesh.positions.len()
            )));
        }
        if let Some(normals) = &mesh.normals {
            if normals.len() != mesh.positions.len() {
                return Err(ConvertError::InvalidTopology(
                    "normal count does not match position count".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl PrimitiveConverter for MeshConverter {
    fn convert(
        &self,
        primitive: &Primitive,
        backend: &dyn RenderBackend,
    ) -> Result<NodeHandle, ConvertError> {
        let Primitive::Mesh(mesh) = primitive else {
            return Err(ConvertError::InvalidTopology(
                "mesh converter received a non-mesh primitive".to_string(),
            ));
        };
        Self::validate(mesh)?;

        let node = backend
            .create_node("polymesh")
            .ok_or_else(|| ConvertError::NodeCreation("polymesh".to_string()))?;

        backend.set_param(node, "nsides", Value::UIntArray(mesh.verts_per_face.clone()));
        backend.set_param(node, "vidxs", Value::UIntArray(mesh.vert_ids.clone()));
        backend.set_param(node, "vlist", Value::Vec3Array(mesh.positions.clone()));
        if let Some(normals) = &mesh.normals {
            backend.set_param(node, "nlist", Value::Vec3Array(normals.clone()));
        }
        if let Some(uvs) = &mesh.uvs {
            let flattened: Vec<f32> = uvs.iter().flat_map(|uv| [uv.x, uv.y]).collect();
            backend.set_param(node, "uvlist", Value::FloatArray(flattened));
        }
        if mesh.interpolation == "catmullClark" {
            backend.set_param(node, "subdiv_type", Value::from("catclark"));
        }

        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::convert::ConverterRegistry;
    use crate::backend::memory::MemoryBackend;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_quad_converts_to_polymesh() {
        let backend = MemoryBackend::new();
        let registry = ConverterRegistry::with_defaults();

        let node = registry
            .convert(&Primitive::Mesh(MeshPrimitive::unit_quad()), &backend)
            .unwrap();

        assert_eq!(
            backend.get_param(node, "nsides"),
            Some(Value::UIntArray(vec![4]))
        );
        assert!(matches!(
            backend.get_param(node, "vlist"),
            Some(Value::Vec3Array(v)) if v.len() == 4
        ));
    }

    #[test]
    fn test_subdivision_interpolation_sets_subdiv_type() {
        let backend = MemoryBackend::new();
        let mesh = MeshPrimitive::unit_quad().with_interpolation("catmullClark");

        let node = MeshConverter
            .convert(&Primitive::Mesh(mesh), &backend)
            .unwrap();
        assert_eq!(
            backend.get_param(node, "subdiv_type"),
            Some(Value::from("catclark"))
        );
    }

    #[test]
    fn test_mismatched_topology_is_rejected() {
        let backend = MemoryBackend::new();
        let broken = MeshPrimitive::new(
            vec![4],
            vec![0, 1, 2],
            vec![Vec3::zeros(), Vec3::zeros(), Vec3::zeros()],
        );

        let result = MeshConverter.convert(&Primitive::Mesh(broken), &backend);
        assert!(matches!(result, Err(ConvertError::InvalidTopology(_))));
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        let backend = MemoryBackend::new();
        let broken = MeshPrimitive::new(vec![3], vec![0, 1, 9], vec![Vec3::zeros(); 3]);

        let result = MeshConverter.convert(&Primitive::Mesh(broken), &backend);
        assert!(matches!(result, Err(ConvertError::InvalidTopology(_))));
    }
}
