//! Polygon mesh primitive description

use crate::foundation::math::{Vec2, Vec3};

/// A polygon mesh as described by the scene protocol
///
/// Topology is face-varying: `verts_per_face[i]` gives the vertex count of
/// face `i`, and `vert_ids` concatenates every face's indices into
/// `positions`. Normals and UVs are optional per-vertex data.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshPrimitive {
    /// Vertex count per face, in face order
    pub verts_per_face: Vec<u32>,
    /// Concatenated per-face vertex indices into `positions`
    pub vert_ids: Vec<u32>,
    /// Interpolation scheme: `"linear"` for polygons, `"catmullClark"` for
    /// subdivision surfaces
    pub interpolation: String,
    /// Vertex positions
    pub positions: Vec<Vec3>,
    /// Optional per-vertex normals
    pub normals: Option<Vec<Vec3>>,
    /// Optional per-vertex texture coordinates
    pub uvs: Option<Vec<Vec2>>,
}

impl MeshPrimitive {
    /// Create a linearly interpolated mesh from topology and positions
    pub fn new(verts_per_face: Vec<u32>, vert_ids: Vec<u32>, positions: Vec<Vec3>) -> Self {
        Self {
            verts_per_face,
            vert_ids,
            interpolation: "linear".to_string(),
            positions,
            normals: None,
            uvs: None,
        }
    }

    /// Builder pattern: set the interpolation scheme
    pub fn with_interpolation(mut self, interpolation: impl Into<String>) -> Self {
        self.interpolation = interpolation.into();
        self
    }

    /// Builder pattern: attach per-vertex normals
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = Some(normals);
        self
    }

    /// Builder pattern: attach per-vertex texture coordinates
    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Self {
        self.uvs = Some(uvs);
        self
    }

    /// A unit quad in the XZ plane, handy for tests and demos
    pub fn unit_quad() -> Self {
        Self::new(
            vec![4],
            vec![0, 1, 2, 3],
            vec![
                Vec3::new(-0.5, 0.0, -0.5),
                Vec3::new(0.5, 0.0, -0.5),
                Vec3::new(0.5, 0.0, 0.5),
                Vec3::new(-0.5, 0.0, 0.5),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_quad_topology() {
        let quad = MeshPrimitive::unit_quad();

        assert_eq!(quad.verts_per_face, vec![4]);
        assert_eq!(quad.vert_ids.len(), 4);
        assert_eq!(quad.positions.len(), 4);
        assert_eq!(quad.interpolation, "linear");
    }
}
