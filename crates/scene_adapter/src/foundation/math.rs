//! Math utilities and types
//!
//! Provides the fundamental math types used by the scene protocol and the
//! backend interface. Transform frames are plain 4x4 affine matrices; the
//! adapter never decomposes them.

pub use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D integer vector type (resolutions, raster coordinates)
pub type Vec2i = Vector2<i32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Convert a matrix to the backend's native row-major layout
///
/// Backends consume matrices as nested `[row][column]` arrays; nalgebra
/// stores column-major, so this is the one place the layouts meet.
pub fn mat4_to_rows(m: &Mat4) -> [[f32; 4]; 4] {
    let mut rows = [[0.0_f32; 4]; 4];
    for (i, row) in rows.iter_mut().enumerate() {
        for (j, value) in row.iter_mut().enumerate() {
            *value = m[(i, j)];
        }
    }
    rows
}

/// Axis-Aligned Bounding Box
///
/// Used for procedural bounding volumes: generators report a local-space
/// bound, and the adapter transforms it to world space at declaration time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Transform this AABB by an affine matrix
    ///
    /// Transforms all eight corners and re-fits an axis-aligned box around
    /// them, so the result bounds the rotated volume conservatively.
    pub fn transformed_by(&self, m: &Mat4) -> Self {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];

        let mut min = Vec3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY);
        let mut max = Vec3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY);
        for corner in corners {
            let p = m.transform_point(&Point3::from(corner));
            min = min.inf(&p.coords);
            max = max.sup(&p.coords);
        }

        Self { min, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_aabb_center_extents() {
        let aabb = Aabb::new(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0));

        assert_eq!(aabb.center(), Vec3::zeros());
        assert_eq!(aabb.extents(), Vec3::new(1.0, 2.0, 3.0));

        let rebuilt = Aabb::from_center_extents(aabb.center(), aabb.extents());
        assert_eq!(rebuilt, aabb);
    }

    #[test]
    fn test_aabb_translation() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let m = Mat4::new_translation(&Vec3::new(10.0, 0.0, -5.0));

        let moved = aabb.transformed_by(&m);
        assert_relative_eq!(moved.min, Vec3::new(9.0, -1.0, -6.0), epsilon = EPSILON);
        assert_relative_eq!(moved.max, Vec3::new(11.0, 1.0, -4.0), epsilon = EPSILON);
    }

    #[test]
    fn test_aabb_rotation_refits() {
        // A unit box rotated 45 degrees about Y must grow along X and Z
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let m = Mat4::from_axis_angle(&Vec3::y_axis(), std::f32::consts::FRAC_PI_4);

        let rotated = aabb.transformed_by(&m);
        let expected = 2.0_f32.sqrt();
        assert_relative_eq!(rotated.max.x, expected, epsilon = 1e-5);
        assert_relative_eq!(rotated.max.z, expected, epsilon = 1e-5);
        assert_relative_eq!(rotated.max.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_mat4_row_layout() {
        let m = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0));
        let rows = mat4_to_rows(&m);

        // Translation lives in the last column of each row
        assert_relative_eq!(rows[0][3], 1.0, epsilon = EPSILON);
        assert_relative_eq!(rows[1][3], 2.0, epsilon = EPSILON);
        assert_relative_eq!(rows[2][3], 3.0, epsilon = EPSILON);
        assert_relative_eq!(rows[3][3], 1.0, epsilon = EPSILON);
    }
}
