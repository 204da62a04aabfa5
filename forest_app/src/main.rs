//! Forest export demo
//!
//! Builds a small procedural forest (a ground plane plus a grid of tree
//! procedurals) and serializes the resulting scene to `forest.ron`. The
//! trees are deferred: their geometry only exists after the backend expands
//! them during scene export, which is exactly what this demo exercises.

use std::sync::Arc;

use scene_adapter::backend::memory::MemoryBackend;
use scene_adapter::foundation::math::{Aabb, Mat4, Vec2i, Vec3};
use scene_adapter::{
    CurveBasis, CurvesPrimitive, MeshPrimitive, ParamMap, Procedural, Session, Value,
};

/// One tree: a curve trunk topped by a cluster of canopy spheres
struct Tree {
    height: f32,
    canopy_radius: f32,
}

impl Procedural for Tree {
    fn bound(&self) -> Aabb {
        let r = self.canopy_radius;
        Aabb::new(
            Vec3::new(-r, 0.0, -r),
            Vec3::new(r, self.height + r, r),
        )
    }

    fn render(&self, session: &mut Session) {
        // Trunk
        let trunk = CurvesPrimitive::new(
            CurveBasis::BSpline,
            vec![4],
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.02, self.height * 0.4, 0.0),
                Vec3::new(-0.02, self.height * 0.7, 0.01),
                Vec3::new(0.0, self.height, 0.0),
            ],
        )
        .with_width(0.1);
        session.curves(trunk);

        // Canopy under its own shading scope
        session.attribute_begin();
        session.shader("surface", "lambert", ParamMap::new());
        session.set_attribute("tree:canopy", Value::Bool(true));
        let offsets = [
            Vec3::new(0.0, self.height, 0.0),
            Vec3::new(self.canopy_radius * 0.5, self.height - 0.2, 0.0),
            Vec3::new(-self.canopy_radius * 0.4, self.height - 0.1, 0.3),
        ];
        for offset in offsets {
            session.transform_begin();
            session.concat_transform(Mat4::new_translation(&offset));
            session.sphere(self.canopy_radius, -1.0, 1.0, 360.0, &ParamMap::new());
            session.transform_end();
        }
        session.attribute_end();
    }
}

fn ground_plane(size: f32) -> MeshPrimitive {
    let half = size * 0.5;
    MeshPrimitive::new(
        vec![4],
        vec![0, 1, 2, 3],
        vec![
            Vec3::new(-half, 0.0, -half),
            Vec3::new(half, 0.0, -half),
            Vec3::new(half, 0.0, half),
            Vec3::new(-half, 0.0, half),
        ],
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Building forest scene...");

    let backend = Arc::new(MemoryBackend::new());
    let mut session = Session::scene_export(backend, "forest.ron")?;

    session.set_option("rb:AA_samples", Value::Int(4));
    session.set_option("user:project", Value::from("forest-demo"));

    let mut camera_params = ParamMap::new();
    camera_params.insert("resolution".to_string(), Value::Vec2i(Vec2i::new(1280, 720)));
    camera_params.insert("fov".to_string(), Value::Float(40.0));
    session.set_transform(Mat4::new_translation(&Vec3::new(0.0, 4.0, 18.0)));
    session.camera("main", camera_params);
    session.set_transform(Mat4::identity());

    session.display("forest_beauty.exr", "driver_exr", "rgba", ParamMap::new());
    session.display("forest_depth.exr", "driver_exr", "Z FLOAT", ParamMap::new());

    session.world_begin();

    session.shader("surface", "standard_surface", ParamMap::new());
    session.mesh(ground_plane(30.0));

    // A deterministic 3x3 grid of trees with mild size variation
    let mut declared = 0;
    for row in 0..3 {
        for col in 0..3 {
            let x = (col as f32 - 1.0) * 6.0;
            let z = (row as f32 - 1.0) * 6.0;
            let height = 3.0 + 0.4 * (row * 3 + col) as f32;

            session.transform_begin();
            session.concat_transform(Mat4::new_translation(&Vec3::new(x, 0.0, z)));
            session.declare_procedural(Box::new(Tree {
                height,
                canopy_radius: 1.2,
            }));
            session.transform_end();
            declared += 1;
        }
    }
    log::info!("Declared {declared} tree procedurals");

    session.world_end()?;
    log::info!("Scene written to forest.ron");
    Ok(())
}
