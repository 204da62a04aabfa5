//! Parametric curve group converter

use crate::adapter::convert::{ConvertError, Primitive, PrimitiveConverter};
use crate::backend::{NodeHandle, RenderBackend};
use crate::scene::CurvesPrimitive;
use crate::scene::value::Value;

/// Converts curve groups into backend `curves` nodes
pub struct CurvesConverter;

impl CurvesConverter {
    fn validate(curves: &CurvesPrimitive) -> Result<(), ConvertError> {
        let point_total: usize = curves.verts_per_curve.iter().map(|&n| n as usize).sum();
        if point_total != curves.positions.len() {
            return Err(ConvertError::InvalidTopology(format!(
                "curve counts reference {} control points but {} were supplied",
                point_total,
                curves.positions.len()
            )));
        }
        if curves.verts_per_curve.iter().any(|&n| n < 2) {
            return Err(ConvertError::InvalidTopology(
                "every curve needs at least two control points".to_string(),
            ));
        }
        Ok(())
    }
}

impl PrimitiveConverter for CurvesConverter {
    fn convert(
        &self,
        primitive: &Primitive,
        backend: &dyn RenderBackend,
    ) -> Result<NodeHandle, ConvertError> {
        let Primitive::Curves(curves) = primitive else {
            return Err(ConvertError::InvalidTopology(
                "curves converter received a non-curves primitive".to_string(),
            ));
        };
        Self::validate(curves)?;

        let node = backend
            .create_node("curves")
            .ok_or_else(|| ConvertError::NodeCreation("curves".to_string()))?;

        backend.set_param(
            node,
            "num_points",
            Value::UIntArray(curves.verts_per_curve.clone()),
        );
        backend.set_param(node, "points", Value::Vec3Array(curves.positions.clone()));
        backend.set_param(node, "radius", Value::Float(curves.width * 0.5));
        backend.set_param(node, "basis", Value::from(curves.basis.as_str()));
        backend.set_param(node, "mode", Value::from("ribbon"));

        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;
    use crate::foundation::math::Vec3;
    use crate::scene::CurveBasis;

    fn strand() -> CurvesPrimitive {
        CurvesPrimitive::new(
            CurveBasis::BSpline,
            vec![4],
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.1, 2.0, 0.0),
                Vec3::new(0.3, 3.0, 0.0),
            ],
        )
    }

    #[test]
    fn test_strand_converts_with_basis_and_radius() {
        let backend = MemoryBackend::new();
        let node = CurvesConverter
            .convert(&Primitive::Curves(strand().with_width(0.2)), &backend)
            .unwrap();

        assert_eq!(backend.get_param(node, "basis"), Some(Value::from("b-spline")));
        assert_eq!(backend.get_param(node, "radius"), Some(Value::Float(0.1)));
    }

    #[test]
    fn test_short_curve_is_rejected() {
        let backend = MemoryBackend::new();
        let broken = CurvesPrimitive::new(CurveBasis::Linear, vec![1], vec![Vec3::zeros()]);

        let result = CurvesConverter.convert(&Primitive::Curves(broken), &backend);
        assert!(matches!(result, Err(ConvertError::InvalidTopology(_))));
    }
}
