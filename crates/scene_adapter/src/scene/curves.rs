//! Parametric curve group primitive description

use crate::foundation::math::Vec3;

/// Cubic basis of a curve group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveBasis {
    /// Piecewise linear segments
    Linear,
    /// Bezier basis
    Bezier,
    /// Uniform B-spline basis
    BSpline,
    /// Catmull-Rom basis
    CatmullRom,
}

impl CurveBasis {
    /// The backend's name for this basis
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Bezier => "bezier",
            Self::BSpline => "b-spline",
            Self::CatmullRom => "catmull-rom",
        }
    }
}

/// A group of parametric curves sharing one basis
///
/// `verts_per_curve[i]` gives the control point count of curve `i`;
/// `positions` concatenates every curve's control points.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvesPrimitive {
    /// Basis shared by every curve in the group
    pub basis: CurveBasis,
    /// Whether the curves wrap around
    pub periodic: bool,
    /// Control point count per curve, in curve order
    pub verts_per_curve: Vec<u32>,
    /// Concatenated control points
    pub positions: Vec<Vec3>,
    /// Constant curve width
    pub width: f32,
}

impl CurvesPrimitive {
    /// Create a curve group with the default width
    pub fn new(basis: CurveBasis, verts_per_curve: Vec<u32>, positions: Vec<Vec3>) -> Self {
        Self {
            basis,
            periodic: false,
            verts_per_curve,
            positions,
            width: 0.01,
        }
    }

    /// Builder pattern: mark the curves periodic
    pub fn with_periodic(mut self, periodic: bool) -> Self {
        self.periodic = periodic;
        self
    }

    /// Builder pattern: set a constant width
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }
}
