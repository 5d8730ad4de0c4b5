use serde::Serialize;

use super::core::{Point3, Tolerance, Vec3};

pub trait Curve3 {
    fn point_at(&self, t: f64) -> Point3;

    fn derivative_at(&self, t: f64) -> Vec3;

    #[must_use]
    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    /// Returns the unit tangent vector at parameter `t`.
    /// Returns `None` if the derivative is zero or degenerate.
    #[must_use]
    fn tangent_at(&self, t: f64) -> Option<Vec3> {
        self.derivative_at(t).normalized()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cubic Bezier
// ─────────────────────────────────────────────────────────────────────────────

/// Bernstein-basis cubic evaluated per axis. `t` is not clamped: values
/// outside `[0, 1]` extrapolate the polynomial.
#[must_use]
pub fn evaluate_cubic_bezier(p0: Point3, p1: Point3, p2: Point3, p3: Point3, t: f64) -> Point3 {
    let u = 1.0 - t;
    let u2 = u * u;
    let t2 = t * t;
    let b0 = u2 * u;
    let b1 = 3.0 * u2 * t;
    let b2 = 3.0 * u * t2;
    let b3 = t2 * t;
    Point3::new(
        b0 * p0.x + b1 * p1.x + b2 * p2.x + b3 * p3.x,
        b0 * p0.y + b1 * p1.y + b2 * p2.y + b3 * p3.y,
        b0 * p0.z + b1 * p1.z + b2 * p2.z + b3 * p3.z,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CubicBezier3 {
    pub p0: Point3,
    pub p1: Point3,
    pub p2: Point3,
    pub p3: Point3,
}

impl CubicBezier3 {
    #[must_use]
    pub const fn new(p0: Point3, p1: Point3, p2: Point3, p3: Point3) -> Self {
        Self { p0, p1, p2, p3 }
    }

    #[must_use]
    pub const fn control_points(&self) -> [Point3; 4] {
        [self.p0, self.p1, self.p2, self.p3]
    }
}

impl Curve3 for CubicBezier3 {
    fn point_at(&self, t: f64) -> Point3 {
        evaluate_cubic_bezier(self.p0, self.p1, self.p2, self.p3, t)
    }

    fn derivative_at(&self, t: f64) -> Vec3 {
        let u = 1.0 - t;
        let a = self.p1.sub_point(self.p0);
        let b = self.p2.sub_point(self.p1);
        let c = self.p3.sub_point(self.p2);
        a * (3.0 * u * u) + b * (6.0 * u * t) + c * (3.0 * t * t)
    }
}

/// Samples `segments + 1` points uniformly in parameter space, endpoints included.
#[must_use]
pub fn tessellate_curve_uniform(curve: &impl Curve3, segments: usize) -> Vec<Point3> {
    let segments = segments.max(1);
    let (a, b) = curve.domain();
    let span = b - a;
    (0..=segments)
        .map(|i| {
            // Hit the end parameter exactly instead of accumulating a step.
            let t = if i == segments {
                b
            } else {
                a + span * (i as f64 / segments as f64)
            };
            curve.point_at(t)
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tangent continuity at the joint
// ─────────────────────────────────────────────────────────────────────────────

/// The control point that drove an edit around the joint P3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContinuityDriver {
    P2,
    P3,
    P4,
}

/// Restores C¹ continuity at the joint after one of P2, P3, P4 moved.
///
/// - P2 or P4 moved: P3 becomes the midpoint of P2 and P4.
/// - P3 moved: P4 is reflected through P3 (`2·P3 − P2`).
///
/// Returns the updated `(p2, p3, p4)`.
#[must_use]
pub fn enforce_tangent_continuity(
    moved: ContinuityDriver,
    p2: Point3,
    p3: Point3,
    p4: Point3,
) -> (Point3, Point3, Point3) {
    match moved {
        ContinuityDriver::P2 | ContinuityDriver::P4 => (p2, p2.midpoint(p4), p4),
        ContinuityDriver::P3 => (p2, p3, p2.reflect_through(p3)),
    }
}

/// Index of one of the seven control points of a [`JoinedBezier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ControlPointId {
    P0,
    P1,
    P2,
    P3,
    P4,
    P5,
    P6,
}

impl ControlPointId {
    pub const ALL: [Self; 7] = [
        Self::P0,
        Self::P1,
        Self::P2,
        Self::P3,
        Self::P4,
        Self::P5,
        Self::P6,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::P0),
            1 => Some(Self::P1),
            2 => Some(Self::P2),
            3 => Some(Self::P3),
            4 => Some(Self::P4),
            5 => Some(Self::P5),
            6 => Some(Self::P6),
            _ => None,
        }
    }

    /// The continuity role of this point, if it sits at the joint.
    #[must_use]
    pub const fn continuity_driver(self) -> Option<ContinuityDriver> {
        match self {
            Self::P2 => Some(ContinuityDriver::P2),
            Self::P3 => Some(ContinuityDriver::P3),
            Self::P4 => Some(ContinuityDriver::P4),
            _ => None,
        }
    }
}

/// Two cubic segments sharing P3: A = (P0,P1,P2,P3), B = (P3,P4,P5,P6).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JoinedBezier {
    points: [Point3; 7],
}

impl JoinedBezier {
    /// Builds the chain and immediately makes P3 the midpoint of P2 and P4.
    #[must_use]
    pub fn new(points: [Point3; 7]) -> Self {
        let mut chain = Self { points };
        chain.points[3] = points[2].midpoint(points[4]);
        chain
    }

    #[must_use]
    pub const fn points(&self) -> &[Point3; 7] {
        &self.points
    }

    #[must_use]
    pub const fn point(&self, id: ControlPointId) -> Point3 {
        self.points[id.index()]
    }

    #[must_use]
    pub fn segments(&self) -> [CubicBezier3; 2] {
        let p = &self.points;
        [
            CubicBezier3::new(p[0], p[1], p[2], p[3]),
            CubicBezier3::new(p[3], p[4], p[5], p[6]),
        ]
    }

    /// Moves a control point to `(x, y)` keeping its current depth, then
    /// restores continuity if the point sits at the joint.
    pub fn move_point(&mut self, id: ControlPointId, x: f64, y: f64) {
        let current = self.points[id.index()];
        self.set_point(id, Point3::new(x, y, current.z));
    }

    /// Replaces a control point and restores continuity around the joint.
    pub fn set_point(&mut self, id: ControlPointId, point: Point3) {
        self.points[id.index()] = point;
        if let Some(driver) = id.continuity_driver() {
            let (p2, p3, p4) =
                enforce_tangent_continuity(driver, self.points[2], self.points[3], self.points[4]);
            self.points[2] = p2;
            self.points[3] = p3;
            self.points[4] = p4;
        }
    }

    /// Samples each segment with `segments_per_curve + 1` points.
    #[must_use]
    pub fn sample(&self, segments_per_curve: usize) -> [Vec<Point3>; 2] {
        let [a, b] = self.segments();
        [
            tessellate_curve_uniform(&a, segments_per_curve),
            tessellate_curve_uniform(&b, segments_per_curve),
        ]
    }

    /// P3 is the midpoint of P2 and P4 within `tol`.
    #[must_use]
    pub fn is_tangent_continuous(&self, tol: Tolerance) -> bool {
        let incoming = self.points[3].sub_point(self.points[2]);
        let outgoing = self.points[4].sub_point(self.points[3]);
        tol.approx_eq_vec3(incoming, outgoing)
    }
}
