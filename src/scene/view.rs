//! Orthographic view box and keyboard-driven model rotation.

use serde::Serialize;

use crate::geom::{Point2, Transform, Vec3};

/// Symmetric orthographic box `[-h, h]²` with depth range `[near, far]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrthoBounds {
    half_extent: f64,
    pub default_half_extent: f64,
    /// Amount each zoom step moves every edge.
    pub zoom_step: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for OrthoBounds {
    fn default() -> Self {
        Self {
            half_extent: 1.0,
            default_half_extent: 1.0,
            zoom_step: 0.05,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl OrthoBounds {
    #[must_use]
    pub const fn half_extent(&self) -> f64 {
        self.half_extent
    }

    /// `(left, right, bottom, top)`.
    #[must_use]
    pub const fn edges(&self) -> (f64, f64, f64, f64) {
        let h = self.half_extent;
        (-h, h, -h, h)
    }

    /// Pulls every edge inwards by one step. Refuses to collapse the box.
    pub fn zoom_in(&mut self) -> bool {
        let next = self.half_extent - self.zoom_step;
        if next > 0.0 {
            self.half_extent = next;
            true
        } else {
            log::debug!("ortho zoom limit reached at {}", self.half_extent);
            false
        }
    }

    pub fn zoom_out(&mut self) {
        self.half_extent += self.zoom_step;
    }

    pub fn reset(&mut self) {
        self.half_extent = self.default_half_extent;
    }

    /// OpenGL-style orthographic projection matrix.
    #[must_use]
    pub fn projection(&self) -> Transform {
        let (l, r, b, t) = self.edges();
        let (n, f) = (self.near, self.far);
        Transform::from_rows([
            [2.0 / (r - l), 0.0, 0.0, -(r + l) / (r - l)],
            [0.0, 2.0 / (t - b), 0.0, -(t + b) / (t - b)],
            [0.0, 0.0, -2.0 / (f - n), -(f + n) / (f - n)],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Maps normalized device coordinates to world x/y inside the box.
    #[must_use]
    pub fn ndc_to_world(&self, ndc: Point2) -> Point2 {
        Point2::new(ndc.x * self.half_extent, ndc.y * self.half_extent)
    }
}

/// Canvas pixel coordinates (origin top-left) to NDC (origin centre, y up).
#[must_use]
pub fn canvas_to_ndc(px: f64, py: f64, width: f64, height: f64) -> Option<Point2> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    Some(Point2::new(2.0 * px / width - 1.0, 1.0 - 2.0 * py / height))
}

// ─────────────────────────────────────────────────────────────────────────────
// Model rotation
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    #[must_use]
    pub const fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
        }
    }

    /// Parses `x`, `y` or `z`, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "z" => Some(Self::Z),
            _ => None,
        }
    }
}

/// Accumulated model rotation, each key press adding a fixed step about a
/// world axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelRotation {
    transform: Transform,
    /// Step per key press, degrees.
    pub step_degrees: f64,
}

impl Default for ModelRotation {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            step_degrees: 2.0,
        }
    }
}

impl ModelRotation {
    /// Rotates by one step about `axis`; `positive` picks the direction.
    pub fn nudge(&mut self, axis: Axis, positive: bool) {
        let angle = if positive {
            self.step_degrees
        } else {
            -self.step_degrees
        };
        self.rotate(axis, angle);
    }

    pub fn rotate(&mut self, axis: Axis, degrees: f64) {
        if let Some(r) = Transform::rotate_axis(axis.unit(), degrees.to_radians()) {
            self.transform = r * self.transform;
        }
    }

    pub fn reset(&mut self) {
        self.transform = Transform::identity();
    }

    #[must_use]
    pub const fn transform(&self) -> Transform {
        self.transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Point3, Tolerance};

    #[test]
    fn zoom_moves_each_edge_by_one_step() {
        let mut view = OrthoBounds::default();
        view.zoom_in();
        let tol = Tolerance::DEFAULT;
        let (l, r, b, t) = view.edges();
        assert!(tol.approx_eq_f64(l, -0.95) && tol.approx_eq_f64(r, 0.95));
        assert!(tol.approx_eq_f64(b, -0.95) && tol.approx_eq_f64(t, 0.95));
        view.zoom_out();
        view.zoom_out();
        assert!(tol.approx_eq_f64(view.half_extent(), 1.05));
        view.reset();
        assert_eq!(view.half_extent(), 1.0);
    }

    #[test]
    fn zoom_in_never_collapses_the_box() {
        let mut view = OrthoBounds::default();
        for _ in 0..100 {
            view.zoom_in();
        }
        assert!(view.half_extent() > 0.0);
    }

    #[test]
    fn projection_maps_box_corner_to_ndc_corner() {
        let view = OrthoBounds::default();
        let p = view.projection().apply_point(Point3::new(1.0, -1.0, -0.1));
        let tol = Tolerance::new(1e-12);
        assert!(tol.approx_eq_f64(p.x, 1.0));
        assert!(tol.approx_eq_f64(p.y, -1.0));
        assert!(tol.approx_eq_f64(p.z, -1.0));
    }

    #[test]
    fn canvas_centre_is_ndc_origin() {
        let c = canvas_to_ndc(200.0, 150.0, 400.0, 300.0).expect("size");
        assert_eq!(c, Point2::new(0.0, 0.0));
        assert_eq!(canvas_to_ndc(0.0, 0.0, 400.0, 300.0), Some(Point2::new(-1.0, 1.0)));
        assert!(canvas_to_ndc(0.0, 0.0, 0.0, 300.0).is_none());
    }

    #[test]
    fn zoomed_ndc_lands_inside_the_smaller_box() {
        let mut view = OrthoBounds::default();
        for _ in 0..10 {
            view.zoom_in();
        }
        let w = view.ndc_to_world(Point2::new(1.0, -0.3));
        let tol = Tolerance::new(1e-12);
        assert!(tol.approx_eq_f64(w.x, 0.5));
        assert!(tol.approx_eq_f64(w.y, -0.15));
    }

    #[test]
    fn axis_names_parse() {
        assert_eq!(Axis::from_name(" Y "), Some(Axis::Y));
        assert_eq!(Axis::from_name("z"), Some(Axis::Z));
        assert_eq!(Axis::from_name("w"), None);
    }

    #[test]
    fn opposite_nudges_cancel() {
        let mut m = ModelRotation::default();
        m.nudge(Axis::Z, true);
        m.nudge(Axis::Z, false);
        let p = m.transform().apply_point(Point3::new(1.0, 2.0, 3.0));
        assert!(Tolerance::new(1e-12).approx_eq_point3(p, Point3::new(1.0, 2.0, 3.0)));
        m.nudge(Axis::X, true);
        m.reset();
        assert_eq!(m.transform(), Transform::identity());
    }
}
