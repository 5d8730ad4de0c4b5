//! Interactive state for the two-segment Bezier editor.
//!
//! The editor owns the seven control points, the segment colours and the
//! current drag target. Every edit goes through [`JoinedBezier`], so the
//! joint stays tangent-continuous no matter which point moves.

use rand::Rng;

use crate::geom::{
    ColorRange, ControlPointId, GeomCache, GeomError, GeomMesh, JoinedBezier, MARKER_PALETTE,
    Point3, Rgb, generate_sphere_mesh_cached, narrow,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierEditorConfig {
    pub default_points: [Point3; 7],
    /// Half width of the square pick box around each control point.
    pub pick_half_size: f64,
    pub segments_per_curve: usize,
    pub marker_radius: f64,
    pub marker_bands: u32,
    pub marker_palette: [Rgb; 7],
    pub tangent_color: Rgb,
    pub initial_colors: [Rgb; 2],
    /// Ranges for [`BezierEditor::randomize_colors`], one per segment.
    pub segment_color_ranges: [ColorRange; 2],
    /// Range used by [`BezierEditor::recolor`].
    pub recolor_range: ColorRange,
}

impl Default for BezierEditorConfig {
    fn default() -> Self {
        Self {
            default_points: [
                Point3::new(0.65, -0.1, 0.2),
                Point3::new(0.5, 0.4, 0.2),
                Point3::new(0.0, 0.8, 0.2),
                Point3::new(0.0, 0.0, 0.2),
                Point3::new(0.0, -0.5, 0.2),
                Point3::new(-0.2, -0.2, 0.2),
                Point3::new(-0.8, 0.5, 0.2),
            ],
            pick_half_size: 0.05,
            segments_per_curve: 100,
            marker_radius: 0.015,
            marker_bands: 7,
            marker_palette: MARKER_PALETTE,
            tangent_color: Rgb::WHITE,
            initial_colors: [Rgb::RED, Rgb::CYAN],
            segment_color_ranges: [
                ColorRange::new((0.5, 1.0), (0.0, 1.0), (0.0, 1.0)),
                ColorRange::new((0.0, 1.0), (0.15, 1.0), (0.0, 1.0)),
            ],
            recolor_range: ColorRange::UNIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BezierEditor {
    chain: JoinedBezier,
    colors: [Rgb; 2],
    dragging: Option<ControlPointId>,
    config: BezierEditorConfig,
}

impl Default for BezierEditor {
    fn default() -> Self {
        Self::new(BezierEditorConfig::default())
    }
}

impl BezierEditor {
    #[must_use]
    pub fn new(config: BezierEditorConfig) -> Self {
        Self {
            chain: JoinedBezier::new(config.default_points),
            colors: config.initial_colors,
            dragging: None,
            config,
        }
    }

    #[must_use]
    pub const fn chain(&self) -> &JoinedBezier {
        &self.chain
    }

    #[must_use]
    pub const fn colors(&self) -> [Rgb; 2] {
        self.colors
    }

    #[must_use]
    pub const fn config(&self) -> &BezierEditorConfig {
        &self.config
    }

    #[must_use]
    pub const fn dragging(&self) -> Option<ControlPointId> {
        self.dragging
    }

    /// Control point whose pick box contains `(x, y)`; the nearest one wins
    /// when boxes overlap. Boxes are half-open: `[c - h, c + h)` per axis.
    #[must_use]
    pub fn pick(&self, x: f64, y: f64) -> Option<ControlPointId> {
        let h = self.config.pick_half_size;
        let inside = |v: f64, c: f64| v >= c - h && v < c + h;
        ControlPointId::ALL
            .into_iter()
            .filter_map(|id| {
                let p = self.chain.point(id);
                (inside(x, p.x) && inside(y, p.y)).then(|| {
                    let (dx, dy) = (x - p.x, y - p.y);
                    (id, dx * dx + dy * dy)
                })
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Starts dragging the point under `(x, y)`, if any.
    pub fn begin_drag(&mut self, x: f64, y: f64) -> Option<ControlPointId> {
        self.dragging = self.pick(x, y);
        if let Some(id) = self.dragging {
            log::debug!("dragging {id:?}");
        }
        self.dragging
    }

    /// Moves the dragged point; returns false when nothing is being dragged.
    pub fn drag_to(&mut self, x: f64, y: f64) -> bool {
        match self.dragging {
            Some(id) => {
                self.move_point(id, x, y);
                true
            }
            None => false,
        }
    }

    pub fn end_drag(&mut self) {
        self.dragging = None;
    }

    /// Moves a point in x/y, keeping its depth. Non-finite targets are ignored.
    pub fn move_point(&mut self, id: ControlPointId, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            log::debug!("ignoring non-finite move of {id:?} to ({x}, {y})");
            return;
        }
        self.chain.move_point(id, x, y);
    }

    pub fn set_point(&mut self, id: ControlPointId, point: Point3) -> Result<(), GeomError> {
        if !point.is_finite() {
            return Err(GeomError::invalid("point", "must be finite"));
        }
        self.chain.set_point(id, point);
        Ok(())
    }

    /// Restores the default control points and cancels any drag.
    pub fn reset(&mut self) {
        self.chain = JoinedBezier::new(self.config.default_points);
        self.dragging = None;
    }

    /// Draws new segment colours from the per-segment ranges.
    pub fn randomize_colors<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let [a, b] = self.config.segment_color_ranges;
        self.colors = [a.sample(rng), b.sample(rng)];
    }

    /// Draws new segment colours with every channel in the recolour range.
    pub fn recolor<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let range = self.config.recolor_range;
        self.colors = [range.sample(rng), range.sample(rng)];
    }

    /// Interleaved `[x, y, z, r, g, b]` for both segments, segment A first.
    #[must_use]
    pub fn curve_vertices(&self) -> Vec<f32> {
        let samples = self.chain.sample(self.config.segments_per_curve);
        let mut out = Vec::with_capacity(6 * (samples[0].len() + samples[1].len()));
        for (points, color) in samples.iter().zip(self.colors) {
            for &p in points {
                push_vertex(&mut out, p, color);
            }
        }
        out
    }

    /// Number of vertices [`Self::curve_vertices`] produces.
    #[must_use]
    pub fn curve_vertex_count(&self) -> usize {
        2 * (self.config.segments_per_curve.max(1) + 1)
    }

    /// The P2-P3-P4 polyline through the joint.
    #[must_use]
    pub fn tangent_vertices(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(18);
        for id in [ControlPointId::P2, ControlPointId::P3, ControlPointId::P4] {
            push_vertex(&mut out, self.chain.point(id), self.config.tangent_color);
        }
        out
    }

    /// One small coloured sphere per control point, all sharing the cached
    /// index buffer.
    pub fn marker_meshes(&self, cache: &mut GeomCache) -> Result<Vec<GeomMesh>, GeomError> {
        let bands = self.config.marker_bands;
        self.chain
            .points()
            .iter()
            .zip(self.config.marker_palette)
            .map(|(&center, color)| {
                let mesh = generate_sphere_mesh_cached(
                    self.config.marker_radius,
                    center,
                    bands,
                    bands,
                    cache,
                )?;
                let colors = vec![color.to_array(); mesh.vertex_count()];
                Ok(mesh.with_colors(colors))
            })
            .collect()
    }
}

fn push_vertex(out: &mut Vec<f32>, p: Point3, c: Rgb) {
    out.extend([p.x, p.y, p.z, c.r, c.g, c.b].map(narrow));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Tolerance;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn defaults_start_continuous() {
        let editor = BezierEditor::default();
        assert!(editor.chain().is_tangent_continuous(Tolerance::DEFAULT));
        let p3 = editor.chain().point(ControlPointId::P3);
        assert!(Tolerance::DEFAULT.approx_eq_point3(p3, Point3::new(0.0, 0.15, 0.2)));
    }

    #[test]
    fn pick_uses_half_open_boxes() {
        let editor = BezierEditor::default();
        assert_eq!(editor.pick(0.66, -0.09), Some(ControlPointId::P0));
        assert_eq!(editor.pick(-0.84, 0.46), Some(ControlPointId::P6));
        assert_eq!(editor.pick(0.3, -0.9), None);
    }

    #[test]
    fn pick_prefers_the_nearest_point() {
        let mut editor = BezierEditor::default();
        editor
            .set_point(ControlPointId::P5, Point3::new(0.62, -0.1, 0.2))
            .expect("finite");
        assert_eq!(editor.pick(0.625, -0.1), Some(ControlPointId::P5));
        assert_eq!(editor.pick(0.645, -0.1), Some(ControlPointId::P0));
    }

    #[test]
    fn drag_moves_only_while_active() {
        let mut editor = BezierEditor::default();
        assert!(!editor.drag_to(0.0, 0.0));
        assert_eq!(editor.begin_drag(0.0, 0.8), Some(ControlPointId::P2));
        assert!(editor.drag_to(0.2, 0.6));
        editor.end_drag();
        assert!(!editor.drag_to(0.9, 0.9));

        let chain = editor.chain();
        assert_eq!(chain.point(ControlPointId::P2), Point3::new(0.2, 0.6, 0.2));
        assert!(chain.is_tangent_continuous(Tolerance::DEFAULT));
    }

    #[test]
    fn reset_restores_default_points() {
        let mut editor = BezierEditor::default();
        editor.move_point(ControlPointId::P3, 0.4, 0.4);
        editor.reset();
        assert_eq!(editor, BezierEditor::default());
    }

    #[test]
    fn curve_buffer_layout() {
        let editor = BezierEditor::default();
        let buf = editor.curve_vertices();
        assert_eq!(editor.curve_vertex_count(), 202);
        assert_eq!(buf.len(), 202 * 6);
        assert_eq!(&buf[0..6], &[0.65, -0.1, 0.2, 1.0, 0.0, 0.0]);
        assert_eq!(&buf[101 * 6 + 3..101 * 6 + 6], &[0.0, 1.0, 1.0]);
        // segment B starts where A ends
        assert_eq!(&buf[100 * 6..100 * 6 + 3], &buf[101 * 6..101 * 6 + 3]);
    }

    #[test]
    fn tangent_line_is_white_through_the_joint() {
        let editor = BezierEditor::default();
        let buf = editor.tangent_vertices();
        assert_eq!(buf.len(), 18);
        assert!(buf.chunks_exact(6).all(|v| v[3..] == [1.0_f32; 3]));
    }

    #[test]
    fn random_colours_respect_segment_ranges() {
        let mut editor = BezierEditor::default();
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..50 {
            editor.randomize_colors(&mut rng);
            let [a, b] = editor.colors();
            assert!(a.r >= 0.5 && a.r < 1.0);
            assert!(b.g >= 0.15 && b.g < 1.0);
        }
        editor.recolor(&mut rng);
    }

    #[test]
    fn markers_use_the_palette_and_share_indices() {
        let editor = BezierEditor::default();
        let mut cache = GeomCache::new();
        let markers = editor.marker_meshes(&mut cache).expect("markers");
        assert_eq!(markers.len(), 7);
        assert_eq!(markers[3].colors.as_ref().expect("colors")[0], [1.0, 1.0, 0.0]);
        assert_eq!(markers[0].vertex_count(), 64);
        assert_eq!(cache.stats().sphere_index_hits, 6);
    }
}
