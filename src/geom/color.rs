//! Vertex colours: fixed palettes, per-vertex ramps, and random sampling.

use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0);
    pub const YELLOW: Self = Self::new(1.0, 1.0, 0.0);
    pub const PURPLE: Self = Self::new(1.0, 0.0, 1.0);
    pub const CYAN: Self = Self::new(0.0, 1.0, 1.0);

    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Builds a colour from 0-255 channel values, clamped to `[0, 1]`.
    #[must_use]
    pub fn from_byte_units(r: f64, g: f64, b: f64) -> Self {
        Self::new(r / 255.0, g / 255.0, b / 255.0).clamped()
    }

    #[must_use]
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn to_f32_array(self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<Rgb> for [f64; 3] {
    fn from(c: Rgb) -> Self {
        c.to_array()
    }
}

/// Marker colours for control points P0..P6.
pub const MARKER_PALETTE: [Rgb; 7] = [
    Rgb::RED,
    Rgb::GREEN,
    Rgb::BLUE,
    Rgb::YELLOW,
    Rgb::PURPLE,
    Rgb::CYAN,
    Rgb::WHITE,
];

// ─────────────────────────────────────────────────────────────────────────────
// Random colours
// ─────────────────────────────────────────────────────────────────────────────

/// Half-open channel ranges for random colour sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorRange {
    pub r: (f64, f64),
    pub g: (f64, f64),
    pub b: (f64, f64),
}

impl ColorRange {
    /// Every channel in `[0, 1)`.
    pub const UNIT: Self = Self::new((0.0, 1.0), (0.0, 1.0), (0.0, 1.0));

    #[must_use]
    pub const fn new(r: (f64, f64), g: (f64, f64), b: (f64, f64)) -> Self {
        Self { r, g, b }
    }

    /// Draws one colour. A channel whose range is empty collapses to its
    /// lower bound.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Rgb {
        Rgb::new(
            sample_channel(rng, self.r),
            sample_channel(rng, self.g),
            sample_channel(rng, self.b),
        )
    }
}

impl Default for ColorRange {
    fn default() -> Self {
        Self::UNIT
    }
}

fn sample_channel<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (f64, f64)) -> f64 {
    if lo < hi { rng.random_range(lo..hi) } else { lo }
}

// ─────────────────────────────────────────────────────────────────────────────
// Per-vertex ramps
// ─────────────────────────────────────────────────────────────────────────────

/// Linear per-vertex colour ramp, expressed in 0-255 channel units.
///
/// Vertex `i` gets `(start + i·step) / 255`, clamped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorRamp {
    pub start: [f64; 3],
    pub step: [f64; 3],
}

impl ColorRamp {
    #[must_use]
    pub const fn new(start: [f64; 3], step: [f64; 3]) -> Self {
        Self { start, step }
    }

    /// A ramp that never changes.
    #[must_use]
    pub fn solid(color: Rgb) -> Self {
        Self::new(
            [color.r * 255.0, color.g * 255.0, color.b * 255.0],
            [0.0; 3],
        )
    }

    #[must_use]
    pub fn color_at(&self, index: usize) -> Rgb {
        let i = index as f64;
        Rgb::from_byte_units(
            self.start[0] + i * self.step[0],
            self.start[1] + i * self.step[1],
            self.start[2] + i * self.step[2],
        )
    }

    #[must_use]
    pub fn colors(&self, count: usize) -> Vec<[f64; 3]> {
        (0..count).map(|i| self.color_at(i).to_array()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn ramp_clamps_channels() {
        let ramp = ColorRamp::new([255.0, 255.0, 0.0], [-0.4, -0.4, 0.0]);
        assert_eq!(ramp.color_at(0), Rgb::YELLOW);
        let far = ramp.color_at(10_000);
        assert_eq!(far, Rgb::BLACK);
    }

    #[test]
    fn solid_ramp_is_constant() {
        let ramp = ColorRamp::solid(Rgb::CYAN);
        assert_eq!(ramp.colors(3), vec![[0.0, 1.0, 1.0]; 3]);
    }

    #[test]
    fn sampled_colours_stay_in_range() {
        let range = ColorRange::new((0.5, 1.0), (0.15, 1.0), (0.0, 0.0));
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let c = range.sample(&mut rng);
            assert!((0.5..1.0).contains(&c.r));
            assert!((0.15..1.0).contains(&c.g));
            assert_eq!(c.b, 0.0);
        }
    }
}
