//! Chaos-game point generation (Sierpinski triangle) and the random starfield
//! backdrop. Both take their randomness from an injected [`Rng`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::geom::{GeomError, Point2, Rgb, narrow};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChaosAnchor {
    pub position: Point2,
    pub color: Rgb,
}

impl ChaosAnchor {
    #[must_use]
    pub const fn new(position: Point2, color: Rgb) -> Self {
        Self { position, color }
    }
}

/// One generated point, coloured by the anchor it moved towards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChaosSample {
    pub point: Point2,
    pub color: Rgb,
    pub anchor: usize,
}

/// Upper bound on `ChaosGame::iterations` accepted for a vertex buffer.
pub const MAX_CHAOS_ITERATIONS: usize = 10_000_000;

/// Upper bound on the number of stars a starfield may hold.
pub const MAX_STARS: usize = 1_000_000;

const CHAOS_ROW: usize = 5;
const STAR_ROW: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChaosGame {
    pub anchors: [ChaosAnchor; 3],
    pub start: Point2,
    /// Nominal iteration count `N`; `N - 1` points are produced.
    pub iterations: usize,
}

impl Default for ChaosGame {
    fn default() -> Self {
        Self {
            anchors: [
                ChaosAnchor::new(Point2::new(-1.0, -1.0), Rgb::GREEN),
                ChaosAnchor::new(Point2::new(0.0, 1.0), Rgb::RED),
                ChaosAnchor::new(Point2::new(1.0, -1.0), Rgb::BLUE),
            ],
            start: Point2::ORIGIN,
            iterations: 40_000,
        }
    }
}

impl ChaosGame {
    #[must_use]
    pub fn with_iterations(iterations: usize) -> Self {
        Self {
            iterations,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), GeomError> {
        let finite = |p: Point2| p.x.is_finite() && p.y.is_finite();
        if !self.anchors.iter().all(|a| finite(a.position)) {
            return Err(GeomError::invalid("anchors", "positions must be finite"));
        }
        if !finite(self.start) {
            return Err(GeomError::invalid("start", "must be finite"));
        }
        if self.iterations > MAX_CHAOS_ITERATIONS {
            return Err(GeomError::invalid(
                "iterations",
                format!("{} exceeds {MAX_CHAOS_ITERATIONS}", self.iterations),
            ));
        }
        Ok(())
    }

    /// Number of points a full run yields.
    #[must_use]
    pub const fn point_count(&self) -> usize {
        self.iterations.saturating_sub(1)
    }

    /// Lazily generates the points. Calling again with an equally seeded
    /// source replays the same sequence.
    pub fn points<R: Rng>(&self, rng: R) -> ChaosPoints<R> {
        ChaosPoints {
            anchors: self.anchors,
            current: self.start,
            remaining: self.point_count(),
            rng,
        }
    }

    /// [`Self::points`] driven by a `StdRng` seeded with `seed`.
    #[must_use]
    pub fn seeded(&self, seed: u64) -> ChaosPoints<StdRng> {
        self.points(StdRng::seed_from_u64(seed))
    }

    /// Interleaved `[x, y, r, g, b]` rows: the three anchors first, then every
    /// generated point.
    pub fn vertex_buffer<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<f32>, GeomError> {
        self.validate()?;
        let rows = self.anchors.len().saturating_add(self.point_count());
        let mut out = Vec::with_capacity(rows.saturating_mul(CHAOS_ROW));
        for anchor in &self.anchors {
            push_row(&mut out, anchor.position, anchor.color);
        }
        for sample in self.points(rng) {
            push_row(&mut out, sample.point, sample.color);
        }
        Ok(out)
    }
}

fn push_row(out: &mut Vec<f32>, p: Point2, c: Rgb) {
    out.extend([p.x, p.y, c.r, c.g, c.b].map(narrow));
}

/// Iterator returned by [`ChaosGame::points`].
#[derive(Debug, Clone)]
pub struct ChaosPoints<R> {
    anchors: [ChaosAnchor; 3],
    current: Point2,
    remaining: usize,
    rng: R,
}

impl<R: Rng> Iterator for ChaosPoints<R> {
    type Item = ChaosSample;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let anchor = self.rng.random_range(0..self.anchors.len());
        let target = self.anchors[anchor];
        self.current = self.current.midpoint(target.position);
        Some(ChaosSample {
            point: self.current,
            color: target.color,
            anchor,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<R: Rng> ExactSizeIterator for ChaosPoints<R> {}

// ─────────────────────────────────────────────────────────────────────────────
// Starfield
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StarfieldOptions {
    pub x_start: f64,
    /// Exclusive upper bound for star x positions.
    pub x_end: f64,
    pub spacing: f64,
    /// Half-open range for the random y coordinate.
    pub y_range: (f64, f64),
    pub depth: f64,
    pub color: Rgb,
}

impl Default for StarfieldOptions {
    fn default() -> Self {
        let grey = 245.0 / 255.0;
        Self {
            x_start: -0.99,
            x_end: 1.0,
            spacing: 0.015,
            y_range: (0.0, 1.0),
            depth: 1.0,
            color: Rgb::new(grey, grey, grey),
        }
    }
}

impl StarfieldOptions {
    #[allow(clippy::cast_precision_loss)]
    pub fn validate(&self) -> Result<(), GeomError> {
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(GeomError::invalid(
                "spacing",
                format!("must be finite and positive, got {}", self.spacing),
            ));
        }
        if !self.x_start.is_finite() || !self.x_end.is_finite() {
            return Err(GeomError::invalid("x_range", "bounds must be finite"));
        }
        let (lo, hi) = self.y_range;
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            return Err(GeomError::invalid(
                "y_range",
                format!("expected a finite interval, got [{lo}, {hi})"),
            ));
        }
        let span = self.x_end - self.x_start;
        if span > 0.0 && (span / self.spacing).ceil() > MAX_STARS as f64 {
            return Err(GeomError::invalid(
                "spacing",
                format!(
                    "{} over [{}, {}) places more than {MAX_STARS} stars",
                    self.spacing, self.x_start, self.x_end
                ),
            ));
        }
        Ok(())
    }

    /// Stars placed at `x_start + i·spacing` while below `x_end`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn star_count(&self) -> usize {
        let span = self.x_end - self.x_start;
        if span <= 0.0 {
            return 0;
        }
        (span / self.spacing).ceil() as usize
    }
}

/// Interleaved `[x, y, z, r, g, b]` rows for the background stars.
pub fn starfield<R: Rng + ?Sized>(
    options: &StarfieldOptions,
    rng: &mut R,
) -> Result<Vec<f32>, GeomError> {
    options.validate()?;
    let count = options.star_count();
    let (lo, hi) = options.y_range;
    let c = options.color;
    let capacity = count
        .checked_mul(STAR_ROW)
        .ok_or_else(|| GeomError::invalid("spacing", format!("{count} stars overflow the buffer")))?;
    let mut out = Vec::with_capacity(capacity);
    for i in 0..count {
        let x = options.x_start + i as f64 * options.spacing;
        if x >= options.x_end {
            break;
        }
        let y = if lo < hi { rng.random_range(lo..hi) } else { lo };
        out.extend([x, y, options.depth, c.r, c.g, c.b].map(narrow));
    }
    Ok(out)
}
