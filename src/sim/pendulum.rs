//! Angle integrators for the two pendulum demos.
//!
//! [`Rotator`] spins a rigid arm at a constant rate scaled by elapsed time.
//! [`Pendulum`] is a damped free pendulum advanced one nominal frame at a time
//! with semi-implicit Euler. Angles are in degrees throughout.

use std::f64::consts::TAU;

use serde::Serialize;

use crate::geom::{GeomError, Point2, Transform, Vec3};

// ─────────────────────────────────────────────────────────────────────────────
// Constant-rate rotator
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RotatorConfig {
    /// Initial and reset rate, degrees per second.
    pub default_step: f64,
    /// Change applied by [`Rotator::increase`] and [`Rotator::decrease`].
    pub step_increment: f64,
}

impl Default for RotatorConfig {
    fn default() -> Self {
        Self {
            default_step: 45.0,
            step_increment: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rotator {
    angle: f64,
    step: f64,
    config: RotatorConfig,
}

impl Default for Rotator {
    fn default() -> Self {
        Self::new(RotatorConfig::default())
    }
}

impl Rotator {
    #[must_use]
    pub fn new(config: RotatorConfig) -> Self {
        Self {
            angle: 0.0,
            step: config.default_step,
            config,
        }
    }

    /// Advances by `dt` seconds and returns the new angle in `[0, 360)`.
    /// A negative rate turns the arm backwards. Non-finite `dt` is ignored.
    pub fn advance(&mut self, dt: f64) -> f64 {
        if !dt.is_finite() {
            log::debug!("rotator ignoring non-finite dt {dt}");
            return self.angle;
        }
        self.angle = (self.angle + self.step * dt).rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        if self.angle >= 360.0 {
            self.angle = 0.0;
        }
        self.angle
    }

    #[must_use]
    pub const fn angle(&self) -> f64 {
        self.angle
    }

    #[must_use]
    pub const fn step(&self) -> f64 {
        self.step
    }

    pub fn set_step(&mut self, step: f64) {
        if step.is_finite() {
            self.step = step;
        }
    }

    pub fn increase(&mut self) {
        self.step += self.config.step_increment;
    }

    pub fn decrease(&mut self) {
        self.step -= self.config.step_increment;
    }

    pub fn stop(&mut self) {
        self.step = 0.0;
    }

    /// Restores the default rate. The current angle is kept.
    pub fn reset(&mut self) {
        self.step = self.config.default_step;
    }

    /// Rotation about +Z by the current angle.
    #[must_use]
    pub fn model_transform(&self) -> Transform {
        z_rotation(self.angle)
    }
}

fn z_rotation(degrees: f64) -> Transform {
    Transform::rotate_axis(Vec3::Z, degrees.to_radians()).unwrap_or_default()
}

// ─────────────────────────────────────────────────────────────────────────────
// Damped free pendulum
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PendulumConfig {
    pub gravity: f64,
    pub length: f64,
    /// Per-frame velocity multiplier in `(0, 1]`.
    pub damping: f64,
    pub initial_angle: f64,
    pub initial_velocity: f64,
    /// Change applied by the gravity up/down controls.
    pub gravity_increment: f64,
    /// Duration of one nominal integration frame, seconds.
    pub frame_seconds: f64,
    /// Frames [`Pendulum::advance`] will run per call before dropping the
    /// remaining backlog.
    pub max_catch_up_frames: u32,
}

impl Default for PendulumConfig {
    fn default() -> Self {
        Self {
            gravity: 30.0,
            length: 175.0,
            damping: 0.995,
            initial_angle: 45.0,
            initial_velocity: 0.0,
            gravity_increment: 10.0,
            frame_seconds: 1.0 / 60.0,
            max_catch_up_frames: 120,
        }
    }
}

impl PendulumConfig {
    pub fn validate(&self) -> Result<(), GeomError> {
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(GeomError::invalid(
                "damping",
                format!("must be in (0, 1], got {}", self.damping),
            ));
        }
        if !self.length.is_finite() || self.length <= 0.0 {
            return Err(GeomError::invalid(
                "length",
                format!("must be finite and positive, got {}", self.length),
            ));
        }
        if !self.frame_seconds.is_finite() || self.frame_seconds <= 0.0 {
            return Err(GeomError::invalid(
                "frame_seconds",
                format!("must be finite and positive, got {}", self.frame_seconds),
            ));
        }
        for (name, value) in [
            ("gravity", self.gravity),
            ("initial_angle", self.initial_angle),
            ("initial_velocity", self.initial_velocity),
            ("gravity_increment", self.gravity_increment),
        ] {
            if !value.is_finite() {
                return Err(GeomError::invalid(name, format!("must be finite, got {value}")));
            }
        }
        Ok(())
    }
}

/// Snapshot of the integrator state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PendulumState {
    pub angle: f64,
    pub angular_velocity: f64,
    pub angular_acceleration: f64,
    pub gravity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pendulum {
    state: PendulumState,
    accumulator: f64,
    config: PendulumConfig,
}

impl Pendulum {
    pub fn new(config: PendulumConfig) -> Result<Self, GeomError> {
        config.validate()?;
        Ok(Self {
            state: initial_state(&config),
            accumulator: 0.0,
            config,
        })
    }

    /// One nominal frame:
    /// `a = -(g/L)·sin θ`, `ω += a`, `θ += ω`, `ω *= damping`.
    pub fn step(&mut self) -> f64 {
        let s = &mut self.state;
        s.angular_acceleration = -(s.gravity / self.config.length) * s.angle.to_radians().sin();
        s.angular_velocity += s.angular_acceleration;
        s.angle += s.angular_velocity;
        s.angular_velocity *= self.config.damping;
        s.angle
    }

    /// Runs as many whole frames as `dt` seconds (plus any carried remainder)
    /// cover and returns how many ran.
    pub fn advance(&mut self, dt: f64) -> u32 {
        if !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        self.accumulator += dt;
        let frame = self.config.frame_seconds;
        let mut frames = 0;
        while self.accumulator >= frame {
            if frames == self.config.max_catch_up_frames {
                log::debug!(
                    "pendulum dropping {:.3}s of backlog after {frames} frames",
                    self.accumulator
                );
                self.accumulator = 0.0;
                break;
            }
            self.accumulator -= frame;
            self.step();
            frames += 1;
        }
        frames
    }

    #[must_use]
    pub const fn state(&self) -> PendulumState {
        self.state
    }

    #[must_use]
    pub const fn angle(&self) -> f64 {
        self.state.angle
    }

    #[must_use]
    pub const fn angular_velocity(&self) -> f64 {
        self.state.angular_velocity
    }

    #[must_use]
    pub const fn gravity(&self) -> f64 {
        self.state.gravity
    }

    #[must_use]
    pub const fn config(&self) -> &PendulumConfig {
        &self.config
    }

    pub fn set_gravity(&mut self, gravity: f64) {
        if gravity.is_finite() {
            self.state.gravity = gravity;
        }
    }

    pub fn increase_gravity(&mut self) {
        self.state.gravity += self.config.gravity_increment;
    }

    pub fn decrease_gravity(&mut self) {
        self.state.gravity -= self.config.gravity_increment;
    }

    /// Switches gravity off; the bob coasts until damping stops it.
    pub fn stop(&mut self) {
        self.state.gravity = 0.0;
    }

    pub fn reset(&mut self) {
        self.state = initial_state(&self.config);
        self.accumulator = 0.0;
    }

    #[must_use]
    pub fn model_transform(&self) -> Transform {
        z_rotation(self.state.angle)
    }
}

const fn initial_state(config: &PendulumConfig) -> PendulumState {
    PendulumState {
        angle: config.initial_angle,
        angular_velocity: config.initial_velocity,
        angular_acceleration: 0.0,
        gravity: config.gravity,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Bob geometry
// ─────────────────────────────────────────────────────────────────────────────

/// Rest position of the bob centre in clip space.
pub const BOB_CENTER: Point2 = Point2::new(0.0, -0.8);
pub const BOB_RADIUS: f64 = 0.1;
/// The bob is drawn as a hexagon.
pub const BOB_SIDES: u32 = 6;

/// Regular polygon outline, first vertex at angle 0, counter-clockwise.
pub fn bob_outline(center: Point2, radius: f64, sides: u32) -> Result<Vec<Point2>, GeomError> {
    if sides < 3 {
        return Err(GeomError::invalid("sides", format!("need at least 3, got {sides}")));
    }
    if !radius.is_finite() || radius < 0.0 {
        return Err(GeomError::invalid(
            "radius",
            format!("must be finite and non-negative, got {radius}"),
        ));
    }
    Ok((0..sides)
        .map(|i| {
            let a = TAU * f64::from(i) / f64::from(sides);
            Point2::new(center.x + radius * a.cos(), center.y + radius * a.sin())
        })
        .collect())
}

/// Triangle-fan vertex list `[centre, v0, v1, ..., v0]` as flat `x, y` pairs.
pub fn bob_fan(center: Point2, radius: f64, sides: u32) -> Result<Vec<f32>, GeomError> {
    let outline = bob_outline(center, radius, sides)?;
    let first = outline.first().copied().unwrap_or(center);
    Ok(std::iter::once(center)
        .chain(outline)
        .chain(std::iter::once(first))
        .flat_map(|p| [crate::geom::narrow(p.x), crate::geom::narrow(p.y)])
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Tolerance;

    #[test]
    fn rotator_scales_with_elapsed_time_and_wraps() {
        let mut r = Rotator::default();
        assert!(Tolerance::DEFAULT.approx_eq_f64(r.advance(1.0), 45.0));
        r.advance(7.0);
        assert!(Tolerance::DEFAULT.approx_eq_f64(r.angle(), 0.0));
        r.set_step(-90.0);
        assert!(Tolerance::DEFAULT.approx_eq_f64(r.advance(1.0), 270.0));
    }

    #[test]
    fn rotator_controls() {
        let mut r = Rotator::default();
        r.increase();
        r.increase();
        assert!(Tolerance::DEFAULT.approx_eq_f64(r.step(), 65.0));
        r.decrease();
        assert!(Tolerance::DEFAULT.approx_eq_f64(r.step(), 55.0));
        r.stop();
        let before = r.angle();
        r.advance(3.0);
        assert_eq!(r.angle(), before);
        r.reset();
        assert_eq!(r.step(), 45.0);
    }

    #[test]
    fn zero_gravity_velocity_decays_geometrically() {
        let mut p = Pendulum::new(PendulumConfig {
            gravity: 0.0,
            initial_velocity: 2.0,
            ..PendulumConfig::default()
        })
        .expect("config");
        for _ in 0..100 {
            p.step();
        }
        let expected = 2.0 * 0.995_f64.powi(100);
        assert!(Tolerance::new(1e-12).approx_eq_f64(p.angular_velocity(), expected));
    }

    #[test]
    fn damped_swing_loses_amplitude() {
        let mut p = Pendulum::new(PendulumConfig::default()).expect("config");
        let mut peaks = Vec::new();
        let mut prev_velocity = p.angular_velocity();
        for _ in 0..5_000 {
            p.step();
            let v = p.angular_velocity();
            if prev_velocity > 0.0 && v <= 0.0 {
                peaks.push(p.angle().abs());
            }
            prev_velocity = v;
        }
        assert!(peaks.len() >= 3, "expected several swings, got {}", peaks.len());
        assert!(peaks.windows(2).all(|w| w[1] < w[0]));
        assert!(peaks[0] < 45.0);
    }

    #[test]
    fn advance_runs_whole_frames_and_carries_remainder() {
        let mut p = Pendulum::new(PendulumConfig::default()).expect("config");
        assert_eq!(p.advance(2.5 / 60.0), 2);
        assert_eq!(p.advance(0.6 / 60.0), 1);
        assert_eq!(p.advance(0.0), 0);
        assert_eq!(p.advance(f64::NAN), 0);
        assert_eq!(p.advance(100.0), 120);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut p = Pendulum::new(PendulumConfig::default()).expect("config");
        p.increase_gravity();
        for _ in 0..10 {
            p.step();
        }
        p.stop();
        assert_eq!(p.gravity(), 0.0);
        p.reset();
        let s = p.state();
        assert_eq!((s.angle, s.angular_velocity, s.gravity), (45.0, 0.0, 30.0));
    }

    #[test]
    fn config_rejects_bad_damping_and_length() {
        for damping in [0.0, -0.5, 1.5, f64::NAN] {
            let cfg = PendulumConfig {
                damping,
                ..PendulumConfig::default()
            };
            assert!(Pendulum::new(cfg).is_err(), "damping {damping}");
        }
        let cfg = PendulumConfig {
            length: 0.0,
            ..PendulumConfig::default()
        };
        assert!(Pendulum::new(cfg).is_err());
    }

    #[test]
    fn hexagon_bob_outline() {
        let pts = bob_outline(BOB_CENTER, BOB_RADIUS, 6).expect("outline");
        assert_eq!(pts.len(), 6);
        let tol = Tolerance::new(1e-12);
        assert!(tol.approx_eq_f64(pts[0].x, 0.1));
        assert!(tol.approx_eq_f64(pts[3].x, -0.1));
        assert!(tol.approx_eq_f64(pts[3].y, -0.8));
        assert!(bob_outline(BOB_CENTER, BOB_RADIUS, 2).is_err());

        let fan = bob_fan(BOB_CENTER, BOB_RADIUS, 6).expect("fan");
        assert_eq!(fan.len(), 2 * 8);
        assert_eq!(&fan[2..4], &fan[14..16]);
    }
}
