//! Free-look camera driven by pitch/yaw/roll commands.
//!
//! The look-at target is the initial view vector rotated by an orientation
//! quaternion; each command composes one fixed-step rotation into it.

use serde::Serialize;

use crate::geom::{Point3, Quaternion, Transform, Vec3};
use crate::sim::SUN_RADIUS;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraConfig {
    pub eye: Point3,
    /// View vector before any rotation.
    pub initial_target: Vec3,
    pub up: Vec3,
    /// Rotation per command, degrees.
    pub step_degrees: f64,
    /// Frustum half-extent scale `s`; the half-extent is `s · range`.
    pub scale: f64,
    pub zoom_factor: f64,
    /// Near plane distance `r`; the far plane sits at `3r`.
    pub range: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Point3::new(0.0, 0.0, -100.0),
            initial_target: Vec3::new(0.0, 0.0, -2.0 * SUN_RADIUS),
            up: Vec3::Y,
            step_degrees: 10.0,
            scale: 0.018,
            zoom_factor: 1.1,
            range: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CameraCommand {
    PitchUp,
    PitchDown,
    YawLeft,
    YawRight,
    RollLeft,
    RollRight,
    ZoomIn,
    ZoomOut,
    Reset,
}

impl CameraCommand {
    /// Parses the snake_case command name used by the page bindings.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let command = match name.trim().to_ascii_lowercase().as_str() {
            "pitch_up" => Self::PitchUp,
            "pitch_down" => Self::PitchDown,
            "yaw_left" => Self::YawLeft,
            "yaw_right" => Self::YawRight,
            "roll_left" => Self::RollLeft,
            "roll_right" => Self::RollRight,
            "zoom_in" => Self::ZoomIn,
            "zoom_out" => Self::ZoomOut,
            "reset" => Self::Reset,
            _ => return None,
        };
        Some(command)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frustum {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
    pub near: f64,
    pub far: f64,
}

impl Frustum {
    /// OpenGL-style perspective matrix for this frustum.
    #[must_use]
    pub fn projection(&self) -> Transform {
        let Self {
            left: l,
            right: r,
            bottom: b,
            top: t,
            near: n,
            far: f,
        } = *self;
        Transform::from_rows([
            [2.0 * n / (r - l), 0.0, (r + l) / (r - l), 0.0],
            [0.0, 2.0 * n / (t - b), (t + b) / (t - b), 0.0],
            [0.0, 0.0, -(f + n) / (f - n), -2.0 * f * n / (f - n)],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }
}

/// Right-handed view matrix. `None` when `eye == target` or `up` is
/// parallel to the viewing direction.
#[must_use]
pub fn look_at(eye: Point3, target: Point3, up: Vec3) -> Option<Transform> {
    let f = target.sub_point(eye).normalized()?;
    let s = f.cross(up).normalized()?;
    let u = s.cross(f);
    let e = eye.to_vec3();
    Some(Transform::from_rows([
        [s.x, s.y, s.z, -s.dot(e)],
        [u.x, u.y, u.z, -u.dot(e)],
        [-f.x, -f.y, -f.z, f.dot(e)],
        [0.0, 0.0, 0.0, 1.0],
    ]))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuaternionCamera {
    orientation: Quaternion,
    scale: f64,
    config: CameraConfig,
}

impl Default for QuaternionCamera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl QuaternionCamera {
    #[must_use]
    pub const fn new(config: CameraConfig) -> Self {
        Self {
            orientation: Quaternion::IDENTITY,
            scale: config.scale,
            config,
        }
    }

    pub fn apply(&mut self, command: CameraCommand) {
        let step = self.config.step_degrees;
        match command {
            CameraCommand::PitchUp => self.rotate(Vec3::X, step),
            CameraCommand::PitchDown => self.rotate(Vec3::X, -step),
            CameraCommand::YawLeft => self.rotate(Vec3::Y, step),
            CameraCommand::YawRight => self.rotate(Vec3::Y, -step),
            CameraCommand::RollLeft => self.rotate(Vec3::Z, step),
            CameraCommand::RollRight => self.rotate(Vec3::Z, -step),
            CameraCommand::ZoomIn => self.scale /= self.config.zoom_factor,
            CameraCommand::ZoomOut => self.scale *= self.config.zoom_factor,
            CameraCommand::Reset => {
                self.orientation = Quaternion::IDENTITY;
                self.scale = self.config.scale;
            }
        }
    }

    /// Composes a rotation of `degrees` about `axis` into the orientation.
    /// A zero axis leaves the orientation unchanged.
    pub fn rotate(&mut self, axis: Vec3, degrees: f64) {
        let step = Quaternion::from_axis_angle(axis, degrees.to_radians());
        self.orientation = step.compose(self.orientation);
    }

    #[must_use]
    pub const fn orientation(&self) -> Quaternion {
        self.orientation
    }

    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Current view vector.
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.orientation.rotate_vec3(self.config.initial_target)
    }

    #[must_use]
    pub fn frustum(&self) -> Frustum {
        let h = self.scale * self.config.range;
        Frustum {
            left: -h,
            right: h,
            bottom: -h,
            top: h,
            near: self.config.range,
            far: 3.0 * self.config.range,
        }
    }

    /// View matrix looking from the eye towards the rotated target. Falls
    /// back to identity when the view direction is degenerate.
    #[must_use]
    pub fn view_matrix(&self) -> Transform {
        let target = Point3::ORIGIN.add_vec(self.target());
        look_at(self.config.eye, target, self.config.up).unwrap_or_else(|| {
            log::debug!("degenerate camera direction; using identity view");
            Transform::identity()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Tolerance;

    #[test]
    fn opposite_commands_cancel() {
        let mut cam = QuaternionCamera::default();
        let start = cam.target();
        for (a, b) in [
            (CameraCommand::PitchUp, CameraCommand::PitchDown),
            (CameraCommand::YawLeft, CameraCommand::YawRight),
            (CameraCommand::RollLeft, CameraCommand::RollRight),
        ] {
            cam.apply(a);
            cam.apply(b);
        }
        assert!(Tolerance::new(1e-12).approx_eq_vec3(cam.target(), start));
    }

    #[test]
    fn rotation_keeps_view_vector_length() {
        let mut cam = QuaternionCamera::default();
        let len = cam.target().length();
        for _ in 0..37 {
            cam.apply(CameraCommand::YawLeft);
            cam.apply(CameraCommand::PitchUp);
        }
        assert!(Tolerance::new(1e-12).approx_eq_f64(cam.target().length(), len));
        assert!(Tolerance::new(1e-12).approx_eq_f64(cam.orientation().norm(), 1.0));
    }

    #[test]
    fn zoom_scales_the_frustum() {
        let mut cam = QuaternionCamera::default();
        let tol = Tolerance::new(1e-12);
        assert!(tol.approx_eq_f64(cam.frustum().right, 0.9));
        cam.apply(CameraCommand::ZoomOut);
        assert!(tol.approx_eq_f64(cam.frustum().right, 0.99));
        cam.apply(CameraCommand::ZoomIn);
        assert!(tol.approx_eq_f64(cam.frustum().right, 0.9));
        let f = cam.frustum();
        assert_eq!((f.near, f.far), (50.0, 150.0));
    }

    #[test]
    fn reset_restores_orientation_and_zoom() {
        let mut cam = QuaternionCamera::default();
        cam.apply(CameraCommand::RollLeft);
        cam.apply(CameraCommand::ZoomOut);
        cam.apply(CameraCommand::Reset);
        assert_eq!(cam.orientation(), Quaternion::IDENTITY);
        assert_eq!(cam.scale(), 0.018);
    }

    #[test]
    fn look_at_puts_target_on_negative_z() {
        let eye = Point3::new(0.0, 0.0, 5.0);
        let view = look_at(eye, Point3::ORIGIN, Vec3::Y).expect("view");
        let p = view.apply_point(Point3::ORIGIN);
        assert!(Tolerance::DEFAULT.approx_eq_point3(p, Point3::new(0.0, 0.0, -5.0)));
        assert!(look_at(eye, eye, Vec3::Y).is_none());
    }

    #[test]
    fn command_names_parse() {
        assert_eq!(CameraCommand::from_name(" Yaw_Left "), Some(CameraCommand::YawLeft));
        assert_eq!(CameraCommand::from_name("reset"), Some(CameraCommand::Reset));
        assert_eq!(CameraCommand::from_name("spin"), None);
    }
}
