//! Axis-angle quaternions for free camera orientation.
//!
//! Components are stored as `(x, y, z, w)` with `w` the scalar part. A vector
//! `v` is rotated by the sandwich product `q ⊗ (v, 0) ⊗ q̄`.

use std::ops::Mul;

use serde::Serialize;

use super::core::{Transform, Vec3};
use super::error::GeomError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quaternion {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Pure quaternion `(v, 0)`.
    #[must_use]
    pub const fn from_vec3(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z, 0.0)
    }

    /// Unit rotation quaternion `(sin(a/2)·axis, cos(a/2))`.
    ///
    /// The axis is normalized first; a zero-length or non-finite axis is a
    /// [`GeomError::DegenerateInput`].
    pub fn try_from_axis_angle(axis: Vec3, angle: f64) -> Result<Self, GeomError> {
        let axis = axis
            .normalized()
            .ok_or(GeomError::DegenerateInput("rotation axis has zero length"))?;
        let half = angle * 0.5;
        let s = half.sin();
        Ok(Self::new(axis.x * s, axis.y * s, axis.z * s, half.cos()))
    }

    /// Same as [`Self::try_from_axis_angle`] but resolves a degenerate axis
    /// to the identity rotation.
    #[must_use]
    pub fn from_axis_angle(axis: Vec3, angle: f64) -> Self {
        Self::try_from_axis_angle(axis, angle).unwrap_or_else(|err| {
            log::debug!("{err}; using identity rotation");
            Self::IDENTITY
        })
    }

    #[must_use]
    pub fn norm(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    /// Unit quaternion in the same direction. A zero or non-finite norm
    /// yields the identity instead of NaN components.
    #[must_use]
    pub fn normalized(self) -> Self {
        let n = self.norm();
        if n.is_finite() && n > 0.0 {
            let inv = 1.0 / n;
            Self::new(self.x * inv, self.y * inv, self.z * inv, self.w * inv)
        } else {
            log::debug!("quaternion norm is {n}; using identity");
            Self::IDENTITY
        }
    }

    #[must_use]
    pub const fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Raw Hamilton product `self ⊗ rhs`.
    #[must_use]
    pub const fn hamilton(self, b: Self) -> Self {
        let a = self;
        Self::new(
            a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        )
    }

    /// Rotation composition: apply `rhs` first, then `self`. The product is
    /// renormalized so repeated composition does not drift off the unit sphere.
    #[must_use]
    pub fn compose(self, rhs: Self) -> Self {
        self.hamilton(rhs).normalized()
    }

    /// Rotates `v` with the sandwich product. `self` is normalized before use;
    /// the vector keeps its length.
    #[must_use]
    pub fn rotate_vec3(self, v: Vec3) -> Vec3 {
        let q = self.normalized();
        let r = q.hamilton(Self::from_vec3(v)).hamilton(q.conjugate());
        Vec3::new(r.x, r.y, r.z)
    }

    /// Equivalent rotation matrix.
    #[must_use]
    pub fn to_transform(self) -> Transform {
        let q = self.normalized();
        let (x, y, z, w) = (q.x, q.y, q.z, q.w);
        Transform::from_rows([
            [
                1.0 - 2.0 * (y * y + z * z),
                2.0 * (x * y - z * w),
                2.0 * (x * z + y * w),
                0.0,
            ],
            [
                2.0 * (x * y + z * w),
                1.0 - 2.0 * (x * x + z * z),
                2.0 * (y * z - x * w),
                0.0,
            ],
            [
                2.0 * (x * z - y * w),
                2.0 * (y * z + x * w),
                1.0 - 2.0 * (x * x + y * y),
                0.0,
            ],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quaternion {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(rhs)
    }
}

/// Rotates `vector` about `axis` by `angle` radians.
///
/// A zero-length axis leaves the vector unchanged.
#[must_use]
pub fn rotate(vector: Vec3, axis: Vec3, angle: f64) -> Vec3 {
    Quaternion::from_axis_angle(axis, angle).rotate_vec3(vector)
}
