use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::Serialize;

// ─────────────────────────────────────────────────────────────────────────────
// Vec3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn from_array([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[must_use]
    pub const fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[must_use]
    pub const fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    #[must_use]
    pub const fn cross(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    /// Unit vector in the same direction, or `None` for zero/non-finite input.
    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        (len.is_finite() && len > 0.0).then(|| self / len)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.to_array().iter().all(|c| c.is_finite())
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;
    fn mul(self, v: Vec3) -> Vec3 {
        v * self
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, s: f64) -> Self {
        Self::new(self.x / s, self.y / s, self.z / s)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Point3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn from_array([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Position vector from the origin.
    #[must_use]
    pub const fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[must_use]
    pub const fn add_vec(self, v: Vec3) -> Self {
        Self::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }

    #[must_use]
    pub const fn sub_point(self, rhs: Self) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }

    #[must_use]
    pub fn midpoint(self, rhs: Self) -> Self {
        Self::new(
            (self.x + rhs.x) * 0.5,
            (self.y + rhs.y) * 0.5,
            (self.z + rhs.z) * 0.5,
        )
    }

    /// `2 * center - self`.
    #[must_use]
    pub fn reflect_through(self, center: Self) -> Self {
        Self::new(
            2.0 * center.x - self.x,
            2.0 * center.y - self.y,
            2.0 * center.z - self.z,
        )
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        self.sub_point(other).length()
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.to_vec3().is_finite()
    }
}

impl Add<Vec3> for Point3 {
    type Output = Self;
    fn add(self, rhs: Vec3) -> Self {
        self.add_vec(rhs)
    }
}

impl Sub for Point3 {
    type Output = Vec3;
    fn sub(self, rhs: Self) -> Vec3 {
        self.sub_point(rhs)
    }
}

/// Planar point used by the 2D demos.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn midpoint(self, rhs: Self) -> Self {
        Self::new((self.x + rhs.x) * 0.5, (self.y + rhs.y) * 0.5)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transform
// ─────────────────────────────────────────────────────────────────────────────

/// Row-major 4x4 affine transform acting on column vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    m: [[f64; 4]; 4],
}

impl Transform {
    #[must_use]
    pub const fn identity() -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    #[must_use]
    pub const fn from_rows(m: [[f64; 4]; 4]) -> Self {
        Self { m }
    }

    #[must_use]
    pub const fn translate(offset: Vec3) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, offset.x],
            [0.0, 1.0, 0.0, offset.y],
            [0.0, 0.0, 1.0, offset.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Right-handed rotation of `angle` radians about `axis`.
    /// `None` when the axis cannot be normalized.
    #[must_use]
    pub fn rotate_axis(axis: Vec3, angle: f64) -> Option<Self> {
        let Vec3 { x, y, z } = axis.normalized()?;
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        Some(Self::from_rows([
            [t * x * x + c, t * x * y - s * z, t * x * z + s * y, 0.0],
            [t * x * y + s * z, t * y * y + c, t * y * z - s * x, 0.0],
            [t * x * z - s * y, t * y * z + s * x, t * z * z + c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]))
    }

    /// `self * other`: `other` is applied first.
    #[must_use]
    pub fn compose(self, other: Self) -> Self {
        let m = std::array::from_fn(|i| {
            std::array::from_fn(|j| (0..4).map(|k| self.m[i][k] * other.m[k][j]).sum())
        });
        Self { m }
    }

    #[must_use]
    pub fn apply_point(self, p: Point3) -> Point3 {
        let v = self.apply_vec(p.to_vec3());
        Point3::new(v.x + self.m[0][3], v.y + self.m[1][3], v.z + self.m[2][3])
    }

    /// Applies the linear part only.
    #[must_use]
    pub fn apply_vec(self, v: Vec3) -> Vec3 {
        let row = |r: [f64; 4]| r[0] * v.x + r[1] * v.y + r[2] * v.z;
        Vec3::new(row(self.m[0]), row(self.m[1]), row(self.m[2]))
    }

    #[must_use]
    pub const fn as_matrix(&self) -> &[[f64; 4]; 4] {
        &self.m
    }

    /// Column-major f32 layout expected by `uniformMatrix4fv`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_column_major_f32(self) -> [f32; 16] {
        std::array::from_fn(|i| self.m[i % 4][i / 4] as f32)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Transform {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.compose(rhs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tolerance
// ─────────────────────────────────────────────────────────────────────────────

/// Absolute tolerance for geometric comparisons.
///
/// - `Tolerance::DEFAULT` - general comparisons (1e-9)
/// - `Tolerance::LOOSE` - error accumulated over long runs (1e-6)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub eps: f64,
}

impl Tolerance {
    pub const DEFAULT: Self = Self { eps: 1e-9 };
    pub const LOOSE: Self = Self { eps: 1e-6 };

    #[must_use]
    pub const fn new(eps: f64) -> Self {
        Self { eps }
    }

    #[must_use]
    pub fn approx_eq_f64(self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.eps
    }

    #[must_use]
    pub fn approx_eq_point3(self, a: Point3, b: Point3) -> bool {
        self.approx_eq_vec3(a.to_vec3(), b.to_vec3())
    }

    #[must_use]
    pub fn approx_eq_vec3(self, a: Vec3, b: Vec3) -> bool {
        (a - b).length_squared() <= self.eps * self.eps
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec3_operators() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(-a, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    }

    #[test]
    fn zero_vector_does_not_normalize() {
        assert!(Vec3::ZERO.normalized().is_none());
        assert!(Vec3::new(f64::NAN, 0.0, 0.0).normalized().is_none());
    }

    #[test]
    fn point3_midpoint_and_reflection() {
        let a = Point3::new(0.0, 0.8, 0.2);
        let b = Point3::new(0.0, -0.5, 0.2);
        let mid = a.midpoint(b);
        assert!(Tolerance::DEFAULT.approx_eq_point3(mid, Point3::new(0.0, 0.15, 0.2)));
        assert!(Tolerance::DEFAULT.approx_eq_point3(a.reflect_through(mid), b));
    }

    #[test]
    fn transform_applies_rhs_first() {
        let rotate = Transform::rotate_axis(Vec3::Z, std::f64::consts::FRAC_PI_2).expect("axis");
        let translate = Transform::translate(Vec3::new(1.0, 0.0, 0.0));
        let p = (rotate * translate).apply_point(Point3::ORIGIN);
        assert!(Tolerance::DEFAULT.approx_eq_point3(p, Point3::new(0.0, 1.0, 0.0)));
        assert!(Transform::rotate_axis(Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn column_major_layout() {
        let cols = Transform::translate(Vec3::new(1.0, 2.0, 3.0)).to_column_major_f32();
        assert_eq!(&cols[12..16], &[1.0, 2.0, 3.0, 1.0]);
        assert_eq!(cols[0], 1.0);
        assert_eq!(cols[1], 0.0);
    }
}
