//! Hierarchical orbital animation for the solar-system demos.
//!
//! Each body is a sphere that spins about its tilt axis and sits
//! `orbit_distance` along the rotated x axis of its parent frame:
//! `M = M_parent · R(axis, angle · rate) · T(orbit_distance, 0, 0)`.

use std::f64::consts::PI;

use serde::Serialize;

use crate::geom::{
    ColorRamp, GeomCache, GeomError, GeomMesh, Point3, Transform, Vec3,
    generate_sphere_mesh_cached,
};

/// Radius of the sun; every other body is a fraction of it.
pub const SUN_RADIUS: f64 = 0.35 / 1.35;

/// Shared spin axis of the demo, tilted slightly towards the viewer.
pub const TILT_AXIS: Vec3 = Vec3::new(0.0, 1.0, 0.15);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrbitalBody {
    pub name: String,
    pub radius: f64,
    pub orbit_distance: f64,
    /// Multiplier applied to the clock angle.
    pub rate: f64,
    /// Index of the body this one orbits; must precede it in the system.
    pub parent: Option<usize>,
    pub axis: Vec3,
    pub ramp: ColorRamp,
}

impl OrbitalBody {
    #[must_use]
    pub fn new(name: impl Into<String>, radius: f64, orbit_distance: f64, rate: f64) -> Self {
        Self {
            name: name.into(),
            radius,
            orbit_distance,
            rate,
            parent: None,
            axis: TILT_AXIS,
            ramp: ColorRamp::new([255.0; 3], [0.0; 3]),
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn with_ramp(mut self, ramp: ColorRamp) -> Self {
        self.ramp = ramp;
        self
    }

    /// Local frame relative to the parent at clock angle `angle` (degrees).
    #[must_use]
    pub fn local_transform(&self, angle: f64) -> Transform {
        let spin = Transform::rotate_axis(self.axis, (angle * self.rate).to_radians())
            .unwrap_or_default();
        spin * Transform::translate(Vec3::new(self.orbit_distance, 0.0, 0.0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrbitalSystem {
    pub bodies: Vec<OrbitalBody>,
}

impl Default for OrbitalSystem {
    fn default() -> Self {
        Self::solar_system()
    }
}

impl OrbitalSystem {
    pub fn new(bodies: Vec<OrbitalBody>) -> Result<Self, GeomError> {
        let system = Self { bodies };
        system.validate()?;
        Ok(system)
    }

    /// Sun, five planets and the moon, with the demo's sizes and rates.
    #[must_use]
    pub fn solar_system() -> Self {
        let r = SUN_RADIUS;
        let ramp = ColorRamp::new;
        Self {
            bodies: vec![
                OrbitalBody::new("Sun", r, 0.0, -1.0)
                    .with_ramp(ramp([255.0, 255.0, 0.0], [-0.4, -0.4, 0.0])),
                OrbitalBody::new("Mercury", 0.1 * r, 0.3, 1.0 / 2.0)
                    .with_ramp(ramp([255.0, 128.0, 128.0], [-0.3, 0.0, 0.0])),
                OrbitalBody::new("Venus", 0.2 * r, -0.4, 1.0 / 3.0)
                    .with_ramp(ramp([175.0, 255.0, 0.0], [0.0, -0.4, 0.0])),
                OrbitalBody::new("Earth", 0.3 * r, 0.6, 1.0 / 3.5)
                    .with_ramp(ramp([0.0, 255.0, 255.0], [0.35, -0.35, -0.35])),
                OrbitalBody::new("Moon", 0.15 * r, 0.12, -2.0)
                    .with_parent(3)
                    .with_ramp(ramp([255.0, 255.0, 255.0], [0.0, -0.15, 0.0])),
                OrbitalBody::new("Mars", 0.45 * r, 0.85, 1.0 / 3.5)
                    .with_ramp(ramp([172.0, 42.0, 42.0], [-0.4, 0.0, 0.0])),
                OrbitalBody::new("Jupiter", 0.75 * r, -1.0, 1.0 / 6.0)
                    .with_ramp(ramp([255.0, 255.0, 0.0], [0.0, -0.2, 0.2])),
            ],
        }
    }

    pub fn validate(&self) -> Result<(), GeomError> {
        for (i, body) in self.bodies.iter().enumerate() {
            if !body.radius.is_finite() || body.radius < 0.0 {
                return Err(GeomError::invalid(
                    "radius",
                    format!("body `{}` has radius {}", body.name, body.radius),
                ));
            }
            if !body.orbit_distance.is_finite() || !body.rate.is_finite() {
                return Err(GeomError::invalid(
                    "orbit",
                    format!("body `{}` has a non-finite orbit or rate", body.name),
                ));
            }
            if body.parent.is_some_and(|p| p >= i) {
                return Err(GeomError::invalid(
                    "parent",
                    format!("body `{}` must come after its parent", body.name),
                ));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn body_index(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b.name == name)
    }

    /// World transforms of every body at clock angle `angle` (degrees).
    #[must_use]
    pub fn body_transforms(&self, angle: f64) -> Vec<Transform> {
        let mut out: Vec<Transform> = Vec::with_capacity(self.bodies.len());
        for body in &self.bodies {
            let parent = body
                .parent
                .and_then(|p| out.get(p).copied())
                .unwrap_or_default();
            out.push(parent * body.local_transform(angle));
        }
        out
    }

    /// Body centres in world space at clock angle `angle`.
    #[must_use]
    pub fn body_positions(&self, angle: f64) -> Vec<Point3> {
        self.body_transforms(angle)
            .into_iter()
            .map(|m| m.apply_point(Point3::ORIGIN))
            .collect()
    }

    /// Tessellates every body around its local origin with its colour ramp.
    /// All bodies share one index buffer through `cache`.
    pub fn meshes(
        &self,
        lat_bands: u32,
        lon_bands: u32,
        cache: &mut GeomCache,
    ) -> Result<Vec<GeomMesh>, GeomError> {
        self.bodies
            .iter()
            .map(|body| {
                let mesh = generate_sphere_mesh_cached(
                    body.radius,
                    Point3::ORIGIN,
                    lat_bands,
                    lon_bands,
                    cache,
                )?;
                let colors = body.ramp.colors(mesh.vertex_count());
                Ok(mesh.with_colors(colors))
            })
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Clock
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum OrbitSpeed {
    Slow,
    #[default]
    Normal,
    Medium,
    Fast,
}

impl OrbitSpeed {
    pub const ALL: [Self; 4] = [Self::Slow, Self::Normal, Self::Medium, Self::Fast];

    /// Speed by position in [`Self::ALL`], slowest first.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub const fn factor(self) -> f64 {
        match self {
            Self::Slow => 50.0,
            Self::Normal => 150.0,
            Self::Medium => 450.0,
            Self::Fast => 800.0,
        }
    }
}

/// Accumulates the animation angle: `dθ = dt / 6 · n · π` degrees for speed
/// factor `n`. Changing speed does not make the angle jump.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitClock {
    angle: f64,
    speed: f64,
    paused: bool,
}

impl Default for OrbitClock {
    fn default() -> Self {
        Self::new(OrbitSpeed::default())
    }
}

impl OrbitClock {
    #[must_use]
    pub const fn new(speed: OrbitSpeed) -> Self {
        Self {
            angle: 0.0,
            speed: speed.factor(),
            paused: false,
        }
    }

    /// Advances by `dt` seconds unless paused and returns the angle.
    pub fn advance(&mut self, dt: f64) -> f64 {
        if !self.paused && dt.is_finite() && dt > 0.0 {
            self.angle += dt / 6.0 * self.speed * PI;
        }
        self.angle
    }

    #[must_use]
    pub const fn angle(&self) -> f64 {
        self.angle
    }

    #[must_use]
    pub const fn speed_factor(&self) -> f64 {
        self.speed
    }

    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_speed(&mut self, speed: OrbitSpeed) {
        self.speed = speed.factor();
    }

    pub fn set_speed_factor(&mut self, factor: f64) {
        if factor.is_finite() {
            self.speed = factor;
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }
}
