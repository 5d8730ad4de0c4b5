//! Time-stepped and random generators: pendulums, the chaos game, orbits.

mod chaos;
mod orbit;
mod pendulum;

pub use chaos::{
    ChaosAnchor, ChaosGame, ChaosPoints, ChaosSample, MAX_CHAOS_ITERATIONS, MAX_STARS,
    StarfieldOptions, starfield,
};
pub use orbit::{OrbitClock, OrbitSpeed, OrbitalBody, OrbitalSystem, SUN_RADIUS, TILT_AXIS};
pub use pendulum::{
    BOB_CENTER, BOB_RADIUS, BOB_SIDES, Pendulum, PendulumConfig, PendulumState, Rotator,
    RotatorConfig, bob_fan, bob_outline,
};
