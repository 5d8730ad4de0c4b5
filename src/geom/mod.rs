mod cache;
mod color;
mod core;
mod curve;
mod error;
mod mesh;
mod quaternion;
mod sphere;
mod surface_plot;

pub use cache::{GeomCache, GeomCacheStats};
pub use color::{ColorRamp, ColorRange, MARKER_PALETTE, Rgb};
pub use core::{Point2, Point3, Tolerance, Transform, Vec3};
pub use curve::{
    ContinuityDriver, ControlPointId, CubicBezier3, Curve3, JoinedBezier,
    enforce_tangent_continuity, evaluate_cubic_bezier, tessellate_curve_uniform,
};
pub use error::GeomError;
pub use mesh::GeomMesh;
pub(crate) use mesh::{narrow, to_f32};
pub use quaternion::{Quaternion, rotate};
pub use sphere::{
    SphereMesh, generate_sphere, generate_sphere_mesh_cached, sphere_indices, sphere_vertices,
};
pub use surface_plot::{
    SurfacePlotOptions, accumulate_vertex_normals, grid_indices, mexican_hat, plot_bivariate,
    plot_bivariate_cached,
};

#[cfg(test)]
mod tests;
