//! Height-field plots of `z = f(x, y)` over a rectangular domain.

use serde::Serialize;

use super::cache::GeomCache;
use super::color::Rgb;
use super::core::{Point3, Vec3};
use super::error::GeomError;
use super::mesh::GeomMesh;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurfacePlotOptions {
    /// Cells per side; the grid has `(k + 1)²` vertices.
    pub resolution: u32,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    /// Colour of vertices with `z > 0`.
    pub positive_color: Rgb,
    /// Colour of vertices with `z <= 0`.
    pub negative_color: Rgb,
}

impl Default for SurfacePlotOptions {
    fn default() -> Self {
        Self {
            resolution: 100,
            x_range: (0.0, 1.0),
            y_range: (0.0, 1.0),
            positive_color: Rgb::RED,
            negative_color: Rgb::GREEN,
        }
    }
}

impl SurfacePlotOptions {
    pub fn validate(&self) -> Result<(), GeomError> {
        check_resolution(self.resolution)?;
        for (name, (lo, hi)) in [("x_range", self.x_range), ("y_range", self.y_range)] {
            if !lo.is_finite() || !hi.is_finite() || lo >= hi {
                return Err(GeomError::invalid(
                    name,
                    format!("expected a finite non-empty interval, got [{lo}, {hi}]"),
                ));
            }
        }
        Ok(())
    }
}

/// The damped radial ripple ("Mexican hat") used by the surface-plot demo,
/// centred on `(0.5, 0.5)` of the unit square.
#[must_use]
pub fn mexican_hat(x: f64, y: f64) -> f64 {
    let r = (80.0 * x - 40.0).hypot(90.0 * y - 45.0);
    0.5 * (-0.04 * r).exp() * (0.15 * r).cos()
}

fn check_resolution(resolution: u32) -> Result<(), GeomError> {
    if resolution == 0 {
        return Err(GeomError::invalid("resolution", "must be at least 1"));
    }
    let side = u64::from(resolution) + 1;
    if side * side > u64::from(u32::MAX) {
        return Err(GeomError::invalid(
            "resolution",
            format!("{resolution} exceeds the u32 index range"),
        ));
    }
    Ok(())
}

/// Triangle list for a `(k+1)×(k+1)` row-major grid.
///
/// Each cell with upper-right corner `v = j(k+1)+i` (for `i, j` in `1..=k`)
/// yields `(v-k-2, v-k-1, v)` and `(v-k-2, v, v-1)`. Fails when the vertex
/// count does not fit a `u32` index.
pub fn grid_indices(resolution: u32) -> Result<Vec<u32>, GeomError> {
    check_resolution(resolution)?;
    Ok(grid_triangles(resolution))
}

fn grid_triangles(k: u32) -> Vec<u32> {
    let mut out = Vec::with_capacity(6 * (k as usize) * (k as usize));
    for j in 1..=k {
        for i in 1..=k {
            let v = j * (k + 1) + i;
            out.extend_from_slice(&[v - k - 2, v - k - 1, v, v - k - 2, v, v - 1]);
        }
    }
    out
}

/// Per-vertex normals: the sum of the unit normals of the incident
/// triangles, renormalized. Degenerate triangles contribute nothing, and
/// vertices with no usable contribution get a zero normal.
#[must_use]
pub fn accumulate_vertex_normals(positions: &[[f64; 3]], indices: &[u32]) -> Vec<[f64; 3]> {
    let mut sums = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
        let (Some(&pa), Some(&pb), Some(&pc)) = (positions.get(a), positions.get(b), positions.get(c))
        else {
            continue;
        };
        let (pa, pb, pc) = (Point3::from_array(pa), Point3::from_array(pb), Point3::from_array(pc));
        let Some(n) = pb.sub_point(pa).cross(pc.sub_point(pa)).normalized() else {
            continue;
        };
        for v in [a, b, c] {
            sums[v] = sums[v] + n;
        }
    }
    sums.into_iter()
        .map(|n| n.normalized().unwrap_or(Vec3::ZERO).to_array())
        .collect()
}

fn plot_positions(
    f: &impl Fn(f64, f64) -> f64,
    options: &SurfacePlotOptions,
) -> Result<Vec<[f64; 3]>, GeomError> {
    options.validate()?;
    let k = options.resolution;
    let (x0, x1) = options.x_range;
    let (y0, y1) = options.y_range;
    let hx = (x1 - x0) / f64::from(k);
    let hy = (y1 - y0) / f64::from(k);
    let side = (k as usize) + 1;
    let mut positions = Vec::with_capacity(side * side);
    for j in 0..=k {
        let y = y0 + f64::from(j) * hy;
        for i in 0..=k {
            let x = x0 + f64::from(i) * hx;
            let z = f(x, y);
            if !z.is_finite() {
                log::debug!("surface function is {z} at ({x}, {y})");
                return Err(GeomError::DegenerateInput(
                    "surface function produced a non-finite value",
                ));
            }
            positions.push([x, y, z]);
        }
    }
    Ok(positions)
}

fn finish_plot(positions: Vec<[f64; 3]>, indices: Vec<u32>, options: &SurfacePlotOptions) -> GeomMesh {
    let normals = accumulate_vertex_normals(&positions, &indices);
    let colors = positions
        .iter()
        .map(|p| {
            if p[2] > 0.0 {
                options.positive_color.to_array()
            } else {
                options.negative_color.to_array()
            }
        })
        .collect();
    GeomMesh::new(positions, indices)
        .with_normals(normals)
        .with_colors(colors)
}

/// Samples `f` on the grid and returns a mesh with normals and sign colours.
pub fn plot_bivariate(
    f: impl Fn(f64, f64) -> f64,
    options: &SurfacePlotOptions,
) -> Result<GeomMesh, GeomError> {
    let positions = plot_positions(&f, options)?;
    let indices = grid_triangles(options.resolution);
    Ok(finish_plot(positions, indices, options))
}

/// [`plot_bivariate`] with the grid index buffer shared through `cache`.
pub fn plot_bivariate_cached(
    f: impl Fn(f64, f64) -> f64,
    options: &SurfacePlotOptions,
    cache: &mut GeomCache,
) -> Result<GeomMesh, GeomError> {
    let positions = plot_positions(&f, options)?;
    let k = options.resolution;
    let indices = cache.get_or_insert_grid_indices(k, || grid_triangles(k));
    Ok(finish_plot(positions, indices.to_vec(), options))
}
