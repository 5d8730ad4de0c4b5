//! UV-sphere tessellation.
//!
//! Vertices are laid out latitude-major: ring `i` (θ = iπ/L, pole to pole)
//! holds `M + 1` vertices at φ = j·2π/M, so the seam column is duplicated.
//! The index list depends only on `(L, M)` and can be shared between spheres.

use std::f64::consts::PI;

use serde::Serialize;

use super::cache::GeomCache;
use super::core::{Point3, Vec3};
use super::error::GeomError;
use super::mesh::GeomMesh;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SphereMesh {
    pub center: Point3,
    pub radius: f64,
    pub lat_bands: u32,
    pub lon_bands: u32,
    pub vertices: Vec<Point3>,
    pub triangles: Vec<[u32; 3]>,
}

impl SphereMesh {
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Flat triangle-list index buffer.
    #[must_use]
    pub fn flat_indices(&self) -> Vec<u32> {
        self.triangles.as_flattened().to_vec()
    }

    /// Outward unit normals; a zero-radius sphere yields zero vectors.
    #[must_use]
    pub fn normals(&self) -> Vec<[f64; 3]> {
        self.vertices
            .iter()
            .map(|&v| {
                v.sub_point(self.center)
                    .normalized()
                    .unwrap_or(Vec3::ZERO)
                    .to_array()
            })
            .collect()
    }

    #[must_use]
    pub fn into_geom_mesh(self) -> GeomMesh {
        let normals = self.normals();
        let indices = self.flat_indices();
        let positions = self.vertices.iter().map(|p| p.to_array()).collect();
        GeomMesh::new(positions, indices).with_normals(normals)
    }
}

fn validate(radius: f64, center: Point3, lat_bands: u32, lon_bands: u32) -> Result<(), GeomError> {
    if lat_bands == 0 {
        return Err(GeomError::invalid("lat_bands", "must be at least 1"));
    }
    if lon_bands == 0 {
        return Err(GeomError::invalid("lon_bands", "must be at least 1"));
    }
    if !radius.is_finite() || radius < 0.0 {
        return Err(GeomError::invalid(
            "radius",
            format!("must be finite and non-negative, got {radius}"),
        ));
    }
    if !center.is_finite() {
        return Err(GeomError::invalid("center", "must be finite"));
    }
    let count = (u64::from(lat_bands) + 1) * (u64::from(lon_bands) + 1);
    if count > u64::from(u32::MAX) {
        return Err(GeomError::invalid(
            "lat_bands",
            format!("{lat_bands}x{lon_bands} bands exceed the u32 index range"),
        ));
    }
    Ok(())
}

/// `(L+1)(M+1)` vertices, ring by ring.
///
/// Vertex `(i, j)` is `center + r·(cos φ sin θ, cos θ, sin φ sin θ)`.
pub fn sphere_vertices(
    radius: f64,
    center: Point3,
    lat_bands: u32,
    lon_bands: u32,
) -> Result<Vec<Point3>, GeomError> {
    validate(radius, center, lat_bands, lon_bands)?;
    let lat = f64::from(lat_bands);
    let lon = f64::from(lon_bands);
    let mut out = Vec::with_capacity(((lat_bands + 1) * (lon_bands + 1)) as usize);
    for i in 0..=lat_bands {
        let theta = f64::from(i) * PI / lat;
        let (sin_t, cos_t) = theta.sin_cos();
        for j in 0..=lon_bands {
            let phi = f64::from(j) * 2.0 * PI / lon;
            let (sin_p, cos_p) = phi.sin_cos();
            out.push(Point3::new(
                center.x + radius * cos_p * sin_t,
                center.y + radius * cos_t,
                center.z + radius * sin_p * sin_t,
            ));
        }
    }
    Ok(out)
}

/// Two triangles per quad: `(first, second, first+1)` and
/// `(second, second+1, first+1)` with `first = i(M+1)+j`, `second = first+M+1`.
pub fn sphere_indices(lat_bands: u32, lon_bands: u32) -> Result<Vec<[u32; 3]>, GeomError> {
    validate(0.0, Point3::ORIGIN, lat_bands, lon_bands)?;
    let mut out = Vec::with_capacity(2 * (lat_bands as usize) * (lon_bands as usize));
    for i in 0..lat_bands {
        for j in 0..lon_bands {
            let first = i * (lon_bands + 1) + j;
            let second = first + lon_bands + 1;
            out.push([first, second, first + 1]);
            out.push([second, second + 1, first + 1]);
        }
    }
    Ok(out)
}

pub fn generate_sphere(
    radius: f64,
    center: Point3,
    lat_bands: u32,
    lon_bands: u32,
) -> Result<SphereMesh, GeomError> {
    let vertices = sphere_vertices(radius, center, lat_bands, lon_bands)?;
    let triangles = sphere_indices(lat_bands, lon_bands)?;
    Ok(SphereMesh {
        center,
        radius,
        lat_bands,
        lon_bands,
        vertices,
        triangles,
    })
}

/// Like [`generate_sphere`] but draws the flat index buffer from `cache`,
/// so spheres with the same band counts share it.
pub fn generate_sphere_mesh_cached(
    radius: f64,
    center: Point3,
    lat_bands: u32,
    lon_bands: u32,
    cache: &mut GeomCache,
) -> Result<GeomMesh, GeomError> {
    let vertices = sphere_vertices(radius, center, lat_bands, lon_bands)?;
    let indices = cache.get_or_insert_sphere_indices(lat_bands, lon_bands, || {
        sphere_indices(lat_bands, lon_bands)
            .map(|tris| tris.as_flattened().to_vec())
            .unwrap_or_default()
    });
    let normals = vertices
        .iter()
        .map(|&v| {
            v.sub_point(center)
                .normalized()
                .unwrap_or(Vec3::ZERO)
                .to_array()
        })
        .collect();
    let positions = vertices.iter().map(|p| p.to_array()).collect();
    Ok(GeomMesh::new(positions, indices.to_vec()).with_normals(normals))
}
