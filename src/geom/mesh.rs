use super::core::{Point3, Transform, Vec3};
use super::error::GeomError;

/// Indexed triangle mesh with optional per-vertex normals and colours.
///
/// Attribute buffers, when present, have one entry per position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeomMesh {
    pub positions: Vec<[f64; 3]>,
    pub indices: Vec<u32>,
    pub normals: Option<Vec<[f64; 3]>>,
    pub colors: Option<Vec<[f64; 3]>>,
}

impl GeomMesh {
    /// Create a new mesh with positions and indices only.
    #[must_use]
    pub fn new(positions: Vec<[f64; 3]>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices,
            normals: None,
            colors: None,
        }
    }

    #[must_use]
    pub fn with_normals(mut self, normals: Vec<[f64; 3]>) -> Self {
        self.normals = Some(normals);
        self
    }

    #[must_use]
    pub fn with_colors(mut self, colors: Vec<[f64; 3]>) -> Self {
        self.colors = Some(colors);
        self
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn position(&self, index: usize) -> Option<Point3> {
        self.positions.get(index).copied().map(Point3::from_array)
    }

    /// Returns true if any vertex position contains NaN or Inf values.
    #[must_use]
    pub fn has_invalid_vertices(&self) -> bool {
        self.positions
            .iter()
            .any(|p| !p[0].is_finite() || !p[1].is_finite() || !p[2].is_finite())
    }

    /// Returns true if all vertex indices are within bounds.
    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.positions.len();
        self.indices.iter().all(|&i| (i as usize) < n)
    }

    #[must_use]
    pub fn has_triangle_indices(&self) -> bool {
        self.indices.len() % 3 == 0
    }

    #[must_use]
    pub fn has_valid_attribute_lengths(&self) -> bool {
        let n = self.positions.len();
        self.normals.as_ref().is_none_or(|normals| normals.len() == n)
            && self.colors.as_ref().is_none_or(|colors| colors.len() == n)
    }

    pub fn validate(&self) -> Result<(), GeomError> {
        if !self.has_triangle_indices() {
            return Err(GeomError::DegenerateInput(
                "mesh indices are not a triangle list (len % 3 != 0)",
            ));
        }
        if self.has_invalid_vertices() {
            return Err(GeomError::DegenerateInput(
                "mesh has invalid vertex coordinates (NaN/Inf)",
            ));
        }
        if !self.has_valid_indices() {
            return Err(GeomError::DegenerateInput(
                "mesh has out-of-bounds vertex indices",
            ));
        }
        if !self.has_valid_attribute_lengths() {
            return Err(GeomError::DegenerateInput(
                "mesh attribute buffers do not match vertex count",
            ));
        }
        Ok(())
    }

    /// Returns the position buffer as a flat slice: `[x0, y0, z0, x1, y1, z1, ...]`.
    #[must_use]
    pub fn positions_flat(&self) -> &[f64] {
        self.positions.as_flattened()
    }

    #[must_use]
    pub fn normals_flat(&self) -> Option<&[f64]> {
        self.normals.as_deref().map(<[[f64; 3]]>::as_flattened)
    }

    #[must_use]
    pub fn colors_flat(&self) -> Option<&[f64]> {
        self.colors.as_deref().map(<[[f64; 3]]>::as_flattened)
    }

    /// Single-precision copy of the positions, ready for a GPU vertex buffer.
    #[must_use]
    pub fn positions_f32(&self) -> Vec<f32> {
        to_f32(self.positions_flat())
    }

    #[must_use]
    pub fn normals_f32(&self) -> Option<Vec<f32>> {
        self.normals_flat().map(to_f32)
    }

    /// Interleaved `[x, y, z, r, g, b]` per vertex. Vertices without a colour
    /// buffer are emitted white.
    #[must_use]
    pub fn interleaved_position_color_f32(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.positions.len() * 6);
        for (i, p) in self.positions.iter().enumerate() {
            let c = self
                .colors
                .as_ref()
                .and_then(|colors| colors.get(i))
                .copied()
                .unwrap_or([1.0; 3]);
            out.extend(p.iter().chain(c.iter()).map(|&v| narrow(v)));
        }
        out
    }

    /// Index buffer narrowed to `u16` for renderers without 32-bit index
    /// support. Fails when an index does not fit.
    pub fn indices_u16(&self) -> Result<Vec<u16>, GeomError> {
        self.indices
            .iter()
            .map(|&i| {
                u16::try_from(i).map_err(|_| {
                    GeomError::invalid("indices", format!("index {i} exceeds u16 range"))
                })
            })
            .collect()
    }

    /// Appends `other`, offsetting its indices past the current vertices.
    ///
    /// An attribute survives only when both meshes carry it; an empty mesh
    /// takes on whatever `other` carries.
    pub fn append(&mut self, other: &Self) -> Result<(), GeomError> {
        let offset = u32::try_from(self.positions.len())
            .map_err(|_| GeomError::invalid("positions", "vertex count exceeds u32 range"))?;
        let combined = u64::from(offset) + other.positions.len() as u64;
        if combined > u64::from(u32::MAX) {
            return Err(GeomError::invalid(
                "positions",
                "combined vertex count exceeds u32 range",
            ));
        }
        let empty = self.positions.is_empty();
        self.normals = merge_attribute(self.normals.take(), other.normals.as_ref(), empty);
        self.colors = merge_attribute(self.colors.take(), other.colors.as_ref(), empty);
        self.positions.extend_from_slice(&other.positions);
        self.indices.extend(other.indices.iter().map(|&i| i + offset));
        Ok(())
    }

    /// Applies `transform` to positions and, when present, normals.
    /// Normals are renormalized afterwards; zero normals stay zero.
    #[must_use]
    pub fn transformed(&self, transform: Transform) -> Self {
        let positions = self
            .positions
            .iter()
            .map(|&p| transform.apply_point(Point3::from_array(p)).to_array())
            .collect();
        let normals = self.normals.as_ref().map(|normals| {
            normals
                .iter()
                .map(|&n| {
                    transform
                        .apply_vec(Vec3::from_array(n))
                        .normalized()
                        .unwrap_or(Vec3::ZERO)
                        .to_array()
                })
                .collect()
        });
        Self {
            positions,
            indices: self.indices.clone(),
            normals,
            colors: self.colors.clone(),
        }
    }
}

fn merge_attribute(
    mine: Option<Vec<[f64; 3]>>,
    theirs: Option<&Vec<[f64; 3]>>,
    adopt: bool,
) -> Option<Vec<[f64; 3]>> {
    match (mine, theirs) {
        (Some(mut a), Some(b)) => {
            a.extend_from_slice(b);
            Some(a)
        }
        (None, Some(b)) if adopt => Some(b.clone()),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
pub(crate) fn narrow(v: f64) -> f32 {
    v as f32
}

pub(crate) fn to_f32(data: &[f64]) -> Vec<f32> {
    data.iter().map(|&v| narrow(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> GeomMesh {
        GeomMesh::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn validate_flags_out_of_bounds_index() {
        let mut mesh = triangle();
        assert!(mesh.validate().is_ok());
        mesh.indices[2] = 3;
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn validate_flags_attribute_length_mismatch() {
        let mesh = triangle().with_colors(vec![[1.0, 0.0, 0.0]]);
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn append_offsets_indices_and_drops_partial_attributes() {
        let mut a = triangle().with_colors(vec![[1.0, 0.0, 0.0]; 3]);
        let b = triangle();
        a.append(&b).expect("append");
        assert_eq!(a.vertex_count(), 6);
        assert_eq!(a.indices, vec![0, 1, 2, 3, 4, 5]);
        assert!(a.colors.is_none());
        assert!(a.validate().is_ok());
    }

    #[test]
    fn append_into_empty_mesh_keeps_attributes() {
        let mut scene = GeomMesh::new(Vec::new(), Vec::new());
        scene
            .append(&triangle().with_colors(vec![[0.0, 1.0, 0.0]; 3]))
            .expect("append");
        scene
            .append(&triangle().with_colors(vec![[0.0, 0.0, 1.0]; 3]))
            .expect("append");
        assert_eq!(scene.colors.as_ref().map(Vec::len), Some(6));
        assert!(scene.validate().is_ok());
    }

    #[test]
    fn interleaved_buffer_defaults_to_white() {
        let buf = triangle().interleaved_position_color_f32();
        assert_eq!(buf.len(), 18);
        assert_eq!(&buf[6..12], &[1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn indices_u16_rejects_large_index() {
        let mut mesh = triangle();
        assert_eq!(mesh.indices_u16().expect("fits"), vec![0u16, 1, 2]);
        mesh.indices[0] = 70_000;
        assert!(mesh.indices_u16().is_err());
    }
}
