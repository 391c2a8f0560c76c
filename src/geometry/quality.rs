//! Signed volumes and simple quality metrics for volume cells.
//!
//! Boundary-layer cells are thin by construction, so the aspect ratio is the
//! metric worth watching after a pass.
//!
//! # Supported cell types
//! The routines accept the following vertex orderings:
//!
//! - **Tetrahedron**: `[v0, v1, v2, v3]`, positive when `v0, v1, v2` wind
//!   counter-clockwise seen from `v3`.
//! - **Hexahedron**: `[v0, .., v7]` with bottom face `[0, 1, 2, 3]` and top
//!   face `[4, 5, 6, 7]`.
//! - **Prism**: `[v0, .., v5]` with bottom triangle `[0, 1, 2]` and top
//!   triangle `[3, 4, 5]`.
//! - **Pyramid**: `[v0, .., v4]` with base quad `[0, 1, 2, 3]` and apex `v4`.
//!
//! Volumes are computed by fixed tetrahedral decompositions, which are exact
//! for cells with planar faces.
//!
//! # Examples
//! ```rust
//! use mesh_boundary_layer::geometry::quality::signed_volume;
//! use mesh_boundary_layer::topology::cell_type::CellType;
//!
//! let tet = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
//! let v = signed_volume(CellType::Tetrahedron, &tet)?;
//! assert!((v - 1.0 / 6.0).abs() < 1e-12);
//! # Ok::<(), mesh_boundary_layer::mesh_error::MeshError>(())
//! ```

use crate::geometry::vector::{Point3, cross, distance, dot, sub};
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;

pub(crate) const EPS: f64 = 1e-12;

/// Basic quality metrics for a single cell.
#[derive(Clone, Copy, Debug)]
pub struct CellQuality {
    /// Ratio of the longest edge length to the shortest edge length.
    pub aspect_ratio: f64,
    /// Signed volume. Negative values indicate inverted orientation; zero
    /// indicates degenerate geometry.
    pub jacobian_sign: f64,
}

/// Compute quality metrics from explicit vertex coordinates.
pub fn cell_quality(cell_type: CellType, vertices: &[Point3]) -> Result<CellQuality, MeshError> {
    let jacobian_sign = signed_volume(cell_type, vertices)?;
    let aspect_ratio = aspect_ratio(cell_type, vertices)?;
    Ok(CellQuality {
        aspect_ratio,
        jacobian_sign,
    })
}

/// Signed volume of a tet4, prism6, pyramid5 or hex8.
pub fn signed_volume(cell_type: CellType, vertices: &[Point3]) -> Result<f64, MeshError> {
    check_count(cell_type, vertices)?;
    let v = vertices;
    match cell_type {
        CellType::Tetrahedron => Ok(tet_signed_volume(v[0], v[1], v[2], v[3])),
        CellType::Prism => Ok(tet_signed_volume(v[0], v[1], v[2], v[3])
            + tet_signed_volume(v[1], v[4], v[2], v[3])
            + tet_signed_volume(v[2], v[4], v[5], v[3])),
        CellType::Pyramid => Ok(tet_signed_volume(v[0], v[1], v[2], v[4])
            + tet_signed_volume(v[0], v[2], v[3], v[4])),
        CellType::Hexahedron => Ok(tet_signed_volume(v[0], v[1], v[3], v[4])
            + tet_signed_volume(v[1], v[2], v[3], v[6])
            + tet_signed_volume(v[1], v[3], v[4], v[6])
            + tet_signed_volume(v[1], v[4], v[5], v[6])
            + tet_signed_volume(v[3], v[4], v[6], v[7])),
        _ => Err(unsupported(cell_type)),
    }
}

/// Signed volume of the tetrahedron `(a, b, c, d)`.
#[inline]
pub fn tet_signed_volume(a: Point3, b: Point3, c: Point3, d: Point3) -> f64 {
    dot(sub(b, a), cross(sub(c, a), sub(d, a))) / 6.0
}

fn aspect_ratio(cell_type: CellType, vertices: &[Point3]) -> Result<f64, MeshError> {
    let edges = edges_for_cell(cell_type).ok_or_else(|| unsupported(cell_type))?;
    let mut min_len = f64::INFINITY;
    let mut max_len = 0.0f64;
    for &(a, b) in edges {
        let len = distance(vertices[a], vertices[b]);
        if len <= EPS {
            return Err(MeshError::InvalidGeometry("zero-length edge detected".into()));
        }
        min_len = min_len.min(len);
        max_len = max_len.max(len);
    }
    Ok(max_len / min_len)
}

fn check_count(cell_type: CellType, vertices: &[Point3]) -> Result<(), MeshError> {
    if cell_type.dimension() != 3 {
        return Err(unsupported(cell_type));
    }
    let expected = cell_type.node_count();
    if vertices.len() != expected {
        return Err(MeshError::InvalidGeometry(format!(
            "vertex count mismatch: expected {expected}, got {}",
            vertices.len()
        )));
    }
    Ok(())
}

fn unsupported(cell_type: CellType) -> MeshError {
    MeshError::InvalidGeometry(format!("unsupported cell type: {cell_type:?}"))
}

fn edges_for_cell(cell_type: CellType) -> Option<&'static [(usize, usize)]> {
    match cell_type {
        CellType::Tetrahedron => Some(&TET_EDGES),
        CellType::Hexahedron => Some(&HEX_EDGES),
        CellType::Prism => Some(&PRISM_EDGES),
        CellType::Pyramid => Some(&PYRAMID_EDGES),
        _ => None,
    }
}

const TET_EDGES: [(usize, usize); 6] = [(0, 1), (1, 2), (2, 0), (0, 3), (1, 3), (2, 3)];
const HEX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];
const PRISM_EDGES: [(usize, usize); 9] = [
    (0, 1),
    (1, 2),
    (2, 0),
    (3, 4),
    (4, 5),
    (5, 3),
    (0, 3),
    (1, 4),
    (2, 5),
];
const PYRAMID_EDGES: [(usize, usize); 8] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (0, 4),
    (1, 4),
    (2, 4),
    (3, 4),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube() -> Vec<Point3> {
        vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
            [0.0, 1.0, 1.0],
        ]
    }

    #[test]
    fn unit_cube_has_unit_volume() {
        let v = signed_volume(CellType::Hexahedron, &unit_cube()).unwrap();
        assert!((v - 1.0).abs() < 1e-12);
    }

    #[test]
    fn half_cube_prism() {
        let c = unit_cube();
        let prism = [c[0], c[1], c[2], c[4], c[5], c[6]];
        let v = signed_volume(CellType::Prism, &prism).unwrap();
        assert!((v - 0.5).abs() < 1e-12);
    }

    #[test]
    fn mirrored_tet_is_negative() {
        let tet = [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        assert!(signed_volume(CellType::Tetrahedron, &tet).unwrap() < 0.0);
        assert!(cell_quality(CellType::Tetrahedron, &tet).unwrap().jacobian_sign < 0.0);
    }

    #[test]
    fn flattened_box_aspect_ratio() {
        let mut c = unit_cube();
        for p in c.iter_mut().skip(4) {
            p[2] = 0.25;
        }
        let q = cell_quality(CellType::Hexahedron, &c).unwrap();
        assert!((q.aspect_ratio - 4.0).abs() < 1e-12);
    }

    #[test]
    fn wrong_vertex_count_errors() {
        assert!(signed_volume(CellType::Hexahedron, &unit_cube()[..6]).is_err());
        assert!(signed_volume(CellType::Triangle, &unit_cube()[..3]).is_err());
    }
}
