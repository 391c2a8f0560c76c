//! Cell type metadata for mesh elements and registry entities.

use serde::{Deserialize, Serialize};

/// Cell kinds understood by the mesh container and the remeshing registry.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum CellType {
    /// 0D vertex.
    Vertex,
    /// 1D segment/edge.
    Segment,
    /// 2D simplex (triangle).
    Triangle,
    /// 2D tensor-product cell (quad).
    Quadrilateral,
    /// 3D simplex (tet4).
    Tetrahedron,
    /// 3D tensor-product cell (hex8).
    Hexahedron,
    /// 3D wedge/prism (penta6).
    Prism,
    /// 3D pyramid (pyra5).
    Pyramid,
}

impl Default for CellType {
    fn default() -> Self {
        CellType::Vertex
    }
}

impl CellType {
    /// Returns the topological dimension of the cell.
    pub fn dimension(self) -> u8 {
        match self {
            CellType::Vertex => 0,
            CellType::Segment => 1,
            CellType::Triangle | CellType::Quadrilateral => 2,
            CellType::Tetrahedron | CellType::Hexahedron | CellType::Prism | CellType::Pyramid => {
                3
            }
        }
    }

    /// Number of corner nodes of the linear cell.
    pub fn node_count(self) -> usize {
        match self {
            CellType::Vertex => 1,
            CellType::Segment => 2,
            CellType::Triangle => 3,
            CellType::Quadrilateral | CellType::Tetrahedron => 4,
            CellType::Pyramid => 5,
            CellType::Prism => 6,
            CellType::Hexahedron => 8,
        }
    }

    /// Volume cell type with exactly `len` nodes, as produced by the remesher.
    pub fn from_volume_node_count(len: usize) -> Option<Self> {
        match len {
            4 => Some(CellType::Tetrahedron),
            5 => Some(CellType::Pyramid),
            6 => Some(CellType::Prism),
            8 => Some(CellType::Hexahedron),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_counts_round_trip_for_volume_cells() {
        for ct in [
            CellType::Tetrahedron,
            CellType::Pyramid,
            CellType::Prism,
            CellType::Hexahedron,
        ] {
            assert_eq!(CellType::from_volume_node_count(ct.node_count()), Some(ct));
            assert_eq!(ct.dimension(), 3);
        }
        assert_eq!(CellType::from_volume_node_count(7), None);
    }
}
