//! Nodes, elements and boundary faces of a [`VolumeMesh`](super::VolumeMesh).

use serde::{Deserialize, Serialize};

use crate::geometry::Point3;
use crate::topology::cell_type::CellType;

/// A mesh node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub position: Point3,
    /// Scratch marker for bookkeeping passes.
    pub tag: i32,
}

/// A volume element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub cell_type: CellType,
    pub nodes: Vec<usize>,
    /// Part (element group) the element belongs to.
    pub part: usize,
    pub tag: i32,
}

/// A boundary face, derived from the elements by
/// [`VolumeMesh::rebuild`](super::VolumeMesh::rebuild).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Face {
    /// Face nodes in outward winding.
    pub nodes: Vec<usize>,
    /// Owning element.
    pub element: usize,
    /// Local face index within the owning element.
    pub local: usize,
    pub selected: bool,
    pub tag: i32,
}

const HEX_FACES: [&[usize]; 6] = [
    &[0, 1, 5, 4],
    &[1, 2, 6, 5],
    &[2, 3, 7, 6],
    &[3, 0, 4, 7],
    &[3, 2, 1, 0],
    &[4, 5, 6, 7],
];
const PRISM_FACES: [&[usize]; 5] = [
    &[0, 1, 4, 3],
    &[1, 2, 5, 4],
    &[0, 3, 5, 2],
    &[0, 2, 1],
    &[3, 4, 5],
];
const TET4_FACES: [&[usize]; 4] = [&[0, 1, 3], &[1, 2, 3], &[0, 3, 2], &[0, 2, 1]];
const PYRAMID_FACES: [&[usize]; 5] = [
    &[0, 1, 4],
    &[1, 2, 4],
    &[2, 3, 4],
    &[3, 0, 4],
    &[3, 2, 1, 0],
];

/// Outward-wound local faces of a volume cell; empty for lower-dimensional kinds.
///
/// Hex, prism and tet faces share the numbering of the reference cells in
/// [`crate::topology::reference`]; a unit test keeps the two in step.
pub fn local_faces(cell_type: CellType) -> &'static [&'static [usize]] {
    match cell_type {
        CellType::Hexahedron => &HEX_FACES,
        CellType::Prism => &PRISM_FACES,
        CellType::Tetrahedron => &TET4_FACES,
        CellType::Pyramid => &PYRAMID_FACES,
        _ => &[],
    }
}

/// Node permutation that flips the orientation of a cell.
pub fn inverted_order(cell_type: CellType) -> &'static [usize] {
    match cell_type {
        CellType::Tetrahedron => &[0, 2, 1, 3],
        CellType::Pyramid => &[0, 3, 2, 1, 4],
        CellType::Prism => &[0, 2, 1, 3, 5, 4],
        CellType::Hexahedron => &[0, 3, 2, 1, 4, 7, 6, 5],
        CellType::Quadrilateral => &[0, 3, 2, 1],
        CellType::Triangle => &[0, 2, 1],
        CellType::Segment => &[1, 0],
        CellType::Vertex => &[0],
    }
}

impl Element {
    /// Node list of local face `local`, in outward winding.
    pub fn face_nodes(&self, local: usize) -> Option<Vec<usize>> {
        local_faces(self.cell_type)
            .get(local)
            .map(|face| face.iter().map(|&k| self.nodes[k]).collect())
    }

    /// Number of local faces.
    pub fn face_count(&self) -> usize {
        local_faces(self.cell_type).len()
    }

    /// Reorders the nodes so the signed volume changes sign.
    pub fn invert(&mut self) {
        let order = inverted_order(self.cell_type);
        if order.len() == self.nodes.len() {
            self.nodes = order.iter().map(|&k| self.nodes[k]).collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::quality::signed_volume;

    fn cube() -> Vec<Point3> {
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
    fn inversion_flips_every_volume_kind() {
        let c = cube();
        let cases = [
            (CellType::Hexahedron, vec![0, 1, 2, 3, 4, 5, 6, 7]),
            (CellType::Prism, vec![0, 1, 2, 4, 5, 6]),
            (CellType::Tetrahedron, vec![0, 1, 3, 4]),
            (CellType::Pyramid, vec![0, 1, 2, 3, 6]),
        ];
        for (cell_type, nodes) in cases {
            let mut e = Element {
                cell_type,
                nodes,
                part: 0,
                tag: 0,
            };
            let pts = |e: &Element| e.nodes.iter().map(|&n| c[n]).collect::<Vec<_>>();
            let before = signed_volume(cell_type, &pts(&e)).unwrap();
            e.invert();
            let after = signed_volume(cell_type, &pts(&e)).unwrap();
            assert!(before > 0.0, "{cell_type:?}");
            assert!((before + after).abs() < 1e-12, "{cell_type:?}");
        }
    }

    #[test]
    fn local_faces_match_reference_cells() {
        use crate::topology::reference::{BOX_FACES, TET_FACES, WEDGE_QUADS, WEDGE_TRIS};
        for (k, f) in BOX_FACES.iter().enumerate() {
            assert_eq!(local_faces(CellType::Hexahedron)[k], &f[..]);
        }
        for (k, f) in WEDGE_QUADS.iter().enumerate() {
            assert_eq!(local_faces(CellType::Prism)[k], &f[..]);
        }
        for (k, f) in WEDGE_TRIS.iter().enumerate() {
            assert_eq!(local_faces(CellType::Prism)[3 + k], &f[..]);
        }
        for (k, f) in TET_FACES.iter().enumerate() {
            assert_eq!(local_faces(CellType::Tetrahedron)[k], &f[..]);
        }
    }

    #[test]
    fn face_nodes_follow_local_tables() {
        let e = Element {
            cell_type: CellType::Prism,
            nodes: vec![10, 11, 12, 13, 14, 15],
            part: 0,
            tag: 0,
        };
        assert_eq!(e.face_count(), 5);
        assert_eq!(e.face_nodes(3), Some(vec![10, 12, 11]));
        assert_eq!(e.face_nodes(5), None);
    }
}
