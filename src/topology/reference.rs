//! Local numbering of the reference hex8, penta6 and tet4 cells.
//!
//! Vertex numbering follows the usual FE convention: the hex has bottom
//! corners `0..4` and top corners `4..8` with `k + 4` above `k`; the wedge has
//! bottom triangle `0, 1, 2` and top triangle `3, 4, 5`; the tet has base
//! `0, 1, 2` and apex `3`. All face windings point out of the cell.
//!
//! Local edges and faces are addressed through the enums below; the `*_EDGES`
//! and `*_FACES` tables give their vertex lists in the same order as the enum
//! discriminants.

macro_rules! local_index_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// All variants, in local-index order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Local index of this entity.
            #[inline]
            pub const fn index(self) -> usize {
                self as usize
            }

            /// Entity with local index `index`, if in range.
            #[inline]
            pub fn from_index(index: usize) -> Option<Self> {
                Self::ALL.get(index).copied()
            }
        }
    };
}

local_index_enum!(
    /// Faces of the hex8 reference cell.
    BoxFace { Front, Right, Back, Left, Bottom, Top }
);

local_index_enum!(
    /// Edges of the hex8 reference cell, named after their local endpoints.
    BoxEdge {
        Bottom01, Bottom12, Bottom23, Bottom30,
        Top45, Top56, Top67, Top74,
        Rise04, Rise15, Rise26, Rise37,
    }
);

local_index_enum!(
    /// Faces of the penta6 reference cell; `Side*` are quads, `Bottom`/`Top` triangles.
    WedgeFace { Side0, Side1, Side2, Bottom, Top }
);

local_index_enum!(
    /// Edges of the penta6 reference cell.
    WedgeEdge {
        Bottom01, Bottom12, Bottom20,
        Top34, Top45, Top53,
        Rise03, Rise14, Rise25,
    }
);

local_index_enum!(
    /// Faces of the tet4 reference cell, named after the vertex they do not contain.
    TetFace { Opposite2, Opposite0, Opposite1, Opposite3 }
);

local_index_enum!(
    /// Edges of the tet4 reference cell.
    TetEdge { E01, E12, E20, E03, E13, E23 }
);

local_index_enum!(
    /// Vertices of the tet4 reference cell.
    TetVertex { V0, V1, V2, V3 }
);

pub const QUAD_EDGES: [[usize; 2]; 4] = [[0, 1], [1, 2], [2, 3], [3, 0]];
pub const TRI_EDGES: [[usize; 2]; 3] = [[0, 1], [1, 2], [2, 0]];

pub const BOX_EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];
pub const BOX_FACES: [[usize; 4]; 6] = [
    [0, 1, 5, 4],
    [1, 2, 6, 5],
    [2, 3, 7, 6],
    [3, 0, 4, 7],
    [3, 2, 1, 0],
    [4, 5, 6, 7],
];

pub const WEDGE_EDGES: [[usize; 2]; 9] = [
    [0, 1],
    [1, 2],
    [2, 0],
    [3, 4],
    [4, 5],
    [5, 3],
    [0, 3],
    [1, 4],
    [2, 5],
];
pub const WEDGE_QUADS: [[usize; 4]; 3] = [[0, 1, 4, 3], [1, 2, 5, 4], [0, 3, 5, 2]];
pub const WEDGE_TRIS: [[usize; 3]; 2] = [[0, 2, 1], [3, 4, 5]];

pub const TET_EDGES: [[usize; 2]; 6] = [[0, 1], [1, 2], [2, 0], [0, 3], [1, 3], [2, 3]];
pub const TET_FACES: [[usize; 3]; 4] = [[0, 1, 3], [1, 2, 3], [0, 3, 2], [0, 2, 1]];

impl BoxFace {
    pub fn vertices(self) -> [usize; 4] {
        BOX_FACES[self.index()]
    }
}

impl BoxEdge {
    pub fn vertices(self) -> [usize; 2] {
        BOX_EDGES[self.index()]
    }

    /// Vertical edge rising from bottom corner `corner` (0..4).
    pub fn rise(corner: usize) -> BoxEdge {
        [BoxEdge::Rise04, BoxEdge::Rise15, BoxEdge::Rise26, BoxEdge::Rise37][corner % 4]
    }
}

impl WedgeFace {
    /// Quad corner list for side faces, `None` for the triangles.
    pub fn quad_vertices(self) -> Option<[usize; 4]> {
        WEDGE_QUADS.get(self.index()).copied()
    }

    /// Triangle corner list for `Bottom`/`Top`, `None` for side faces.
    pub fn tri_vertices(self) -> Option<[usize; 3]> {
        match self {
            WedgeFace::Bottom => Some(WEDGE_TRIS[0]),
            WedgeFace::Top => Some(WEDGE_TRIS[1]),
            _ => None,
        }
    }
}

impl WedgeEdge {
    pub fn vertices(self) -> [usize; 2] {
        WEDGE_EDGES[self.index()]
    }

    /// Vertical edge rising from bottom corner `corner` (0..3).
    pub fn rise(corner: usize) -> WedgeEdge {
        [WedgeEdge::Rise03, WedgeEdge::Rise14, WedgeEdge::Rise25][corner % 3]
    }
}

impl TetFace {
    pub fn vertices(self) -> [usize; 3] {
        TET_FACES[self.index()]
    }

    /// The vertex not on this face.
    pub fn opposite_vertex(self) -> TetVertex {
        match self {
            TetFace::Opposite2 => TetVertex::V2,
            TetFace::Opposite0 => TetVertex::V0,
            TetFace::Opposite1 => TetVertex::V1,
            TetFace::Opposite3 => TetVertex::V3,
        }
    }
}

impl TetEdge {
    pub fn vertices(self) -> [usize; 2] {
        TET_EDGES[self.index()]
    }

    /// The edge sharing no vertex with this one.
    pub fn opposite(self) -> TetEdge {
        match self {
            TetEdge::E01 => TetEdge::E23,
            TetEdge::E12 => TetEdge::E03,
            TetEdge::E20 => TetEdge::E13,
            TetEdge::E03 => TetEdge::E12,
            TetEdge::E13 => TetEdge::E20,
            TetEdge::E23 => TetEdge::E01,
        }
    }
}

impl TetVertex {
    /// The face not containing this vertex.
    pub fn opposite_face(self) -> TetFace {
        match self {
            TetVertex::V0 => TetFace::Opposite0,
            TetVertex::V1 => TetFace::Opposite1,
            TetVertex::V2 => TetFace::Opposite2,
            TetVertex::V3 => TetFace::Opposite3,
        }
    }
}

/// Box split into two wedges: `[option][edge] -> [wedge 0 corners, wedge 1 corners]`.
///
/// Both options cut along the diagonal plane through the split edge and the
/// edge opposite to it. Option 0 puts the split edge on `Rise03` of both
/// wedges; option 1 puts the opposite edge there, and each wedge keeps one of
/// the two box faces adjacent to the split edge as its `Side1`.
pub const BOX_SPLIT: [[[[usize; 6]; 2]; 12]; 2] = [
    [
        [[0, 3, 7, 1, 2, 6], [0, 7, 4, 1, 6, 5]],
        [[1, 0, 4, 2, 3, 7], [1, 4, 5, 2, 7, 6]],
        [[3, 7, 4, 2, 6, 5], [3, 4, 0, 2, 5, 1]],
        [[0, 4, 5, 3, 7, 6], [0, 5, 1, 3, 6, 2]],
        [[4, 0, 3, 5, 1, 2], [4, 3, 7, 5, 2, 6]],
        [[5, 1, 0, 6, 2, 3], [5, 0, 4, 6, 3, 7]],
        [[7, 4, 0, 6, 5, 1], [7, 0, 3, 6, 1, 2]],
        [[4, 5, 1, 7, 6, 2], [4, 1, 0, 7, 2, 3]],
        [[0, 1, 2, 4, 5, 6], [0, 2, 3, 4, 6, 7]],
        [[1, 2, 3, 5, 6, 7], [1, 3, 0, 5, 7, 4]],
        [[2, 3, 0, 6, 7, 4], [2, 0, 1, 6, 4, 5]],
        [[3, 0, 1, 7, 4, 5], [3, 1, 2, 7, 5, 6]],
    ],
    [
        [[7, 4, 0, 6, 5, 1], [7, 0, 3, 6, 1, 2]],
        [[4, 5, 1, 7, 6, 2], [4, 1, 0, 7, 2, 3]],
        [[4, 0, 3, 5, 1, 2], [4, 3, 7, 5, 2, 6]],
        [[5, 1, 0, 6, 2, 3], [5, 0, 4, 6, 3, 7]],
        [[3, 7, 4, 2, 6, 5], [3, 4, 0, 2, 5, 1]],
        [[0, 4, 5, 3, 7, 6], [0, 5, 1, 3, 6, 2]],
        [[0, 3, 7, 1, 2, 6], [0, 7, 4, 1, 6, 5]],
        [[1, 0, 4, 2, 3, 7], [1, 4, 5, 2, 7, 6]],
        [[2, 3, 0, 6, 7, 4], [2, 0, 1, 6, 4, 5]],
        [[3, 0, 1, 7, 4, 5], [3, 1, 2, 7, 5, 6]],
        [[0, 1, 2, 4, 5, 6], [0, 2, 3, 4, 6, 7]],
        [[1, 2, 3, 5, 6, 7], [1, 3, 0, 5, 7, 4]],
    ],
];

/// Box faces cut by a split along each edge (same for both options).
pub const BOX_SPLIT_CUT_FACES: [[BoxFace; 2]; 12] = [
    [BoxFace::Right, BoxFace::Left],
    [BoxFace::Front, BoxFace::Back],
    [BoxFace::Right, BoxFace::Left],
    [BoxFace::Front, BoxFace::Back],
    [BoxFace::Right, BoxFace::Left],
    [BoxFace::Front, BoxFace::Back],
    [BoxFace::Right, BoxFace::Left],
    [BoxFace::Front, BoxFace::Back],
    [BoxFace::Bottom, BoxFace::Top],
    [BoxFace::Bottom, BoxFace::Top],
    [BoxFace::Bottom, BoxFace::Top],
    [BoxFace::Bottom, BoxFace::Top],
];

/// Wedge split into three tets, keyed by the wedge corner every tet fans from.
pub const WEDGE_SPLIT: [[[usize; 4]; 3]; 6] = [
    [[0, 1, 2, 3], [1, 2, 3, 4], [2, 3, 4, 5]],
    [[1, 2, 0, 4], [2, 0, 4, 5], [0, 4, 5, 3]],
    [[2, 0, 1, 5], [0, 1, 5, 3], [1, 5, 3, 4]],
    [[3, 5, 4, 0], [5, 4, 0, 2], [4, 0, 2, 1]],
    [[4, 3, 5, 1], [3, 5, 1, 0], [5, 1, 0, 2]],
    [[5, 4, 3, 2], [4, 3, 2, 1], [3, 2, 1, 0]],
];

/// Side face of the wedge marked excluded by each split.
pub const WEDGE_SPLIT_CUT_FACE: [WedgeFace; 6] = [
    WedgeFace::Side1,
    WedgeFace::Side2,
    WedgeFace::Side0,
    WedgeFace::Side1,
    WedgeFace::Side2,
    WedgeFace::Side0,
];

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn enums_index_their_tables() {
        assert_eq!(BoxFace::ALL.len(), BOX_FACES.len());
        assert_eq!(BoxEdge::ALL.len(), BOX_EDGES.len());
        assert_eq!(WedgeEdge::ALL.len(), WEDGE_EDGES.len());
        assert_eq!(TetEdge::ALL.len(), TET_EDGES.len());
        assert_eq!(TetFace::ALL.len(), TET_FACES.len());
        assert_eq!(BoxFace::Top.vertices(), [4, 5, 6, 7]);
        assert_eq!(BoxEdge::from_index(9), Some(BoxEdge::Rise15));
        assert_eq!(BoxEdge::rise(3).vertices(), [3, 7]);
        assert_eq!(WedgeEdge::rise(2).vertices(), [2, 5]);
        assert_eq!(WedgeFace::Bottom.tri_vertices(), Some([0, 2, 1]));
        assert_eq!(WedgeFace::Top.quad_vertices(), None);
    }

    #[test]
    fn tet_opposites_are_disjoint() {
        for &f in TetFace::ALL {
            let v = f.opposite_vertex().index();
            assert!(!f.vertices().contains(&v));
            assert_eq!(f.opposite_vertex().opposite_face(), f);
        }
        for &e in TetEdge::ALL {
            let a = e.vertices();
            let b = e.opposite().vertices();
            assert!(a.iter().all(|x| !b.contains(x)));
            assert_eq!(e.opposite().opposite(), e);
        }
    }

    #[test]
    fn box_splits_cover_all_corners_and_cut_listed_faces() {
        for option in 0..2 {
            for edge in 0..12 {
                let [w0, w1] = BOX_SPLIT[option][edge];
                let all: Vec<usize> =
                    w0.iter().chain(w1.iter()).copied().sorted().dedup().collect();
                assert_eq!(all, (0..8).collect::<Vec<_>>(), "option {option} edge {edge}");
                let [a, b] = BOX_EDGES[edge];
                for w in [w0, w1] {
                    assert!(w.contains(&a) && w.contains(&b));
                }
                // the cut faces each contribute one diagonal shared by both wedges
                for face in BOX_SPLIT_CUT_FACES[edge] {
                    let fv = face.vertices();
                    let shared = w0.iter().filter(|v| w1.contains(v) && fv.contains(v)).count();
                    assert_eq!(shared, 2, "option {option} edge {edge} face {face:?}");
                }
            }
        }
    }

    #[test]
    fn option_one_keeps_the_faces_adjacent_to_the_split_edge() {
        for edge in 0..12 {
            let [a, b] = BOX_EDGES[edge];
            let mut kept = Vec::new();
            for wedge in BOX_SPLIT[1][edge] {
                let side: Vec<usize> = WEDGE_QUADS[1].iter().map(|&k| wedge[k]).sorted().collect();
                let face = BoxFace::ALL
                    .iter()
                    .copied()
                    .find(|f| f.vertices().iter().copied().sorted().collect::<Vec<_>>() == side)
                    .expect("side 1 must be a box face");
                assert!(face.vertices().contains(&a) && face.vertices().contains(&b));
                kept.push(face);
            }
            assert_ne!(kept[0], kept[1], "edge {edge}");
        }
    }

    #[test]
    fn wedge_splits_cover_all_corners() {
        for (corner, tets) in WEDGE_SPLIT.iter().enumerate() {
            let all: Vec<usize> = tets.iter().flatten().copied().sorted().dedup().collect();
            assert_eq!(all, (0..6).collect::<Vec<_>>());
            assert!(tets[0].contains(&corner));
        }
    }
}
