//! Hex8 cell template.
//!
//! A box is refined by sweeping its `Bottom` patch grid to its `Top` patch
//! grid along the four rising edges. Intermediate layers are patches whose
//! sides copy the distribution of the bottom sides, so adjacent boxes that
//! sweep in the same direction share their layer edges.

use super::edge::EdgeMeshing;
use super::patch::{Grid, Quad, QuadGridMap};
use super::store::EntityStore;
use crate::mesh_error::MeshError;
use crate::topology::handle::{BoxId, EdgeId, QuadId, VertexId};
use crate::topology::orientation::{D4, Orientation, Sense, accumulate_path};
use crate::topology::reference::{BOX_EDGES, BOX_FACES, BoxEdge, BoxFace};

/// Local bottom corner `c` sits under local top corner `3 - c`.
const BOTTOM_TO_TOP: D4 = D4::new(3, true);

/// The four edges parallel to each axis, flagged when they run towards
/// increasing `y`, `x` and `z` respectively (away from `Front`, `Left` and
/// `Bottom`).
const AXIS_EDGES: [[(BoxEdge, bool); 4]; 3] = [
    [
        (BoxEdge::Bottom30, false),
        (BoxEdge::Bottom12, true),
        (BoxEdge::Top56, true),
        (BoxEdge::Top74, false),
    ],
    [
        (BoxEdge::Bottom23, false),
        (BoxEdge::Bottom01, true),
        (BoxEdge::Top45, true),
        (BoxEdge::Top67, false),
    ],
    [
        (BoxEdge::Rise37, true),
        (BoxEdge::Rise26, true),
        (BoxEdge::Rise15, true),
        (BoxEdge::Rise04, true),
    ],
];

#[derive(Clone, Debug)]
pub struct BoxCell {
    pub(crate) vertices: [VertexId; 8],
    pub(crate) edges: [EdgeId; 12],
    pub(crate) senses: [Sense; 12],
    pub(crate) faces: [QuadId; 6],
    pub(crate) orientations: [D4; 6],
    pub(crate) element: Option<usize>,
    pub(crate) part: usize,
    pub(crate) excluded: bool,
    pub(crate) elements: Vec<Vec<VertexId>>,
}

impl BoxCell {
    pub(crate) fn new(
        store: &mut EntityStore,
        vertices: [VertexId; 8],
        element: Option<usize>,
        part: usize,
    ) -> Result<Self, MeshError> {
        let mut edges = [EdgeId::new(0); 12];
        let mut senses = [Sense::SAME; 12];
        for (k, [a, b]) in BOX_EDGES.iter().enumerate() {
            (edges[k], senses[k]) = store.add_edge(vertices[*a], vertices[*b]);
        }
        let mut faces = [QuadId::new(0); 6];
        let mut orientations = [D4::default(); 6];
        for (k, corners) in BOX_FACES.iter().enumerate() {
            (faces[k], orientations[k]) = store.add_quad(corners.map(|c| vertices[c]))?;
        }
        Ok(Self {
            vertices,
            edges,
            senses,
            faces,
            orientations,
            element,
            part,
            excluded: false,
            elements: Vec::new(),
        })
    }

    pub fn vertices(&self) -> [VertexId; 8] {
        self.vertices
    }

    pub fn edge(&self, edge: BoxEdge) -> (EdgeId, Sense) {
        (self.edges[edge.index()], self.senses[edge.index()])
    }

    pub fn face(&self, face: BoxFace) -> (QuadId, D4) {
        (self.faces[face.index()], self.orientations[face.index()])
    }

    /// Mesh element this box was created from, if any.
    pub fn element(&self) -> Option<usize> {
        self.element
    }

    pub fn part(&self) -> usize {
        self.part
    }

    /// Excluded boxes were split into wedges and emit nothing.
    pub fn is_excluded(&self) -> bool {
        self.excluded
    }

    /// Node lists of the hexes produced by [`create_mesh`](Self::create_mesh).
    pub fn elements(&self) -> &[Vec<VertexId>] {
        &self.elements
    }

    pub fn find_face(&self, vertices: &[VertexId]) -> Option<BoxFace> {
        BoxFace::ALL.iter().copied().find(|f| {
            vertices.len() == 4
                && f.vertices().iter().all(|&c| vertices.contains(&self.vertices[c]))
        })
    }

    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<BoxEdge> {
        BoxEdge::ALL.iter().copied().find(|e| {
            let [p, q] = e.vertices().map(|c| self.vertices[c]);
            (p, q) == (a, b) || (p, q) == (b, a)
        })
    }

    pub fn find_vertex(&self, vertex: VertexId) -> Option<usize> {
        self.vertices.iter().position(|&v| v == vertex)
    }

    /// Requests one distribution per axis group: `groups[0]` on the edges
    /// along `y`, `groups[1]` along `x` and `groups[2]` along `z`, each
    /// oriented towards increasing coordinate.
    pub(crate) fn set_mesh(
        &self,
        store: &mut EntityStore,
        groups: [EdgeMeshing; 3],
    ) -> Result<(), MeshError> {
        for (axis, group) in AXIS_EDGES.iter().enumerate() {
            for &(edge, positive) in group {
                let meshing = if positive {
                    groups[axis]
                } else {
                    groups[axis].reversed()
                };
                let (id, sense) = self.edge(edge);
                store.request_edge(id, sense, meshing)?;
            }
        }
        Ok(())
    }

    /// Refines towards `face`: the edges leaving it get `layer`, graded away
    /// from the face; every other edge keeps one segment.
    pub(crate) fn set_mesh_single_face(
        &self,
        store: &mut EntityStore,
        face: BoxFace,
        layer: EdgeMeshing,
    ) -> Result<(), MeshError> {
        let (axis, meshing) = match face {
            BoxFace::Front => (0, layer),
            BoxFace::Back => (0, layer.reversed()),
            BoxFace::Left => (1, layer),
            BoxFace::Right => (1, layer.reversed()),
            BoxFace::Bottom => (2, layer),
            BoxFace::Top => (2, layer.reversed()),
        };
        let mut groups = [EdgeMeshing::SINGLE; 3];
        groups[axis] = meshing;
        self.set_mesh(store, groups)
    }

    fn label(&self, id: BoxId) -> String {
        match self.element {
            Some(e) => format!("{id} (element {e})"),
            None => id.to_string(),
        }
    }

    /// Sweeps the bottom grid to the top grid and emits the hexes.
    pub(crate) fn create_mesh(
        &mut self,
        id: BoxId,
        store: &mut EntityStore,
    ) -> Result<(), MeshError> {
        let (bottom_id, bottom_orientation) = self.face(BoxFace::Bottom);
        let (top_id, top_orientation) = self.face(BoxFace::Top);
        let bottom: Grid = store.quads[bottom_id.index()].grid.clone();
        let (m, n) = store.quads[bottom_id.index()]
            .dims()
            .ok_or_else(|| {
                MeshError::IncompatiblePatch(format!("{}: bottom is not meshed", self.label(id)))
            })?;

        // rising edge under each stored corner of the bottom patch
        let rises: [(EdgeId, Sense); 4] = std::array::from_fn(|k| {
            let corner = BOX_FACES[BoxFace::Bottom.index()][bottom_orientation.apply(k)];
            self.edge(BoxEdge::rise(corner))
        });
        let layers = store.edges[rises[0].0.index()]
            .span()
            .ok_or(MeshError::UnmeshedEdge(rises[0].0))?;
        if rises
            .iter()
            .any(|(e, _)| store.edges[e.index()].span() != Some(layers))
        {
            return Err(MeshError::IncompatiblePatch(format!(
                "{}: rising edges disagree on their segment count",
                self.label(id)
            )));
        }

        let to_top =
            accumulate_path([D4::inverse(top_orientation), BOTTOM_TO_TOP, bottom_orientation]);
        let top = &store.quads[top_id.index()];
        let map = top
            .dims()
            .and_then(|dims| QuadGridMap::new(to_top, (m, n), dims))
            .ok_or_else(|| MeshError::IncompatibleFaceOrientation { cell: self.label(id) })?;
        let top_grid: Grid = (0..=m)
            .map(|i| {
                (0..=n)
                    .map(|j| {
                        let (ti, tj) = map.map(i, j);
                        top.grid[ti][tj]
                    })
                    .collect()
            })
            .collect();

        let template = &store.quads[bottom_id.index()];
        let (template_edges, template_senses) = (template.edges, template.senses);
        let mut levels: Vec<Grid> = Vec::with_capacity(layers + 1);
        levels.push(bottom);
        for level in 1..layers {
            let mut corners = [VertexId::new(0); 4];
            for (k, &(e, s)) in rises.iter().enumerate() {
                corners[k] = store.edges[e.index()]
                    .local_node(s, level)
                    .ok_or(MeshError::UnmeshedEdge(e))?
                    .0;
            }
            let (edges, senses) = store.slice_edges(corners, template_edges, template_senses)?;
            let mut slice = Quad::new(corners, None, edges, senses);
            slice.create_mesh(&store.edges, &mut store.vertices)?;
            if slice.dims() != Some((m, n)) {
                return Err(MeshError::IncompatiblePatch(format!(
                    "{}: layer {level} does not match the bottom grid",
                    self.label(id)
                )));
            }
            levels.push(slice.grid);
        }
        levels.push(top_grid);

        let same = bottom_orientation.same_sense();
        self.elements.clear();
        for k in 0..layers {
            for i in 0..m {
                for j in 0..n {
                    let at = |di: usize, dj: usize, dk: usize| levels[k + dk][i + di][j + dj];
                    let ring = |dk| {
                        if same {
                            [at(0, 0, dk), at(0, 1, dk), at(1, 1, dk), at(1, 0, dk)]
                        } else {
                            [at(0, 0, dk), at(1, 0, dk), at(1, 1, dk), at(0, 1, dk)]
                        }
                    };
                    let mut hex = ring(0).to_vec();
                    hex.extend(ring(1));
                    self.elements.push(hex);
                }
            }
        }
        log::trace!("{} emitted {} hexes", self.label(id), self.elements.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vertex::Provenance;

    fn unit_box(store: &mut EntityStore) -> BoxCell {
        let v = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
            [0.0, 1.0, 1.0],
        ]
        .map(|p| store.add_vertex(p, Provenance::New));
        BoxCell::new(store, v, Some(0), 2).unwrap()
    }

    #[test]
    fn registration_shares_edges_between_faces() {
        let mut store = EntityStore::new();
        let b = unit_box(&mut store);
        assert_eq!(store.edges().len(), 12);
        assert_eq!(store.quads().len(), 6);
        let reversed = [b.vertices[3], b.vertices[2], b.vertices[1], b.vertices[0]];
        assert_eq!(b.find_face(&reversed), Some(BoxFace::Bottom));
        assert_eq!(b.find_edge(b.vertices[7], b.vertices[3]), Some(BoxEdge::Rise37));
        assert_eq!(b.find_edge(b.vertices[0], b.vertices[6]), None);
    }

    #[test]
    fn single_face_refines_the_normal_edges_only() {
        let mut store = EntityStore::new();
        let b = unit_box(&mut store);
        b.set_mesh_single_face(&mut store, BoxFace::Top, EdgeMeshing::new(4, 2.0))
            .unwrap();
        let (rise, sense) = b.edge(BoxEdge::Rise15);
        let meshing = store.edge(rise).unwrap().meshing().unwrap();
        assert_eq!(meshing.oriented(sense), EdgeMeshing::new(4, 0.5));
        let (bottom, _) = b.edge(BoxEdge::Bottom01);
        assert_eq!(store.edge(bottom).unwrap().meshing(), Some(EdgeMeshing::SINGLE));
    }

    #[test]
    fn opposite_faces_conflict_on_shared_edges() {
        let mut store = EntityStore::new();
        let b = unit_box(&mut store);
        b.set_mesh_single_face(&mut store, BoxFace::Bottom, EdgeMeshing::new(3, 2.0))
            .unwrap();
        assert!(matches!(
            b.set_mesh_single_face(&mut store, BoxFace::Top, EdgeMeshing::new(3, 2.0)),
            Err(MeshError::InconsistentEdgeBias { .. })
        ));
    }
}
