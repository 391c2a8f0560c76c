//! Tet4 cell template.
//!
//! A tet is refined from one of its faces, vertices or edges. Only the edges
//! joining the driving feature to the rest of the tet are subdivided; the
//! layers between consecutive points on those edges become prisms, or hexes
//! when refining from an edge, and the last layer closes with a tet or wedge.

use super::edge::EdgeMeshing;
use super::store::EntityStore;
use crate::mesh_error::MeshError;
use crate::topology::handle::{EdgeId, TetId, TriId, VertexId};
use crate::topology::orientation::{D3, Sense};
use crate::topology::reference::{TET_EDGES, TET_FACES, TetEdge, TetFace, TetVertex};

/// Edges leaving each face, one per face corner, and whether their local
/// direction points away from the face.
const FACE_EDGES: [[usize; 3]; 4] = [[2, 1, 5], [0, 2, 3], [0, 4, 1], [3, 5, 4]];
const FACE_EDGES_AWAY: [[bool; 3]; 4] = [
    [false, true, false],
    [false, true, false],
    [true, false, false],
    [true, true, true],
];
/// Edges of each face, which keep a single segment.
const FACE_RIM: [[usize; 3]; 4] = [[0, 4, 3], [1, 5, 4], [3, 5, 2], [2, 1, 0]];

/// Edges leaving each vertex and whether their local direction points away from it.
const VERTEX_EDGES: [[usize; 3]; 4] = [[0, 3, 2], [1, 4, 0], [2, 5, 1], [3, 4, 5]];
const VERTEX_EDGES_AWAY: [[bool; 3]; 4] = [
    [true, true, false],
    [true, true, false],
    [true, true, false],
    [false, false, false],
];
const VERTEX_RIM: [[usize; 3]; 4] = [[1, 4, 5], [2, 3, 5], [0, 3, 4], [0, 1, 2]];

/// For an edge `A-B` with opposite edge `C-D`: the edges `A-C`, `B-C`,
/// `B-D`, `A-D`, and whether their local direction points away from `A-B`.
const EDGE_EDGES: [[usize; 4]; 6] = [
    [2, 1, 4, 3],
    [0, 2, 5, 4],
    [1, 0, 3, 5],
    [0, 4, 5, 2],
    [1, 5, 3, 0],
    [2, 3, 4, 1],
];
const EDGE_EDGES_AWAY: [[bool; 4]; 6] = [
    [false, true, true, true],
    [false, true, true, true],
    [false, true, true, true],
    [true, false, false, false],
    [true, false, false, false],
    [true, false, false, false],
];

/// Feature a tet is refined from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TetMode {
    Face(TetFace),
    Vertex(TetVertex),
    Edge(TetEdge),
}

#[derive(Clone, Debug)]
pub struct TetCell {
    pub(crate) vertices: [VertexId; 4],
    pub(crate) edges: [EdgeId; 6],
    pub(crate) senses: [Sense; 6],
    pub(crate) faces: [TriId; 4],
    pub(crate) orientations: [D3; 4],
    pub(crate) mode: Option<TetMode>,
    pub(crate) element: Option<usize>,
    pub(crate) part: usize,
    pub(crate) elements: Vec<Vec<VertexId>>,
}

impl TetCell {
    pub(crate) fn new(
        store: &mut EntityStore,
        vertices: [VertexId; 4],
        element: Option<usize>,
        part: usize,
    ) -> Self {
        let mut edges = [EdgeId::new(0); 6];
        let mut senses = [Sense::SAME; 6];
        for (k, [a, b]) in TET_EDGES.iter().enumerate() {
            (edges[k], senses[k]) = store.add_edge(vertices[*a], vertices[*b]);
        }
        let mut faces = [TriId::new(0); 4];
        let mut orientations = [D3::default(); 4];
        for (k, corners) in TET_FACES.iter().enumerate() {
            (faces[k], orientations[k]) = store.add_tri(corners.map(|c| vertices[c]));
        }
        Self {
            vertices,
            edges,
            senses,
            faces,
            orientations,
            mode: None,
            element,
            part,
            elements: Vec::new(),
        }
    }

    pub fn vertices(&self) -> [VertexId; 4] {
        self.vertices
    }

    pub fn edge(&self, edge: TetEdge) -> (EdgeId, Sense) {
        (self.edges[edge.index()], self.senses[edge.index()])
    }

    pub fn face(&self, face: TetFace) -> (TriId, D3) {
        (self.faces[face.index()], self.orientations[face.index()])
    }

    pub fn mode(&self) -> Option<TetMode> {
        self.mode
    }

    pub fn element(&self) -> Option<usize> {
        self.element
    }

    pub fn part(&self) -> usize {
        self.part
    }

    pub fn elements(&self) -> &[Vec<VertexId>] {
        &self.elements
    }

    pub fn find_face(&self, vertices: &[VertexId]) -> Option<TetFace> {
        TetFace::ALL.iter().copied().find(|f| {
            vertices.len() == 3
                && f.vertices().iter().all(|&c| vertices.contains(&self.vertices[c]))
        })
    }

    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<TetEdge> {
        TetEdge::ALL.iter().copied().find(|e| {
            let [p, q] = e.vertices().map(|c| self.vertices[c]);
            (p, q) == (a, b) || (p, q) == (b, a)
        })
    }

    pub fn find_vertex(&self, vertex: VertexId) -> Option<TetVertex> {
        self.vertices
            .iter()
            .position(|&v| v == vertex)
            .and_then(TetVertex::from_index)
    }

    fn request(
        &self,
        store: &mut EntityStore,
        driven: &[usize],
        away: &[bool],
        rim: &[usize],
        layer: EdgeMeshing,
    ) -> Result<(), MeshError> {
        for (&e, &positive) in driven.iter().zip(away) {
            let meshing = if positive { layer } else { layer.reversed() };
            store.request_edge(self.edges[e], self.senses[e], meshing)?;
        }
        for &e in rim {
            store.request_edge(self.edges[e], self.senses[e], EdgeMeshing::SINGLE)?;
        }
        Ok(())
    }

    fn set_apex(
        &self,
        store: &mut EntityStore,
        face: TetFace,
        corner: usize,
    ) -> Result<(), MeshError> {
        let tri = self.faces[face.index()];
        if store.tris[tri.index()].set_apex_vertex(self.vertices[corner]) {
            Ok(())
        } else {
            Err(MeshError::LocalFeatureNotFound {
                cell: tri.to_string(),
                feature: "apex vertex",
            })
        }
    }

    /// Layers parallel to `face`, graded away from it.
    pub(crate) fn set_mesh_from_face(
        &mut self,
        store: &mut EntityStore,
        face: TetFace,
        layer: EdgeMeshing,
    ) -> Result<(), MeshError> {
        let f = face.index();
        self.request(store, &FACE_EDGES[f], &FACE_EDGES_AWAY[f], &FACE_RIM[f], layer)?;
        let apex = face.opposite_vertex().index();
        for &other in TetFace::ALL.iter().filter(|&&g| g != face) {
            self.set_apex(store, other, apex)?;
        }
        self.mode = Some(TetMode::Face(face));
        Ok(())
    }

    /// Layers around `vertex`, graded away from it.
    pub(crate) fn set_mesh_from_vertex(
        &mut self,
        store: &mut EntityStore,
        vertex: TetVertex,
        layer: EdgeMeshing,
    ) -> Result<(), MeshError> {
        let v = vertex.index();
        self.request(store, &VERTEX_EDGES[v], &VERTEX_EDGES_AWAY[v], &VERTEX_RIM[v], layer)?;
        for &face in TetFace::ALL {
            if face.vertices().contains(&v) {
                self.set_apex(store, face, v)?;
            }
        }
        self.mode = Some(TetMode::Vertex(vertex));
        Ok(())
    }

    /// Layers around `edge`, graded away from it.
    pub(crate) fn set_mesh_from_edge(
        &mut self,
        store: &mut EntityStore,
        edge: TetEdge,
        layer: EdgeMeshing,
    ) -> Result<(), MeshError> {
        let e = edge.index();
        let rim = [e, edge.opposite().index()];
        self.request(store, &EDGE_EDGES[e], &EDGE_EDGES_AWAY[e], &rim, layer)?;
        let [a, b] = edge.vertices();
        for &face in TetFace::ALL {
            let corners = face.vertices();
            let apex = match (corners.contains(&a), corners.contains(&b)) {
                // faces through the edge fan out of their third corner
                (true, true) => corners.iter().copied().find(|&c| c != a && c != b),
                (true, false) => Some(a),
                (false, true) => Some(b),
                (false, false) => None,
            };
            if let Some(apex) = apex {
                self.set_apex(store, face, apex)?;
            }
        }
        self.mode = Some(TetMode::Edge(edge));
        Ok(())
    }

    /// Point `i` steps along local edge `e`, counted from the end named by `from_start`.
    fn node(
        &self,
        store: &EntityStore,
        e: usize,
        from_start: bool,
        i: usize,
    ) -> Result<VertexId, MeshError> {
        let id = self.edges[e];
        let edge = &store.edges[id.index()];
        let span = edge.span().ok_or(MeshError::UnmeshedEdge(id))?;
        let k = if from_start { i } else { span - i };
        edge.local_node(self.senses[e], k)
            .map(|(v, _)| v)
            .ok_or(MeshError::UnmeshedEdge(id))
    }

    fn driven_span(
        &self,
        store: &EntityStore,
        id: TetId,
        driven: &[usize],
    ) -> Result<usize, MeshError> {
        let spans: Vec<Option<usize>> = driven
            .iter()
            .map(|&e| store.edges[self.edges[e].index()].span())
            .collect();
        match spans[0] {
            Some(n) if spans.iter().all(|&s| s == Some(n)) => Ok(n),
            Some(_) => Err(MeshError::IncompatiblePatch(format!(
                "{id}: driven edges disagree on their segment count"
            ))),
            None => Err(MeshError::UnmeshedEdge(self.edges[driven[0]])),
        }
    }

    /// Emits the layered elements for the chosen mode. A tet without a mode
    /// is emitted unchanged.
    pub(crate) fn create_mesh(&mut self, id: TetId, store: &EntityStore) -> Result<(), MeshError> {
        self.elements = match self.mode {
            None => vec![self.vertices.to_vec()],
            Some(TetMode::Face(face)) => self.layers_from_face(id, store, face)?,
            Some(TetMode::Vertex(vertex)) => self.layers_from_vertex(id, store, vertex)?,
            Some(TetMode::Edge(edge)) => self.layers_from_edge(id, store, edge)?,
        };
        log::trace!("{id} emitted {} elements", self.elements.len());
        Ok(())
    }

    fn layers_from_face(
        &self,
        id: TetId,
        store: &EntityStore,
        face: TetFace,
    ) -> Result<Vec<Vec<VertexId>>, MeshError> {
        let [e0, e1, e2] = FACE_EDGES[face.index()];
        let [p0, p1, p2] = FACE_EDGES_AWAY[face.index()];
        let n = self.driven_span(store, id, &[e0, e1, e2])?;
        let ring = |i| -> Result<[VertexId; 3], MeshError> {
            Ok([
                self.node(store, e0, p0, i)?,
                self.node(store, e2, p2, i)?,
                self.node(store, e1, p1, i)?,
            ])
        };
        let mut elements = Vec::with_capacity(n);
        for i in 0..n - 1 {
            let mut prism = ring(i)?.to_vec();
            prism.extend(ring(i + 1)?);
            elements.push(prism);
        }
        let mut tet = ring(n - 1)?.to_vec();
        tet.push(self.vertices[face.opposite_vertex().index()]);
        elements.push(tet);
        Ok(elements)
    }

    fn layers_from_vertex(
        &self,
        id: TetId,
        store: &EntityStore,
        vertex: TetVertex,
    ) -> Result<Vec<Vec<VertexId>>, MeshError> {
        let [e0, e1, e2] = VERTEX_EDGES[vertex.index()];
        let [p0, p1, p2] = VERTEX_EDGES_AWAY[vertex.index()];
        let n = self.driven_span(store, id, &[e0, e1, e2])?;
        let point = |e, p, i| self.node(store, e, p, i);
        let mut elements = Vec::with_capacity(n);
        elements.push(vec![
            point(e0, p0, 1)?,
            point(e1, p1, 1)?,
            point(e2, p2, 1)?,
            self.vertices[vertex.index()],
        ]);
        for i in 1..n {
            elements.push(vec![
                point(e0, p0, i)?,
                point(e2, p2, i)?,
                point(e1, p1, i)?,
                point(e0, p0, i + 1)?,
                point(e2, p2, i + 1)?,
                point(e1, p1, i + 1)?,
            ]);
        }
        Ok(elements)
    }

    fn layers_from_edge(
        &self,
        id: TetId,
        store: &EntityStore,
        edge: TetEdge,
    ) -> Result<Vec<Vec<VertexId>>, MeshError> {
        let [ac, bc, bd, ad] = EDGE_EDGES[edge.index()];
        let [pac, pbc, pbd, pad] = EDGE_EDGES_AWAY[edge.index()];
        let n = self.driven_span(store, id, &[ac, bc, bd, ad])?;
        let ac_at = |i| self.node(store, ac, pac, i);
        let bc_at = |i| self.node(store, bc, pbc, i);
        let bd_at = |i| self.node(store, bd, pbd, i);
        let ad_at = |i| self.node(store, ad, pad, i);
        let (a, b, c, d) = (ac_at(0)?, bc_at(0)?, bc_at(n)?, bd_at(n)?);
        if n == 1 {
            return Ok(vec![vec![a, b, c, d]]);
        }
        let mut elements = Vec::with_capacity(n);
        elements.push(vec![a, ac_at(1)?, ad_at(1)?, b, bc_at(1)?, bd_at(1)?]);
        for i in 1..n - 1 {
            elements.push(vec![
                ac_at(i)?,
                ad_at(i)?,
                bd_at(i)?,
                bc_at(i)?,
                ac_at(i + 1)?,
                ad_at(i + 1)?,
                bd_at(i + 1)?,
                bc_at(i + 1)?,
            ]);
        }
        elements.push(vec![
            ac_at(n - 1)?,
            bc_at(n - 1)?,
            c,
            ad_at(n - 1)?,
            bd_at(n - 1)?,
            d,
        ]);
        Ok(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vertex::Provenance;

    fn unit_tet(store: &mut EntityStore) -> TetCell {
        let v = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
            .map(|p| store.add_vertex(p, Provenance::New));
        TetCell::new(store, v, Some(0), 0)
    }

    fn mesh_edges(store: &mut EntityStore) {
        for k in 0..store.edges().len() {
            store.mesh_edge(EdgeId::new(k)).unwrap();
        }
    }

    #[test]
    fn face_tables_point_from_the_face_to_its_opposite_vertex() {
        for &face in TetFace::ALL {
            let f = face.index();
            let opposite = face.opposite_vertex().index();
            for (k, &e) in FACE_EDGES[f].iter().enumerate() {
                let [a, b] = TET_EDGES[e];
                let far = if FACE_EDGES_AWAY[f][k] { b } else { a };
                assert_eq!(far, opposite, "face {face:?} edge {e}");
            }
            for &e in &FACE_RIM[f] {
                assert!(TET_EDGES[e].iter().all(|c| face.vertices().contains(c)));
            }
        }
    }

    #[test]
    fn vertex_and_edge_tables_point_away_from_their_feature() {
        for v in 0..4 {
            for (k, &e) in VERTEX_EDGES[v].iter().enumerate() {
                let [a, b] = TET_EDGES[e];
                let near = if VERTEX_EDGES_AWAY[v][k] { a } else { b };
                assert_eq!(near, v);
            }
        }
        for &edge in TetEdge::ALL {
            let [a, b] = edge.vertices();
            for (k, &e) in EDGE_EDGES[edge.index()].iter().enumerate() {
                let [p, q] = TET_EDGES[e];
                let near = if EDGE_EDGES_AWAY[edge.index()][k] { p } else { q };
                // A-C and A-D start at A, B-C and B-D at B
                let expected = if k == 0 || k == 3 { a } else { b };
                assert_eq!(near, expected, "edge {edge:?} slot {k}");
            }
        }
    }

    #[test]
    fn refinement_from_a_face_stacks_prisms_under_a_tet() {
        let mut store = EntityStore::new();
        let mut t = unit_tet(&mut store);
        t.set_mesh_from_face(&mut store, TetFace::Opposite3, EdgeMeshing::new(4, 1.0))
            .unwrap();
        mesh_edges(&mut store);
        t.create_mesh(TetId::new(0), &store).unwrap();
        let sizes: Vec<usize> = t.elements().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![6, 6, 6, 4]);
        assert_eq!(store.vertices().len(), 4 + 9);
    }

    #[test]
    fn refinement_from_an_edge_alternates_wedges_and_hexes() {
        let mut store = EntityStore::new();
        let mut t = unit_tet(&mut store);
        t.set_mesh_from_edge(&mut store, TetEdge::E01, EdgeMeshing::new(3, 2.0))
            .unwrap();
        mesh_edges(&mut store);
        t.create_mesh(TetId::new(0), &store).unwrap();
        let sizes: Vec<usize> = t.elements().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![6, 8, 6]);
        let (face, _) = t.face(TetFace::Opposite3);
        let tri = store.tri(face).unwrap();
        // face 0-2-1 contains the edge; it fans out of vertex 2
        assert_eq!(tri.corners()[tri.apex().unwrap()], t.vertices()[2]);
    }

    #[test]
    fn refinement_from_a_vertex_starts_with_a_tet() {
        let mut store = EntityStore::new();
        let mut t = unit_tet(&mut store);
        t.set_mesh_from_vertex(&mut store, TetVertex::V3, EdgeMeshing::new(2, 1.0))
            .unwrap();
        mesh_edges(&mut store);
        t.create_mesh(TetId::new(0), &store).unwrap();
        let sizes: Vec<usize> = t.elements().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![4, 6]);
        assert_eq!(t.elements()[0][3], t.vertices()[3]);
    }
}
