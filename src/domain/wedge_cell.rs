//! Penta6 cell template.
//!
//! A wedge is swept from its `Bottom` triangle to its `Top` triangle. Both
//! triangles fan out of the corner on the chosen rising edge (the apex line),
//! so the layer next to that edge is a column of pentas and every other
//! layer is made of hexes.

use super::edge::EdgeMeshing;
use super::patch::{Grid, Tri};
use super::store::EntityStore;
use crate::mesh_error::MeshError;
use crate::topology::handle::{EdgeId, QuadId, TriId, VertexId, WedgeId};
use crate::topology::orientation::{D3, D4, Orientation, Sense, accumulate_path};
use crate::topology::reference::{
    WEDGE_EDGES, WEDGE_QUADS, WEDGE_TRIS, WedgeEdge, WedgeFace,
};

/// Local bottom corner `c` sits under local top corner `-c mod 3`.
const BOTTOM_TO_TOP: D3 = D3::new(0, true);

/// Edge groups driven by a choice of apex line.
///
/// The first group holds the triangle edges leaving the apex line, flagged
/// when they point away from it; the second holds the triangle edges facing
/// the apex line.
fn edge_groups(rise: WedgeEdge) -> Option<([(WedgeEdge, bool); 4], [WedgeEdge; 2])> {
    use WedgeEdge::*;
    match rise {
        Rise03 => Some((
            [(Bottom01, true), (Bottom20, false), (Top34, true), (Top53, false)],
            [Bottom12, Top45],
        )),
        Rise14 => Some((
            [(Bottom12, true), (Bottom01, false), (Top45, true), (Top34, false)],
            [Bottom20, Top53],
        )),
        Rise25 => Some((
            [(Bottom20, true), (Bottom12, false), (Top53, true), (Top45, false)],
            [Bottom01, Top34],
        )),
        _ => None,
    }
}

#[derive(Clone, Debug)]
pub struct WedgeCell {
    pub(crate) vertices: [VertexId; 6],
    pub(crate) edges: [EdgeId; 9],
    pub(crate) senses: [Sense; 9],
    pub(crate) quads: [QuadId; 3],
    pub(crate) quad_orientations: [D4; 3],
    pub(crate) tris: [TriId; 2],
    pub(crate) tri_orientations: [D3; 2],
    pub(crate) element: Option<usize>,
    pub(crate) part: usize,
    pub(crate) excluded: bool,
    pub(crate) elements: Vec<Vec<VertexId>>,
}

impl WedgeCell {
    pub(crate) fn new(
        store: &mut EntityStore,
        vertices: [VertexId; 6],
        element: Option<usize>,
        part: usize,
    ) -> Result<Self, MeshError> {
        let mut edges = [EdgeId::new(0); 9];
        let mut senses = [Sense::SAME; 9];
        for (k, [a, b]) in WEDGE_EDGES.iter().enumerate() {
            (edges[k], senses[k]) = store.add_edge(vertices[*a], vertices[*b]);
        }
        let mut quads = [QuadId::new(0); 3];
        let mut quad_orientations = [D4::default(); 3];
        for (k, corners) in WEDGE_QUADS.iter().enumerate() {
            (quads[k], quad_orientations[k]) = store.add_quad(corners.map(|c| vertices[c]))?;
        }
        let mut tris = [TriId::new(0); 2];
        let mut tri_orientations = [D3::default(); 2];
        for (k, corners) in WEDGE_TRIS.iter().enumerate() {
            (tris[k], tri_orientations[k]) = store.add_tri(corners.map(|c| vertices[c]));
        }
        Ok(Self {
            vertices,
            edges,
            senses,
            quads,
            quad_orientations,
            tris,
            tri_orientations,
            element,
            part,
            excluded: false,
            elements: Vec::new(),
        })
    }

    pub fn vertices(&self) -> [VertexId; 6] {
        self.vertices
    }

    pub fn edge(&self, edge: WedgeEdge) -> (EdgeId, Sense) {
        (self.edges[edge.index()], self.senses[edge.index()])
    }

    /// Quad patch of a side face.
    pub fn side(&self, face: WedgeFace) -> Option<(QuadId, D4)> {
        let k = face.index();
        (k < 3).then(|| (self.quads[k], self.quad_orientations[k]))
    }

    /// Triangle patch of `Bottom` or `Top`.
    pub fn cap(&self, face: WedgeFace) -> Option<(TriId, D3)> {
        match face {
            WedgeFace::Bottom => Some((self.tris[0], self.tri_orientations[0])),
            WedgeFace::Top => Some((self.tris[1], self.tri_orientations[1])),
            _ => None,
        }
    }

    pub fn element(&self) -> Option<usize> {
        self.element
    }

    pub fn part(&self) -> usize {
        self.part
    }

    /// Excluded wedges were split into tets and emit nothing.
    pub fn is_excluded(&self) -> bool {
        self.excluded
    }

    pub fn elements(&self) -> &[Vec<VertexId>] {
        &self.elements
    }

    pub fn find_face(&self, vertices: &[VertexId]) -> Option<WedgeFace> {
        WedgeFace::ALL.iter().copied().find(|f| {
            let corners: Vec<usize> = match (f.quad_vertices(), f.tri_vertices()) {
                (Some(q), _) => q.to_vec(),
                (_, Some(t)) => t.to_vec(),
                _ => return false,
            };
            corners.len() == vertices.len()
                && corners.iter().all(|&c| vertices.contains(&self.vertices[c]))
        })
    }

    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<WedgeEdge> {
        WedgeEdge::ALL.iter().copied().find(|e| {
            let [p, q] = e.vertices().map(|c| self.vertices[c]);
            (p, q) == (a, b) || (p, q) == (b, a)
        })
    }

    pub fn find_vertex(&self, vertex: VertexId) -> Option<usize> {
        self.vertices.iter().position(|&v| v == vertex)
    }

    /// Chooses `rise` as the apex line and requests `groups[0]` on the
    /// triangle edges leaving it, `groups[1]` on the triangle edges facing it
    /// and `groups[2]` on the three rising edges.
    pub(crate) fn set_mesh(
        &self,
        store: &mut EntityStore,
        rise: WedgeEdge,
        groups: [EdgeMeshing; 3],
    ) -> Result<(), MeshError> {
        let (leaving, facing) = edge_groups(rise).ok_or_else(|| {
            MeshError::InvalidParameter(format!("{rise:?} is not a rising wedge edge"))
        })?;
        for (edge, away) in leaving {
            let meshing = if away { groups[0] } else { groups[0].reversed() };
            let (id, sense) = self.edge(edge);
            store.request_edge(id, sense, meshing)?;
        }
        for edge in facing {
            let (id, sense) = self.edge(edge);
            store.request_edge(id, sense, groups[1])?;
        }
        for edge in [WedgeEdge::Rise03, WedgeEdge::Rise14, WedgeEdge::Rise25] {
            let (id, sense) = self.edge(edge);
            store.request_edge(id, sense, groups[2])?;
        }

        let [low, high] = rise.vertices().map(|c| self.vertices[c]);
        for (tri, apex) in [(self.tris[0], low), (self.tris[1], high)] {
            if !store.tris[tri.index()].set_apex_vertex(apex) {
                return Err(MeshError::LocalFeatureNotFound {
                    cell: format!("{tri}"),
                    feature: "apex vertex",
                });
            }
        }
        Ok(())
    }

    /// Refines towards `face`, grading away from it.
    pub(crate) fn set_mesh_single_face(
        &self,
        store: &mut EntityStore,
        face: WedgeFace,
        layer: EdgeMeshing,
    ) -> Result<(), MeshError> {
        let single = EdgeMeshing::SINGLE;
        let (rise, groups) = match face {
            WedgeFace::Side0 => (WedgeEdge::Rise25, [layer.reversed(), single, single]),
            WedgeFace::Side1 => (WedgeEdge::Rise03, [layer.reversed(), single, single]),
            WedgeFace::Side2 => (WedgeEdge::Rise14, [layer.reversed(), single, single]),
            WedgeFace::Bottom => (WedgeEdge::Rise03, [single, single, layer]),
            WedgeFace::Top => (WedgeEdge::Rise03, [single, single, layer.reversed()]),
        };
        self.set_mesh(store, rise, groups)
    }

    /// Refines towards `edge`: both faces meeting there grade away from it.
    pub(crate) fn set_mesh_single_edge(
        &self,
        store: &mut EntityStore,
        edge: WedgeEdge,
        layer: EdgeMeshing,
    ) -> Result<(), MeshError> {
        use WedgeEdge::*;
        let single = EdgeMeshing::SINGLE;
        let (rise, vertical) = match edge {
            Bottom12 => (Rise03, layer),
            Top45 => (Rise03, layer.reversed()),
            Bottom20 => (Rise14, layer),
            Top53 => (Rise14, layer.reversed()),
            Bottom01 => (Rise25, layer),
            Top34 => (Rise25, layer.reversed()),
            Rise03 | Rise14 | Rise25 => {
                return self.set_mesh(store, edge, [layer, single, single]);
            }
        };
        self.set_mesh(store, rise, [layer.reversed(), single, vertical])
    }

    fn label(&self, id: WedgeId) -> String {
        match self.element {
            Some(e) => format!("{id} (element {e})"),
            None => id.to_string(),
        }
    }

    /// Sweeps the bottom triangle grid to the top one and emits pentas
    /// along the apex line and hexes elsewhere.
    pub(crate) fn create_mesh(
        &mut self,
        id: WedgeId,
        store: &mut EntityStore,
    ) -> Result<(), MeshError> {
        let (bottom_id, bottom_orientation) = (self.tris[0], self.tri_orientations[0]);
        let (top_id, top_orientation) = (self.tris[1], self.tri_orientations[1]);
        let bottom_tri = &store.tris[bottom_id.index()];
        let apex = bottom_tri.apex.ok_or(MeshError::MissingApex(bottom_id))?;
        let top_apex = store.tris[top_id.index()]
            .apex
            .ok_or(MeshError::MissingApex(top_id))?;
        let (m, n) = bottom_tri.dims().ok_or_else(|| {
            MeshError::IncompatiblePatch(format!("{}: bottom is not meshed", self.label(id)))
        })?;
        let bottom: Grid = bottom_tri.grid.clone();
        let (template_edges, template_senses) = (bottom_tri.edges, bottom_tri.senses);

        let to_top =
            accumulate_path([D3::inverse(top_orientation), BOTTOM_TO_TOP, bottom_orientation]);
        let mismatch = || MeshError::IncompatibleFaceOrientation { cell: self.label(id) };
        if to_top.apply(apex) != top_apex {
            return Err(mismatch());
        }
        let next = to_top.apply((apex + 1) % 3);
        let reversed_rows = if next == (top_apex + 1) % 3 {
            false
        } else if next == (top_apex + 2) % 3 {
            true
        } else {
            return Err(mismatch());
        };
        let top = &store.tris[top_id.index()];
        if top.dims() != Some((m, n)) {
            return Err(mismatch());
        }
        let top_grid: Grid = (0..=m)
            .map(|i| {
                (0..=n)
                    .map(|j| top.grid[i][if reversed_rows { n - j } else { j }])
                    .collect()
            })
            .collect();

        let rises: [(EdgeId, Sense); 3] = std::array::from_fn(|k| {
            let corner = WEDGE_TRIS[0][bottom_orientation.apply(k)];
            self.edge(WedgeEdge::rise(corner))
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

        let mut levels: Vec<Grid> = Vec::with_capacity(layers + 1);
        levels.push(bottom);
        for level in 1..layers {
            let mut corners = [VertexId::new(0); 3];
            for (k, &(e, s)) in rises.iter().enumerate() {
                corners[k] = store.edges[e.index()]
                    .local_node(s, level)
                    .ok_or(MeshError::UnmeshedEdge(e))?
                    .0;
            }
            let (edges, senses) = store.slice_edges(corners, template_edges, template_senses)?;
            let mut slice = Tri::new(corners, edges, senses);
            slice.apex = Some(apex);
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
            for j in 0..n {
                let at = |i: usize, dj: usize, dk: usize| levels[k + dk][i][j + dj];
                let fan = |dk| {
                    if same {
                        [at(0, 0, dk), at(1, 1, dk), at(1, 0, dk)]
                    } else {
                        [at(0, 0, dk), at(1, 0, dk), at(1, 1, dk)]
                    }
                };
                let mut penta = fan(0).to_vec();
                penta.extend(fan(1));
                self.elements.push(penta);

                for i in 1..m {
                    let ring = |dk| {
                        if same {
                            [at(i, 0, dk), at(i, 1, dk), at(i + 1, 1, dk), at(i + 1, 0, dk)]
                        } else {
                            [at(i, 0, dk), at(i + 1, 0, dk), at(i + 1, 1, dk), at(i, 1, dk)]
                        }
                    };
                    let mut hex = ring(0).to_vec();
                    hex.extend(ring(1));
                    self.elements.push(hex);
                }
            }
        }
        log::trace!("{} emitted {} elements", self.label(id), self.elements.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vertex::Provenance;

    fn unit_wedge(store: &mut EntityStore) -> WedgeCell {
        let v = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [0.0, 1.0, 1.0],
        ]
        .map(|p| store.add_vertex(p, Provenance::New));
        WedgeCell::new(store, v, None, 0).unwrap()
    }

    #[test]
    fn registration_creates_shared_patches() {
        let mut store = EntityStore::new();
        let w = unit_wedge(&mut store);
        assert_eq!(store.edges().len(), 9);
        assert_eq!(store.quads().len(), 3);
        assert_eq!(store.tris().len(), 2);
        let v = w.vertices();
        assert_eq!(w.find_face(&[v[3], v[4], v[5]]), Some(WedgeFace::Top));
        assert_eq!(w.find_face(&[v[1], v[2], v[5], v[4]]), Some(WedgeFace::Side1));
        assert_eq!(w.find_edge(v[5], v[2]), Some(WedgeEdge::Rise25));
    }

    #[test]
    fn set_mesh_places_the_apex_on_the_rise() {
        let mut store = EntityStore::new();
        let w = unit_wedge(&mut store);
        let layers = [EdgeMeshing::new(3, 1.0), EdgeMeshing::SINGLE, EdgeMeshing::SINGLE];
        w.set_mesh(&mut store, WedgeEdge::Rise14, layers).unwrap();
        let bottom = store.tri(w.tris[0]).unwrap();
        let apex = bottom.apex().unwrap();
        assert_eq!(bottom.corners()[apex], w.vertices()[1]);
        let top = store.tri(w.tris[1]).unwrap();
        assert_eq!(top.corners()[top.apex().unwrap()], w.vertices()[4]);
        assert!(w.set_mesh(&mut store, WedgeEdge::Top34, [EdgeMeshing::SINGLE; 3]).is_err());
    }

    #[test]
    fn single_face_refinement_is_consistent_across_the_cell() {
        let mut store = EntityStore::new();
        let w = unit_wedge(&mut store);
        for face in [WedgeFace::Side0, WedgeFace::Side1, WedgeFace::Side2, WedgeFace::Bottom] {
            let mut fresh = EntityStore::new();
            let w = unit_wedge(&mut fresh);
            w.set_mesh_single_face(&mut fresh, face, EdgeMeshing::new(3, 1.5))
                .unwrap();
        }
        w.set_mesh_single_edge(&mut store, WedgeEdge::Bottom12, EdgeMeshing::new(2, 1.0))
            .unwrap();
        let (rise, _) = w.edge(WedgeEdge::Rise03);
        assert_eq!(store.edge(rise).unwrap().meshing().map(|m| m.segments), Some(2));
    }
}
