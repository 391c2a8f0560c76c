//! Arena of shared vertices, edges and patches with find-or-create lookup.
//!
//! Edges and patches are keyed by their sorted corner vertices, so two cells
//! that name the same edge or face in different orders get the same master
//! entity back, together with the orientation relating their local view to
//! the stored one.

use hashbrown::HashMap;

use super::edge::{Edge, EdgeMeshing};
use super::patch::{Quad, Tri};
use super::vertex::{Provenance, Vertex};
use crate::geometry::Point3;
use crate::mesh_error::MeshError;
use crate::topology::handle::{EdgeId, QuadId, TriId, VertexId};
use crate::topology::orientation::{BitFlip, D3, D4, Sense};
use crate::topology::reference::{QUAD_EDGES, TRI_EDGES};

fn sorted<const N: usize>(mut key: [VertexId; N]) -> [VertexId; N] {
    key.sort_unstable();
    key
}

#[derive(Clone, Debug, Default)]
pub struct EntityStore {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) quads: Vec<Quad>,
    pub(crate) tris: Vec<Tri>,
    edge_index: HashMap<[VertexId; 2], EdgeId>,
    quad_index: HashMap<[VertexId; 4], QuadId>,
    tri_index: HashMap<[VertexId; 3], TriId>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    pub fn tris(&self) -> &[Tri] {
        &self.tris
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.index())
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    pub fn quad(&self, id: QuadId) -> Option<&Quad> {
        self.quads.get(id.index())
    }

    pub fn tri(&self, id: TriId) -> Option<&Tri> {
        self.tris.get(id.index())
    }

    pub fn add_vertex(&mut self, position: Point3, provenance: Provenance) -> VertexId {
        self.vertices.push(Vertex::new(position, provenance));
        VertexId::new(self.vertices.len() - 1)
    }

    /// Master edge joining `a` and `b`, with the walk direction `a -> b` relative to it.
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<(EdgeId, Sense)> {
        let id = *self.edge_index.get(&sorted([a, b]))?;
        let sense = BitFlip::matching(self.edges[id.index()].ends, [a, b])?;
        Some((id, sense))
    }

    /// Finds or creates the edge `a -> b`.
    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> (EdgeId, Sense) {
        self.insert_edge(a, b, None)
    }

    /// Finds or creates the quadratic edge `a -> b` through `mid`.
    pub fn add_quadratic_edge(
        &mut self,
        a: VertexId,
        b: VertexId,
        mid: VertexId,
    ) -> (EdgeId, Sense) {
        self.insert_edge(a, b, Some(mid))
    }

    fn insert_edge(&mut self, a: VertexId, b: VertexId, mid: Option<VertexId>) -> (EdgeId, Sense) {
        if let Some(found) = self.find_edge(a, b) {
            return found;
        }
        let id = EdgeId::new(self.edges.len());
        self.edges.push(Edge::new([a, b], mid));
        self.edge_index.insert(sorted([a, b]), id);
        self.vertices[a.index()].edges.push(id);
        self.vertices[b.index()].edges.push(id);
        (id, Sense::SAME)
    }

    /// Stored quad with corner set `corners`, and the orientation mapping its
    /// stored corners onto `corners`.
    pub fn find_quad(&self, corners: [VertexId; 4]) -> Option<(QuadId, D4)> {
        let id = *self.quad_index.get(&sorted(corners))?;
        let orientation = D4::matching(&self.quads[id.index()].corners, &corners)?;
        Some((id, orientation))
    }

    pub fn add_quad(&mut self, corners: [VertexId; 4]) -> Result<(QuadId, D4), MeshError> {
        self.insert_quad(corners, None)
    }

    pub fn add_quadratic_quad(
        &mut self,
        corners: [VertexId; 4],
        mids: [VertexId; 4],
    ) -> Result<(QuadId, D4), MeshError> {
        self.insert_quad(corners, Some(mids))
    }

    fn insert_quad(
        &mut self,
        corners: [VertexId; 4],
        mids: Option<[VertexId; 4]>,
    ) -> Result<(QuadId, D4), MeshError> {
        let key = sorted(corners);
        if let Some(&id) = self.quad_index.get(&key) {
            let orientation = D4::matching(&self.quads[id.index()].corners, &corners)
                .ok_or_else(|| {
                    MeshError::InvalidGeometry(format!(
                        "quad {corners:?} reuses the corners of {id} in a different cycle"
                    ))
                })?;
            return Ok((id, orientation));
        }
        let mut edges = [EdgeId::new(0); 4];
        let mut senses = [Sense::SAME; 4];
        for (k, [a, b]) in QUAD_EDGES.iter().enumerate() {
            (edges[k], senses[k]) = match mids {
                Some(m) => self.add_quadratic_edge(corners[*a], corners[*b], m[k]),
                None => self.add_edge(corners[*a], corners[*b]),
            };
        }
        let id = QuadId::new(self.quads.len());
        self.quads.push(Quad::new(corners, mids, edges, senses));
        self.quad_index.insert(key, id);
        for c in corners {
            self.vertices[c.index()].quads.push(id);
        }
        Ok((id, D4::default()))
    }

    pub fn find_tri(&self, corners: [VertexId; 3]) -> Option<(TriId, D3)> {
        let id = *self.tri_index.get(&sorted(corners))?;
        let orientation = D3::matching(&self.tris[id.index()].corners, &corners)?;
        Some((id, orientation))
    }

    /// Finds or creates the triangle `corners`.
    pub fn add_tri(&mut self, corners: [VertexId; 3]) -> (TriId, D3) {
        if let Some(found) = self.find_tri(corners) {
            return found;
        }
        let mut edges = [EdgeId::new(0); 3];
        let mut senses = [Sense::SAME; 3];
        for (k, [a, b]) in TRI_EDGES.iter().enumerate() {
            (edges[k], senses[k]) = self.add_edge(corners[*a], corners[*b]);
        }
        let id = TriId::new(self.tris.len());
        self.tris.push(Tri::new(corners, edges, senses));
        self.tri_index.insert(sorted(corners), id);
        for c in corners {
            self.vertices[c.index()].tris.push(id);
        }
        (id, D3::default())
    }

    /// Requests `meshing`, expressed in the direction the consumer walks the
    /// edge (`sense` relative to the master), on edge `id`.
    pub fn request_edge(
        &mut self,
        id: EdgeId,
        sense: Sense,
        meshing: EdgeMeshing,
    ) -> Result<(), MeshError> {
        let edge = self
            .edges
            .get_mut(id.index())
            .ok_or(MeshError::UnmeshedEdge(id))?;
        edge.request(id, meshing.oriented(sense))
    }

    pub(crate) fn mesh_edge(&mut self, id: EdgeId) -> Result<(), MeshError> {
        let Self {
            vertices, edges, ..
        } = self;
        edges[id.index()].create_mesh(id, vertices)
    }

    /// Finds or creates the edge `a -> b`, requests `meshing` on it and meshes
    /// it if it has no points yet.
    pub(crate) fn add_meshed_edge(
        &mut self,
        a: VertexId,
        b: VertexId,
        meshing: EdgeMeshing,
    ) -> Result<(EdgeId, Sense), MeshError> {
        let (id, sense) = self.add_edge(a, b);
        self.request_edge(id, sense, meshing)?;
        if !self.edges[id.index()].is_meshed() {
            self.mesh_edge(id)?;
        }
        Ok((id, sense))
    }

    /// Meshes every edge. Edges no cell asked for keep a single segment.
    pub(crate) fn mesh_edges(&mut self) -> Result<(), MeshError> {
        let mut defaulted = 0;
        for k in 0..self.edges.len() {
            let id = EdgeId::new(k);
            if self.edges[k].meshing.is_none() {
                self.edges[k].meshing = Some(EdgeMeshing::SINGLE);
                defaulted += 1;
            }
            if !self.edges[k].is_meshed() {
                self.mesh_edge(id)?;
            }
        }
        if defaulted > 0 {
            log::debug!("{defaulted} edges had no request and keep a single segment");
        }
        Ok(())
    }

    /// Meshes every quad that was not cut by a split, then every triangle.
    pub(crate) fn mesh_patches(&mut self) -> Result<(), MeshError> {
        let Self {
            vertices,
            edges,
            quads,
            tris,
            ..
        } = self;
        for (k, quad) in quads.iter_mut().enumerate() {
            if quad.excluded {
                continue;
            }
            let quadratic_edges = quad.edges.iter().all(|e| edges[e.index()].is_quadratic());
            let linear_edges = quad.edges.iter().all(|e| !edges[e.index()].is_quadratic());
            let consistent = if quad.is_quadratic() { quadratic_edges } else { linear_edges };
            if !consistent {
                return Err(MeshError::QuadraticMismatch(QuadId::new(k)));
            }
            quad.create_mesh(edges, vertices)?;
        }
        for tri in tris.iter_mut() {
            tri.create_mesh(edges, vertices)?;
        }
        Ok(())
    }

    /// Forgets every request, apex choice and grid. Vertices created by an
    /// earlier meshing pass stay in the arena but are no longer referenced.
    pub(crate) fn reset(&mut self) {
        for edge in &mut self.edges {
            edge.reset();
        }
        for quad in &mut self.quads {
            quad.grid.clear();
        }
        for tri in &mut self.tris {
            tri.apex = None;
            tri.grid.clear();
        }
    }

    /// Boundary edges for an intermediate sweep layer: each side copies the
    /// distribution of the matching side of the template patch.
    pub(crate) fn slice_edges<const N: usize>(
        &mut self,
        corners: [VertexId; N],
        template_edges: [EdgeId; N],
        template_senses: [Sense; N],
    ) -> Result<([EdgeId; N], [Sense; N]), MeshError> {
        let mut edges = [EdgeId::new(0); N];
        let mut senses = [Sense::SAME; N];
        for k in 0..N {
            let template = template_edges[k];
            let meshing = self.edges[template.index()]
                .meshing
                .ok_or(MeshError::UnmeshedEdge(template))?;
            (edges[k], senses[k]) = self.add_meshed_edge(
                corners[k],
                corners[(k + 1) % N],
                meshing.oriented(template_senses[k]),
            )?;
        }
        Ok((edges, senses))
    }
}
