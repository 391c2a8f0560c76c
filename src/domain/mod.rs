//! The local remeshing registry.
//!
//! A [`Domain`] collects the cells that take part in one remeshing pass
//! together with every vertex, edge and patch they share. Refinement is a
//! three-stage affair:
//!
//! 1. register cells ([`Domain::add_element`] or the `add_*` constructors),
//!    optionally splitting boxes and wedges;
//! 2. pick a refinement for each cell (`set_*`), which requests segment
//!    counts and biases on the shared edges and fails on the first conflict;
//! 3. [`Domain::mesh_domain`] meshes edges, then patches, then cells, and
//!    writes the resulting nodes and elements into a [`VolumeMesh`].
//!
//! Because every cell reads its boundary points from the shared master
//! edges and patches, neighboring cells always agree on the points of the
//! faces they share.

pub mod box_cell;
pub mod edge;
pub mod harvest;
pub mod patch;
pub mod split;
pub mod store;
pub mod tet_cell;
pub mod vertex;
pub mod wedge_cell;

use hashbrown::HashMap;

use crate::debug_invariants::{DebugInvariants, ensure};
use crate::geometry::Point3;
use crate::mesh::VolumeMesh;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use crate::topology::handle::{BoxId, CellId, EdgeId, QuadId, TetId, TriId, VertexId, WedgeId};
use crate::topology::orientation::{BitFlip, D3, D4, Sense};
use crate::topology::reference::{
    BOX_FACES, BoxFace, QUAD_EDGES, TET_FACES, TRI_EDGES, TetEdge, TetFace, TetVertex, WEDGE_QUADS,
    WEDGE_TRIS, WedgeEdge, WedgeFace,
};

pub use box_cell::BoxCell;
pub use edge::{Edge, EdgeMeshing, biased_lattice};
pub use harvest::HarvestSummary;
pub use patch::{Grid, Quad, Tri};
pub use split::SplitOption;
pub use store::EntityStore;
pub use tet_cell::{TetCell, TetMode};
pub use vertex::{Provenance, Vertex};
pub use wedge_cell::WedgeCell;

fn unknown(cell: CellId) -> MeshError {
    MeshError::InvalidParameter(format!("{cell} does not exist"))
}

fn note_replaced_mode(id: TetId, cell: &TetCell) {
    if let Some(mode) = cell.mode() {
        log::debug!("{id}: replacing layering mode {mode:?}");
    }
}

fn corners<const N: usize>(
    vertices: &[VertexId],
    element: usize,
) -> Result<[VertexId; N], MeshError> {
    vertices.try_into().map_err(|_| {
        MeshError::InvalidGeometry(format!(
            "element {element} has {} nodes, expected {N}",
            vertices.len()
        ))
    })
}

/// Registry of the cells, patches, edges and vertices of one remeshing pass.
#[derive(Clone, Debug, Default)]
pub struct Domain {
    store: EntityStore,
    boxes: Vec<BoxCell>,
    wedges: Vec<WedgeCell>,
    tets: Vec<TetCell>,
    node_vertices: HashMap<usize, VertexId>,
    element_cells: HashMap<usize, CellId>,
}

impl Domain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared vertices, edges and patches.
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn boxes(&self) -> &[BoxCell] {
        &self.boxes
    }

    pub fn wedges(&self) -> &[WedgeCell] {
        &self.wedges
    }

    pub fn tets(&self) -> &[TetCell] {
        &self.tets
    }

    pub fn box_cell(&self, id: BoxId) -> Option<&BoxCell> {
        self.boxes.get(id.index())
    }

    pub fn wedge(&self, id: WedgeId) -> Option<&WedgeCell> {
        self.wedges.get(id.index())
    }

    pub fn tet(&self, id: TetId) -> Option<&TetCell> {
        self.tets.get(id.index())
    }

    // ---- vertices, edges, patches ---------------------------------------

    /// Adds a vertex that does not mirror a mesh node.
    pub fn add_vertex(&mut self, position: Point3) -> VertexId {
        self.store.add_vertex(position, Provenance::New)
    }

    /// Registry vertex mirroring mesh node `node`, if registered.
    pub fn vertex_for_node(&self, node: usize) -> Option<VertexId> {
        self.node_vertices.get(&node).copied()
    }

    /// Finds or creates the vertex mirroring mesh node `node`.
    pub fn add_node_vertex(
        &mut self,
        mesh: &VolumeMesh,
        node: usize,
    ) -> Result<VertexId, MeshError> {
        if let Some(v) = self.vertex_for_node(node) {
            return Ok(v);
        }
        let position = mesh
            .node(node)
            .ok_or_else(|| MeshError::MissingNode {
                node,
                owner: "domain".to_string(),
            })?
            .position;
        let v = self.store.add_vertex(position, Provenance::Node(node));
        self.node_vertices.insert(node, v);
        Ok(v)
    }

    /// Registry vertices of `nodes`, if every one is registered.
    pub fn vertices_for_nodes(&self, nodes: &[usize]) -> Option<Vec<VertexId>> {
        nodes.iter().map(|&n| self.vertex_for_node(n)).collect()
    }

    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> (EdgeId, Sense) {
        self.store.add_edge(a, b)
    }

    pub fn add_quadratic_edge(
        &mut self,
        a: VertexId,
        b: VertexId,
        mid: VertexId,
    ) -> (EdgeId, Sense) {
        self.store.add_quadratic_edge(a, b, mid)
    }

    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<(EdgeId, Sense)> {
        self.store.find_edge(a, b)
    }

    pub fn add_quad(&mut self, corners: [VertexId; 4]) -> Result<(QuadId, D4), MeshError> {
        self.store.add_quad(corners)
    }

    pub fn add_quadratic_quad(
        &mut self,
        corners: [VertexId; 4],
        mids: [VertexId; 4],
    ) -> Result<(QuadId, D4), MeshError> {
        self.store.add_quadratic_quad(corners, mids)
    }

    pub fn find_quad(&self, corners: [VertexId; 4]) -> Option<(QuadId, D4)> {
        self.store.find_quad(corners)
    }

    pub fn add_tri(&mut self, corners: [VertexId; 3]) -> (TriId, D3) {
        self.store.add_tri(corners)
    }

    pub fn find_tri(&self, corners: [VertexId; 3]) -> Option<(TriId, D3)> {
        self.store.find_tri(corners)
    }

    /// Quad patch over the mesh face with node list `nodes`.
    pub fn find_quad_for_face(&self, nodes: &[usize]) -> Option<(QuadId, D4)> {
        let vertices = self.vertices_for_nodes(nodes)?;
        self.store.find_quad(vertices.try_into().ok()?)
    }

    /// Triangle patch over the mesh face with node list `nodes`.
    pub fn find_tri_for_face(&self, nodes: &[usize]) -> Option<(TriId, D3)> {
        let vertices = self.vertices_for_nodes(nodes)?;
        self.store.find_tri(vertices.try_into().ok()?)
    }

    /// Requests `meshing` on `edge` in its master direction.
    pub fn set_edge_meshing(
        &mut self,
        edge: EdgeId,
        meshing: EdgeMeshing,
    ) -> Result<(), MeshError> {
        self.store.request_edge(edge, Sense::SAME, meshing)
    }

    // ---- cells -----------------------------------------------------------

    pub fn add_box(
        &mut self,
        vertices: [VertexId; 8],
        element: Option<usize>,
        part: usize,
    ) -> Result<BoxId, MeshError> {
        let cell = BoxCell::new(&mut self.store, vertices, element, part)?;
        self.boxes.push(cell);
        Ok(BoxId::new(self.boxes.len() - 1))
    }

    pub fn add_wedge(
        &mut self,
        vertices: [VertexId; 6],
        element: Option<usize>,
        part: usize,
    ) -> Result<WedgeId, MeshError> {
        let cell = WedgeCell::new(&mut self.store, vertices, element, part)?;
        self.wedges.push(cell);
        Ok(WedgeId::new(self.wedges.len() - 1))
    }

    pub fn add_tet(
        &mut self,
        vertices: [VertexId; 4],
        element: Option<usize>,
        part: usize,
    ) -> TetId {
        let cell = TetCell::new(&mut self.store, vertices, element, part);
        self.tets.push(cell);
        TetId::new(self.tets.len() - 1)
    }

    /// Registers mesh element `element` as a box, wedge or tet template.
    ///
    /// The element's nodes become registry vertices (shared with earlier
    /// registrations) and its part is carried to every element it produces.
    pub fn add_element(&mut self, mesh: &VolumeMesh, element: usize) -> Result<CellId, MeshError> {
        if self.element_cells.contains_key(&element) {
            return Err(MeshError::DuplicateElement(element));
        }
        let e = mesh
            .element(element)
            .ok_or_else(|| {
                MeshError::InvalidParameter(format!("element {element} does not exist"))
            })?;
        let (cell_type, part) = (e.cell_type, e.part);
        let vertices = e
            .nodes
            .iter()
            .map(|&n| self.add_node_vertex(mesh, n))
            .collect::<Result<Vec<_>, _>>()?;
        let cell = match cell_type {
            CellType::Hexahedron => {
                CellId::Box(self.add_box(corners(&vertices, element)?, Some(element), part)?)
            }
            CellType::Prism => {
                CellId::Wedge(self.add_wedge(corners(&vertices, element)?, Some(element), part)?)
            }
            CellType::Tetrahedron => {
                CellId::Tet(self.add_tet(corners(&vertices, element)?, Some(element), part))
            }
            other => {
                return Err(MeshError::UnsupportedElementType {
                    element,
                    cell_type: other,
                    operation: "local remeshing",
                });
            }
        };
        self.element_cells.insert(element, cell);
        log::trace!("registered element {element} as {cell}");
        Ok(cell)
    }

    pub fn contains_element(&self, element: usize) -> bool {
        self.element_cells.contains_key(&element)
    }

    /// Cell first registered for mesh element `element`.
    pub fn cell_for_element(&self, element: usize) -> Option<CellId> {
        self.element_cells.get(&element).copied()
    }

    // ---- refinement choices ---------------------------------------------

    /// Requests one distribution per axis group of `id` (see [`BoxCell`]).
    pub fn set_box_mesh(&mut self, id: BoxId, groups: [EdgeMeshing; 3]) -> Result<(), MeshError> {
        let cell = self.boxes.get(id.index()).ok_or_else(|| unknown(CellId::Box(id)))?;
        cell.set_mesh(&mut self.store, groups)
    }

    /// Refines box `id` towards `face`, graded away from it.
    pub fn set_box_single_face(
        &mut self,
        id: BoxId,
        face: BoxFace,
        layer: EdgeMeshing,
    ) -> Result<(), MeshError> {
        let cell = self.boxes.get(id.index()).ok_or_else(|| unknown(CellId::Box(id)))?;
        cell.set_mesh_single_face(&mut self.store, face, layer)
    }

    /// Chooses the apex line of wedge `id` and requests per-group distributions.
    pub fn set_wedge_mesh(
        &mut self,
        id: WedgeId,
        rise: WedgeEdge,
        groups: [EdgeMeshing; 3],
    ) -> Result<(), MeshError> {
        let cell = self.wedges.get(id.index()).ok_or_else(|| unknown(CellId::Wedge(id)))?;
        cell.set_mesh(&mut self.store, rise, groups)
    }

    pub fn set_wedge_single_face(
        &mut self,
        id: WedgeId,
        face: WedgeFace,
        layer: EdgeMeshing,
    ) -> Result<(), MeshError> {
        let cell = self.wedges.get(id.index()).ok_or_else(|| unknown(CellId::Wedge(id)))?;
        cell.set_mesh_single_face(&mut self.store, face, layer)
    }

    pub fn set_wedge_single_edge(
        &mut self,
        id: WedgeId,
        edge: WedgeEdge,
        layer: EdgeMeshing,
    ) -> Result<(), MeshError> {
        let cell = self.wedges.get(id.index()).ok_or_else(|| unknown(CellId::Wedge(id)))?;
        cell.set_mesh_single_edge(&mut self.store, edge, layer)
    }

    /// Layers tet `id` away from `face`. A mode set earlier is replaced.
    pub fn set_tet_from_face(
        &mut self,
        id: TetId,
        face: TetFace,
        layer: EdgeMeshing,
    ) -> Result<(), MeshError> {
        let cell = self.tets.get_mut(id.index()).ok_or_else(|| unknown(CellId::Tet(id)))?;
        note_replaced_mode(id, cell);
        cell.set_mesh_from_face(&mut self.store, face, layer)
    }

    pub fn set_tet_from_vertex(
        &mut self,
        id: TetId,
        vertex: TetVertex,
        layer: EdgeMeshing,
    ) -> Result<(), MeshError> {
        let cell = self.tets.get_mut(id.index()).ok_or_else(|| unknown(CellId::Tet(id)))?;
        note_replaced_mode(id, cell);
        cell.set_mesh_from_vertex(&mut self.store, vertex, layer)
    }

    pub fn set_tet_from_edge(
        &mut self,
        id: TetId,
        edge: TetEdge,
        layer: EdgeMeshing,
    ) -> Result<(), MeshError> {
        let cell = self.tets.get_mut(id.index()).ok_or_else(|| unknown(CellId::Tet(id)))?;
        note_replaced_mode(id, cell);
        cell.set_mesh_from_edge(&mut self.store, edge, layer)
    }

    /// Drops every refinement choice so the cells can be set up afresh.
    pub fn reset_mesh_parameters(&mut self) {
        self.store.reset();
        for cell in &mut self.boxes {
            cell.elements.clear();
        }
        for cell in &mut self.wedges {
            cell.elements.clear();
        }
        for cell in &mut self.tets {
            cell.mode = None;
            cell.elements.clear();
        }
    }

    // ---- meshing ---------------------------------------------------------

    /// Meshes edges, then patches, then every cell that was not split.
    pub fn mesh_cells(&mut self) -> Result<(), MeshError> {
        self.debug_assert_invariants();
        self.store.mesh_edges()?;
        self.store.mesh_patches()?;
        for (k, cell) in self.boxes.iter_mut().enumerate() {
            if !cell.excluded {
                cell.create_mesh(BoxId::new(k), &mut self.store)?;
            }
        }
        for (k, cell) in self.wedges.iter_mut().enumerate() {
            if !cell.excluded {
                cell.create_mesh(WedgeId::new(k), &mut self.store)?;
            }
        }
        for (k, cell) in self.tets.iter_mut().enumerate() {
            cell.create_mesh(TetId::new(k), &self.store)?;
        }
        log::debug!(
            "meshed {} boxes, {} wedges, {} tets over {} vertices",
            self.boxes.iter().filter(|c| !c.excluded).count(),
            self.wedges.iter().filter(|c| !c.excluded).count(),
            self.tets.len(),
            self.store.vertices.len()
        );
        Ok(())
    }

    /// Meshes every cell and writes the result into `mesh`.
    pub fn mesh_domain(mut self, mesh: &mut VolumeMesh) -> Result<HarvestSummary, MeshError> {
        self.mesh_cells()?;
        self.harvest(mesh)
    }
}

impl DebugInvariants for Domain {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "Domain");
    }

    fn validate_invariants(&self) -> Result<(), MeshError> {
        let store = &self.store;
        let vertex_count = store.vertices.len();
        for (k, edge) in store.edges.iter().enumerate() {
            let id = EdgeId::new(k);
            let [a, b] = edge.ends;
            ensure(a.index() < vertex_count && b.index() < vertex_count, || {
                format!("{id} references a missing vertex")
            })?;
            ensure(a != b, || format!("{id} is degenerate"))?;
            ensure(store.find_edge(a, b) == Some((id, Sense::SAME)), || {
                format!("{id} is not indexed under its endpoints")
            })?;
            ensure(
                store.vertices[a.index()].edges.contains(&id)
                    && store.vertices[b.index()].edges.contains(&id),
                || format!("{id} is missing from its endpoints' adjacency"),
            )?;
            if edge.is_meshed() {
                ensure(
                    edge.nodes.first() == Some(&a) && edge.nodes.last() == Some(&b),
                    || format!("{id} points do not start and end at its endpoints"),
                )?;
                ensure(
                    edge.parameters.len() == edge.nodes.len()
                        && edge.parameters.windows(2).all(|w| w[0] < w[1]),
                    || format!("{id} parameters are not increasing"),
                )?;
            }
        }

        for (k, quad) in store.quads.iter().enumerate() {
            for (e, [i, j]) in QUAD_EDGES.iter().enumerate() {
                let ends = store.edges[quad.edges[e].index()].ends;
                ensure(
                    BitFlip::matching(ends, [quad.corners[*i], quad.corners[*j]])
                        == Some(quad.senses[e]),
                    || format!("quad#{k} side {e} does not join its corners"),
                )?;
            }
        }
        for (k, tri) in store.tris.iter().enumerate() {
            for (e, [i, j]) in TRI_EDGES.iter().enumerate() {
                let ends = store.edges[tri.edges[e].index()].ends;
                ensure(
                    BitFlip::matching(ends, [tri.corners[*i], tri.corners[*j]])
                        == Some(tri.senses[e]),
                    || format!("tri#{k} side {e} does not join its corners"),
                )?;
            }
        }

        for (k, cell) in self.boxes.iter().enumerate() {
            for (f, local) in BOX_FACES.iter().enumerate() {
                let stored = store.quads[cell.faces[f].index()].corners;
                let o = cell.orientations[f];
                ensure(
                    (0..4).all(|c| stored[c] == cell.vertices[local[o.apply(c)]]),
                    || format!("box#{k} face {f} orientation is stale"),
                )?;
            }
        }
        for (k, cell) in self.wedges.iter().enumerate() {
            for (f, local) in WEDGE_QUADS.iter().enumerate() {
                let stored = store.quads[cell.quads[f].index()].corners;
                let o = cell.quad_orientations[f];
                ensure(
                    (0..4).all(|c| stored[c] == cell.vertices[local[o.apply(c)]]),
                    || format!("wedge#{k} side {f} orientation is stale"),
                )?;
            }
            for (f, local) in WEDGE_TRIS.iter().enumerate() {
                let stored = store.tris[cell.tris[f].index()].corners;
                let o = cell.tri_orientations[f];
                ensure(
                    (0..3).all(|c| stored[c] == cell.vertices[local[o.apply(c)]]),
                    || format!("wedge#{k} cap {f} orientation is stale"),
                )?;
            }
        }
        for (k, cell) in self.tets.iter().enumerate() {
            for (f, local) in TET_FACES.iter().enumerate() {
                let stored = store.tris[cell.faces[f].index()].corners;
                let o = cell.orientations[f];
                ensure(
                    (0..3).all(|c| stored[c] == cell.vertices[local[o.apply(c)]]),
                    || format!("tet#{k} face {f} orientation is stale"),
                )?;
            }
        }

        for (&element, &cell) in &self.element_cells {
            let exists = match cell {
                CellId::Box(id) => id.index() < self.boxes.len(),
                CellId::Wedge(id) => id.index() < self.wedges.len(),
                CellId::Tet(id) => id.index() < self.tets.len(),
            };
            ensure(exists, || format!("element {element} maps to missing {cell}"))?;
        }
        for (&node, &v) in &self.node_vertices {
            ensure(
                store.vertices.get(v.index()).and_then(Vertex::node) == Some(node),
                || format!("node {node} maps to {v}, which mirrors another node"),
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh_generation::{MeshGenerationOptions, hex_mesh, tet_mesh};

    #[test]
    fn neighboring_elements_share_vertices_and_patches() {
        let mesh = hex_mesh(2, 1, 1, [0.0; 3], [2.0, 1.0, 1.0], MeshGenerationOptions::default())
            .unwrap();
        let mut domain = Domain::new();
        let a = domain.add_element(&mesh, 0).unwrap();
        let b = domain.add_element(&mesh, 1).unwrap();
        assert_eq!((a, b), (CellId::Box(BoxId::new(0)), CellId::Box(BoxId::new(1))));
        assert_eq!(domain.store().vertices().len(), 12);
        assert_eq!(domain.store().edges().len(), 20);
        assert_eq!(domain.store().quads().len(), 11);
        assert_eq!(domain.cell_for_element(1), Some(b));
        assert!(matches!(
            domain.add_element(&mesh, 1),
            Err(MeshError::DuplicateElement(1))
        ));
        domain.validate_invariants().unwrap();

        // the shared face is found from either element's node order
        let shared = mesh.elements()[1].face_nodes(3).unwrap();
        assert!(domain.find_quad_for_face(&shared).is_some());
    }

    #[test]
    fn single_hex_refined_from_its_bottom() {
        let mut mesh = hex_mesh(1, 1, 1, [0.0; 3], [1.0; 3], MeshGenerationOptions { part: 3 })
            .unwrap();
        let mut domain = Domain::new();
        let CellId::Box(b) = domain.add_element(&mesh, 0).unwrap() else {
            panic!("expected a box");
        };
        domain
            .set_box_single_face(b, BoxFace::Bottom, EdgeMeshing::new(3, 2.0))
            .unwrap();
        let summary = domain.mesh_domain(&mut mesh).unwrap();
        assert_eq!(summary.nodes_added, 8);
        assert_eq!(summary.elements_added, 3);
        assert_eq!(mesh.elements().len(), 4);
        assert!(mesh.elements()[1..].iter().all(|e| e.part == 3));
        // the original element is still there until the caller deletes it
        let added: f64 = (1..4).map(|e| mesh.element_volume(e).unwrap()).sum();
        assert!((added - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tets_sharing_a_face_refine_consistently() {
        let mut mesh = tet_mesh(1, 1, 1, [0.0; 3], [1.0; 3], MeshGenerationOptions::default())
            .unwrap();
        let mut domain = Domain::new();
        let layer = EdgeMeshing::new(2, 1.0);
        for element in 0..2 {
            let CellId::Tet(t) = domain.add_element(&mesh, element).unwrap() else {
                panic!("expected a tet");
            };
            domain.set_tet_from_face(t, TetFace::Opposite3, layer).unwrap();
        }
        let summary = domain.mesh_domain(&mut mesh).unwrap();
        // edges 0-6, 1-6, 2-6 and 3-6 each gain a midpoint
        assert_eq!(summary.nodes_added, 4);
        assert_eq!(summary.elements_added, 4);
    }

    #[test]
    fn unsupported_elements_are_rejected() {
        let mut mesh = VolumeMesh::new();
        let ids: Vec<usize> = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.5, 0.5, 1.0],
        ]
        .into_iter()
        .map(|p| mesh.add_node(p))
        .collect();
        mesh.add_element(CellType::Pyramid, ids, 0).unwrap();
        let mut domain = Domain::new();
        assert!(matches!(
            domain.add_element(&mesh, 0),
            Err(MeshError::UnsupportedElementType { .. })
        ));
        assert!(domain.add_element(&mesh, 5).is_err());
    }

    #[test]
    fn later_tet_mode_replaces_the_earlier_one() {
        let mesh = tet_mesh(1, 1, 1, [0.0; 3], [1.0; 3], MeshGenerationOptions::default())
            .unwrap();
        let mut domain = Domain::new();
        let CellId::Tet(t) = domain.add_element(&mesh, 0).unwrap() else {
            panic!("expected a tet");
        };
        let layer = EdgeMeshing::new(2, 1.0);
        domain.set_tet_from_face(t, TetFace::Opposite3, layer).unwrap();
        assert_eq!(domain.tet(t).unwrap().mode(), Some(TetMode::Face(TetFace::Opposite3)));
        // the same edges leave vertex 3, so the requests agree
        domain.set_tet_from_vertex(t, TetVertex::V3, layer).unwrap();
        assert_eq!(domain.tet(t).unwrap().mode(), Some(TetMode::Vertex(TetVertex::V3)));
    }

    #[test]
    fn reset_clears_requests() {
        let mesh = hex_mesh(1, 1, 1, [0.0; 3], [1.0; 3], MeshGenerationOptions::default()).unwrap();
        let mut domain = Domain::new();
        let CellId::Box(b) = domain.add_element(&mesh, 0).unwrap() else {
            panic!("expected a box");
        };
        domain.set_box_single_face(b, BoxFace::Bottom, EdgeMeshing::new(3, 2.0)).unwrap();
        assert!(domain.set_box_single_face(b, BoxFace::Top, EdgeMeshing::new(3, 2.0)).is_err());
        domain.reset_mesh_parameters();
        domain.set_box_single_face(b, BoxFace::Top, EdgeMeshing::new(3, 2.0)).unwrap();
        assert!(domain.store().edges().iter().all(|e| e.meshing().is_some()));
    }
}
