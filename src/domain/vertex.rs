//! Registry vertices.

use crate::geometry::Point3;
use crate::topology::handle::{EdgeId, QuadId, TriId};

/// Where a registry vertex came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// Copy of an existing mesh node.
    Node(usize),
    /// Created by the remesher; receives a node id at harvest.
    New,
}

/// A registry vertex with back-references to the entities that use it.
#[derive(Clone, Debug)]
pub struct Vertex {
    pub position: Point3,
    pub provenance: Provenance,
    pub(crate) edges: Vec<EdgeId>,
    pub(crate) quads: Vec<QuadId>,
    pub(crate) tris: Vec<TriId>,
}

impl Vertex {
    pub fn new(position: Point3, provenance: Provenance) -> Self {
        Self {
            position,
            provenance,
            edges: Vec::new(),
            quads: Vec::new(),
            tris: Vec::new(),
        }
    }

    /// Original node id, if this vertex mirrors one.
    pub fn node(&self) -> Option<usize> {
        match self.provenance {
            Provenance::Node(n) => Some(n),
            Provenance::New => None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.provenance == Provenance::New
    }

    /// Edges incident to this vertex.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Quads having this vertex as a corner.
    pub fn quads(&self) -> &[QuadId] {
        &self.quads
    }

    /// Triangles having this vertex as a corner.
    pub fn tris(&self) -> &[TriId] {
        &self.tris
    }
}
