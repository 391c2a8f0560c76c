#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-boundary-layer
//!
//! mesh-boundary-layer inserts graded boundary layers into volume meshes made
//! of hexahedra, prisms and tetrahedra. The elements touching a set of
//! selected boundary faces are replaced by structured stacks of thinner
//! elements, and the refined mesh stays conforming across every shared edge
//! and face.
//!
//! ## Features
//! - A per-call registry ([`domain::Domain`]) that deduplicates vertices,
//!   edges and patches shared between neighboring cells
//! - Biased 1-D point distributions, structured quad and triangle patch grids
//! - Sweep templates for hex8, penta6 and tet4 cells, plus hex-to-wedge and
//!   wedge-to-tet splits for corners
//! - A small [`mesh::VolumeMesh`] container with boundary-face selection,
//!   tagging, deletion and orientation repair
//! - Structured block generators for tests and benchmarks
//!
//! ## Determinism
//!
//! Elements are visited in index order and new nodes are numbered in the
//! order the registry created them, so a given input always produces the
//! same output numbering.
//!
//! ## Usage
//!
//! ```rust
//! use mesh_boundary_layer::prelude::*;
//!
//! let mut mesh = hex_mesh(2, 2, 1, [0.0; 3], [1.0; 3], MeshGenerationOptions::default())?;
//! mesh.select_faces_where(|c| c[2] < 1e-9);
//! let layered = apply(&mesh, BoundaryLayerOptions::new(3, 1.5))?;
//! assert_eq!(layered.elements().len(), 12);
//! # Ok::<(), MeshError>(())
//! ```
//!
//! Optional features: `rayon` parallelizes the negative-volume scan;
//! `strict-invariants`/`check-invariants` keep the structural self-checks on
//! in release builds.

pub mod debug_invariants;
pub mod domain;
pub mod geometry;
pub mod layer;
pub mod mesh;
pub mod mesh_error;
pub mod mesh_generation;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::domain::{Domain, EdgeMeshing, HarvestSummary, SplitOption, TetMode};
    pub use crate::geometry::Point3;
    pub use crate::layer::{BoundaryLayerMesher, BoundaryLayerOptions, apply};
    pub use crate::mesh::{Element, Face, Node, VolumeMesh};
    pub use crate::mesh_error::MeshError;
    pub use crate::mesh_generation::{MeshGenerationOptions, hex_mesh, prism_mesh, tet_mesh};
    pub use crate::topology::cell_type::CellType;
    pub use crate::topology::handle::{
        BoxId, CellId, EdgeId, QuadId, TetId, TriId, VertexId, WedgeId,
    };
    pub use crate::topology::reference::{
        BoxEdge, BoxFace, TetEdge, TetFace, TetVertex, WedgeEdge, WedgeFace,
    };
}
