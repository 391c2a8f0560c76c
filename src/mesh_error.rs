//! MeshError: unified error type for boundary-layer remeshing
//!
//! Every fallible public API in this crate returns `Result<_, MeshError>`.
//! The first error aborts a remeshing call; the caller's mesh is never
//! partially modified.

use thiserror::Error;

use crate::domain::edge::EdgeMeshing;
use crate::topology::cell_type::CellType;
use crate::topology::handle::{EdgeId, QuadId, TriId};

/// Unified error type for boundary-layer operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// No boundary face of the mesh is marked as selected.
    #[error("no faces are selected")]
    NoSelection,
    /// An element carries more selected faces than any corner template handles.
    #[error("element {element} has {count} selected faces; at most two are supported")]
    TooManySelectedFaces { element: usize, count: usize },
    /// The selection touches an element in a pattern no template covers.
    #[error("unsupported corner at element {element}: {reason}")]
    UnsupportedCorner {
        element: usize,
        reason: &'static str,
    },
    /// Two cells requested different meshing parameters for the same shared edge.
    #[error("edge {edge} is already meshed as {existing:?} but {requested:?} was requested")]
    InconsistentEdgeBias {
        edge: EdgeId,
        existing: EdgeMeshing,
        requested: EdgeMeshing,
    },
    /// The operation is not defined for this kind of element.
    #[error("element {element} of type {cell_type:?} is not supported by {operation}")]
    UnsupportedElementType {
        element: usize,
        cell_type: CellType,
        operation: &'static str,
    },
    /// A remeshing parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// An edge reached the meshing stage without segment count.
    #[error("edge {0} has no meshing parameters")]
    UnmeshedEdge(EdgeId),
    /// Opposite boundary edges of a patch disagree on their segment count.
    #[error("patch boundary mismatch: {0}")]
    IncompatiblePatch(String),
    /// A quad is quadratic but its bounding edges are not (or vice versa).
    #[error("quad {0} and its bounding edges disagree on quadratic interpolation")]
    QuadraticMismatch(QuadId),
    /// A triangle was asked to mesh itself before any cell chose its apex.
    #[error("triangle {0} has no apex vertex")]
    MissingApex(TriId),
    /// The two end patches of a sweep cannot be matched corner to corner.
    #[error("cell {cell}: end faces have incompatible orientation")]
    IncompatibleFaceOrientation { cell: String },
    /// A face, edge or vertex was looked up in a cell that does not contain it.
    #[error("{feature} not found in {cell}")]
    LocalFeatureNotFound {
        cell: String,
        feature: &'static str,
    },
    /// The element was already registered with the domain.
    #[error("element {0} is already registered")]
    DuplicateElement(usize),
    /// An element or face references a node index outside the mesh.
    #[error("node {node} referenced by {owner} does not exist")]
    MissingNode { node: usize, owner: String },
    /// Geometry or connectivity handed to a constructor is malformed.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    /// A structural invariant of the domain or mesh is broken.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}
