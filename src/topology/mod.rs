//! Top-level module for cell and registry topology.
//!
//! This module provides:
//! - Cell type metadata shared by the mesh container and the registry
//! - Typed arena handles for registry entities
//! - Orientation groups recording how shared edges and faces map into cells
//! - Reference-cell numbering and split tables

pub mod cell_type;
pub mod handle;
pub mod orientation;
pub mod reference;

pub use cell_type::CellType;
pub use handle::*;
pub use orientation::*;
