//! Strong, zero-cost handles for registry entities.
//!
//! The remeshing registry stores vertices, edges, patches and cells in
//! growable arenas and links them with integer indices. Each entity kind gets
//! its own handle type so that an edge index can never be used to address a
//! quad, and so that shared entities are referenced rather than owned.
//!
//! All handles are `repr(transparent)` wrappers around `u32`.

use std::fmt;

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
        )]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Wraps a raw arena index.
            ///
            /// # Panics
            ///
            /// If `index` does not fit in a `u32`.
            #[inline]
            pub const fn new(index: usize) -> Self {
                assert!(
                    index <= u32::MAX as usize,
                    concat!(stringify!($name), " index exceeds u32::MAX")
                );
                $name(index as u32)
            }

            /// Wraps a raw arena index, or `None` if it does not fit in a `u32`.
            #[inline]
            pub fn try_new(index: usize) -> Option<Self> {
                u32::try_from(index).ok().map($name)
            }

            /// Arena index of this handle.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0).finish()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $label, self.0)
            }
        }
    };
}

define_handle!(
    /// Handle of a registry vertex.
    VertexId,
    "vertex"
);
define_handle!(
    /// Handle of a master edge.
    EdgeId,
    "edge"
);
define_handle!(
    /// Handle of a quadrilateral patch.
    QuadId,
    "quad"
);
define_handle!(
    /// Handle of a triangular patch.
    TriId,
    "tri"
);
define_handle!(
    /// Handle of a hex8 cell template.
    BoxId,
    "box"
);
define_handle!(
    /// Handle of a penta6 cell template.
    WedgeId,
    "wedge"
);
define_handle!(
    /// Handle of a tet4 cell template.
    TetId,
    "tet"
);

/// Any 3-D cell template held by the registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CellId {
    Box(BoxId),
    Wedge(WedgeId),
    Tet(TetId),
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellId::Box(id) => id.fmt(f),
            CellId::Wedge(id) => id.fmt(f),
            CellId::Tet(id) => id.fmt(f),
        }
    }
}
