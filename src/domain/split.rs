//! Splitting boxes into wedges and wedges into tets.
//!
//! A split registers the pieces as new cells, carrying the element and part
//! of the parent, and marks the parent and the patches the cut runs through
//! as excluded so that meshing skips them. Splits happen before any
//! refinement is chosen.

use serde::{Deserialize, Serialize};

use super::Domain;
use crate::mesh_error::MeshError;
use crate::topology::handle::{BoxId, CellId, TetId, WedgeId};
use crate::topology::reference::{
    BOX_SPLIT, BOX_SPLIT_CUT_FACES, BoxEdge, WEDGE_SPLIT, WEDGE_SPLIT_CUT_FACE,
};

/// How the two wedges of a box split are laid out.
///
/// Both layouts cut the box along the diagonal plane through the split edge
/// and the edge opposite to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitOption {
    /// Both wedges rise along the split edge; refining that edge fans the
    /// layers out of it.
    FanFromEdge,
    /// Both wedges rise along the opposite edge, and each keeps one of the
    /// two box faces meeting at the split edge as its `Side1`.
    KeepAdjacentFaces,
}

impl SplitOption {
    fn index(self) -> usize {
        match self {
            SplitOption::FanFromEdge => 0,
            SplitOption::KeepAdjacentFaces => 1,
        }
    }
}

impl Domain {
    /// Splits box `id` into two wedges along `edge`.
    pub fn split_box(
        &mut self,
        id: BoxId,
        edge: BoxEdge,
        option: SplitOption,
    ) -> Result<[WedgeId; 2], MeshError> {
        let cell = self
            .boxes
            .get(id.index())
            .ok_or_else(|| {
                MeshError::InvalidParameter(format!("{} does not exist", CellId::Box(id)))
            })?;
        if cell.excluded {
            return Err(MeshError::InvalidParameter(format!("{id} is already split")));
        }
        let (vertices, element, part) = (cell.vertices, cell.element, cell.part);
        let cut = BOX_SPLIT_CUT_FACES[edge.index()].map(|f| cell.faces[f.index()]);

        let mut wedges = [WedgeId::new(0); 2];
        for (k, corners) in BOX_SPLIT[option.index()][edge.index()].iter().enumerate() {
            wedges[k] = self.add_wedge(corners.map(|c| vertices[c]), element, part)?;
        }
        self.boxes[id.index()].excluded = true;
        for quad in cut {
            self.store.quads[quad.index()].excluded = true;
        }
        log::debug!("split {id} along {edge:?} ({option:?}) into {} and {}", wedges[0], wedges[1]);
        Ok(wedges)
    }

    /// Splits wedge `id` into three tets fanning from local corner `corner`.
    pub fn split_wedge(&mut self, id: WedgeId, corner: usize) -> Result<[TetId; 3], MeshError> {
        let cell = self
            .wedges
            .get(id.index())
            .ok_or_else(|| {
                MeshError::InvalidParameter(format!("{} does not exist", CellId::Wedge(id)))
            })?;
        if cell.excluded {
            return Err(MeshError::InvalidParameter(format!("{id} is already split")));
        }
        let layout = WEDGE_SPLIT.get(corner).ok_or_else(|| {
            MeshError::InvalidParameter(format!("wedge corner {corner} is out of range"))
        })?;
        let (vertices, element, part) = (cell.vertices, cell.element, cell.part);
        let cut = cell.quads[WEDGE_SPLIT_CUT_FACE[corner].index()];

        let tets = layout.map(|corners| self.add_tet(corners.map(|c| vertices[c]), element, part));
        self.wedges[id.index()].excluded = true;
        self.store.quads[cut.index()].excluded = true;
        log::debug!("split {id} from corner {corner} into {} tets", tets.len());
        Ok(tets)
    }
}
