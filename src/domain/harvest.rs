//! Writing meshed cells back into a volume mesh.

use std::collections::BTreeSet;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::Domain;
use super::vertex::Provenance;
use crate::mesh::VolumeMesh;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use crate::topology::handle::VertexId;

/// What a harvest appended to the mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestSummary {
    /// Index of the first appended node.
    pub first_node: usize,
    pub nodes_added: usize,
    /// Index of the first appended element.
    pub first_element: usize,
    pub elements_added: usize,
}

impl Domain {
    /// Appends the new vertices and the emitted elements of every meshed cell
    /// to `mesh`. Vertices mirroring mesh nodes keep their node ids; only new
    /// vertices that some element references become nodes, in creation order.
    ///
    /// The source elements stay in place; removing them is up to the caller.
    pub fn harvest(self, mesh: &mut VolumeMesh) -> Result<HarvestSummary, MeshError> {
        let mut emitted: Vec<(&[VertexId], usize)> = Vec::new();
        for cell in self.boxes.iter().filter(|c| !c.excluded) {
            emitted.extend(cell.elements.iter().map(|e| (e.as_slice(), cell.part)));
        }
        for cell in self.wedges.iter().filter(|c| !c.excluded) {
            emitted.extend(cell.elements.iter().map(|e| (e.as_slice(), cell.part)));
        }
        for cell in &self.tets {
            emitted.extend(cell.elements.iter().map(|e| (e.as_slice(), cell.part)));
        }

        let vertices = &self.store.vertices;
        let fresh: BTreeSet<VertexId> = emitted
            .iter()
            .flat_map(|(nodes, _)| nodes.iter().copied())
            .filter(|v| vertices[v.index()].is_new())
            .collect();
        let first_node = mesh.append_nodes(fresh.iter().map(|v| vertices[v.index()].position));
        let node_of: HashMap<VertexId, usize> = fresh
            .iter()
            .enumerate()
            .map(|(k, &v)| (v, first_node + k))
            .collect();

        let first_element = mesh.elements().len();
        for (nodes, part) in &emitted {
            let cell_type = CellType::from_volume_node_count(nodes.len()).ok_or_else(|| {
                MeshError::InvalidGeometry(format!("cannot emit a cell with {} nodes", nodes.len()))
            })?;
            let ids: Vec<usize> = nodes
                .iter()
                .map(|v| match vertices[v.index()].provenance {
                    Provenance::Node(n) => n,
                    Provenance::New => node_of[v],
                })
                .collect();
            mesh.add_element(cell_type, ids, *part)?;
        }

        let summary = HarvestSummary {
            first_node,
            nodes_added: fresh.len(),
            first_element,
            elements_added: emitted.len(),
        };
        log::debug!(
            "harvested {} nodes and {} elements",
            summary.nodes_added,
            summary.elements_added
        );
        Ok(summary)
    }
}
