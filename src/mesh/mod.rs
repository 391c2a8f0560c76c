//! `VolumeMesh`: the node/element/face container the remesher reads and edits.
//!
//! Nodes and elements are stored in flat arrays and addressed by index.
//! Boundary faces are derived data: [`VolumeMesh::rebuild`] recomputes them
//! from the elements after any bulk edit. A face is a boundary face when no
//! other element has a face with the same node set.
//!
//! Faces carry a `selected` flag that drives boundary-layer insertion.
//! Selection survives a rebuild for every face whose node set is unchanged.
//!
//! # Example
//! ```rust
//! use mesh_boundary_layer::mesh::VolumeMesh;
//! use mesh_boundary_layer::topology::cell_type::CellType;
//!
//! let mut mesh = VolumeMesh::new();
//! let ids: Vec<usize> = [
//!     [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0],
//! ]
//! .into_iter()
//! .map(|p| mesh.add_node(p))
//! .collect();
//! mesh.add_element(CellType::Tetrahedron, ids, 0)?;
//! mesh.rebuild();
//! assert_eq!(mesh.faces().len(), 4);
//! # Ok::<(), mesh_boundary_layer::mesh_error::MeshError>(())
//! ```

pub mod element;

use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::debug_invariants::{DebugInvariants, ensure};
use crate::geometry::Point3;
use crate::geometry::quality::{CellQuality, cell_quality, signed_volume};
use crate::geometry::vector::centroid;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;

pub use element::{Element, Face, Node, inverted_order, local_faces};

/// Nodes, volume elements and derived boundary faces.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeMesh {
    nodes: Vec<Node>,
    elements: Vec<Element>,
    faces: Vec<Face>,
}

fn face_key(nodes: &[usize]) -> Vec<usize> {
    nodes.iter().copied().sorted_unstable().collect()
}

impl VolumeMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn element(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    pub fn face(&self, index: usize) -> Option<&Face> {
        self.faces.get(index)
    }

    /// Appends a node and returns its index.
    pub fn add_node(&mut self, position: Point3) -> usize {
        self.nodes.push(Node { position, tag: 0 });
        self.nodes.len() - 1
    }

    /// Appends a batch of nodes; returns the index of the first one.
    pub fn append_nodes(&mut self, positions: impl IntoIterator<Item = Point3>) -> usize {
        let first = self.nodes.len();
        self.nodes
            .extend(positions.into_iter().map(|position| Node { position, tag: 0 }));
        first
    }

    /// Appends an element after checking its node count and node indices.
    pub fn add_element(
        &mut self,
        cell_type: CellType,
        nodes: impl Into<Vec<usize>>,
        part: usize,
    ) -> Result<usize, MeshError> {
        let nodes = nodes.into();
        let index = self.elements.len();
        if cell_type.dimension() != 3 || nodes.len() != cell_type.node_count() {
            return Err(MeshError::InvalidGeometry(format!(
                "element {index}: {cell_type:?} cannot have {} nodes",
                nodes.len()
            )));
        }
        if let Some(&node) = nodes.iter().find(|&&n| n >= self.nodes.len()) {
            return Err(MeshError::MissingNode {
                node,
                owner: format!("element {index}"),
            });
        }
        self.elements.push(Element {
            cell_type,
            nodes,
            part,
            tag: 0,
        });
        Ok(index)
    }

    /// Positions of the nodes of element `index`.
    pub fn element_positions(&self, index: usize) -> Result<Vec<Point3>, MeshError> {
        let element = self.elements.get(index).ok_or_else(|| missing_element(index))?;
        element
            .nodes
            .iter()
            .map(|&n| {
                self.nodes
                    .get(n)
                    .map(|node| node.position)
                    .ok_or_else(|| MeshError::MissingNode {
                        node: n,
                        owner: format!("element {index}"),
                    })
            })
            .collect()
    }

    /// Signed volume of element `index`.
    pub fn element_volume(&self, index: usize) -> Result<f64, MeshError> {
        let element = self.elements.get(index).ok_or_else(|| missing_element(index))?;
        signed_volume(element.cell_type, &self.element_positions(index)?)
    }

    /// Aspect ratio and signed volume of element `index`.
    pub fn element_quality(&self, index: usize) -> Result<CellQuality, MeshError> {
        let element = self.elements.get(index).ok_or_else(|| missing_element(index))?;
        cell_quality(element.cell_type, &self.element_positions(index)?)
    }

    /// Sum of the absolute element volumes.
    pub fn total_volume(&self) -> Result<f64, MeshError> {
        (0..self.elements.len()).try_fold(0.0, |acc, i| Ok(acc + self.element_volume(i)?.abs()))
    }

    /// Elements with a negative signed volume.
    #[cfg(not(feature = "rayon"))]
    pub fn inverted_elements(&self) -> Result<Vec<usize>, MeshError> {
        let mut out = Vec::new();
        for i in 0..self.elements.len() {
            if self.element_volume(i)? < 0.0 {
                out.push(i);
            }
        }
        Ok(out)
    }

    /// Elements with a negative signed volume.
    #[cfg(feature = "rayon")]
    pub fn inverted_elements(&self) -> Result<Vec<usize>, MeshError> {
        use rayon::prelude::*;
        let flags = (0..self.elements.len())
            .into_par_iter()
            .map(|i| self.element_volume(i).map(|v| v < 0.0))
            .collect::<Result<Vec<bool>, MeshError>>()?;
        Ok(flags
            .into_iter()
            .enumerate()
            .filter_map(|(i, neg)| neg.then_some(i))
            .collect())
    }

    /// Local face of `element` whose node set equals `nodes`.
    pub fn find_element_face(&self, element: usize, nodes: &[usize]) -> Option<usize> {
        let e = self.elements.get(element)?;
        let key = face_key(nodes);
        (0..e.face_count()).find(|&k| {
            e.face_nodes(k)
                .is_some_and(|face| face_key(&face) == key)
        })
    }

    /// First element other than `exclude` that has a face with node set `nodes`.
    pub fn element_with_face(&self, nodes: &[usize], exclude: usize) -> Option<(usize, usize)> {
        (0..self.elements.len())
            .filter(|&i| i != exclude)
            .find_map(|i| self.find_element_face(i, nodes).map(|k| (i, k)))
    }

    /// Recomputes boundary faces from the elements.
    pub fn rebuild(&mut self) {
        let selected: HashSet<Vec<usize>> = self
            .faces
            .iter()
            .filter(|f| f.selected)
            .map(|f| face_key(&f.nodes))
            .collect();

        let mut counts: HashMap<Vec<usize>, usize> = HashMap::new();
        for e in &self.elements {
            for k in 0..e.face_count() {
                if let Some(nodes) = e.face_nodes(k) {
                    *counts.entry(face_key(&nodes)).or_insert(0) += 1;
                }
            }
        }

        let mut faces = Vec::new();
        for (index, e) in self.elements.iter().enumerate() {
            for k in 0..e.face_count() {
                let Some(nodes) = e.face_nodes(k) else {
                    continue;
                };
                let key = face_key(&nodes);
                if counts.get(&key) == Some(&1) {
                    faces.push(Face {
                        selected: selected.contains(&key),
                        nodes,
                        element: index,
                        local: k,
                        tag: 0,
                    });
                }
            }
        }
        log::debug!(
            "rebuilt {} boundary faces for {} elements",
            faces.len(),
            self.elements.len()
        );
        self.faces = faces;
    }

    /// Marks face `index` as selected.
    pub fn select_face(&mut self, index: usize) -> Result<(), MeshError> {
        let face = self.faces.get_mut(index).ok_or_else(|| {
            MeshError::InvalidParameter(format!("face {index} does not exist"))
        })?;
        face.selected = true;
        Ok(())
    }

    /// Selects every face whose centroid satisfies `predicate`; returns how many matched.
    pub fn select_faces_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(Point3) -> bool,
    {
        let mut count = 0;
        for face in &mut self.faces {
            let pts: Vec<Point3> = face
                .nodes
                .iter()
                .filter_map(|&n| self.nodes.get(n).map(|node| node.position))
                .collect();
            if predicate(centroid(&pts)) {
                face.selected = true;
                count += 1;
            }
        }
        count
    }

    pub fn clear_selection(&mut self) {
        for face in &mut self.faces {
            face.selected = false;
        }
    }

    /// Indices of the selected faces.
    pub fn selected_faces(&self) -> impl Iterator<Item = usize> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.selected.then_some(i))
    }

    pub fn set_node_tags(&mut self, tag: i32) {
        self.nodes.iter_mut().for_each(|n| n.tag = tag);
    }

    pub fn set_element_tags(&mut self, tag: i32) {
        self.elements.iter_mut().for_each(|e| e.tag = tag);
    }

    pub fn set_element_tag(&mut self, index: usize, tag: i32) -> Result<(), MeshError> {
        let e = self
            .elements
            .get_mut(index)
            .ok_or_else(|| missing_element(index))?;
        e.tag = tag;
        Ok(())
    }

    /// Removes every element whose tag equals `tag`; returns how many were removed.
    ///
    /// Faces are stale afterwards until [`rebuild`](Self::rebuild) runs.
    pub fn delete_tagged_elements(&mut self, tag: i32) -> usize {
        let before = self.elements.len();
        self.elements.retain(|e| e.tag != tag);
        before - self.elements.len()
    }

    /// Flips the orientation of every element whose tag equals `tag`.
    pub fn invert_tagged_elements(&mut self, tag: i32) -> usize {
        let mut count = 0;
        for e in self.elements.iter_mut().filter(|e| e.tag == tag) {
            e.invert();
            count += 1;
        }
        count
    }
}

fn missing_element(index: usize) -> MeshError {
    MeshError::InvalidParameter(format!("element {index} does not exist"))
}

impl DebugInvariants for VolumeMesh {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "VolumeMesh");
    }

    fn validate_invariants(&self) -> Result<(), MeshError> {
        for (i, e) in self.elements.iter().enumerate() {
            ensure(e.nodes.len() == e.cell_type.node_count(), || {
                format!("element {i} has {} nodes for {:?}", e.nodes.len(), e.cell_type)
            })?;
            if let Some(&node) = e.nodes.iter().find(|&&n| n >= self.nodes.len()) {
                return Err(MeshError::MissingNode {
                    node,
                    owner: format!("element {i}"),
                });
            }
            ensure(e.nodes.iter().all_unique(), || {
                format!("element {i} repeats a node")
            })?;
        }
        for (i, f) in self.faces.iter().enumerate() {
            ensure(f.element < self.elements.len(), || {
                format!("face {i} points at missing element {}", f.element)
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tets() -> VolumeMesh {
        let mut m = VolumeMesh::new();
        m.append_nodes([
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
        ]);
        m.add_element(CellType::Tetrahedron, vec![0, 1, 2, 3], 0).unwrap();
        m.add_element(CellType::Tetrahedron, vec![1, 2, 3, 4], 1).unwrap();
        m.rebuild();
        m
    }

    #[test]
    fn shared_face_is_not_a_boundary_face() {
        let m = two_tets();
        assert_eq!(m.faces().len(), 6);
        assert_eq!(m.element_with_face(&[3, 2, 1], 0), Some((1, 3)));
        assert_eq!(m.find_element_face(0, &[2, 1, 3]), Some(1));
        m.validate_invariants().unwrap();
    }

    #[test]
    fn selection_survives_rebuild() {
        let mut m = two_tets();
        let n = m.select_faces_where(|c| c[2].abs() < 1e-12);
        assert_eq!(n, 1);
        m.rebuild();
        assert_eq!(m.selected_faces().count(), 1);
        m.clear_selection();
        assert_eq!(m.selected_faces().count(), 0);
    }

    #[test]
    fn add_element_rejects_bad_input() {
        let mut m = two_tets();
        assert!(matches!(
            m.add_element(CellType::Tetrahedron, vec![0, 1, 2, 9], 0),
            Err(MeshError::MissingNode { node: 9, .. })
        ));
        assert!(m.add_element(CellType::Hexahedron, vec![0, 1, 2, 3], 0).is_err());
    }

    #[test]
    fn delete_and_invert_by_tag() {
        let mut m = two_tets();
        m.set_element_tag(0, -1).unwrap();
        assert_eq!(m.invert_tagged_elements(-1), 1);
        assert!(m.element_volume(0).unwrap() < 0.0);
        assert_eq!(m.inverted_elements().unwrap(), vec![0]);
        assert_eq!(m.delete_tagged_elements(-1), 1);
        m.rebuild();
        assert_eq!(m.elements().len(), 1);
        assert_eq!(m.faces().len(), 4);
    }

    #[test]
    fn inversion_negates_random_tet_volumes() {
        use rand::rngs::SmallRng;
        use rand::{Rng, SeedableRng};

        let mut rng = SmallRng::seed_from_u64(42);
        let mut m = VolumeMesh::new();
        for t in 0..32 {
            let first = m.append_nodes((0..4).map(|_| {
                [rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)]
            }));
            m.add_element(CellType::Tetrahedron, (first..first + 4).collect::<Vec<usize>>(), t).unwrap();
        }
        let before: Vec<f64> = (0..32).map(|e| m.element_volume(e).unwrap()).collect();
        m.set_element_tags(-1);
        assert_eq!(m.invert_tagged_elements(-1), 32);
        for (e, v) in before.iter().enumerate() {
            let after = m.element_volume(e).unwrap();
            assert!((after + v).abs() <= 1e-12 * v.abs().max(1.0));
        }
    }
}
