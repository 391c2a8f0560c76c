//! Boundary-layer insertion on selected faces of a volume mesh.
//!
//! [`BoundaryLayerMesher::apply`] refines every element that touches the
//! selected faces so that a graded stack of `segments` layers lines the
//! selection:
//!
//! * elements with one selected face are layered away from it;
//! * hexes with two selected faces meeting at an edge are split into two
//!   wedges, each layered from its own face;
//! * tets with two selected faces hand the layering to the tets behind their
//!   other two faces;
//! * elements touching the selection only along an edge fan the layers out
//!   of that edge, and tets touching it at a single node fan them out of the
//!   shared vertex, keeping the refined mesh conforming;
//! * hexes and wedges touching the selection at a single node, or along more
//!   than one edge, cannot be refined conformingly and fail with
//!   [`MeshError::UnsupportedCorner`].
//!
//! The mesh handed in is never modified; a refined copy is returned.

pub mod options;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

use hashbrown::HashSet;

use crate::domain::{Domain, EdgeMeshing, SplitOption};
use crate::mesh::{Element, VolumeMesh};
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use crate::topology::handle::{CellId, VertexId};
use crate::topology::reference::{BoxEdge, WedgeEdge};

pub use options::BoundaryLayerOptions;

/// Tag marking elements for deletion or inversion.
const MARKED: i32 = -1;
const UNMARKED: i32 = 1;

fn not_a(element: usize, kind: &str) -> MeshError {
    MeshError::InvariantViolation(format!("element {element} is not a {kind}"))
}

fn not_found(cell: impl Display, feature: &'static str) -> MeshError {
    MeshError::LocalFeatureNotFound {
        cell: cell.to_string(),
        feature,
    }
}

/// Local edge of `element` joining the two `shared` nodes, if they are the
/// ends of one of `edges`.
fn local_edge<E: Copy>(
    element: &Element,
    shared: &[usize],
    edges: &[E],
    ends: impl Fn(E) -> [usize; 2],
) -> Option<E> {
    let &[a, b] = shared else {
        return None;
    };
    let la = element.nodes.iter().position(|&n| n == a)?;
    let lb = element.nodes.iter().position(|&n| n == b)?;
    edges.iter().copied().find(|&e| {
        let [p, q] = ends(e);
        (p, q) == (la, lb) || (p, q) == (lb, la)
    })
}

/// Inserts boundary layers according to a fixed set of options.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoundaryLayerMesher {
    options: BoundaryLayerOptions,
}

impl BoundaryLayerMesher {
    pub fn new(options: BoundaryLayerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BoundaryLayerOptions {
        &self.options
    }

    /// Returns a copy of `mesh` with the boundary layer inserted on its
    /// selected faces.
    ///
    /// With a single segment there is nothing to insert and the copy is
    /// returned unchanged. Any failure leaves `mesh` untouched and reports
    /// the first problem found.
    pub fn apply(&self, mesh: &VolumeMesh) -> Result<VolumeMesh, MeshError> {
        self.options.validate()?;
        if self.options.segments == 1 {
            return Ok(mesh.clone());
        }
        let selected: Vec<usize> = mesh.selected_faces().collect();
        if selected.is_empty() {
            return Err(MeshError::NoSelection);
        }

        let mut builder = LayerBuilder::new(mesh, self.options.layer());
        builder.classify(&selected)?;
        let LayerBuilder {
            domain, superseded, ..
        } = builder;

        let mut refined = mesh.clone();
        let summary = domain.mesh_domain(&mut refined)?;

        refined.set_element_tags(UNMARKED);
        for &element in &superseded {
            refined.set_element_tag(element, MARKED)?;
        }
        let removed = refined.delete_tagged_elements(MARKED);
        refined.rebuild();

        refined.set_element_tags(UNMARKED);
        for element in refined.inverted_elements()? {
            refined.set_element_tag(element, MARKED)?;
        }
        let inverted = refined.invert_tagged_elements(MARKED);
        if inverted > 0 {
            log::debug!("inverted {inverted} elements with negative volume");
            refined.rebuild();
        }
        refined.set_element_tags(0);

        log::info!(
            "boundary layer: {} faces selected, {removed} elements replaced by {}, {} nodes added",
            selected.len(),
            summary.elements_added,
            summary.nodes_added
        );
        Ok(refined)
    }
}

/// Shorthand for `BoundaryLayerMesher::new(options).apply(mesh)`.
pub fn apply(mesh: &VolumeMesh, options: BoundaryLayerOptions) -> Result<VolumeMesh, MeshError> {
    BoundaryLayerMesher::new(options).apply(mesh)
}

/// Per-call state: the registry being filled and the elements it replaces.
struct LayerBuilder<'a> {
    mesh: &'a VolumeMesh,
    layer: EdgeMeshing,
    domain: Domain,
    superseded: BTreeSet<usize>,
}

impl<'a> LayerBuilder<'a> {
    fn new(mesh: &'a VolumeMesh, layer: EdgeMeshing) -> Self {
        Self {
            mesh,
            layer,
            domain: Domain::new(),
            superseded: BTreeSet::new(),
        }
    }

    /// Sorts the touched elements into face, corner and node contacts and
    /// chooses a refinement for each.
    fn classify(&mut self, selected: &[usize]) -> Result<(), MeshError> {
        let mesh = self.mesh;
        let mut selected_by_element: BTreeMap<usize, Vec<&[usize]>> = BTreeMap::new();
        let mut touched: HashSet<usize> = HashSet::new();
        for &f in selected {
            let face = &mesh.faces()[f];
            selected_by_element
                .entry(face.element)
                .or_default()
                .push(face.nodes.as_slice());
            touched.extend(face.nodes.iter().copied());
        }

        for (&element, faces) in &selected_by_element {
            match faces.as_slice() {
                [face] => self.single_face(element, face)?,
                [first, second] => self.external_corner(element, first, second)?,
                _ => {
                    return Err(MeshError::TooManySelectedFaces {
                        element,
                        count: faces.len(),
                    });
                }
            }
        }

        for (element, e) in mesh.elements().iter().enumerate() {
            if selected_by_element.contains_key(&element) {
                continue;
            }
            let shared: Vec<usize> = e
                .nodes
                .iter()
                .copied()
                .filter(|n| touched.contains(n))
                .collect();
            if !shared.is_empty() {
                self.internal_corner(element, &shared)?;
            }
        }
        Ok(())
    }

    fn register(&mut self, element: usize) -> Result<CellId, MeshError> {
        match self.domain.cell_for_element(element) {
            Some(cell) => Ok(cell),
            None => self.domain.add_element(self.mesh, element),
        }
    }

    fn vertices(&self, nodes: &[usize]) -> Result<Vec<VertexId>, MeshError> {
        self.domain
            .vertices_for_nodes(nodes)
            .ok_or_else(|| {
                MeshError::InvariantViolation(format!("nodes {nodes:?} are not registered"))
            })
    }

    /// Layers `element` away from the face with node list `face`.
    fn single_face(&mut self, element: usize, face: &[usize]) -> Result<(), MeshError> {
        let cell = self.register(element)?;
        let vertices = self.vertices(face)?;
        let layer = self.layer;
        match cell {
            CellId::Box(b) => {
                let local = self
                    .domain
                    .box_cell(b)
                    .and_then(|c| c.find_face(&vertices))
                    .ok_or_else(|| not_found(b, "selected face"))?;
                self.domain.set_box_single_face(b, local, layer)?;
            }
            CellId::Wedge(w) => {
                let local = self
                    .domain
                    .wedge(w)
                    .and_then(|c| c.find_face(&vertices))
                    .ok_or_else(|| not_found(w, "selected face"))?;
                self.domain.set_wedge_single_face(w, local, layer)?;
            }
            CellId::Tet(t) => {
                let local = self
                    .domain
                    .tet(t)
                    .and_then(|c| c.find_face(&vertices))
                    .ok_or_else(|| not_found(t, "selected face"))?;
                self.domain.set_tet_from_face(t, local, layer)?;
            }
        }
        log::debug!("element {element}: layered from one face as {cell}");
        self.superseded.insert(element);
        Ok(())
    }

    /// Two selected faces on one element.
    fn external_corner(
        &mut self,
        element: usize,
        first: &[usize],
        second: &[usize],
    ) -> Result<(), MeshError> {
        let common: Vec<usize> = first.iter().copied().filter(|n| second.contains(n)).collect();
        if common.len() != 2 {
            return Err(MeshError::UnsupportedCorner {
                element,
                reason: "the two selected faces do not share an edge",
            });
        }
        let cell_type = self.mesh.elements()[element].cell_type;
        match cell_type {
            CellType::Hexahedron => self.split_external_corner(element, &common, [first, second]),
            CellType::Tetrahedron => self.tet_external_corner(element, [first, second]),
            CellType::Prism => Err(MeshError::UnsupportedCorner {
                element,
                reason: "a wedge cannot carry two selected faces",
            }),
            other => Err(MeshError::UnsupportedElementType {
                element,
                cell_type: other,
                operation: "boundary layer insertion",
            }),
        }
    }

    /// Splits a hex along the edge its selected faces share; each wedge is
    /// layered from the face it keeps.
    fn split_external_corner(
        &mut self,
        element: usize,
        common: &[usize],
        faces: [&[usize]; 2],
    ) -> Result<(), MeshError> {
        let CellId::Box(b) = self.register(element)? else {
            return Err(not_a(element, "box"));
        };
        let corner = self.vertices(common)?;
        let edge = self
            .domain
            .box_cell(b)
            .and_then(|c| c.find_edge(corner[0], corner[1]))
            .ok_or_else(|| not_found(b, "corner edge"))?;
        let face_vertices = [self.vertices(faces[0])?, self.vertices(faces[1])?];
        let layer = self.layer;
        for w in self.domain.split_box(b, edge, SplitOption::KeepAdjacentFaces)? {
            let local = self
                .domain
                .wedge(w)
                .and_then(|c| face_vertices.iter().find_map(|f| c.find_face(f)))
                .ok_or_else(|| not_found(w, "selected face"))?;
            self.domain.set_wedge_single_face(w, local, layer)?;
        }
        log::debug!("element {element}: external corner split along {edge:?}");
        self.superseded.insert(element);
        Ok(())
    }

    /// A tet with two selected faces stays as it is; the tets behind its
    /// other two faces are layered from the shared face instead.
    fn tet_external_corner(
        &mut self,
        element: usize,
        faces: [&[usize]; 2],
    ) -> Result<(), MeshError> {
        let mesh = self.mesh;
        let e = &mesh.elements()[element];
        let selected = faces.map(|f| mesh.find_element_face(element, f));
        for local in (0..e.face_count()).filter(|k| !selected.contains(&Some(*k))) {
            let Some(nodes) = e.face_nodes(local) else {
                continue;
            };
            let Some((neighbor, _)) = mesh
                .element_with_face(&nodes, element)
                .filter(|&(n, _)| mesh.elements()[n].cell_type == CellType::Tetrahedron)
            else {
                break;
            };
            let CellId::Tet(t) = self.register(neighbor)? else {
                return Err(not_a(neighbor, "tet"));
            };
            let vertices = self.vertices(&nodes)?;
            let face = self
                .domain
                .tet(t)
                .and_then(|c| c.find_face(&vertices))
                .ok_or_else(|| not_found(t, "shared face"))?;
            self.domain.set_tet_from_face(t, face, self.layer)?;
            log::debug!("element {element}: external corner layered through neighbor {neighbor}");
            self.superseded.insert(neighbor);
        }
        Ok(())
    }

    /// An element touching the selection only through `shared` nodes.
    fn internal_corner(&mut self, element: usize, shared: &[usize]) -> Result<(), MeshError> {
        if self.domain.contains_element(element) {
            log::debug!("element {element}: already layered from a corner neighbor");
            return Ok(());
        }
        let mesh = self.mesh;
        let e = &mesh.elements()[element];
        let layer = self.layer;
        match (e.cell_type, shared.len()) {
            (CellType::Hexahedron, 2) => {
                let edge = local_edge(e, shared, BoxEdge::ALL, BoxEdge::vertices)
                    .ok_or(MeshError::UnsupportedCorner {
                        element,
                        reason: "the two shared nodes are not an edge of the hex",
                    })?;
                let CellId::Box(b) = self.register(element)? else {
                    return Err(not_a(element, "box"));
                };
                let vertices = self.vertices(shared)?;
                for w in self.domain.split_box(b, edge, SplitOption::FanFromEdge)? {
                    let local = self
                        .domain
                        .wedge(w)
                        .and_then(|c| c.find_edge(vertices[0], vertices[1]))
                        .ok_or_else(|| not_found(w, "corner edge"))?;
                    self.domain.set_wedge_single_edge(w, local, layer)?;
                }
                log::debug!("element {element}: internal corner split along {edge:?}");
            }
            (CellType::Prism, 2) => {
                let edge = local_edge(e, shared, WedgeEdge::ALL, WedgeEdge::vertices)
                    .ok_or(MeshError::UnsupportedCorner {
                        element,
                        reason: "the two shared nodes are not an edge of the wedge",
                    })?;
                let CellId::Wedge(w) = self.register(element)? else {
                    return Err(not_a(element, "wedge"));
                };
                self.domain.set_wedge_single_edge(w, edge, layer)?;
                log::debug!("element {element}: internal corner along {edge:?}");
            }
            (CellType::Prism, 1) => {
                return Err(MeshError::UnsupportedCorner {
                    element,
                    reason: "a wedge touching the selection through a single node",
                });
            }
            (CellType::Tetrahedron, 1 | 2) => {
                let CellId::Tet(t) = self.register(element)? else {
                    return Err(not_a(element, "tet"));
                };
                let vertices = self.vertices(shared)?;
                let tet = self.domain.tet(t).ok_or_else(|| not_found(t, "tet"))?;
                if let [v] = vertices.as_slice() {
                    let local = tet
                        .find_vertex(*v)
                        .ok_or_else(|| not_found(t, "shared vertex"))?;
                    self.domain.set_tet_from_vertex(t, local, layer)?;
                } else {
                    let local = tet
                        .find_edge(vertices[0], vertices[1])
                        .ok_or_else(|| not_found(t, "shared edge"))?;
                    self.domain.set_tet_from_edge(t, local, layer)?;
                }
                log::debug!("element {element}: layered from {} shared nodes", shared.len());
            }
            // left as they are, these would keep unrefined faces against
            // refined neighbors
            (CellType::Hexahedron, 1) => {
                return Err(MeshError::UnsupportedCorner {
                    element,
                    reason: "a hex touching the selection through a single node",
                });
            }
            (CellType::Hexahedron | CellType::Prism | CellType::Tetrahedron, _) => {
                return Err(MeshError::UnsupportedCorner {
                    element,
                    reason: "the element touches the selection through more than one edge",
                });
            }
            (cell_type, _) => {
                return Err(MeshError::UnsupportedElementType {
                    element,
                    cell_type,
                    operation: "boundary layer insertion",
                });
            }
        }
        self.superseded.insert(element);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh_generation::{MeshGenerationOptions, hex_mesh, tet_mesh};

    fn unit_hex() -> VolumeMesh {
        hex_mesh(1, 1, 1, [0.0; 3], [1.0; 3], MeshGenerationOptions::default()).unwrap()
    }

    #[test]
    fn one_segment_returns_the_mesh_unchanged() {
        let mesh = unit_hex();
        let out = apply(&mesh, BoundaryLayerOptions::new(1, 2.0)).unwrap();
        assert_eq!(out, mesh);
    }

    #[test]
    fn nothing_selected() {
        assert_eq!(
            apply(&unit_hex(), BoundaryLayerOptions::new(3, 2.0)),
            Err(MeshError::NoSelection)
        );
    }

    #[test]
    fn invalid_options_are_reported_first() {
        assert!(matches!(
            apply(&unit_hex(), BoundaryLayerOptions::new(0, 2.0)),
            Err(MeshError::InvalidParameter(_))
        ));
    }

    #[test]
    fn local_edge_matches_either_order() {
        let mesh = unit_hex();
        let e = &mesh.elements()[0];
        assert_eq!(local_edge(e, &[4, 0], BoxEdge::ALL, BoxEdge::vertices), Some(BoxEdge::Rise04));
        assert_eq!(local_edge(e, &[0, 6], BoxEdge::ALL, BoxEdge::vertices), None);
        assert_eq!(local_edge(e, &[0], BoxEdge::ALL, BoxEdge::vertices), None);
    }

    #[test]
    fn selected_faces_survive_refinement() {
        let mut mesh = unit_hex();
        mesh.select_faces_where(|c| c[2] < 1e-9);
        let out = apply(&mesh, BoundaryLayerOptions::new(2, 1.0)).unwrap();
        assert_eq!(out.selected_faces().count(), 1);
        assert!(out.elements().iter().all(|e| e.tag == 0));
    }

    #[test]
    fn tet_corner_contact_is_layered_from_the_vertex() {
        let mut mesh =
            tet_mesh(1, 1, 1, [0.0; 3], [1.0; 3], MeshGenerationOptions::default()).unwrap();
        // the bottom face of the first tet
        let bottom = mesh
            .faces()
            .iter()
            .position(|f| {
                f.element == 0 && f.nodes.iter().all(|&n| mesh.nodes()[n].position[2] < 1e-9)
            })
            .unwrap();
        mesh.select_face(bottom).unwrap();
        let out = apply(&mesh, BoundaryLayerOptions::new(2, 1.0)).unwrap();
        assert!((out.total_volume().unwrap() - 1.0).abs() < 1e-12);
        assert!(out.inverted_elements().unwrap().is_empty());
    }
}
