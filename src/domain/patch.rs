//! Quadrilateral and triangular patches.
//!
//! A patch owns no boundary points: its corner and boundary nodes come from
//! the master edges it references. Meshing a patch fills its node grid
//! `grid[i][j]` and creates vertices only for interior points.
//!
//! Quad grids run `i` from corner 0 towards corner 1 and `j` from corner 0
//! towards corner 3. Triangle grids fan out of the apex corner `a`: `i` walks
//! from `a` towards `a + 1`, and `j` walks the edge from `a + 1` to `a + 2`,
//! so `grid[0][*]` is the apex for every `j`.

use super::edge::Edge;
use super::vertex::{Provenance, Vertex};
use crate::geometry::Point3;
use crate::geometry::vector::combine;
use crate::mesh_error::MeshError;
use crate::topology::handle::{EdgeId, VertexId};
use crate::topology::orientation::{D4, Sense};

/// Node grid of a meshed patch, indexed `[i][j]`.
pub type Grid = Vec<Vec<VertexId>>;

/// Nodes of edge `id` in patch order, with parameters increasing along the walk.
fn walk(
    edges: &[Edge],
    id: EdgeId,
    sense: Sense,
    backwards: bool,
) -> Result<Vec<(VertexId, f64)>, MeshError> {
    let edge = &edges[id.index()];
    let span = edge.span().ok_or(MeshError::UnmeshedEdge(id))?;
    (0..=span)
        .map(|i| {
            let k = if backwards { span - i } else { i };
            let (v, t) = edge
                .local_node(sense, k)
                .ok_or(MeshError::UnmeshedEdge(id))?;
            Ok((v, if backwards { 1.0 - t } else { t }))
        })
        .collect()
}

fn push_vertex(vertices: &mut Vec<Vertex>, position: Point3) -> VertexId {
    vertices.push(Vertex::new(position, Provenance::New));
    VertexId::new(vertices.len() - 1)
}

/// A quadrilateral patch.
#[derive(Clone, Debug)]
pub struct Quad {
    pub(crate) corners: [VertexId; 4],
    pub(crate) mids: Option<[VertexId; 4]>,
    pub(crate) edges: [EdgeId; 4],
    pub(crate) senses: [Sense; 4],
    pub(crate) excluded: bool,
    pub(crate) grid: Grid,
}

impl Quad {
    pub(crate) fn new(
        corners: [VertexId; 4],
        mids: Option<[VertexId; 4]>,
        edges: [EdgeId; 4],
        senses: [Sense; 4],
    ) -> Self {
        Self {
            corners,
            mids,
            edges,
            senses,
            excluded: false,
            grid: Vec::new(),
        }
    }

    pub fn corners(&self) -> [VertexId; 4] {
        self.corners
    }

    pub fn mids(&self) -> Option<[VertexId; 4]> {
        self.mids
    }

    pub fn edges(&self) -> [EdgeId; 4] {
        self.edges
    }

    /// Direction of each bounding edge relative to the corner cycle.
    pub fn senses(&self) -> [Sense; 4] {
        self.senses
    }

    pub fn is_quadratic(&self) -> bool {
        self.mids.is_some()
    }

    /// Excluded patches were cut by a split and are never meshed.
    pub fn is_excluded(&self) -> bool {
        self.excluded
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Interval counts `(m, n)` along `i` and `j`, once meshed.
    pub fn dims(&self) -> Option<(usize, usize)> {
        let m = self.grid.len().checked_sub(1)?;
        let n = self.grid.first()?.len().checked_sub(1)?;
        Some((m, n))
    }

    fn interpolate(&self, p: &[Point3; 4], mids: Option<&[Point3; 4]>, u: f64, v: f64) -> Point3 {
        match mids {
            None => combine(
                p,
                &[
                    (1.0 - u) * (1.0 - v),
                    u * (1.0 - v),
                    u * v,
                    (1.0 - u) * v,
                ],
            ),
            Some(m) => {
                let (x, y) = (2.0 * u - 1.0, 2.0 * v - 1.0);
                let corner = |xi: f64, yi: f64| {
                    0.25 * (1.0 + x * xi) * (1.0 + y * yi) * (x * xi + y * yi - 1.0)
                };
                let weights = [
                    corner(-1.0, -1.0),
                    corner(1.0, -1.0),
                    corner(1.0, 1.0),
                    corner(-1.0, 1.0),
                    0.5 * (1.0 - x * x) * (1.0 - y),
                    0.5 * (1.0 + x) * (1.0 - y * y),
                    0.5 * (1.0 - x * x) * (1.0 + y),
                    0.5 * (1.0 - x) * (1.0 - y * y),
                ];
                let points = [p[0], p[1], p[2], p[3], m[0], m[1], m[2], m[3]];
                combine(&points, &weights)
            }
        }
    }

    /// Fills the node grid from the meshed bounding edges.
    ///
    /// Interior points sit where the lines joining matching boundary nodes
    /// cross in parameter space, mapped through the bilinear (or 8-node
    /// serendipity) patch geometry.
    pub(crate) fn create_mesh(
        &mut self,
        edges: &[Edge],
        vertices: &mut Vec<Vertex>,
    ) -> Result<(), MeshError> {
        let bottom = walk(edges, self.edges[0], self.senses[0], false)?;
        let right = walk(edges, self.edges[1], self.senses[1], false)?;
        let top = walk(edges, self.edges[2], self.senses[2], true)?;
        let left = walk(edges, self.edges[3], self.senses[3], true)?;
        let m = bottom.len() - 1;
        let n = left.len() - 1;
        if top.len() != m + 1 || right.len() != n + 1 {
            return Err(MeshError::IncompatiblePatch(format!(
                "quad {:?}: opposite edges have {m}/{} and {n}/{} intervals",
                self.corners,
                top.len() - 1,
                right.len() - 1
            )));
        }

        let p = self.corners.map(|c| vertices[c.index()].position);
        let mids = self
            .mids
            .map(|mids| mids.map(|c| vertices[c.index()].position));

        let mut grid = vec![vec![self.corners[0]; n + 1]; m + 1];
        for i in 0..=m {
            grid[i][0] = bottom[i].0;
            grid[i][n] = top[i].0;
        }
        for j in 0..=n {
            grid[0][j] = left[j].0;
            grid[m][j] = right[j].0;
        }
        for i in 1..m {
            let (ub, ut) = (bottom[i].1, top[i].1);
            for j in 1..n {
                let (vl, vr) = (left[j].1, right[j].1);
                let du = ut - ub;
                let dv = vr - vl;
                let u = (ub + du * vl) / (1.0 - du * dv);
                let v = vl + dv * u;
                let position = self.interpolate(&p, mids.as_ref(), u, v);
                grid[i][j] = push_vertex(vertices, position);
            }
        }
        self.grid = grid;
        Ok(())
    }
}

/// A triangular patch.
#[derive(Clone, Debug)]
pub struct Tri {
    pub(crate) corners: [VertexId; 3],
    pub(crate) edges: [EdgeId; 3],
    pub(crate) senses: [Sense; 3],
    pub(crate) apex: Option<usize>,
    pub(crate) grid: Grid,
}

impl Tri {
    pub(crate) fn new(corners: [VertexId; 3], edges: [EdgeId; 3], senses: [Sense; 3]) -> Self {
        Self {
            corners,
            edges,
            senses,
            apex: None,
            grid: Vec::new(),
        }
    }

    pub fn corners(&self) -> [VertexId; 3] {
        self.corners
    }

    pub fn edges(&self) -> [EdgeId; 3] {
        self.edges
    }

    pub fn senses(&self) -> [Sense; 3] {
        self.senses
    }

    /// Corner index the node grid fans out of, once a cell chose one.
    pub fn apex(&self) -> Option<usize> {
        self.apex
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn dims(&self) -> Option<(usize, usize)> {
        let m = self.grid.len().checked_sub(1)?;
        let n = self.grid.first()?.len().checked_sub(1)?;
        Some((m, n))
    }

    /// Sets the apex to the corner holding `vertex`; false if it is not a corner.
    pub(crate) fn set_apex_vertex(&mut self, vertex: VertexId) -> bool {
        match self.corners.iter().position(|&c| c == vertex) {
            Some(k) => {
                if self.apex.is_some_and(|a| a != k) {
                    log::debug!("moving triangle apex from corner {:?} to {k}", self.apex);
                }
                self.apex = Some(k);
                true
            }
            None => false,
        }
    }

    /// Fills the node grid. Triangles without an apex fan out of corner 0.
    pub(crate) fn create_mesh(
        &mut self,
        edges: &[Edge],
        vertices: &mut Vec<Vertex>,
    ) -> Result<(), MeshError> {
        let a = self.apex.unwrap_or(0);
        let (b, c) = ((a + 1) % 3, (a + 2) % 3);
        let side_ab = walk(edges, self.edges[a], self.senses[a], false)?;
        let side_bc = walk(edges, self.edges[b], self.senses[b], false)?;
        let side_ac = walk(edges, self.edges[c], self.senses[c], true)?;
        let m = side_ab.len() - 1;
        let n = side_bc.len() - 1;
        if side_ac.len() != m + 1 {
            return Err(MeshError::IncompatiblePatch(format!(
                "triangle {:?}: edges out of the apex have {m} and {} intervals",
                self.corners,
                side_ac.len() - 1
            )));
        }

        let [pa, pb, pc] = [a, b, c].map(|k| vertices[self.corners[k].index()].position);
        let mut grid = vec![vec![self.corners[a]; n + 1]; m + 1];
        for i in 1..=m {
            grid[i][0] = side_ab[i].0;
            grid[i][n] = side_ac[i].0;
        }
        for j in 0..=n {
            grid[m][j] = side_bc[j].0;
        }
        for i in 1..m {
            for j in 1..n {
                let v = side_bc[j].1;
                let u = (1.0 - v) * side_ab[i].1 + v * side_ac[i].1;
                let position = combine(&[pa, pb, pc], &[1.0 - u, u * (1.0 - v), u * v]);
                grid[i][j] = push_vertex(vertices, position);
            }
        }
        self.grid = grid;
        Ok(())
    }
}

/// Index correspondence between the grids of two quad patches lying over one
/// another (bottom and top of a sweep).
///
/// `orientation` maps stored corners of the source onto stored corners of the
/// target patch.
#[derive(Clone, Copy, Debug)]
pub(crate) struct QuadGridMap {
    origin: (isize, isize),
    step_i: (isize, isize),
    step_j: (isize, isize),
}

impl QuadGridMap {
    pub(crate) fn new(
        orientation: D4,
        source: (usize, usize),
        target: (usize, usize),
    ) -> Option<Self> {
        let (tm, tn) = (target.0 as isize, target.1 as isize);
        let corner = [(0, 0), (tm, 0), (tm, tn), (0, tn)];
        let origin = corner[orientation.apply(0)];
        let toward = |k: usize| {
            let c = corner[orientation.apply(k)];
            (c.0 - origin.0, c.1 - origin.1)
        };
        let (di, dj) = (toward(1), toward(3));
        let length = |d: (isize, isize)| (d.0.abs() + d.1.abs()) as usize;
        if length(di) != source.0 || length(dj) != source.1 {
            return None;
        }
        Some(Self {
            origin,
            step_i: (di.0.signum(), di.1.signum()),
            step_j: (dj.0.signum(), dj.1.signum()),
        })
    }

    pub(crate) fn map(&self, i: usize, j: usize) -> (usize, usize) {
        let (i, j) = (i as isize, j as isize);
        (
            (self.origin.0 + self.step_i.0 * i + self.step_j.0 * j) as usize,
            (self.origin.1 + self.step_i.1 * i + self.step_j.1 * j) as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::edge::EdgeMeshing;

    /// Unit square with each side meshed as requested, edges stored in cycle order.
    fn square(meshing: [EdgeMeshing; 4]) -> (Vec<Vertex>, Vec<Edge>, Quad) {
        let corners = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]];
        let mut vertices: Vec<Vertex> = corners
            .into_iter()
            .enumerate()
            .map(|(k, p)| Vertex::new(p, Provenance::Node(k)))
            .collect();
        let mut edges = Vec::new();
        for k in 0..4 {
            let mut e = Edge::new([VertexId::new(k), VertexId::new((k + 1) % 4)], None);
            e.request(EdgeId::new(k), meshing[k]).unwrap();
            e.create_mesh(EdgeId::new(k), &mut vertices).unwrap();
            edges.push(e);
        }
        let quad = Quad::new(
            [0, 1, 2, 3].map(VertexId::new),
            None,
            [0, 1, 2, 3].map(EdgeId::new),
            [Sense::SAME; 4],
        );
        (vertices, edges, quad)
    }

    #[test]
    fn uniform_quad_grid() {
        let (mut vertices, edges, mut quad) = square([
            EdgeMeshing::new(2, 1.0),
            EdgeMeshing::new(2, 1.0),
            EdgeMeshing::new(2, 1.0),
            EdgeMeshing::new(2, 1.0),
        ]);
        quad.create_mesh(&edges, &mut vertices).unwrap();
        assert_eq!(quad.dims(), Some((2, 2)));
        let center = quad.grid()[1][1];
        assert_eq!(vertices[center.index()].position, [0.5, 0.5, 0.0]);
        assert_eq!(quad.grid()[2][2], VertexId::new(2));
        assert_eq!(quad.grid()[0][2], VertexId::new(3));
    }

    #[test]
    fn biased_quad_interior_follows_the_boundary() {
        // edge 2 runs 2 -> 3, so its bias must be reciprocal to match edge 0
        let (mut vertices, edges, mut quad) = square([
            EdgeMeshing::new(3, 2.0),
            EdgeMeshing::SINGLE,
            EdgeMeshing::new(3, 0.5),
            EdgeMeshing::SINGLE,
        ]);
        quad.create_mesh(&edges, &mut vertices).unwrap();
        assert_eq!(quad.dims(), Some((3, 1)));
        let x1 = vertices[quad.grid()[1][0].index()].position[0];
        let x1_top = vertices[quad.grid()[1][1].index()].position[0];
        assert!((x1 - 1.0 / 7.0).abs() < 1e-12);
        assert!((x1_top - 1.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn mismatched_sides_are_rejected() {
        let (mut vertices, edges, mut quad) = square([
            EdgeMeshing::new(3, 1.0),
            EdgeMeshing::SINGLE,
            EdgeMeshing::new(2, 1.0),
            EdgeMeshing::SINGLE,
        ]);
        assert!(matches!(
            quad.create_mesh(&edges, &mut vertices),
            Err(MeshError::IncompatiblePatch(_))
        ));
    }

    #[test]
    fn triangle_fans_out_of_its_apex() {
        let mut vertices: Vec<Vertex> = [[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]]
            .into_iter()
            .enumerate()
            .map(|(k, p)| Vertex::new(p, Provenance::Node(k)))
            .collect();
        let mut edges = Vec::new();
        for (k, segments) in [(0, 2), (1, 2), (2, 2)] {
            let mut e = Edge::new([VertexId::new(k), VertexId::new((k + 1) % 3)], None);
            e.request(EdgeId::new(k), EdgeMeshing::new(segments, 1.0)).unwrap();
            e.create_mesh(EdgeId::new(k), &mut vertices).unwrap();
            edges.push(e);
        }
        let mut tri = Tri::new(
            [0, 1, 2].map(VertexId::new),
            [0, 1, 2].map(EdgeId::new),
            [Sense::SAME; 3],
        );
        assert!(tri.set_apex_vertex(VertexId::new(0)));
        tri.create_mesh(&edges, &mut vertices).unwrap();
        assert_eq!(tri.dims(), Some((2, 2)));
        assert!(tri.grid()[0].iter().all(|&v| v == VertexId::new(0)));
        let interior = vertices[tri.grid()[1][1].index()].position;
        assert!((interior[0] - 0.5).abs() < 1e-12 && (interior[1] - 0.5).abs() < 1e-12);
        assert!(!tri.set_apex_vertex(VertexId::new(9)));
    }

    #[test]
    fn grid_map_follows_corner_correspondence() {
        // identity
        let map = QuadGridMap::new(D4::default(), (3, 2), (3, 2)).unwrap();
        assert_eq!(map.map(1, 2), (1, 2));
        // reflection: source corner k lands on target corner 3 - k
        let map = QuadGridMap::new(D4::new(3, true), (3, 2), (3, 2)).unwrap();
        assert_eq!(map.map(0, 0), (0, 2));
        assert_eq!(map.map(3, 0), (3, 2));
        assert_eq!(map.map(0, 2), (0, 0));
        assert!(QuadGridMap::new(D4::new(3, true), (3, 2), (2, 3)).is_none());
        // quarter turn: i and j swap roles
        let map = QuadGridMap::new(D4::new(1, false), (3, 2), (2, 3)).unwrap();
        assert_eq!(map.map(0, 0), (2, 0));
        assert_eq!(map.map(3, 0), (2, 3));
        assert_eq!(map.map(0, 2), (0, 0));
    }
}
