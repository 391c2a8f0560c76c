//! Master edges and their biased point distributions.
//!
//! An edge is stored once, oriented from `ends[0]` to `ends[1]`. Its meshing
//! parameters are expressed in that master direction; consumers walking the
//! edge backwards see the reciprocal bias.

use serde::{Deserialize, Serialize};

use super::vertex::{Provenance, Vertex};
use crate::geometry::Point3;
use crate::geometry::vector::combine;
use crate::mesh_error::MeshError;
use crate::topology::handle::{EdgeId, VertexId};
use crate::topology::orientation::Sense;

/// Relative tolerance when comparing biases requested by different cells.
const BIAS_TOLERANCE: f64 = 1e-12;

/// Biases this close to one are treated as uniform spacing.
const UNIFORM_TOLERANCE: f64 = 1e-12;

/// Segment count and growth ratio of an edge.
///
/// `bias` is the ratio between consecutive segment lengths walking from the
/// first to the last point; `1.0` spaces the points uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeMeshing {
    pub segments: usize,
    pub bias: f64,
    #[serde(default)]
    pub double_bias: bool,
}

impl EdgeMeshing {
    /// One uniform segment: the edge is left as it is.
    pub const SINGLE: EdgeMeshing = EdgeMeshing {
        segments: 1,
        bias: 1.0,
        double_bias: false,
    };

    pub fn new(segments: usize, bias: f64) -> Self {
        Self {
            segments,
            bias,
            double_bias: false,
        }
    }

    pub fn with_double_bias(mut self, double_bias: bool) -> Self {
        self.double_bias = double_bias;
        self
    }

    /// The same distribution seen from the other end.
    pub fn reversed(self) -> Self {
        Self {
            bias: self.bias.recip(),
            ..self
        }
    }

    /// Parameters as seen by a consumer whose direction relative to the
    /// master edge is `sense`.
    pub fn oriented(self, sense: Sense) -> Self {
        if sense.is_same() { self } else { self.reversed() }
    }

    /// Checks that the distribution can be generated walking from either end.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.segments < 1 {
            return Err(MeshError::InvalidParameter(
                "segments must be at least 1".to_string(),
            ));
        }
        let Ok(n) = i32::try_from(self.segments) else {
            return Err(MeshError::InvalidParameter(format!(
                "{} segments do not fit a power series",
                self.segments
            )));
        };
        if !(self.bias.is_finite() && self.bias > 0.0) {
            return Err(MeshError::InvalidParameter(format!(
                "bias must be positive and finite, got {}",
                self.bias
            )));
        }
        // the master direction may carry the reciprocal of the requested bias
        let overflows = |b: f64| !(b.powi(n) - 1.0).is_finite();
        if !is_uniform(self.bias) && (overflows(self.bias) || overflows(self.bias.recip())) {
            return Err(MeshError::InvalidParameter(format!(
                "bias {} over {} segments overflows",
                self.bias, self.segments
            )));
        }
        Ok(())
    }

    /// True when both describe the same distribution up to rounding.
    pub fn agrees_with(&self, other: &EdgeMeshing) -> bool {
        self.segments == other.segments
            && self.double_bias == other.double_bias
            && (self.bias - other.bias).abs() <= BIAS_TOLERANCE * self.bias.abs().max(1.0)
    }
}

fn is_uniform(bias: f64) -> bool {
    (bias - 1.0).abs() <= UNIFORM_TOLERANCE
}

/// Normalized point distribution of `segments` segments with growth `bias`.
///
/// Returns `segments + 1` parameters increasing from exactly `0.0` to exactly
/// `1.0`, where consecutive intervals grow by the factor `bias`.
pub fn biased_lattice(segments: usize, bias: f64) -> Vec<f64> {
    let n = segments.max(1);
    let mut r = vec![0.0; n + 1];
    if is_uniform(bias) {
        for (i, ri) in r.iter_mut().enumerate() {
            *ri = i as f64 / n as f64;
        }
    } else {
        let total = bias.powi(i32::try_from(n).unwrap_or(i32::MAX));
        let mut step = (bias - 1.0) / (total - 1.0);
        for i in 1..=n {
            r[i] = r[i - 1] + step;
            step *= bias;
        }
    }
    r[n] = 1.0;
    r
}

/// Shape function weights of `(ends[0], ends[1], mid)` at parameter `eta`.
pub fn edge_shape(quadratic: bool, eta: f64) -> [f64; 3] {
    if quadratic {
        [
            2.0 * (1.0 - eta) * (0.5 - eta),
            2.0 * eta * (eta - 0.5),
            4.0 * eta * (1.0 - eta),
        ]
    } else {
        [1.0 - eta, eta, 0.0]
    }
}

/// A master edge shared by every patch and cell that touches it.
#[derive(Clone, Debug)]
pub struct Edge {
    pub(crate) ends: [VertexId; 2],
    pub(crate) mid: Option<VertexId>,
    pub(crate) meshing: Option<EdgeMeshing>,
    pub(crate) parameters: Vec<f64>,
    pub(crate) nodes: Vec<VertexId>,
}

impl Edge {
    pub(crate) fn new(ends: [VertexId; 2], mid: Option<VertexId>) -> Self {
        Self {
            ends,
            mid,
            meshing: None,
            parameters: Vec::new(),
            nodes: Vec::new(),
        }
    }

    pub fn ends(&self) -> [VertexId; 2] {
        self.ends
    }

    pub fn mid(&self) -> Option<VertexId> {
        self.mid
    }

    pub fn is_quadratic(&self) -> bool {
        self.mid.is_some()
    }

    /// Meshing parameters in the master direction, once some cell requested them.
    pub fn meshing(&self) -> Option<EdgeMeshing> {
        self.meshing
    }

    /// Normalized positions of [`nodes`](Self::nodes) along the edge.
    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    /// Points along the edge in master order; empty until meshed.
    pub fn nodes(&self) -> &[VertexId] {
        &self.nodes
    }

    pub fn is_meshed(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Number of lattice intervals: twice the segment count on quadratic edges.
    pub fn span(&self) -> Option<usize> {
        let n = self.nodes.len();
        (n >= 2).then(|| n - 1)
    }

    /// Records `requested` (master direction) or checks it against what is there.
    pub(crate) fn request(
        &mut self,
        id: EdgeId,
        requested: EdgeMeshing,
    ) -> Result<(), MeshError> {
        requested.validate()?;
        match self.meshing {
            None => {
                self.meshing = Some(requested);
                Ok(())
            }
            Some(existing) if existing.agrees_with(&requested) => Ok(()),
            Some(existing) => Err(MeshError::InconsistentEdgeBias {
                edge: id,
                existing,
                requested,
            }),
        }
    }

    pub(crate) fn reset(&mut self) {
        self.meshing = None;
        self.parameters.clear();
        self.nodes.clear();
    }

    /// Node `i` steps along the edge in the consumer's direction, together with
    /// its normalized parameter in that direction.
    pub(crate) fn local_node(&self, sense: Sense, i: usize) -> Option<(VertexId, f64)> {
        let span = self.span()?;
        if i > span {
            return None;
        }
        if sense.is_same() {
            Some((self.nodes[i], self.parameters[i]))
        } else {
            Some((self.nodes[span - i], 1.0 - self.parameters[span - i]))
        }
    }

    /// Generates the point distribution. The end vertices are reused; only
    /// interior points create new vertices.
    pub(crate) fn create_mesh(
        &mut self,
        id: EdgeId,
        vertices: &mut Vec<Vertex>,
    ) -> Result<(), MeshError> {
        let meshing = self.meshing.ok_or(MeshError::UnmeshedEdge(id))?;
        if meshing.segments < 1 {
            return Err(MeshError::UnmeshedEdge(id));
        }
        // double-bias edges use the same progression
        let base = biased_lattice(meshing.segments, meshing.bias);
        let quadratic = self.is_quadratic();
        self.parameters = if quadratic {
            let mut r = Vec::with_capacity(2 * base.len() - 1);
            for w in base.windows(2) {
                r.push(w[0]);
                r.push(0.5 * (w[0] + w[1]));
            }
            r.push(1.0);
            r
        } else {
            base
        };

        let corners: [Point3; 3] = [
            vertices[self.ends[0].index()].position,
            vertices[self.ends[1].index()].position,
            self.mid
                .map(|m| vertices[m.index()].position)
                .unwrap_or_default(),
        ];
        let last = self.parameters.len() - 1;
        self.nodes = Vec::with_capacity(last + 1);
        for (i, &eta) in self.parameters.iter().enumerate() {
            let v = if i == 0 {
                self.ends[0]
            } else if i == last {
                self.ends[1]
            } else if let Some(mid) = self.mid.filter(|_| (eta - 0.5).abs() < 1e-14) {
                mid
            } else {
                let position = combine(&corners, &edge_shape(quadratic, eta));
                vertices.push(Vertex::new(position, Provenance::New));
                VertexId::new(vertices.len() - 1)
            };
            self.nodes.push(v);
        }
        log::trace!("meshed {id} with {} segments", meshing.segments);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_vertices() -> Vec<Vertex> {
        vec![
            Vertex::new([0.0, 0.0, 0.0], Provenance::Node(0)),
            Vertex::new([4.0, 0.0, 0.0], Provenance::Node(1)),
        ]
    }

    #[test]
    fn uniform_lattice() {
        assert_eq!(biased_lattice(4, 1.0), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(biased_lattice(1, 3.0), vec![0.0, 1.0]);
    }

    #[test]
    fn geometric_lattice_grows_by_bias() {
        let r = biased_lattice(3, 2.0);
        // intervals 1/7, 2/7, 4/7
        assert!((r[1] - 1.0 / 7.0).abs() < 1e-15);
        assert!((r[2] - 3.0 / 7.0).abs() < 1e-15);
        assert_eq!(r[3], 1.0);
    }

    #[test]
    fn reversed_meshing_agrees_after_round_trip() {
        let m = EdgeMeshing::new(5, 49.0);
        assert!(m.reversed().reversed().agrees_with(&m));
        assert!(!m.reversed().agrees_with(&m));
        assert!(!EdgeMeshing::new(4, 49.0).agrees_with(&m));
    }

    #[test]
    fn create_mesh_reuses_end_vertices() {
        let mut vertices = two_vertices();
        let mut edge = Edge::new([VertexId::new(0), VertexId::new(1)], None);
        edge.request(EdgeId::new(0), EdgeMeshing::new(4, 1.0)).unwrap();
        edge.create_mesh(EdgeId::new(0), &mut vertices).unwrap();
        assert_eq!(vertices.len(), 5);
        assert_eq!(edge.nodes()[0], VertexId::new(0));
        assert_eq!(edge.nodes()[4], VertexId::new(1));
        assert_eq!(vertices[edge.nodes()[1].index()].position, [1.0, 0.0, 0.0]);
        assert_eq!(edge.span(), Some(4));
    }

    #[test]
    fn local_node_walks_backwards_when_reversed() {
        let mut vertices = two_vertices();
        let mut edge = Edge::new([VertexId::new(0), VertexId::new(1)], None);
        edge.request(EdgeId::new(0), EdgeMeshing::new(3, 2.0)).unwrap();
        edge.create_mesh(EdgeId::new(0), &mut vertices).unwrap();
        let (v, t) = edge.local_node(Sense::REVERSED, 1).unwrap();
        assert_eq!(v, edge.nodes()[2]);
        // the reversed walk sees the long interval first
        assert!((t - 4.0 / 7.0).abs() < 1e-15);
        assert!(edge.local_node(Sense::SAME, 4).is_none());
    }

    #[test]
    fn conflicting_requests_are_rejected() {
        let mut edge = Edge::new([VertexId::new(0), VertexId::new(1)], None);
        edge.request(EdgeId::new(7), EdgeMeshing::new(3, 2.0)).unwrap();
        edge.request(EdgeId::new(7), EdgeMeshing::new(3, 2.0)).unwrap();
        let err = edge
            .request(EdgeId::new(7), EdgeMeshing::new(3, 0.5))
            .unwrap_err();
        assert!(matches!(err, MeshError::InconsistentEdgeBias { .. }));
    }

    #[test]
    fn double_bias_follows_the_single_progression() {
        let mut single = Edge::new([VertexId::new(0), VertexId::new(1)], None);
        let mut double = single.clone();
        single.request(EdgeId::new(0), EdgeMeshing::new(3, 2.0)).unwrap();
        double
            .request(EdgeId::new(0), EdgeMeshing::new(3, 2.0).with_double_bias(true))
            .unwrap();
        single.create_mesh(EdgeId::new(0), &mut two_vertices()).unwrap();
        double.create_mesh(EdgeId::new(0), &mut two_vertices()).unwrap();
        assert_eq!(single.parameters(), double.parameters());
    }

    #[test]
    fn unmeshed_edge_cannot_be_meshed() {
        let mut vertices = two_vertices();
        let mut edge = Edge::new([VertexId::new(0), VertexId::new(1)], None);
        assert_eq!(
            edge.create_mesh(EdgeId::new(2), &mut vertices),
            Err(MeshError::UnmeshedEdge(EdgeId::new(2)))
        );
        assert!(matches!(
            edge.request(EdgeId::new(2), EdgeMeshing::new(0, 1.0)),
            Err(MeshError::InvalidParameter(_))
        ));
        assert!(edge.meshing().is_none());
        assert!(edge.create_mesh(EdgeId::new(2), &mut vertices).is_err());
    }

    #[test]
    fn steep_gradings_that_overflow_are_rejected() {
        assert!(EdgeMeshing::new(1000, 2.0).validate().is_ok());
        for bad in [
            EdgeMeshing::new(2000, 2.0),
            EdgeMeshing::new(2000, 0.5),
            EdgeMeshing::new(usize::MAX, 1.0),
            EdgeMeshing::new(3, f64::MIN_POSITIVE / 1024.0),
        ] {
            assert!(matches!(bad.validate(), Err(MeshError::InvalidParameter(_))), "{bad:?}");
        }
        let mut edge = Edge::new([VertexId::new(0), VertexId::new(1)], None);
        assert!(edge.request(EdgeId::new(0), EdgeMeshing::new(2000, 2.0)).is_err());
        assert!(edge.meshing().is_none());
    }

    #[test]
    fn long_lattice_stays_finite_and_increasing() {
        let r = biased_lattice(1000, 2.0);
        assert!(r.iter().all(|t| t.is_finite()));
        assert!(r.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(r[1000], 1.0);
    }

    #[test]
    fn quadratic_edge_interleaves_midpoints() {
        let mut vertices = two_vertices();
        vertices.push(Vertex::new([2.0, 1.0, 0.0], Provenance::Node(2)));
        let mut edge = Edge::new([VertexId::new(0), VertexId::new(1)], Some(VertexId::new(2)));
        edge.request(EdgeId::new(0), EdgeMeshing::new(1, 1.0)).unwrap();
        edge.create_mesh(EdgeId::new(0), &mut vertices).unwrap();
        assert_eq!(edge.parameters(), &[0.0, 0.5, 1.0]);
        assert_eq!(edge.nodes()[1], VertexId::new(2));

        let mut edge = Edge::new([VertexId::new(0), VertexId::new(1)], Some(VertexId::new(2)));
        edge.request(EdgeId::new(0), EdgeMeshing::new(2, 1.0)).unwrap();
        edge.create_mesh(EdgeId::new(0), &mut vertices).unwrap();
        assert_eq!(edge.span(), Some(4));
        // the point at eta = 0.25 lies on the parabola through the three nodes
        let p = vertices[edge.nodes()[1].index()].position;
        assert!((p[0] - 1.0).abs() < 1e-12);
        assert!((p[1] - 0.75).abs() < 1e-12);
    }
}
