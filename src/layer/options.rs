//! Parameters of a boundary-layer pass.

use serde::{Deserialize, Serialize};

use crate::domain::EdgeMeshing;
use crate::mesh_error::MeshError;

/// Layer count and grading of the inserted boundary layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryLayerOptions {
    /// Number of layers stacked on the selected faces.
    pub segments: usize,
    /// Ratio between the thickness of consecutive layers, walking away from
    /// the selected faces.
    pub bias: f64,
    /// Grade from both ends of each layer edge.
    pub double_bias: bool,
}

impl Default for BoundaryLayerOptions {
    fn default() -> Self {
        Self {
            segments: 1,
            bias: 1.0,
            double_bias: false,
        }
    }
}

impl BoundaryLayerOptions {
    pub fn new(segments: usize, bias: f64) -> Self {
        Self {
            segments,
            bias,
            ..Self::default()
        }
    }

    /// Rejects layer counts and gradings that cannot be generated.
    pub fn validate(&self) -> Result<(), MeshError> {
        self.layer().validate()
    }

    /// Distribution requested on every edge leaving a selected feature,
    /// in the direction pointing away from it.
    pub fn layer(&self) -> EdgeMeshing {
        EdgeMeshing::new(self.segments, self.bias).with_double_bias(self.double_bias)
    }
}
