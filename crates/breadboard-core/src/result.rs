//! Analysis results handed back to the host editor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// The analysis that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisMode {
    Dc,
    AcSweep,
    Transient,
}

/// Magnitude/phase pair for a node voltage. Phase is zero outside AC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phasor {
    pub magnitude: f64,
    pub phase: f64,
}

impl Phasor {
    pub fn real(magnitude: f64) -> Self {
        Self {
            magnitude,
            phase: 0.0,
        }
    }
}

/// Per-node snapshot: solved voltage plus every component touching the node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub voltage: f64,
    pub phase: f64,
    pub component_ids: Vec<String>,
}

/// One row of sweep/transient plot data.
///
/// `x` is frequency in Hz (AC sweep) or time in seconds (transient);
/// `voltages[k]` is the solved voltage of node k+1 (the editor's N1..Nn
/// plot columns).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotPoint {
    pub x: f64,
    pub voltages: Vec<f64>,
}

impl PlotPoint {
    /// Voltage of a node in this row, if the node is plotted.
    pub fn voltage(&self, node: NodeId) -> Option<f64> {
        self.voltages.get(node.matrix_index()?).copied()
    }
}

/// The complete outcome of one solve.
///
/// Every engine entry point returns a well-formed result; failures surface
/// through `error` rather than a Rust error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub mode: AnalysisMode,
    pub nodes: Vec<NodeSnapshot>,
    pub node_voltages: BTreeMap<NodeId, Phasor>,
    pub component_currents: BTreeMap<String, f64>,
    pub plot_data: Vec<PlotPoint>,
    /// DC bias frequency (0) or sweep start frequency.
    pub frequency: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl AnalysisResult {
    /// An empty result for the given analysis.
    pub fn new(mode: AnalysisMode) -> Self {
        Self {
            mode,
            nodes: Vec::new(),
            node_voltages: BTreeMap::new(),
            component_currents: BTreeMap::new(),
            plot_data: Vec::new(),
            frequency: 0.0,
            error: None,
            warnings: Vec::new(),
        }
    }

    /// An empty result carrying only a diagnostic message.
    pub fn with_error(mode: AnalysisMode, message: impl Into<String>) -> Self {
        let mut result = Self::new(mode);
        result.error = Some(message.into());
        result
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Solved voltage magnitude at a node, zero if unknown.
    pub fn voltage(&self, node: NodeId) -> f64 {
        self.node_voltages
            .get(&node)
            .map(|p| p.magnitude)
            .unwrap_or(0.0)
    }

    /// Solved current through a component, zero if unknown.
    pub fn current(&self, component: &str) -> f64 {
        self.component_currents
            .get(component)
            .copied()
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_result() {
        let r = AnalysisResult::with_error(AnalysisMode::Dc, "No Ground (GND) found.");
        assert!(!r.is_ok());
        assert!(r.nodes.is_empty());
        assert_eq!(r.voltage(NodeId::new(1)), 0.0);
    }

    #[test]
    fn test_plot_point_lookup() {
        let p = PlotPoint {
            x: 1.0,
            voltages: vec![3.0, 4.0],
        };
        assert_eq!(p.voltage(NodeId::new(1)), Some(3.0));
        assert_eq!(p.voltage(NodeId::new(2)), Some(4.0));
        assert_eq!(p.voltage(NodeId::new(3)), None);
        assert_eq!(p.voltage(NodeId::GROUND), None);
    }

    #[test]
    fn test_mode_serde_names() {
        let json = serde_json::to_string(&AnalysisMode::AcSweep).unwrap();
        assert_eq!(json, "\"AC_SWEEP\"");
    }
}
