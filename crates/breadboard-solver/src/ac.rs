//! AC small-signal frequency sweep.
//!
//! The circuit is stamped into a complex MNA system at each of a set of
//! log-spaced frequencies and solved independently; the plot rows carry the
//! node-voltage magnitudes. Only linear small-signal elements participate:
//! diodes, LEDs, logic gates and ammeters are absent in this regime, DC
//! sources become shorts, and AC sources drive their magnitude.

use std::f64::consts::TAU;

use nalgebra::{DMatrix, DVector};
use num_complex::Complex;
use serde::{Deserialize, Serialize};

use breadboard_core::graph::build_graph;
use breadboard_core::{AnalysisMode, AnalysisResult, Component, ComponentKind, PlotPoint, Wire};
use breadboard_devices::passive::VOLTMETER_CONDUCTANCE;

use crate::dc::resolve_opamp;
use crate::extra::ExtraVars;
use crate::linear::solve_complex;

/// AC sweep parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcSweepConfig {
    /// Start frequency (Hz); floored to 1 Hz for the log grid.
    pub start_freq: f64,
    /// Stop frequency (Hz).
    pub stop_freq: f64,
    /// Number of frequency points.
    pub points: usize,
}

/// Complex MNA system for one frequency point.
///
/// Same layout as the real [`MnaSystem`](breadboard_core::mna::MnaSystem):
/// node voltages first, extra unknowns after.
#[derive(Debug, Clone)]
pub struct ComplexMna {
    matrix: DMatrix<Complex<f64>>,
    rhs: DVector<Complex<f64>>,
    num_nodes: usize,
    num_extra: usize,
}

impl ComplexMna {
    pub fn new(num_nodes: usize, num_extra: usize) -> Self {
        let size = num_nodes + num_extra;
        Self {
            matrix: DMatrix::from_element(size, size, Complex::new(0.0, 0.0)),
            rhs: DVector::from_element(size, Complex::new(0.0, 0.0)),
            num_nodes,
            num_extra,
        }
    }

    pub fn size(&self) -> usize {
        self.num_nodes + self.num_extra
    }

    pub fn matrix(&self) -> &DMatrix<Complex<f64>> {
        &self.matrix
    }

    pub fn rhs(&self) -> &DVector<Complex<f64>> {
        &self.rhs
    }

    pub fn add_element(&mut self, row: usize, col: usize, value: Complex<f64>) {
        self.matrix[(row, col)] += value;
    }

    pub fn add_rhs(&mut self, row: usize, value: Complex<f64>) {
        self.rhs[row] += value;
    }

    /// Stamp a complex admittance between two nodes.
    pub fn stamp_admittance(
        &mut self,
        node_i: Option<usize>,
        node_j: Option<usize>,
        y: Complex<f64>,
    ) {
        if let Some(i) = node_i {
            self.matrix[(i, i)] += y;
        }
        if let Some(j) = node_j {
            self.matrix[(j, j)] += y;
        }
        if let (Some(i), Some(j)) = (node_i, node_j) {
            self.matrix[(i, j)] -= y;
            self.matrix[(j, i)] -= y;
        }
    }

    /// Stamp a real conductance between two nodes.
    pub fn stamp_conductance(&mut self, node_i: Option<usize>, node_j: Option<usize>, g: f64) {
        self.stamp_admittance(node_i, node_j, Complex::new(g, 0.0));
    }

    /// Stamp a voltage source: V(pos) - V(neg) = voltage.
    pub fn stamp_voltage_source(
        &mut self,
        node_pos: Option<usize>,
        node_neg: Option<usize>,
        extra_idx: usize,
        voltage: Complex<f64>,
    ) {
        let row = self.num_nodes + extra_idx;
        let one = Complex::new(1.0, 0.0);

        if let Some(i) = node_pos {
            self.matrix[(i, row)] += one;
            self.matrix[(row, i)] += one;
        }
        if let Some(j) = node_neg {
            self.matrix[(j, row)] -= one;
            self.matrix[(row, j)] -= one;
        }
        self.rhs[row] += voltage;
    }

    /// Stamp an op-amp's small-signal model: input conductance between the
    /// inputs, the output-current column, and the unclamped gain row.
    pub fn stamp_opamp(
        &mut self,
        non_inverting: Option<usize>,
        inverting: Option<usize>,
        output: Option<usize>,
        extra_idx: usize,
        gain: f64,
        input_conductance: f64,
    ) {
        self.stamp_conductance(non_inverting, inverting, input_conductance);

        let row = self.num_nodes + extra_idx;
        if let Some(o) = output {
            self.matrix[(o, row)] += Complex::new(1.0, 0.0);
            self.matrix[(row, o)] += Complex::new(1.0, 0.0);
        }
        if let Some(p) = non_inverting {
            self.matrix[(row, p)] -= Complex::new(gain, 0.0);
        }
        if let Some(m) = inverting {
            self.matrix[(row, m)] += Complex::new(gain, 0.0);
        }
    }
}

/// The log-spaced frequency grid for a sweep.
pub fn sweep_frequencies(config: &AcSweepConfig) -> Vec<f64> {
    if config.points == 0 {
        return Vec::new();
    }
    let log_start = config.start_freq.max(1.0).log10();
    let log_stop = config.stop_freq.log10();
    let step = if config.points > 1 {
        (log_stop - log_start) / (config.points - 1) as f64
    } else {
        0.0
    };
    (0..config.points)
        .map(|i| 10.0_f64.powf(log_start + step * i as f64))
        .collect()
}

/// Run an AC sweep over the circuit.
///
/// Without a ground rail or without any non-ground node there is nothing to
/// sweep and the plot comes back empty. A system that collapses entirely
/// under pivoting reports `"Singular matrix"` with an empty plot.
pub fn solve_ac_sweep(
    components: &[Component],
    wires: &[Wire],
    config: &AcSweepConfig,
) -> AnalysisResult {
    let mut result = AnalysisResult::new(AnalysisMode::AcSweep);
    result.frequency = config.start_freq;

    let graph = build_graph(components, wires);
    if !graph.has_ground || graph.num_nodes == 0 {
        return result;
    }

    let vars = ExtraVars::small_signal(components);
    let num_nodes = graph.num_nodes;

    for freq in sweep_frequencies(config) {
        let omega = TAU * freq;
        let mut mna = ComplexMna::new(num_nodes, vars.count());
        stamp_small_signal(&mut mna, components, &graph, &vars, omega);

        match solve_complex(mna.matrix(), mna.rhs()) {
            Ok(x) => {
                result.plot_data.push(PlotPoint {
                    x: freq,
                    voltages: (0..num_nodes).map(|i| x[i].norm()).collect(),
                });
            }
            Err(e) => {
                log::warn!("AC sweep failed at {} Hz: {}", freq, e);
                result.plot_data.clear();
                result.error = Some(e.to_string());
                return result;
            }
        }
    }

    result
}

fn stamp_small_signal(
    mna: &mut ComplexMna,
    components: &[Component],
    graph: &breadboard_core::Graph,
    vars: &ExtraVars,
    omega: f64,
) {
    for c in components {
        let ports = || -> Option<(Option<usize>, Option<usize>)> {
            Some((
                graph.node_of(&c.id, 0)?.matrix_index(),
                graph.node_of(&c.id, 1)?.matrix_index(),
            ))
        };
        match c.kind {
            ComponentKind::Resistor => {
                if let Some((i, j)) = ports() {
                    mna.stamp_conductance(i, j, 1.0 / c.value);
                }
            }
            ComponentKind::Capacitor => {
                if let Some((i, j)) = ports() {
                    mna.stamp_admittance(i, j, Complex::new(0.0, omega * c.value));
                }
            }
            ComponentKind::Inductor => {
                if let Some((i, j)) = ports() {
                    mna.stamp_admittance(i, j, Complex::new(0.0, -1.0 / (omega * c.value)));
                }
            }
            ComponentKind::Voltmeter => {
                if let Some((i, j)) = ports() {
                    mna.stamp_conductance(i, j, VOLTMETER_CONDUCTANCE);
                }
            }
            ComponentKind::VoltageSource => {
                // DC sources are AC shorts.
                if let (Some((i, j)), Some(idx)) = (ports(), vars.index_of(&c.id)) {
                    mna.stamp_voltage_source(i, j, idx, Complex::new(0.0, 0.0));
                }
            }
            ComponentKind::AcSource => {
                if let (Some((i, j)), Some(idx)) = (ports(), vars.index_of(&c.id)) {
                    mna.stamp_voltage_source(i, j, idx, Complex::new(c.value, 0.0));
                }
            }
            ComponentKind::Opamp => {
                if let Some(op) = resolve_opamp(c, graph, vars) {
                    mna.stamp_opamp(
                        op.non_inverting.matrix_index(),
                        op.inverting.matrix_index(),
                        op.output.matrix_index(),
                        op.extra_index,
                        op.gain,
                        op.input_conductance,
                    );
                }
            }
            // Diodes, LEDs, gates and ammeters do not exist at small signal.
            _ => {}
        }
    }
}
