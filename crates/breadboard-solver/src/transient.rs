//! Transient (time-domain) analysis.
//!
//! Fixed-step Backward Euler integration. Each step stamps a fresh real MNA
//! system: reactive elements contribute companion models fed with the
//! previous step's state, sources sample their waveform at the current time,
//! and op-amps use the unclamped linear relation. The per-device state
//! (previous node voltages, inductor branch currents) lives in this call
//! frame and is discarded on return, keeping the input description
//! immutable.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use breadboard_core::graph::build_graph;
use breadboard_core::mna::MnaSystem;
use breadboard_core::{
    AnalysisMode, AnalysisResult, Component, ComponentKind, NodeId, NodeSnapshot, Phasor,
    PlotPoint, Wire,
};
use breadboard_devices::{
    Capacitor, Inductor, Resistor, SourceWaveform, Stamp, VoltageSource, Voltmeter,
};

use crate::dc::resolve_opamp;
use crate::error::{Error, Result};
use crate::extra::ExtraVars;
use crate::linear::solve_dense;

/// Transient analysis parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransientConfig {
    /// Integration step (s).
    pub time_step: f64,
    /// End of the simulated interval (s).
    pub stop_time: f64,
}

/// Run a transient simulation of the circuit.
///
/// The plot holds `ceil(stop_time / time_step) + 1` rows at `t = k·dt`,
/// plus a node snapshot of the final step. Without a ground rail or without
/// any non-ground node the plot comes back empty.
pub fn solve_transient(
    components: &[Component],
    wires: &[Wire],
    config: &TransientConfig,
) -> AnalysisResult {
    match run_transient(components, wires, config) {
        Ok(result) => result,
        Err(e) => AnalysisResult::with_error(AnalysisMode::Transient, e.to_string()),
    }
}

fn run_transient(
    components: &[Component],
    wires: &[Wire],
    config: &TransientConfig,
) -> Result<AnalysisResult> {
    let mut result = AnalysisResult::new(AnalysisMode::Transient);

    let graph = build_graph(components, wires);
    if !graph.has_ground || graph.num_nodes == 0 {
        return Ok(result);
    }
    if !(config.time_step > 0.0) || config.stop_time < 0.0 {
        return Err(Error::InvalidTimeStep);
    }

    let vars = ExtraVars::small_signal(components);
    let num_nodes = graph.num_nodes;
    let dt = config.time_step;
    let steps = (config.stop_time / dt).ceil() as usize;

    // Integration state, keyed off the immutable description.
    let mut prev_voltages = vec![0.0; num_nodes + 1];
    let mut inductor_currents: HashMap<String, f64> = components
        .iter()
        .filter(|c| c.kind == ComponentKind::Inductor)
        .map(|c| (c.id.clone(), 0.0))
        .collect();

    for step in 0..=steps {
        let t = step as f64 * dt;

        let mut mna = MnaSystem::new(num_nodes, vars.count());
        stamp_time_step(
            &mut mna,
            components,
            &graph,
            &vars,
            t,
            dt,
            &prev_voltages,
            &inductor_currents,
        );

        let x = match solve_dense(mna.matrix(), mna.rhs()) {
            Ok(x) => x,
            Err(e) => {
                log::warn!("transient step at t={} failed: {}", t, e);
                result.plot_data.clear();
                result.error = Some(e.to_string());
                return Ok(result);
            }
        };

        result.plot_data.push(PlotPoint {
            x: t,
            voltages: (0..num_nodes).map(|i| x[i]).collect(),
        });

        for node in 1..=num_nodes {
            prev_voltages[node] = x[node - 1];
        }

        for c in components {
            if c.kind != ComponentKind::Inductor {
                continue;
            }
            let Some((a, b)) = two_ports(&graph, &c.id) else {
                continue;
            };
            let v_new = node_voltage(&prev_voltages, a) - node_voltage(&prev_voltages, b);
            if let Some(current) = inductor_currents.get_mut(&c.id) {
                *current = Inductor::new(a, b, c.value).next_current(*current, dt, v_new);
            }
        }
    }

    // Final-step snapshot for inspection.
    for node in 0..=num_nodes {
        result
            .node_voltages
            .insert(NodeId::new(node as u32), Phasor::real(prev_voltages[node]));
    }
    for (node, component_ids) in graph.components_by_node() {
        result.nodes.push(NodeSnapshot {
            id: node,
            voltage: node_voltage(&prev_voltages, node),
            phase: 0.0,
            component_ids,
        });
    }

    Ok(result)
}

fn node_voltage(voltages: &[f64], node: NodeId) -> f64 {
    voltages[node.as_u32() as usize]
}

fn two_ports(graph: &breadboard_core::Graph, id: &str) -> Option<(NodeId, NodeId)> {
    Some((graph.node_of(id, 0)?, graph.node_of(id, 1)?))
}

#[allow(clippy::too_many_arguments)]
fn stamp_time_step(
    mna: &mut MnaSystem,
    components: &[Component],
    graph: &breadboard_core::Graph,
    vars: &ExtraVars,
    t: f64,
    dt: f64,
    prev_voltages: &[f64],
    inductor_currents: &HashMap<String, f64>,
) {
    for c in components {
        match c.kind {
            ComponentKind::Resistor => {
                if let Some((a, b)) = two_ports(graph, &c.id) {
                    Resistor::new(a, b, c.value).stamp(mna);
                }
            }
            ComponentKind::Voltmeter => {
                if let Some((a, b)) = two_ports(graph, &c.id) {
                    Voltmeter::new(a, b).stamp(mna);
                }
            }
            ComponentKind::Capacitor => {
                if let Some((a, b)) = two_ports(graph, &c.id) {
                    let v_prev =
                        node_voltage(prev_voltages, a) - node_voltage(prev_voltages, b);
                    Capacitor::new(a, b, c.value).stamp_be(mna, dt, v_prev);
                }
            }
            ComponentKind::Inductor => {
                if let Some((a, b)) = two_ports(graph, &c.id) {
                    let i_prev = inductor_currents.get(&c.id).copied().unwrap_or(0.0);
                    Inductor::new(a, b, c.value).stamp_be(mna, dt, i_prev);
                }
            }
            ComponentKind::VoltageSource => {
                if let (Some((a, b)), Some(idx)) = (two_ports(graph, &c.id), vars.index_of(&c.id))
                {
                    VoltageSource::new(a, b, c.value, idx).stamp(mna);
                }
            }
            ComponentKind::AcSource => {
                if let (Some((a, b)), Some(idx)) = (two_ports(graph, &c.id), vars.index_of(&c.id))
                {
                    let sample = SourceWaveform::from_component(c).at(t);
                    VoltageSource::new(a, b, sample, idx).stamp(mna);
                }
            }
            ComponentKind::Opamp => {
                // Always linear here; rail clamping only exists at the
                // operating point. Known limitation.
                if let Some(op) = resolve_opamp(c, graph, vars) {
                    op.stamp_linear(mna);
                }
            }
            // Diodes, LEDs, gates and ammeters do not stamp in transient.
            _ => {}
        }
    }
}
