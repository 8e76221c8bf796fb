//! Operating-point (interactive DC) analysis.
//!
//! Nonlinear devices are handled by fixed-point iteration: every pass
//! re-stamps the whole system with device companions linearized at the
//! previous solution, solves it, and repeats until the node voltages settle.
//! That is good enough for this device set (resistive nonlinearities only)
//! and avoids Jacobian assembly; the iteration cap is the safety valve for
//! topologies that refuse to settle.

use std::collections::HashMap;

use nalgebra::DVector;

use breadboard_core::graph::{build_graph, Graph};
use breadboard_core::mna::MnaSystem;
use breadboard_core::{
    AnalysisMode, AnalysisResult, Component, ComponentKind, NodeId, NodeSnapshot, Phasor, Wire,
};
use breadboard_devices::{
    Ammeter, Capacitor, Diode, GateKind, Inductor, LogicGate, Opamp, Resistor, Stamp,
    VoltageSource, Voltmeter,
};

use crate::error::{Error, Result};
use crate::extra::ExtraVars;
use crate::linear::solve_dense;

/// Cap on fixed-point passes.
pub const MAX_ITERATIONS: usize = 20;

/// Node-voltage settling tolerance, in volts.
pub const CONVERGENCE_TOLERANCE: f64 = 0.01;

/// Solve the operating point of a circuit.
///
/// `frequency` is the editor's bias frequency; it is echoed into the result
/// and does not affect the solve (AC sources contribute their DC bias only).
/// The result always comes back well-formed: a missing ground rail or a
/// fully singular system set `error` instead of panicking or returning a
/// Rust error.
pub fn solve_circuit(components: &[Component], wires: &[Wire], frequency: f64) -> AnalysisResult {
    match operating_point(components, wires, frequency) {
        Ok(result) => result,
        Err(e) => AnalysisResult::with_error(AnalysisMode::Dc, e.to_string()),
    }
}

fn operating_point(
    components: &[Component],
    wires: &[Wire],
    frequency: f64,
) -> Result<AnalysisResult> {
    let graph = build_graph(components, wires);
    if !graph.has_ground {
        return Err(Error::MissingGround);
    }

    let vars = ExtraVars::operating_point(components);
    let num_nodes = graph.num_nodes;

    let gates = collect_gates(components, &graph, &vars);

    // Node voltages indexed by node id; slot 0 is the ground rail and stays 0.
    let mut voltages = vec![0.0; num_nodes + 1];
    let mut gate_targets: HashMap<String, f64> = HashMap::new();
    let mut solution = DVector::zeros(num_nodes + vars.count());
    let mut converged = false;

    for _ in 0..MAX_ITERATIONS {
        for (id, gate) in &gates {
            let inputs: Vec<f64> = gate.inputs.iter().map(|&n| node_voltage(&voltages, n)).collect();
            gate_targets.insert(id.clone(), gate.target(&inputs));
        }

        let mut mna = MnaSystem::new(num_nodes, vars.count());
        stamp_operating_point(
            &mut mna,
            components,
            &graph,
            &vars,
            &voltages,
            &gates,
            &gate_targets,
        );

        let x = solve_dense(mna.matrix(), mna.rhs())?;

        let mut max_diff = 0.0f64;
        for node in 1..=num_nodes {
            max_diff = max_diff.max((x[node - 1] - voltages[node]).abs());
        }
        for node in 1..=num_nodes {
            voltages[node] = x[node - 1];
        }
        solution = x;

        if max_diff < CONVERGENCE_TOLERANCE {
            converged = true;
            break;
        }
    }

    if !converged {
        log::warn!(
            "operating point did not settle within {} iterations",
            MAX_ITERATIONS
        );
    }

    let mut result = AnalysisResult::new(AnalysisMode::Dc);
    result.frequency = frequency;
    harvest(&mut result, components, &graph, &vars, &voltages, &solution);
    Ok(result)
}

fn node_voltage(voltages: &[f64], node: NodeId) -> f64 {
    voltages[node.as_u32() as usize]
}

fn two_ports(graph: &Graph, id: &str) -> Option<(NodeId, NodeId)> {
    Some((graph.node_of(id, 0)?, graph.node_of(id, 1)?))
}

/// Resolve every gate once; kind, input/output nodes and the extra index do
/// not change between iterations, only the driven level does.
fn collect_gates(
    components: &[Component],
    graph: &Graph,
    vars: &ExtraVars,
) -> Vec<(String, LogicGate)> {
    let mut gates = Vec::new();
    for c in components {
        let Some(kind) = GateKind::of(c.kind) else {
            continue;
        };
        let Some(extra_index) = vars.index_of(&c.id) else {
            continue;
        };
        let input_count = match kind {
            GateKind::Not => 1,
            _ => c.gate_inputs(),
        };
        let inputs: Option<Vec<NodeId>> =
            (0..input_count).map(|p| graph.node_of(&c.id, p)).collect();
        let (Some(inputs), Some(output)) = (inputs, graph.node_of(&c.id, input_count)) else {
            continue;
        };
        gates.push((
            c.id.clone(),
            LogicGate::new(kind, inputs, output, extra_index, c.value),
        ));
    }
    gates
}

#[allow(clippy::too_many_arguments)]
fn stamp_operating_point(
    mna: &mut MnaSystem,
    components: &[Component],
    graph: &Graph,
    vars: &ExtraVars,
    voltages: &[f64],
    gates: &[(String, LogicGate)],
    gate_targets: &HashMap<String, f64>,
) {
    for c in components {
        match c.kind {
            ComponentKind::Resistor => {
                if let Some((a, b)) = two_ports(graph, &c.id) {
                    Resistor::new(a, b, c.value).stamp(mna);
                }
            }
            ComponentKind::Capacitor => {
                if let Some((a, b)) = two_ports(graph, &c.id) {
                    Capacitor::new(a, b, c.value).stamp(mna);
                }
            }
            ComponentKind::Inductor => {
                if let Some((a, b)) = two_ports(graph, &c.id) {
                    Inductor::new(a, b, c.value).stamp(mna);
                }
            }
            ComponentKind::Voltmeter => {
                if let Some((a, b)) = two_ports(graph, &c.id) {
                    Voltmeter::new(a, b).stamp(mna);
                }
            }
            ComponentKind::Diode | ComponentKind::Led => {
                if let Some((a, b)) = two_ports(graph, &c.id) {
                    let vd = node_voltage(voltages, a) - node_voltage(voltages, b);
                    Diode::new(a, b, c.value).stamp_operating(mna, vd);
                }
            }
            ComponentKind::VoltageSource => {
                if let (Some((a, b)), Some(idx)) = (two_ports(graph, &c.id), vars.index_of(&c.id))
                {
                    VoltageSource::new(a, b, c.value, idx).stamp(mna);
                }
            }
            ComponentKind::AcSource => {
                // Operating point uses the DC bias only; no superposition of
                // the AC magnitude.
                if let (Some((a, b)), Some(idx)) = (two_ports(graph, &c.id), vars.index_of(&c.id))
                {
                    VoltageSource::new(a, b, c.dc_bias.unwrap_or(0.0), idx).stamp(mna);
                }
            }
            ComponentKind::Ammeter => {
                if let (Some((a, b)), Some(idx)) = (two_ports(graph, &c.id), vars.index_of(&c.id))
                {
                    Ammeter::new(a, b, idx).stamp(mna);
                }
            }
            ComponentKind::Opamp => {
                if let Some(op) = resolve_opamp(c, graph, vars) {
                    let drive = op.drive(
                        node_voltage(voltages, op.non_inverting),
                        node_voltage(voltages, op.inverting),
                    );
                    op.stamp_operating(mna, drive);
                }
            }
            // Ground has no stamp; gates stamp below from their targets.
            _ => {}
        }
    }

    for (id, gate) in gates {
        let target = gate_targets.get(id).copied().unwrap_or(0.0);
        gate.stamp(mna, target);
    }
}

pub(crate) fn resolve_opamp(c: &Component, graph: &Graph, vars: &ExtraVars) -> Option<Opamp> {
    let non_inverting = graph.node_of(&c.id, 0)?;
    let inverting = graph.node_of(&c.id, 1)?;
    let output = graph.node_of(&c.id, 2)?;
    let extra_index = vars.index_of(&c.id)?;
    Some(Opamp::new(
        non_inverting,
        inverting,
        output,
        extra_index,
        c.value,
        c.input_impedance.unwrap_or(0.0),
    ))
}

fn harvest(
    result: &mut AnalysisResult,
    components: &[Component],
    graph: &Graph,
    vars: &ExtraVars,
    voltages: &[f64],
    solution: &DVector<f64>,
) {
    let num_nodes = graph.num_nodes;

    for node in 0..=num_nodes {
        result
            .node_voltages
            .insert(NodeId::new(node as u32), Phasor::real(voltages[node]));
    }

    for c in components {
        // Elements with their own equation read the solved branch current.
        if let Some(idx) = vars.index_of(&c.id) {
            result
                .component_currents
                .insert(c.id.clone(), solution[num_nodes + idx]);
            continue;
        }

        let Some((a, b)) = two_ports(graph, &c.id) else {
            continue;
        };
        let v_diff = node_voltage(voltages, a) - node_voltage(voltages, b);
        let current = match c.kind {
            ComponentKind::Resistor => v_diff * Resistor::new(a, b, c.value).conductance(),
            ComponentKind::Voltmeter => Voltmeter::new(a, b).current(v_diff),
            ComponentKind::Diode | ComponentKind::Led => {
                let diode = Diode::new(a, b, c.value);
                let current = diode.current(v_diff);
                if c.kind == ComponentKind::Led {
                    check_led_rating(result, c, current);
                }
                current
            }
            ComponentKind::Capacitor => {
                v_diff * breadboard_devices::passive::CAPACITOR_DC_CONDUCTANCE
            }
            ComponentKind::Inductor => {
                v_diff * breadboard_devices::passive::INDUCTOR_DC_CONDUCTANCE
            }
            _ => continue,
        };
        result.component_currents.insert(c.id.clone(), current);
    }

    for (node, component_ids) in graph.components_by_node() {
        result.nodes.push(NodeSnapshot {
            id: node,
            voltage: node_voltage(voltages, node),
            phase: 0.0,
            component_ids,
        });
    }
}

fn check_led_rating(result: &mut AnalysisResult, c: &Component, current: f64) {
    let Some(rating) = c.max_current else {
        return;
    };
    if rating > 0.0 && current > rating {
        result.warnings.push(format!(
            "LED {} draws {}A, above its {}A rating",
            c.id,
            breadboard_core::units::format_value(current),
            breadboard_core::units::format_value(rating),
        ));
    }
}
