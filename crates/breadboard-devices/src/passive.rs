//! Passive element models: Resistor, Capacitor, Inductor, Voltmeter.
//!
//! Each element stamps a two-terminal admittance. The operating-point
//! stamps use limiting values for the reactive elements (a capacitor is
//! near-open, an inductor near-short); transient analysis swaps those for
//! Backward Euler companion models fed with the previous step's state.

use breadboard_core::mna::MnaSystem;
use breadboard_core::NodeId;

use crate::stamp::Stamp;

/// Floor on resistance when forming a DC conductance.
pub const MIN_RESISTANCE: f64 = 1e-6;

/// Capacitor leak conductance at DC (near-open).
pub const CAPACITOR_DC_CONDUCTANCE: f64 = 1e-12;

/// Inductor conductance at DC (near-short).
pub const INDUCTOR_DC_CONDUCTANCE: f64 = 1e6;

/// Voltmeter conductance (a 1 GΩ probe).
pub const VOLTMETER_CONDUCTANCE: f64 = 1e-9;

/// A resistor element.
#[derive(Debug, Clone)]
pub struct Resistor {
    pub node_pos: NodeId,
    pub node_neg: NodeId,
    /// Resistance value in ohms.
    pub resistance: f64,
}

impl Resistor {
    pub fn new(node_pos: NodeId, node_neg: NodeId, resistance: f64) -> Self {
        Self {
            node_pos,
            node_neg,
            resistance,
        }
    }

    /// Conductance with the zero-ohm guard applied.
    pub fn conductance(&self) -> f64 {
        1.0 / self.resistance.max(MIN_RESISTANCE)
    }
}

impl Stamp for Resistor {
    fn stamp(&self, mna: &mut MnaSystem) {
        mna.stamp_conductance(
            self.node_pos.matrix_index(),
            self.node_neg.matrix_index(),
            self.conductance(),
        );
    }
}

/// A capacitor element.
#[derive(Debug, Clone)]
pub struct Capacitor {
    pub node_pos: NodeId,
    pub node_neg: NodeId,
    /// Capacitance value in farads.
    pub capacitance: f64,
}

impl Capacitor {
    pub fn new(node_pos: NodeId, node_neg: NodeId, capacitance: f64) -> Self {
        Self {
            node_pos,
            node_neg,
            capacitance,
        }
    }

    /// Backward Euler companion: G_eq = C/h in parallel with a history
    /// current G_eq·(v_pos - v_neg) taken from the previous step.
    pub fn stamp_be(&self, mna: &mut MnaSystem, h: f64, v_prev: f64) {
        let geq = self.capacitance / h;
        let ieq = geq * v_prev;

        let i = self.node_pos.matrix_index();
        let j = self.node_neg.matrix_index();
        mna.stamp_conductance(i, j, geq);
        // History current flows from neg to pos (charging direction).
        mna.stamp_current_source(j, i, ieq);
    }
}

impl Stamp for Capacitor {
    fn stamp(&self, mna: &mut MnaSystem) {
        // Operating point: near-open.
        mna.stamp_conductance(
            self.node_pos.matrix_index(),
            self.node_neg.matrix_index(),
            CAPACITOR_DC_CONDUCTANCE,
        );
    }
}

/// An inductor element.
///
/// Modeled as a two-terminal admittance in every regime; the branch current
/// is tracked by the transient engine, not by an extra MNA unknown.
#[derive(Debug, Clone)]
pub struct Inductor {
    pub node_pos: NodeId,
    pub node_neg: NodeId,
    /// Inductance value in henries.
    pub inductance: f64,
}

impl Inductor {
    pub fn new(node_pos: NodeId, node_neg: NodeId, inductance: f64) -> Self {
        Self {
            node_pos,
            node_neg,
            inductance,
        }
    }

    /// Backward Euler companion: G_eq = h/L in parallel with the stored
    /// branch current, flowing from pos to neg.
    pub fn stamp_be(&self, mna: &mut MnaSystem, h: f64, i_prev: f64) {
        let geq = h / self.inductance;

        let i = self.node_pos.matrix_index();
        let j = self.node_neg.matrix_index();
        mna.stamp_conductance(i, j, geq);
        mna.stamp_current_source(i, j, i_prev);
    }

    /// Advance the stored branch current by one Backward Euler step.
    pub fn next_current(&self, i_prev: f64, h: f64, v_new: f64) -> f64 {
        i_prev + h / self.inductance * v_new
    }
}

impl Stamp for Inductor {
    fn stamp(&self, mna: &mut MnaSystem) {
        // Operating point: near-short.
        mna.stamp_conductance(
            self.node_pos.matrix_index(),
            self.node_neg.matrix_index(),
            INDUCTOR_DC_CONDUCTANCE,
        );
    }
}

/// A voltmeter probe, modeled as a very large resistance.
#[derive(Debug, Clone)]
pub struct Voltmeter {
    pub node_pos: NodeId,
    pub node_neg: NodeId,
}

impl Voltmeter {
    pub fn new(node_pos: NodeId, node_neg: NodeId) -> Self {
        Self { node_pos, node_neg }
    }

    /// Probe current implied by the solved voltages.
    pub fn current(&self, v_diff: f64) -> f64 {
        v_diff * VOLTMETER_CONDUCTANCE
    }
}

impl Stamp for Voltmeter {
    fn stamp(&self, mna: &mut MnaSystem) {
        mna.stamp_conductance(
            self.node_pos.matrix_index(),
            self.node_neg.matrix_index(),
            VOLTMETER_CONDUCTANCE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resistor_stamp() {
        let mut mna = MnaSystem::new(2, 0);
        let r = Resistor::new(NodeId::new(1), NodeId::new(2), 1000.0);
        r.stamp(&mut mna);

        let g = 0.001;
        assert!((mna.matrix()[(0, 0)] - g).abs() < 1e-12);
        assert!((mna.matrix()[(1, 1)] - g).abs() < 1e-12);
        assert!((mna.matrix()[(0, 1)] + g).abs() < 1e-12);
        assert!((mna.matrix()[(1, 0)] + g).abs() < 1e-12);
    }

    #[test]
    fn test_zero_ohm_resistor_is_clamped() {
        let r = Resistor::new(NodeId::new(1), NodeId::GROUND, 0.0);
        assert_eq!(r.conductance(), 1.0 / MIN_RESISTANCE);
    }

    #[test]
    fn test_capacitor_dc_is_near_open() {
        let mut mna = MnaSystem::new(1, 0);
        let c = Capacitor::new(NodeId::new(1), NodeId::GROUND, 1e-6);
        c.stamp(&mut mna);

        assert_eq!(mna.matrix()[(0, 0)], CAPACITOR_DC_CONDUCTANCE);
    }

    #[test]
    fn test_capacitor_companion() {
        // C = 1uF, h = 1us: Geq = 1, previous drop 2V gives a 2A history
        // current into the positive node.
        let mut mna = MnaSystem::new(2, 0);
        let c = Capacitor::new(NodeId::new(1), NodeId::new(2), 1e-6);
        c.stamp_be(&mut mna, 1e-6, 2.0);

        assert!((mna.matrix()[(0, 0)] - 1.0).abs() < 1e-12);
        assert!((mna.rhs()[0] - 2.0).abs() < 1e-12);
        assert!((mna.rhs()[1] + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_inductor_companion() {
        // L = 1mH, h = 1us: Geq = 1e-3; stored current 0.5A leaves the
        // positive node.
        let mut mna = MnaSystem::new(2, 0);
        let l = Inductor::new(NodeId::new(1), NodeId::new(2), 1e-3);
        l.stamp_be(&mut mna, 1e-6, 0.5);

        assert!((mna.matrix()[(0, 0)] - 1e-3).abs() < 1e-15);
        assert!((mna.rhs()[0] + 0.5).abs() < 1e-12);
        assert!((mna.rhs()[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_inductor_current_update() {
        let l = Inductor::new(NodeId::new(1), NodeId::GROUND, 1e-3);
        let i = l.next_current(0.5, 1e-6, 2.0);
        assert!((i - 0.502).abs() < 1e-12);
    }

    #[test]
    fn test_voltmeter_barely_loads() {
        let mut mna = MnaSystem::new(1, 0);
        let vm = Voltmeter::new(NodeId::new(1), NodeId::GROUND);
        vm.stamp(&mut mna);

        assert_eq!(mna.matrix()[(0, 0)], VOLTMETER_CONDUCTANCE);
        assert!((vm.current(5.0) - 5e-9).abs() < 1e-18);
    }
}
