//! Diode and LED companion model for operating-point analysis.
//!
//! The engine runs a fixed-point loop rather than Newton-Raphson, so the
//! diode is a threshold device: above its forward voltage it becomes a 10 Ω
//! resistance anchored at `v_fwd`, below it a 1 nS leak. Both pieces are
//! resistive, which keeps the iteration a sequence of linear solves.

use breadboard_core::mna::MnaSystem;
use breadboard_core::NodeId;

/// Conductance of a conducting diode (10 Ω on-resistance).
pub const ON_CONDUCTANCE: f64 = 0.1;

/// Conductance of a reverse-biased diode.
pub const REVERSE_CONDUCTANCE: f64 = 1e-9;

/// Forward voltage assumed when the component value is unset.
pub const DEFAULT_FORWARD_VOLTAGE: f64 = 0.7;

/// A diode or LED (port 0 anode, port 1 cathode).
#[derive(Debug, Clone)]
pub struct Diode {
    pub node_pos: NodeId,
    pub node_neg: NodeId,
    /// Forward voltage in volts.
    pub forward_voltage: f64,
}

impl Diode {
    /// Create a diode; non-positive `value` falls back to 0.7 V.
    pub fn new(node_pos: NodeId, node_neg: NodeId, value: f64) -> Self {
        let forward_voltage = if value > 0.0 {
            value
        } else {
            DEFAULT_FORWARD_VOLTAGE
        };
        Self {
            node_pos,
            node_neg,
            forward_voltage,
        }
    }

    /// Whether the diode conducts at the given anode-cathode voltage.
    pub fn is_forward(&self, vd: f64) -> bool {
        vd > self.forward_voltage
    }

    /// Stamp the companion linearized at the current iterate's `vd`.
    ///
    /// Conducting: conductance `ON_CONDUCTANCE` plus a history current
    /// `ON_CONDUCTANCE · v_fwd` into the anode, which anchors the line at
    /// the knee. Blocking: a bare leak conductance.
    pub fn stamp_operating(&self, mna: &mut MnaSystem, vd: f64) {
        let i = self.node_pos.matrix_index();
        let j = self.node_neg.matrix_index();

        if self.is_forward(vd) {
            mna.stamp_conductance(i, j, ON_CONDUCTANCE);
            let anchor = ON_CONDUCTANCE * self.forward_voltage;
            if let Some(i) = i {
                mna.add_rhs(i, anchor);
            }
            if let Some(j) = j {
                mna.add_rhs(j, -anchor);
            }
        } else {
            mna.stamp_conductance(i, j, REVERSE_CONDUCTANCE);
        }
    }

    /// Branch current implied by the solved voltage drop.
    pub fn current(&self, vd: f64) -> f64 {
        if self.is_forward(vd) {
            (vd - self.forward_voltage) * ON_CONDUCTANCE
        } else {
            vd * REVERSE_CONDUCTANCE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_forward_voltage() {
        let d = Diode::new(NodeId::new(1), NodeId::GROUND, 0.0);
        assert_eq!(d.forward_voltage, 0.7);
        let led = Diode::new(NodeId::new(1), NodeId::GROUND, 2.1);
        assert_eq!(led.forward_voltage, 2.1);
    }

    #[test]
    fn test_forward_stamp() {
        let mut mna = MnaSystem::new(2, 0);
        let d = Diode::new(NodeId::new(1), NodeId::new(2), 0.7);
        d.stamp_operating(&mut mna, 1.0);

        assert!((mna.matrix()[(0, 0)] - ON_CONDUCTANCE).abs() < 1e-12);
        assert!((mna.matrix()[(0, 1)] + ON_CONDUCTANCE).abs() < 1e-12);
        assert!((mna.rhs()[0] - 0.07).abs() < 1e-12);
        assert!((mna.rhs()[1] + 0.07).abs() < 1e-12);
    }

    #[test]
    fn test_reverse_stamp() {
        let mut mna = MnaSystem::new(2, 0);
        let d = Diode::new(NodeId::new(1), NodeId::new(2), 0.7);
        d.stamp_operating(&mut mna, 0.3);

        assert_eq!(mna.matrix()[(0, 0)], REVERSE_CONDUCTANCE);
        assert_eq!(mna.rhs()[0], 0.0);
    }

    #[test]
    fn test_current() {
        let d = Diode::new(NodeId::new(1), NodeId::GROUND, 0.7);
        assert!((d.current(1.7) - 0.1).abs() < 1e-12);
        assert!((d.current(-5.0) + 5e-9).abs() < 1e-18);
    }
}
