//! Independent source and ammeter stamps.
//!
//! Both append one extra MNA unknown whose solution is the branch current.
//! An ammeter is a 0 V source: it pins its terminals together and reads the
//! current that flows through the pin.

use breadboard_core::mna::MnaSystem;
use breadboard_core::NodeId;

use crate::stamp::Stamp;

/// An independent voltage source (port 0 positive, port 1 negative).
#[derive(Debug, Clone)]
pub struct VoltageSource {
    pub node_pos: NodeId,
    pub node_neg: NodeId,
    /// Driven voltage in volts; the engine supplies the DC value, the AC
    /// bias, or a waveform sample depending on the analysis.
    pub voltage: f64,
    /// Index of this source's extra unknown.
    pub extra_index: usize,
}

impl VoltageSource {
    pub fn new(node_pos: NodeId, node_neg: NodeId, voltage: f64, extra_index: usize) -> Self {
        Self {
            node_pos,
            node_neg,
            voltage,
            extra_index,
        }
    }
}

impl Stamp for VoltageSource {
    fn stamp(&self, mna: &mut MnaSystem) {
        mna.stamp_voltage_source(
            self.node_pos.matrix_index(),
            self.node_neg.matrix_index(),
            self.extra_index,
            self.voltage,
        );
    }
}

/// An in-circuit ammeter.
#[derive(Debug, Clone)]
pub struct Ammeter {
    pub node_pos: NodeId,
    pub node_neg: NodeId,
    /// Index of the meter's extra unknown (its reading).
    pub extra_index: usize,
}

impl Ammeter {
    pub fn new(node_pos: NodeId, node_neg: NodeId, extra_index: usize) -> Self {
        Self {
            node_pos,
            node_neg,
            extra_index,
        }
    }
}

impl Stamp for Ammeter {
    fn stamp(&self, mna: &mut MnaSystem) {
        mna.stamp_voltage_source(
            self.node_pos.matrix_index(),
            self.node_neg.matrix_index(),
            self.extra_index,
            0.0,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voltage_source_stamp() {
        let mut mna = MnaSystem::new(2, 1);
        let v = VoltageSource::new(NodeId::new(1), NodeId::GROUND, 5.0, 0);
        v.stamp(&mut mna);

        assert_eq!(mna.matrix()[(0, 2)], 1.0);
        assert_eq!(mna.matrix()[(2, 0)], 1.0);
        assert_eq!(mna.rhs()[2], 5.0);
    }

    #[test]
    fn test_ammeter_is_zero_volt_source() {
        let mut mna = MnaSystem::new(2, 1);
        let a = Ammeter::new(NodeId::new(1), NodeId::new(2), 0);
        a.stamp(&mut mna);

        assert_eq!(mna.matrix()[(0, 2)], 1.0);
        assert_eq!(mna.matrix()[(2, 0)], 1.0);
        assert_eq!(mna.matrix()[(1, 2)], -1.0);
        assert_eq!(mna.matrix()[(2, 1)], -1.0);
        assert_eq!(mna.rhs()[2], 0.0);
    }
}
