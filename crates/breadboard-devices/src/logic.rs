//! Combinational logic gates for operating-point analysis.
//!
//! A gate's output is an ideal voltage source forced to 0 V or the gate's
//! logic-high level. The driving level is re-evaluated each fixed-point
//! iteration from the input node voltages, using a threshold of half the
//! logic-high level. Gates only exist at the operating point; AC and
//! transient analysis skip them entirely.

use breadboard_core::mna::MnaSystem;
use breadboard_core::{ComponentKind, NodeId};

/// Logic-high level assumed when the component value is unset.
pub const DEFAULT_LOGIC_HIGH: f64 = 5.0;

/// Leak conductance added to each input so a gate-only node stays solvable.
pub const INPUT_LEAK: f64 = 1e-12;

/// Boolean function of a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateKind {
    And,
    Or,
    Nand,
    Nor,
    Xor,
    Not,
}

impl GateKind {
    /// Gate function of a component kind, if it is a gate.
    pub fn of(kind: ComponentKind) -> Option<GateKind> {
        match kind {
            ComponentKind::AndGate => Some(GateKind::And),
            ComponentKind::OrGate => Some(GateKind::Or),
            ComponentKind::NandGate => Some(GateKind::Nand),
            ComponentKind::NorGate => Some(GateKind::Nor),
            ComponentKind::XorGate => Some(GateKind::Xor),
            ComponentKind::NotGate => Some(GateKind::Not),
            _ => None,
        }
    }

    /// Evaluate the Boolean rule over input voltages.
    pub fn evaluate(self, inputs: &[f64], threshold: f64) -> bool {
        let high = |v: f64| v > threshold;
        match self {
            GateKind::And => inputs.iter().all(|&v| high(v)),
            GateKind::Or => inputs.iter().any(|&v| high(v)),
            GateKind::Nand => !inputs.iter().all(|&v| high(v)),
            GateKind::Nor => !inputs.iter().any(|&v| high(v)),
            GateKind::Xor => inputs.iter().filter(|&&v| high(v)).count() % 2 == 1,
            GateKind::Not => !inputs.first().copied().is_some_and(high),
        }
    }
}

/// A placed logic gate, resolved to electrical nodes.
#[derive(Debug, Clone)]
pub struct LogicGate {
    pub kind: GateKind,
    pub inputs: Vec<NodeId>,
    pub output: NodeId,
    /// Index of the output-drive extra unknown.
    pub extra_index: usize,
    pub logic_high: f64,
}

impl LogicGate {
    pub fn new(
        kind: GateKind,
        inputs: Vec<NodeId>,
        output: NodeId,
        extra_index: usize,
        value: f64,
    ) -> Self {
        let logic_high = if value > 0.0 {
            value
        } else {
            DEFAULT_LOGIC_HIGH
        };
        Self {
            kind,
            inputs,
            output,
            extra_index,
            logic_high,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.logic_high / 2.0
    }

    /// Output level for the given input voltages.
    pub fn target(&self, input_voltages: &[f64]) -> f64 {
        if self.kind.evaluate(input_voltages, self.threshold()) {
            self.logic_high
        } else {
            0.0
        }
    }

    /// Force the output node to `target` through the gate's extra unknown,
    /// and leak each input to keep the matrix well posed.
    pub fn stamp(&self, mna: &mut MnaSystem, target: f64) {
        mna.stamp_voltage_source(
            self.output.matrix_index(),
            None,
            self.extra_index,
            target,
        );
        for input in &self.inputs {
            if let Some(i) = input.matrix_index() {
                mna.add_element(i, i, INPUT_LEAK);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truth_tables() {
        let t = 2.5;
        assert!(GateKind::And.evaluate(&[5.0, 5.0], t));
        assert!(!GateKind::And.evaluate(&[5.0, 0.0], t));
        assert!(GateKind::Or.evaluate(&[0.0, 5.0], t));
        assert!(!GateKind::Or.evaluate(&[0.0, 0.0], t));
        assert!(GateKind::Nand.evaluate(&[5.0, 0.0], t));
        assert!(!GateKind::Nand.evaluate(&[5.0, 5.0], t));
        assert!(GateKind::Nor.evaluate(&[0.0, 0.0], t));
        assert!(!GateKind::Nor.evaluate(&[0.0, 5.0], t));
        assert!(GateKind::Xor.evaluate(&[5.0, 0.0], t));
        assert!(!GateKind::Xor.evaluate(&[5.0, 5.0], t));
        assert!(GateKind::Xor.evaluate(&[5.0, 5.0, 5.0], t));
        assert!(GateKind::Not.evaluate(&[0.0], t));
        assert!(!GateKind::Not.evaluate(&[5.0], t));
    }

    #[test]
    fn test_target_levels() {
        let gate = LogicGate::new(
            GateKind::And,
            vec![NodeId::new(1), NodeId::new(2)],
            NodeId::new(3),
            0,
            0.0,
        );
        assert_eq!(gate.logic_high, DEFAULT_LOGIC_HIGH);
        assert_eq!(gate.target(&[5.0, 5.0]), 5.0);
        assert_eq!(gate.target(&[5.0, 0.0]), 0.0);
    }

    #[test]
    fn test_stamp_forces_output() {
        let gate = LogicGate::new(
            GateKind::Or,
            vec![NodeId::new(1), NodeId::new(2)],
            NodeId::new(3),
            0,
            5.0,
        );
        let mut mna = MnaSystem::new(3, 1);
        gate.stamp(&mut mna, 5.0);

        // Output forced through the extra unknown.
        assert_eq!(mna.matrix()[(2, 3)], 1.0);
        assert_eq!(mna.matrix()[(3, 2)], 1.0);
        assert_eq!(mna.rhs()[3], 5.0);
        // Inputs leak to keep lone gate inputs solvable.
        assert_eq!(mna.matrix()[(0, 0)], INPUT_LEAK);
        assert_eq!(mna.matrix()[(1, 1)], INPUT_LEAK);
    }
}
