//! Idealized op-amp model.
//!
//! Three terminals: non-inverting input (port 0), inverting input (port 1),
//! output (port 2). The inputs see a large differential impedance; the
//! output is driven through one extra MNA unknown that carries the injected
//! output current.
//!
//! Operating-point analysis clamps the output to the supply rails: when
//! `gain · (v+ - v-)` would exceed ±15 V the constraint row pins the output
//! node to the rail instead of enforcing the linear gain relation. AC and
//! transient analysis always use the linear relation, so a saturated op-amp
//! can report super-rail outputs in transient plots. Known limitation.

use breadboard_core::mna::MnaSystem;
use breadboard_core::NodeId;

/// Open-loop gain assumed when the component value is unset.
pub const DEFAULT_GAIN: f64 = 1e5;

/// Differential input impedance assumed when unset, in ohms.
pub const DEFAULT_INPUT_IMPEDANCE: f64 = 1e7;

/// Supply rail magnitude in volts.
pub const SUPPLY_RAIL: f64 = 15.0;

/// How the constraint row should drive the output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OpampDrive {
    /// Enforce V(out) = gain · (V+ - V-).
    Linear,
    /// Pin the output node to a rail voltage.
    Saturated(f64),
}

/// An op-amp element.
#[derive(Debug, Clone)]
pub struct Opamp {
    pub non_inverting: NodeId,
    pub inverting: NodeId,
    pub output: NodeId,
    /// Index of the output-current extra unknown.
    pub extra_index: usize,
    pub gain: f64,
    pub input_conductance: f64,
}

impl Opamp {
    /// Create an op-amp; non-positive gain or impedance fall back to the
    /// defaults.
    pub fn new(
        non_inverting: NodeId,
        inverting: NodeId,
        output: NodeId,
        extra_index: usize,
        gain: f64,
        input_impedance: f64,
    ) -> Self {
        let gain = if gain > 0.0 { gain } else { DEFAULT_GAIN };
        let impedance = if input_impedance > 0.0 {
            input_impedance
        } else {
            DEFAULT_INPUT_IMPEDANCE
        };
        Self {
            non_inverting,
            inverting,
            output,
            extra_index,
            gain,
            input_conductance: 1.0 / impedance,
        }
    }

    /// Decide the constraint from the current iterate's input voltages.
    pub fn drive(&self, v_plus: f64, v_minus: f64) -> OpampDrive {
        let target = self.gain * (v_plus - v_minus);
        if target > SUPPLY_RAIL {
            OpampDrive::Saturated(SUPPLY_RAIL)
        } else if target < -SUPPLY_RAIL {
            OpampDrive::Saturated(-SUPPLY_RAIL)
        } else {
            OpampDrive::Linear
        }
    }

    /// Stamp with the given drive decision (operating point).
    pub fn stamp_operating(&self, mna: &mut MnaSystem, drive: OpampDrive) {
        self.stamp_common(mna);
        let row = mna.extra_row(self.extra_index);
        match drive {
            OpampDrive::Linear => self.stamp_gain_row(mna, row),
            OpampDrive::Saturated(rail) => {
                if let Some(o) = self.output.matrix_index() {
                    mna.add_element(row, o, 1.0);
                }
                mna.add_rhs(row, rail);
            }
        }
    }

    /// Stamp the unclamped linear relation (AC and transient).
    pub fn stamp_linear(&self, mna: &mut MnaSystem) {
        self.stamp_common(mna);
        let row = mna.extra_row(self.extra_index);
        self.stamp_gain_row(mna, row);
    }

    /// Input impedance plus the output-current column shared by every drive.
    fn stamp_common(&self, mna: &mut MnaSystem) {
        mna.stamp_conductance(
            self.non_inverting.matrix_index(),
            self.inverting.matrix_index(),
            self.input_conductance,
        );
        let row = mna.extra_row(self.extra_index);
        if let Some(o) = self.output.matrix_index() {
            mna.add_element(o, row, 1.0);
        }
    }

    /// Constraint row V(out) - gain·V(+) + gain·V(-) = 0.
    fn stamp_gain_row(&self, mna: &mut MnaSystem, row: usize) {
        if let Some(o) = self.output.matrix_index() {
            mna.add_element(row, o, 1.0);
        }
        if let Some(p) = self.non_inverting.matrix_index() {
            mna.add_element(row, p, -self.gain);
        }
        if let Some(m) = self.inverting.matrix_index() {
            mna.add_element(row, m, self.gain);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opamp() -> Opamp {
        Opamp::new(NodeId::new(1), NodeId::new(2), NodeId::new(3), 0, 0.0, 0.0)
    }

    #[test]
    fn test_defaults() {
        let op = opamp();
        assert_eq!(op.gain, DEFAULT_GAIN);
        assert!((op.input_conductance - 1e-7).abs() < 1e-20);
    }

    #[test]
    fn test_drive_decision() {
        let op = opamp();
        assert_eq!(op.drive(0.0, 0.0), OpampDrive::Linear);
        assert_eq!(op.drive(1.0, 0.0), OpampDrive::Saturated(SUPPLY_RAIL));
        assert_eq!(op.drive(0.0, 1.0), OpampDrive::Saturated(-SUPPLY_RAIL));
        // 1e-4 across the inputs is exactly 10 V of target, inside the rails.
        assert_eq!(op.drive(1e-4, 0.0), OpampDrive::Linear);
    }

    #[test]
    fn test_linear_stamp() {
        let mut mna = MnaSystem::new(3, 1);
        let op = opamp();
        op.stamp_linear(&mut mna);

        // Input conductance between the inputs.
        assert!((mna.matrix()[(0, 0)] - 1e-7).abs() < 1e-20);
        assert!((mna.matrix()[(0, 1)] + 1e-7).abs() < 1e-20);
        // Output current column.
        assert_eq!(mna.matrix()[(2, 3)], 1.0);
        // Gain row.
        assert_eq!(mna.matrix()[(3, 2)], 1.0);
        assert_eq!(mna.matrix()[(3, 0)], -DEFAULT_GAIN);
        assert_eq!(mna.matrix()[(3, 1)], DEFAULT_GAIN);
        assert_eq!(mna.rhs()[3], 0.0);
    }

    #[test]
    fn test_saturated_stamp_pins_output() {
        let mut mna = MnaSystem::new(3, 1);
        let op = opamp();
        op.stamp_operating(&mut mna, OpampDrive::Saturated(-SUPPLY_RAIL));

        assert_eq!(mna.matrix()[(3, 2)], 1.0);
        assert_eq!(mna.matrix()[(3, 0)], 0.0);
        assert_eq!(mna.rhs()[3], -SUPPLY_RAIL);
        // The output column is stamped regardless of saturation.
        assert_eq!(mna.matrix()[(2, 3)], 1.0);
    }
}
