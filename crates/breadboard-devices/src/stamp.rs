//! MNA stamping trait.

use breadboard_core::mna::MnaSystem;

/// Trait for devices whose contribution does not depend on the iterate.
///
/// The device adds its conductance/coefficient contributions to the matrix
/// and its source contributions to the RHS vector. Devices that linearize
/// around the current iterate (diodes, op-amps, gates) expose inherent
/// methods taking the extra state instead.
pub trait Stamp {
    fn stamp(&self, mna: &mut MnaSystem);
}
