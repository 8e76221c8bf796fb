//! Device models and MNA stamps for Breadboard.
//!
//! This crate provides the per-component stamp models the engines apply:
//! - Passive elements: R, C, L and the voltmeter probe
//! - Sources: independent voltage/AC sources and the ammeter
//! - Nonlinear devices: threshold-companion diode/LED
//! - The rail-clamped ideal op-amp
//! - Combinational logic gates
//! - Source waveform evaluation for transient analysis

pub mod logic;
pub mod nonlinear;
pub mod opamp;
pub mod passive;
pub mod sources;
pub mod stamp;
pub mod waveforms;

pub use logic::{GateKind, LogicGate};
pub use nonlinear::Diode;
pub use opamp::{Opamp, OpampDrive};
pub use passive::{Capacitor, Inductor, Resistor, Voltmeter};
pub use sources::{Ammeter, VoltageSource};
pub use stamp::Stamp;
pub use waveforms::SourceWaveform;
