//! # Breadboard
//!
//! The circuit simulation core behind an interactive schematic editor.
//!
//! The editor hands over an immutable circuit description (placed components
//! plus point-to-point wires) and gets back node voltages, branch currents
//! and plot traces. Three analyses are available:
//!
//! - Operating point with interactive nonlinear devices (diodes, LEDs,
//!   rail-clamped op-amps, combinational logic gates)
//! - AC small-signal magnitude sweep over a log-spaced frequency grid
//! - Transient simulation with Backward Euler companion models and
//!   arbitrary source waveforms
//!
//! ## Quick start
//!
//! ```rust
//! use breadboard::prelude::*;
//!
//! // V1 = 10V across R1 = 100 ohms to ground.
//! let components = vec![
//!     Component::new("v1", ComponentKind::VoltageSource, 10.0),
//!     Component::new("r1", ComponentKind::Resistor, 100.0),
//!     Component::new("gnd", ComponentKind::Ground, 0.0),
//! ];
//! let wires = vec![
//!     Wire::between(("v1", 0), ("r1", 0)),
//!     Wire::between(("r1", 1), ("gnd", 0)),
//!     Wire::between(("v1", 1), ("gnd", 0)),
//! ];
//!
//! let result = solve_circuit(&components, &wires, 0.0);
//! assert!(result.is_ok());
//! assert!((result.current("r1") - 0.1).abs() < 1e-9);
//! ```

// Re-export the member crates.
pub use breadboard_core as core;
pub use breadboard_devices as devices;
pub use breadboard_solver as solver;

// Circuit description and results.
pub use breadboard_core::{
    build_graph, parse_preset, AnalysisMode, AnalysisResult, Component, ComponentKind, Graph,
    NodeId, NodeSnapshot, Phasor, PlotPoint, PortKey, Preset, WaveformKind, Wire,
};

// MNA system.
pub use breadboard_core::mna::MnaSystem;

// Device models.
pub use breadboard_devices::{
    Ammeter, Capacitor, Diode, GateKind, Inductor, LogicGate, Opamp, OpampDrive, Resistor,
    SourceWaveform, Stamp, VoltageSource, Voltmeter,
};

// Engines.
pub use breadboard_solver::{
    solve_ac_sweep, solve_circuit, solve_complex, solve_dense, solve_transient, AcSweepConfig,
    ComplexMna, TransientConfig,
};

/// Re-export of nalgebra's dynamic vector type.
pub use nalgebra::DVector;

/// Re-export of nalgebra's dynamic matrix type.
pub use nalgebra::DMatrix;

/// Re-export of num_complex's Complex type.
pub use num_complex::Complex;

/// Prelude module containing commonly used types and functions.
///
/// ```rust
/// use breadboard::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        build_graph, solve_ac_sweep, solve_circuit, solve_transient, AcSweepConfig,
        AnalysisMode, AnalysisResult, Component, ComponentKind, NodeId, TransientConfig,
        WaveformKind, Wire,
    };

    pub use crate::{Complex, DMatrix, DVector};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_preset_roundtrip_to_solve() {
        let json = r#"{
            "components": [
                {"id": "v1", "type": "VOLTAGE_SOURCE", "value": 10, "position": {"x": 0, "y": 0}},
                {"id": "r1", "type": "RESISTOR", "value": "1k"},
                {"id": "r2", "type": "RESISTOR", "value": "1k"},
                {"id": "gnd", "type": "GROUND"}
            ],
            "wires": [
                {"from": {"componentId": "v1", "portIndex": 0}, "to": {"componentId": "r1", "portIndex": 0}},
                {"from": {"componentId": "r1", "portIndex": 1}, "to": {"componentId": "r2", "portIndex": 0}},
                {"from": {"componentId": "r2", "portIndex": 1}, "to": {"componentId": "gnd", "portIndex": 0}},
                {"from": {"componentId": "v1", "portIndex": 1}, "to": {"componentId": "gnd", "portIndex": 0}}
            ]
        }"#;

        let (components, wires) = crate::parse_preset(json).unwrap();
        let result = solve_circuit(&components, &wires, 0.0);

        assert!(result.is_ok());
        let graph = build_graph(&components, &wires);
        let mid = graph.node_of("r1", 1).unwrap();
        assert!((result.voltage(mid) - 5.0).abs() < 1e-9);
    }
}
