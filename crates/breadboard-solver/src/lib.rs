//! Analysis engines for Breadboard.
//!
//! Three entry points, one per analysis the editor offers:
//!
//! - [`solve_circuit`] - operating point with interactive nonlinear devices
//! - [`solve_ac_sweep`] - small-signal magnitude response over a log grid
//! - [`solve_transient`] - fixed-step Backward Euler time-domain simulation
//!
//! Each takes the immutable circuit description (components plus wires) and
//! returns an [`AnalysisResult`](breadboard_core::AnalysisResult) that is
//! always well-formed; failures surface through its `error` field rather
//! than a Rust error.
//!
//! # Example
//!
//! ```rust
//! use breadboard_core::{Component, ComponentKind, Wire};
//! use breadboard_solver::solve_circuit;
//!
//! // 10V across a 1k/1k divider to ground.
//! let components = vec![
//!     Component::new("v1", ComponentKind::VoltageSource, 10.0),
//!     Component::new("r1", ComponentKind::Resistor, 1000.0),
//!     Component::new("r2", ComponentKind::Resistor, 1000.0),
//!     Component::new("gnd", ComponentKind::Ground, 0.0),
//! ];
//! let wires = vec![
//!     Wire::between(("v1", 0), ("r1", 0)),
//!     Wire::between(("r1", 1), ("r2", 0)),
//!     Wire::between(("r2", 1), ("gnd", 0)),
//!     Wire::between(("v1", 1), ("gnd", 0)),
//! ];
//!
//! let result = solve_circuit(&components, &wires, 0.0);
//! assert!(result.is_ok());
//! // The node between the resistors sits at half the supply.
//! let graph = breadboard_core::build_graph(&components, &wires);
//! let mid = graph.node_of("r1", 1).unwrap();
//! assert!((result.voltage(mid) - 5.0).abs() < 1e-9);
//! ```

pub mod ac;
pub mod dc;
pub mod error;
mod extra;
pub mod linear;
pub mod transient;

pub use ac::{solve_ac_sweep, sweep_frequencies, AcSweepConfig, ComplexMna};
pub use dc::{solve_circuit, CONVERGENCE_TOLERANCE, MAX_ITERATIONS};
pub use error::{Error, Result};
pub use linear::{solve_complex, solve_dense, PIVOT_TOLERANCE};
pub use transient::{solve_transient, TransientConfig};
