//! Core circuit representation and MNA matrix structures for Breadboard.
//!
//! This crate holds the data the schematic editor hands to the simulation
//! engines and everything the engines share:
//!
//! - [`Component`]/[`Wire`] - the immutable circuit description
//! - [`graph::build_graph`] - wire connectivity to numbered electrical nodes
//! - [`mna::MnaSystem`] - the real MNA matrix equation G·x = b
//! - [`AnalysisResult`] - the host-facing outcome of a solve
//! - [`preset`] - the editor's saved-document (JSON) format
//!
//! # Nodes
//!
//! The graph builder collapses wire-connected ports into integer node ids.
//! Ground is always node 0 and is absent from the matrix; node n occupies
//! matrix row n-1:
//!
//! ```rust
//! use breadboard_core::NodeId;
//!
//! assert!(NodeId::GROUND.is_ground());
//! assert_eq!(NodeId::new(3).matrix_index(), Some(2));
//! assert_eq!(NodeId::GROUND.matrix_index(), None);
//! ```

pub mod component;
pub mod error;
pub mod graph;
pub mod mna;
pub mod node;
pub mod preset;
pub mod result;
pub mod units;

pub use component::{Component, ComponentKind, PortKey, WaveformKind, Wire};
pub use error::{Error, Result};
pub use graph::{build_graph, Graph};
pub use node::NodeId;
pub use preset::{parse_preset, Preset};
pub use result::{AnalysisMode, AnalysisResult, NodeSnapshot, Phasor, PlotPoint};
