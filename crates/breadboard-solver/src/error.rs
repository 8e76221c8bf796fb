//! Error types for breadboard-solver.
//!
//! The engine entry points never propagate these across the public surface;
//! they render them into `AnalysisResult::error` so the host always receives
//! a well-formed result. The display strings below are the exact diagnostics
//! the editor shows.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Singular matrix")]
    SingularMatrix,

    #[error("No Ground (GND) found.")]
    MissingGround,

    #[error("time step must be positive")]
    InvalidTimeStep,

    #[error("invalid matrix dimensions: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
