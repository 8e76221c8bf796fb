//! Error types for breadboard-core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid preset: {0}")]
    InvalidPreset(String),

    #[error("unparseable value {value:?} on component {id}")]
    BadValue { id: String, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
