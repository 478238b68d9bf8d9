//! Error types for the Pliant engine.
//!
//! All crates return `PliantResult<T>` from fallible operations.
//! Per-frame solve paths never construct these — degenerate geometry is
//! skipped locally so a step always completes.

use thiserror::Error;

/// Unified error type for the Pliant engine.
#[derive(Debug, Error)]
pub enum PliantError {
    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Configuration value is out of valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A model was used before `initialize()` succeeded.
    #[error("Model not initialized: {0}")]
    NotInitialized(String),

    /// Material parameter is out of valid range.
    #[error("Invalid material parameter: {0}")]
    InvalidMaterial(String),

    /// The task graph contains a cycle or a dangling edge.
    #[error("Invalid task graph: {0}")]
    InvalidGraph(String),
}

/// Convenience alias for `Result<T, PliantError>`.
pub type PliantResult<T> = Result<T, PliantError>;
