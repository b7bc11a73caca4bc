//! Error types for the Aurora3D engine
//!
//! Every fallible operation of the renderer core returns [`Result`]. Errors are
//! never retried: callers either fix their usage (bind before draw, valid
//! strategy names) or abort the frame.

use std::fmt;

/// Result type for Aurora3D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Aurora3D engine errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Unknown strategy name, duplicate registry or material name
    ConfigurationError(String),

    /// Operation used before bind, after destroy, or an invalid graph edit
    InvalidState(String),

    /// Internal invariant broken (e.g. a draw command pointing at a dead node)
    ProgrammingError(String),

    /// Shader compile or link failure reported by the graphics context
    ShaderCompilation(String),

    /// Malformed resource data (mesh buffers, texture pixels)
    InvalidResource(String),

    /// Any other failure reported by the graphics context
    BackendError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            Error::ProgrammingError(msg) => write!(f, "Programming error: {}", msg),
            Error::ShaderCompilation(msg) => write!(f, "Shader compilation failed: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
