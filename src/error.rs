//! Error taxonomy of the engine.
//!
//! Every failure is classified at its source; callers report the message and
//! exit nonzero without reclassifying. Configuration errors carry the exact
//! option wording shown to the user.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid or conflicting command-line parameters.
    #[error("{0}")]
    Configuration(String),

    /// A stated resource limit cannot support the requested run.
    #[error("{0}")]
    Resource(String),

    /// Input data violates a documented constraint.
    #[error("{0}")]
    Data(String),

    /// An internal cross-check failed; never a user error.
    #[error("internal consistency check failed: {0}")]
    InternalConsistency(String),
}

impl EngineError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        EngineError::Configuration(msg.into())
    }

    pub fn resource(msg: impl Into<String>) -> Self {
        EngineError::Resource(msg.into())
    }

    pub fn data(msg: impl Into<String>) -> Self {
        EngineError::Data(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        EngineError::InternalConsistency(msg.into())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
