//! Shared error type across flakyhello crates.

use thiserror::Error;

/// Message carried by every simulated failure.
pub const SIMULATED_FAILURE_MESSAGE: &str = "Simulated random error for testing";

/// Stable error codes, independent of the Display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input (config files included).
    BadRequest,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Deliberate, randomized failure.
    SimulatedFailure,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::SimulatedFailure => "SIMULATED_FAILURE",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, HelloError>;

#[derive(Debug, Error)]
pub enum HelloError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("{}", SIMULATED_FAILURE_MESSAGE)]
    SimulatedFailure,
    #[error("internal: {0}")]
    Internal(String),
}

impl HelloError {
    pub fn client_code(&self) -> ClientCode {
        match self {
            HelloError::BadRequest(_) => ClientCode::BadRequest,
            HelloError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            HelloError::SimulatedFailure => ClientCode::SimulatedFailure,
            HelloError::Internal(_) => ClientCode::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_failure_displays_fixed_message() {
        let err = HelloError::SimulatedFailure;
        assert_eq!(err.to_string(), "Simulated random error for testing");
        assert_eq!(err.client_code().as_str(), "SIMULATED_FAILURE");
    }
}
