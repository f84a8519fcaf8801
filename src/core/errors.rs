/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 *
 * Engine operations are total and never fail; errors only come from the
 * surfaces around it (name parsing, configuration, driver channel).
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Simulator errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SimError {
    #[error("Invalid scheduling policy: {0}")]
    #[diagnostic(
        code(scheduler::invalid_policy),
        help("Use one of: fcfs, sjf, rr, priority.")
    )]
    InvalidPolicy(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(config::invalid),
        help("Review SIM_* environment variables or the JSON config file.")
    )]
    Configuration(String),

    #[error("I/O error: {0}")]
    #[diagnostic(
        code(config::io_error),
        help("Check that the config file exists and is readable.")
    )]
    Io(String),

    #[error("Simulation task unavailable: {0}")]
    #[diagnostic(
        code(driver::unavailable),
        help("The driver task has shut down. Spawn a new SimulationTask.")
    )]
    DriverUnavailable(String),
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        SimError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = SimError::InvalidPolicy("lottery".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("invalid_policy"));
        assert!(json.contains("lottery"));

        let back: SimError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: SimError = io.into();
        assert!(matches!(err, SimError::Io(ref msg) if msg.contains("missing.json")));
    }
}
