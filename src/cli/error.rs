//! CLI-level errors (wraps infrastructure errors)

use std::io::ErrorKind;

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::NoElements(_)
                    | ApplicationError::MarkupRequired(_)
                    | ApplicationError::Serialization(_) => crate::exitcode::DATAERR,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::OperationFailed { source, .. } => {
                        match source.downcast_ref::<std::io::Error>().map(|e| e.kind()) {
                            Some(ErrorKind::NotFound) => crate::exitcode::NOINPUT,
                            _ => crate::exitcode::IOERR,
                        }
                    }
                    ApplicationError::Domain(_) => crate::exitcode::SOFTWARE,
                },
            },
        }
    }
}
