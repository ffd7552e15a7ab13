//! Errors raised by the import engine

use super::engine::EngineState;
use super::validation::ValidationError;

#[derive(Debug, Clone, PartialEq)]
pub enum ImportError {
    /// No row at this index
    RowOutOfRange { index: usize, len: usize },
    /// The operation is not allowed in the engine's current state
    InvalidState(EngineState),
    /// Field name that is neither a fixed field nor a spec on the row
    UnknownField(String),
    /// `name` and `sapCode` come from the spreadsheet and cannot change
    ReadOnlyField(String),
    /// Pre-submission check failed; the engine stays open for correction
    Validation(ValidationError),
    /// No session identity at finalize time; the engine closed
    SessionExpired,
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::RowOutOfRange { index, len } => {
                write!(f, "row {} does not exist ({} rows)", index, len)
            }
            ImportError::InvalidState(state) => {
                write!(f, "operation not allowed while the import is {}", state)
            }
            ImportError::UnknownField(name) => write!(f, "unknown field '{}'", name),
            ImportError::ReadOnlyField(name) => write!(f, "field '{}' is read-only", name),
            ImportError::Validation(err) => write!(f, "{}", err),
            ImportError::SessionExpired => {
                write!(f, "your session has expired, log in again")
            }
        }
    }
}

impl std::error::Error for ImportError {}

impl From<ValidationError> for ImportError {
    fn from(err: ValidationError) -> Self {
        ImportError::Validation(err)
    }
}
