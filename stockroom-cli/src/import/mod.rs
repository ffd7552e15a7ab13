//! Bulk import reconciliation
//!
//! Rows from ingestion are loaded into an [`ImportEngine`], corrected by the
//! operator, validated as a whole and then submitted one at a time.

pub mod engine;
pub mod error;
pub mod export;
pub mod payload;
pub mod report;
pub mod row;
pub mod validation;

pub use engine::{CloseReason, EngineState, ImportEngine, ItemSink};
pub use error::ImportError;
pub use export::write_report_xlsx;
pub use payload::{ItemPayload, PayloadError, build_payload};
pub use report::{BatchOutcome, BatchReport, RowFailure};
pub use row::{ImportRow, PendingSpec, RESERVED_FIELD_NAMES, RowField};
pub use validation::{ValidationError, validate_rows};
