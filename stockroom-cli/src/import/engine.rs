//! Import reconciliation engine
//!
//! Holds the working set of rows coming out of ingestion, lets the operator
//! fix them up (category, location, quantity, technical specs, removal) and
//! then submits them one by one.
//!
//! ```text
//! Loading -> Ready -> Submitting -> Closed(Success | PartialFailure | Halted)
//!              ^          |
//!              +----------+  validation failure, before any network call
//! ```
//!
//! Submission is sequential in working-set order. Every row is attempted
//! unless one fails with the duplicate-code error, which stops the batch on
//! the spot. All failures are reported through the observer; none escape as
//! panics.

use async_trait::async_trait;

use crate::api::error::ApiError;
use crate::catalog::{CatalogSource, Catalogs};
use crate::ingest::IngestedRow;
use crate::notify::{ImportObserver, Severity};
use crate::session::SessionContext;

use super::error::ImportError;
use super::payload::{ItemPayload, build_payload};
use super::report::{BatchOutcome, BatchReport, RowFailure};
use super::row::{ImportRow, RowField, is_reserved_field};
use super::validation::validate_rows;

/// Persists one item
#[async_trait]
pub trait ItemSink: Send + Sync {
    /// Create the item, returning the server's confirmation message
    async fn create_item(&self, payload: &ItemPayload) -> Result<String, ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Success,
    PartialFailure,
    Halted,
    SessionExpired,
    CatalogLoad,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Loading,
    Ready,
    Submitting,
    Closed(CloseReason),
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineState::Loading => write!(f, "loading"),
            EngineState::Ready => write!(f, "ready"),
            EngineState::Submitting => write!(f, "submitting"),
            EngineState::Closed(reason) => write!(f, "closed ({:?})", reason),
        }
    }
}

pub struct ImportEngine<O: ImportObserver> {
    rows: Vec<ImportRow>,
    catalogs: Catalogs,
    state: EngineState,
    observer: O,
}

impl<O: ImportObserver> ImportEngine<O> {
    /// Start a session over the ingested rows and fetch the catalogs.
    ///
    /// If a catalog cannot be fetched the failure is reported through the
    /// observer and the engine comes back already closed.
    pub async fn open<S>(ingested: &[IngestedRow], source: &S, observer: O) -> Self
    where
        S: CatalogSource + ?Sized,
    {
        let rows = ingested.iter().map(ImportRow::from_ingested).collect();
        let mut engine = Self {
            rows,
            catalogs: Catalogs::default(),
            state: EngineState::Loading,
            observer,
        };

        match Catalogs::load(source).await {
            Ok(catalogs) => {
                engine.catalogs = catalogs;
                engine.state = EngineState::Ready;
                log::info!("Import session opened with {} rows", engine.rows.len());
            }
            Err(err) => {
                log::error!("Import session could not open: {}", err);
                engine
                    .observer
                    .alert(&format!("Error loading catalogs: {}", err), Severity::Error);
                engine.close(CloseReason::CatalogLoad);
            }
        }

        engine
    }

    /// Start a session with catalogs that were already fetched
    pub fn with_catalogs(rows: Vec<ImportRow>, catalogs: Catalogs, observer: O) -> Self {
        Self {
            rows,
            catalogs,
            state: EngineState::Ready,
            observer,
        }
    }

    pub fn rows(&self) -> &[ImportRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&ImportRow> {
        self.rows.get(index)
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, EngineState::Closed(_))
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    fn close(&mut self, reason: CloseReason) {
        self.state = EngineState::Closed(reason);
        self.observer.close();
    }

    fn editable_row(&mut self, index: usize) -> Result<&mut ImportRow, ImportError> {
        if self.state != EngineState::Ready {
            return Err(ImportError::InvalidState(self.state));
        }
        let len = self.rows.len();
        self.rows
            .get_mut(index)
            .ok_or(ImportError::RowOutOfRange { index, len })
    }

    /// Set a fixed field. Values are not checked until finalize.
    pub fn edit_field(&mut self, index: usize, field: RowField, value: &str) -> Result<(), ImportError> {
        let row = self.editable_row(index)?;
        row.set(field, value);
        Ok(())
    }

    /// Change the value of a technical spec already present on the row
    pub fn edit_spec_value(&mut self, index: usize, key: &str, value: &str) -> Result<(), ImportError> {
        let row = self.editable_row(index)?;
        if row.spec(key).is_none() {
            return Err(ImportError::UnknownField(key.to_string()));
        }
        row.insert_spec(key, value);
        Ok(())
    }

    /// Set a field by its wire name: a fixed field, or a spec on the row
    pub fn edit_field_by_name(&mut self, index: usize, name: &str, value: &str) -> Result<(), ImportError> {
        if let Ok(field) = name.parse::<RowField>() {
            return self.edit_field(index, field, value);
        }
        if is_reserved_field(name) {
            return Err(ImportError::ReadOnlyField(name.to_string()));
        }
        self.edit_spec_value(index, name, value)
    }

    /// Stage the technical spec to add next (`None` clears the selection)
    pub fn select_spec(&mut self, index: usize, spec_id: Option<i64>) -> Result<(), ImportError> {
        self.editable_row(index)?.pending.spec_id = spec_id;
        Ok(())
    }

    /// Stage the value for the technical spec to add next
    pub fn set_spec_value(&mut self, index: usize, value: &str) -> Result<(), ImportError> {
        self.editable_row(index)?.pending.value = value.to_string();
        Ok(())
    }

    /// Move the staged spec onto the row.
    ///
    /// Returns `Ok(false)` and warns the operator, leaving the row untouched,
    /// when no catalog spec is selected or the value is blank.
    pub fn add_spec_to_row(&mut self, index: usize) -> Result<bool, ImportError> {
        let catalogs = &self.catalogs;
        let observer = &mut self.observer;

        if self.state != EngineState::Ready {
            return Err(ImportError::InvalidState(self.state));
        }
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(ImportError::RowOutOfRange { index, len })?;

        let spec = row.pending.spec_id.and_then(|id| catalogs.spec(id));
        let value = row.pending.value.trim().to_string();

        let Some(spec) = spec else {
            observer.alert("Select a technical specification first.", Severity::Warning);
            return Ok(false);
        };
        if value.is_empty() {
            observer.alert(
                &format!("Enter a value for \"{}\".", spec.label),
                Severity::Warning,
            );
            return Ok(false);
        }
        if !row.insert_spec(&spec.label, &value) {
            observer.alert(
                &format!("\"{}\" cannot be used as a technical specification name.", spec.label),
                Severity::Warning,
            );
            return Ok(false);
        }

        log::debug!("Added spec '{}' to row {} ({})", spec.label, index, row.name());
        row.pending.clear();
        Ok(true)
    }

    /// Drop a row from the working set; there is no undo
    pub fn remove_row(&mut self, index: usize) -> Result<ImportRow, ImportError> {
        self.editable_row(index)?;
        Ok(self.rows.remove(index))
    }

    /// Drop one technical spec from a row
    pub fn remove_spec_field(&mut self, index: usize, key: &str) -> Result<Option<String>, ImportError> {
        let row = self.editable_row(index)?;
        Ok(row.remove_spec(key))
    }

    /// Close without importing anything
    pub fn cancel(&mut self) {
        if self.is_open() {
            self.close(CloseReason::Cancelled);
        }
    }

    /// Validate the working set and submit every row.
    ///
    /// Validation failures leave the engine `Ready` for correction and make
    /// no network call. A missing session closes the engine. Once submission
    /// begins the returned report describes what happened to each row.
    pub async fn finalize<S, K>(&mut self, session: &S, sink: &K) -> Result<BatchReport, ImportError>
    where
        S: SessionContext + ?Sized,
        K: ItemSink + ?Sized,
    {
        if self.state != EngineState::Ready {
            return Err(ImportError::InvalidState(self.state));
        }
        self.state = EngineState::Submitting;

        let Some(user_id) = session.user_id() else {
            log::warn!("Finalize attempted without a session");
            self.observer.alert(
                "Your session has expired. Please log in again.",
                Severity::Error,
            );
            self.close(CloseReason::SessionExpired);
            return Err(ImportError::SessionExpired);
        };

        if let Err(err) = validate_rows(&self.rows) {
            log::info!("Import blocked by validation: {}", err);
            self.observer.alert(&err.to_string(), Severity::Warning);
            self.state = EngineState::Ready;
            return Err(err.into());
        }

        let mut report = BatchReport::new(self.rows.len());
        log::info!("Submitting {} items", report.total);

        for (idx, row) in self.rows.iter().enumerate() {
            let position = idx + 1;

            let result = match build_payload(row, &self.catalogs, user_id) {
                Ok(payload) => sink.create_item(&payload).await,
                Err(err) => Err(ApiError::Rejected(err.to_string())),
            };

            match result {
                Ok(message) => {
                    log::info!("Created {} ({}): {}", row.name(), row.sap_code(), message);
                    report.created.push(row.name().to_string());
                }
                Err(err) => {
                    let duplicate_code = err.is_duplicate_code();
                    log::error!(
                        "Failed to create {} ({}), row {}: {}",
                        row.name(),
                        row.sap_code(),
                        position,
                        err
                    );

                    let message = if duplicate_code {
                        format!(
                            "Row {} (\"{}\"): SAP code {} is already in use. Import stopped; the remaining items were not submitted.",
                            position,
                            row.name(),
                            row.sap_code()
                        )
                    } else {
                        format!("Error creating \"{}\": {}", row.name(), err.detail())
                    };
                    self.observer.alert(&message, Severity::Error);

                    report.failed.push(RowFailure {
                        position,
                        name: row.name().to_string(),
                        sap_code: row.sap_code().to_string(),
                        detail: err.detail().to_string(),
                        duplicate_code,
                    });

                    if duplicate_code {
                        report.halted = true;
                        break;
                    }
                }
            }
        }

        match report.outcome() {
            BatchOutcome::Halted => {
                log::warn!("{}", report.summary());
                self.close(CloseReason::Halted);
            }
            BatchOutcome::PartialFailure => {
                log::warn!("{}", report.summary());
                self.observer.alert(&report.summary(), Severity::Warning);
                self.close(CloseReason::PartialFailure);
            }
            BatchOutcome::Success => {
                log::info!("{}", report.summary());
                self.observer.success(&report.summary());
                self.state = EngineState::Closed(CloseReason::Success);
            }
        }

        Ok(report)
    }
}
