//! Outcome of a finalize run

/// One row the server (or payload building) refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    /// 1-based position in the working set
    pub position: usize,
    pub name: String,
    pub sap_code: String,
    pub detail: String,
    /// The failure was the batch-halting "code already in use" error
    pub duplicate_code: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    Success,
    PartialFailure,
    Halted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Rows in the working set when submission started
    pub total: usize,
    /// Names of the rows created, in submission order
    pub created: Vec<String>,
    pub failed: Vec<RowFailure>,
    /// Submission stopped early on a duplicate code
    pub halted: bool,
}

impl BatchReport {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn outcome(&self) -> BatchOutcome {
        if self.halted {
            BatchOutcome::Halted
        } else if !self.failed.is_empty() {
            BatchOutcome::PartialFailure
        } else {
            BatchOutcome::Success
        }
    }

    /// Rows for which a result was recorded
    pub fn attempted(&self) -> usize {
        self.created.len() + self.failed.len()
    }

    /// Rows never submitted because the batch halted
    pub fn skipped(&self) -> usize {
        self.total.saturating_sub(self.attempted())
    }

    pub fn summary(&self) -> String {
        match self.outcome() {
            BatchOutcome::Success => {
                format!("{} items imported successfully.", self.created.len())
            }
            BatchOutcome::PartialFailure => format!(
                "{} of {} items imported, {} failed. Review the failed items and try again.",
                self.created.len(),
                self.total,
                self.failed.len()
            ),
            BatchOutcome::Halted => format!(
                "Import stopped: {} created, {} failed, {} not submitted.",
                self.created.len(),
                self.failed.len(),
                self.skipped()
            ),
        }
    }
}
