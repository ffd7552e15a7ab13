//! Pre-submission checks
//!
//! Run in a fixed order before any network call: category assignment, an
//! empty working set, required text, then quantity. The first failure wins.

use super::row::{ImportRow, RowField};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Some rows have no category; `first` names the first of them
    MissingCategory { count: usize, first: String },
    /// Nothing left to import
    NoRows,
    /// A required text field is blank (`position` is 1-based)
    MissingText {
        position: usize,
        name: String,
        field: RowField,
    },
    /// Quantity is not a number greater than zero
    InvalidQuantity {
        position: usize,
        name: String,
        value: String,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingCategory { count, first } => {
                if *count == 1 {
                    write!(
                        f,
                        "\"{}\" is missing a category. Assign a category before importing.",
                        first
                    )
                } else {
                    write!(
                        f,
                        "{} items are missing a category (first: \"{}\"). Assign a category before importing.",
                        count, first
                    )
                }
            }
            ValidationError::NoRows => write!(f, "There are no items to import."),
            ValidationError::MissingText {
                position,
                name,
                field,
            } => write!(f, "Row {} (\"{}\"): {} is required.", position, name, field),
            ValidationError::InvalidQuantity {
                position,
                name,
                value,
            } => write!(
                f,
                "Row {} (\"{}\"): quantity must be a number greater than 0 (got \"{}\").",
                position, name, value
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Parse a quantity; only finite numbers greater than zero are accepted
pub fn parse_quantity(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|q| q.is_finite() && *q > 0.0)
}

/// Check every row of the working set
pub fn validate_rows(rows: &[ImportRow]) -> Result<(), ValidationError> {
    let missing_category: Vec<&ImportRow> =
        rows.iter().filter(|r| r.is_missing_category()).collect();
    if let Some(first) = missing_category.first() {
        return Err(ValidationError::MissingCategory {
            count: missing_category.len(),
            first: first.name().to_string(),
        });
    }

    if rows.is_empty() {
        return Err(ValidationError::NoRows);
    }

    for (idx, row) in rows.iter().enumerate() {
        for field in [RowField::Brand, RowField::Description] {
            if row.get(field).trim().is_empty() {
                return Err(ValidationError::MissingText {
                    position: idx + 1,
                    name: row.name().to_string(),
                    field,
                });
            }
        }
    }

    for (idx, row) in rows.iter().enumerate() {
        if parse_quantity(row.get(RowField::Quantity)).is_none() {
            return Err(ValidationError::InvalidQuantity {
                position: idx + 1,
                name: row.name().to_string(),
                value: row.get(RowField::Quantity).to_string(),
            });
        }
    }

    Ok(())
}
