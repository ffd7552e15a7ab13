//! Item-creation payloads
//!
//! Turns a validated row into the body of `POST /items`: technical specs are
//! keyed by catalog id instead of name, numbers are coerced from the raw
//! text the operator edited.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Number;
use std::collections::BTreeMap;

use crate::catalog::Catalogs;

use super::row::{ImportRow, RowField};
use super::validation::parse_quantity;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    pub sap_code: String,
    pub name: String,
    pub brand: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_stock: Option<Number>,
    pub quantity: Number,
    pub fk_id_category: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fk_id_location: Option<i64>,
    pub fk_id_user: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    /// Spec id -> value; omitted entirely when there are none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_specs: Option<BTreeMap<String, String>>,
}

/// A row that passed validation but still cannot be turned into a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    InvalidId { field: RowField, value: String },
    InvalidQuantity(String),
}

impl std::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadError::InvalidId { field, value } => {
                write!(f, "{} id '{}' is not a valid id", field, value)
            }
            PayloadError::InvalidQuantity(value) => {
                write!(f, "quantity '{}' is not a positive number", value)
            }
        }
    }
}

impl std::error::Error for PayloadError {}

/// Integral values are sent as integers, everything else as floats
fn to_number(value: f64) -> Option<Number> {
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        Some(Number::from(value as i64))
    } else {
        Number::from_f64(value)
    }
}

fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Day-first and ISO dates become `YYYY-MM-DD`; anything else is passed
/// through for the server to judge
fn normalize_date(raw: &str) -> Option<String> {
    let raw = optional_text(raw)?;
    let date_part = raw.split(['T', ' ']).next().unwrap_or(raw.as_str());
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, format) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }
    log::warn!("Unrecognised expiration date '{}', sending as entered", raw);
    Some(raw)
}

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

fn parse_id(row: &ImportRow, field: RowField) -> Result<Option<i64>, PayloadError> {
    match optional_text(row.get(field)) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<i64>()
            .map(Some)
            .map_err(|_| PayloadError::InvalidId { field, value: raw }),
    }
}

/// Build the creation payload for `row` on behalf of `user_id`
pub fn build_payload(
    row: &ImportRow,
    catalogs: &Catalogs,
    user_id: i64,
) -> Result<ItemPayload, PayloadError> {
    let quantity_raw = row.get(RowField::Quantity);
    let quantity = parse_quantity(quantity_raw)
        .and_then(to_number)
        .ok_or_else(|| PayloadError::InvalidQuantity(quantity_raw.to_string()))?;

    let fk_id_category = parse_id(row, RowField::Category)?.ok_or_else(|| {
        PayloadError::InvalidId {
            field: RowField::Category,
            value: String::new(),
        }
    })?;
    let fk_id_location = parse_id(row, RowField::Location)?;

    let minimum_stock = match optional_text(row.get(RowField::MinimumStock)) {
        None => None,
        Some(raw) => match raw.parse::<f64>().ok().filter(|v| v.is_finite()) {
            Some(value) => to_number(value),
            None => {
                log::warn!(
                    "Ignoring non-numeric minimum stock '{}' for {}",
                    raw,
                    row.name()
                );
                None
            }
        },
    };

    let mut technical_specs = BTreeMap::new();
    for (key, value) in row.specs() {
        match catalogs.spec_by_key(key) {
            Some(spec) => {
                technical_specs.insert(spec.id.to_string(), value.clone());
            }
            None => {
                log::warn!(
                    "Dropping technical spec '{}' from {}: not in the catalog",
                    key,
                    row.name()
                );
            }
        }
    }

    Ok(ItemPayload {
        sap_code: row.sap_code().trim().to_string(),
        name: row.name().trim().to_string(),
        brand: row.get(RowField::Brand).trim().to_string(),
        description: row.get(RowField::Description).trim().to_string(),
        minimum_stock,
        quantity,
        fk_id_category,
        fk_id_location,
        fk_id_user: user_id,
        expiration_date: normalize_date(row.get(RowField::ExpirationDate)),
        technical_specs: if technical_specs.is_empty() {
            None
        } else {
            Some(technical_specs)
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::CatalogEntry;
    use serde_json::json;

    fn catalogs() -> Catalogs {
        Catalogs::new(
            vec![CatalogEntry::new(1, "Power tools")],
            vec![CatalogEntry::new(10, "Warehouse A")],
            vec![CatalogEntry::new(100, "Voltage"), CatalogEntry::new(101, "Weight")],
        )
    }

    fn drill() -> ImportRow {
        ImportRow::new("Drill", "A1")
            .with(RowField::Brand, " Bosch ")
            .with(RowField::Description, "Hand drill")
            .with(RowField::Quantity, "5")
            .with(RowField::Category, "1")
    }

    #[test]
    fn test_minimal_payload_omits_optional_fields() {
        let payload = build_payload(&drill(), &catalogs(), 7).unwrap();
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "sapCode": "A1",
                "name": "Drill",
                "brand": "Bosch",
                "description": "Hand drill",
                "quantity": 5,
                "fkIdCategory": 1,
                "fkIdUser": 7
            })
        );
    }

    #[test]
    fn test_full_payload() {
        let row = drill()
            .with(RowField::Quantity, "2.5")
            .with(RowField::MinimumStock, "1")
            .with(RowField::Location, "10")
            .with(RowField::ExpirationDate, "2026-12-31")
            .with_spec("Voltage", "18V")
            .with_spec("weight", "1.2kg");

        let payload = build_payload(&row, &catalogs(), 7).unwrap();
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["quantity"], json!(2.5));
        assert_eq!(value["minimumStock"], json!(1));
        assert_eq!(value["fkIdLocation"], json!(10));
        assert_eq!(value["expirationDate"], json!("2026-12-31"));
        assert_eq!(
            value["technicalSpecs"],
            json!({"100": "18V", "101": "1.2kg"})
        );
    }

    #[test]
    fn test_unknown_specs_are_dropped() {
        let row = drill().with_spec("Amperage", "2A");
        let payload = build_payload(&row, &catalogs(), 7).unwrap();
        assert_eq!(payload.technical_specs, None);
    }

    #[test]
    fn test_non_numeric_minimum_stock_is_ignored() {
        let row = drill().with(RowField::MinimumStock, "a few");
        let payload = build_payload(&row, &catalogs(), 7).unwrap();
        assert_eq!(payload.minimum_stock, None);
    }

    #[test]
    fn test_expiration_dates_are_normalized() {
        assert_eq!(normalize_date("31/12/2026").as_deref(), Some("2026-12-31"));
        assert_eq!(normalize_date("2026-12-31T00:00:00").as_deref(), Some("2026-12-31"));
        assert_eq!(normalize_date(" next spring ").as_deref(), Some("next spring"));
        assert_eq!(normalize_date("  "), None);
    }

    #[test]
    fn test_non_numeric_ids_fail() {
        let row = drill().with(RowField::Category, "tools");
        assert_eq!(
            build_payload(&row, &catalogs(), 7),
            Err(PayloadError::InvalidId {
                field: RowField::Category,
                value: "tools".to_string()
            })
        );

        let row = drill().with(RowField::Location, "shelf 3");
        assert!(build_payload(&row, &catalogs(), 7).is_err());
    }
}
