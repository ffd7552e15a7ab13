//! Rows of an import working set
//!
//! Fixed fields and technical-specification values are stored apart, so a
//! spec named like a fixed field can never shadow it. The "missing category"
//! flag is computed from the values and "edited" from the set of fields
//! touched since ingestion; neither is stored.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use crate::ingest::IngestedRow;

/// Names that can never be used as technical-specification keys
pub const RESERVED_FIELD_NAMES: &[&str] = &[
    "id",
    "name",
    "sapCode",
    "brand",
    "description",
    "minimumStock",
    "quantity",
    "expirationDate",
    "fkIdCategory",
    "fkIdLocation",
    "fkIdUser",
    "technicalSpecs",
    "isEdited",
    "isMissingCategory",
    "tempSelectedSpecId",
    "tempSpecValue",
];

pub fn is_reserved_field(key: &str) -> bool {
    let key = key.trim();
    RESERVED_FIELD_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(key))
}

/// Editable fixed fields of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowField {
    Brand,
    Description,
    MinimumStock,
    Quantity,
    ExpirationDate,
    Category,
    Location,
}

impl RowField {
    pub const ALL: [RowField; 7] = [
        RowField::Brand,
        RowField::Description,
        RowField::MinimumStock,
        RowField::Quantity,
        RowField::ExpirationDate,
        RowField::Category,
        RowField::Location,
    ];

    /// Field name on the wire and in ingested rows
    pub fn wire_name(&self) -> &'static str {
        match self {
            RowField::Brand => "brand",
            RowField::Description => "description",
            RowField::MinimumStock => "minimumStock",
            RowField::Quantity => "quantity",
            RowField::ExpirationDate => "expirationDate",
            RowField::Category => "fkIdCategory",
            RowField::Location => "fkIdLocation",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RowField::Brand => "brand",
            RowField::Description => "description",
            RowField::MinimumStock => "minimum stock",
            RowField::Quantity => "quantity",
            RowField::ExpirationDate => "expiration date",
            RowField::Category => "category",
            RowField::Location => "location",
        }
    }
}

impl std::fmt::Display for RowField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for RowField {
    type Err = String;

    /// Accepts the wire name ("fkIdCategory") or the label ("category")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        RowField::ALL
            .into_iter()
            .find(|f| f.wire_name().eq_ignore_ascii_case(s) || f.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| s.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct FieldValues {
    brand: String,
    description: String,
    minimum_stock: String,
    quantity: String,
    expiration_date: String,
    category: String,
    location: String,
}

impl FieldValues {
    fn get(&self, field: RowField) -> &str {
        match field {
            RowField::Brand => &self.brand,
            RowField::Description => &self.description,
            RowField::MinimumStock => &self.minimum_stock,
            RowField::Quantity => &self.quantity,
            RowField::ExpirationDate => &self.expiration_date,
            RowField::Category => &self.category,
            RowField::Location => &self.location,
        }
    }

    fn slot(&mut self, field: RowField) -> &mut String {
        match field {
            RowField::Brand => &mut self.brand,
            RowField::Description => &mut self.description,
            RowField::MinimumStock => &mut self.minimum_stock,
            RowField::Quantity => &mut self.quantity,
            RowField::ExpirationDate => &mut self.expiration_date,
            RowField::Category => &mut self.category,
            RowField::Location => &mut self.location,
        }
    }
}

/// Staging area for adding one technical spec at a time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingSpec {
    pub spec_id: Option<i64>,
    pub value: String,
}

impl PendingSpec {
    pub fn clear(&mut self) {
        self.spec_id = None;
        self.value.clear();
    }
}

/// One candidate item pending import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    name: String,
    sap_code: String,
    values: FieldValues,
    specs: BTreeMap<String, String>,
    touched: BTreeSet<String>,
    pub(crate) pending: PendingSpec,
}

impl ImportRow {
    pub fn new(name: impl Into<String>, sap_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sap_code: sap_code.into(),
            values: FieldValues::default(),
            specs: BTreeMap::new(),
            touched: BTreeSet::new(),
            pending: PendingSpec::default(),
        }
    }

    /// Seed a field while building the row; counts as ingested data
    pub fn with(mut self, field: RowField, value: impl Into<String>) -> Self {
        *self.values.slot(field) = value.into();
        self
    }

    /// Seed a technical spec while building the row. Reserved keys are ignored.
    pub fn with_spec(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        if is_reserved_field(&key) {
            log::warn!("Ignoring reserved column '{}' as a technical spec", key);
            return self;
        }
        self.specs.insert(key, value.into());
        self
    }

    /// Build a row from ingestion output. Known keys fill the fixed fields;
    /// every other non-blank, non-reserved key becomes a technical spec.
    pub fn from_ingested(source: &IngestedRow) -> Self {
        let mut row = ImportRow::new(
            source.text("name").unwrap_or_default(),
            source.text("sapCode").unwrap_or_default(),
        );

        for field in RowField::ALL {
            if let Some(value) = source.text(field.wire_name()) {
                row = row.with(field, value);
            }
        }

        for key in source.keys() {
            if is_reserved_field(key) {
                continue;
            }
            if let Some(value) = source.text(key) {
                row = row.with_spec(key, value);
            }
        }

        row
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sap_code(&self) -> &str {
        &self.sap_code
    }

    pub fn get(&self, field: RowField) -> &str {
        self.values.get(field)
    }

    pub(crate) fn set(&mut self, field: RowField, value: &str) {
        *self.values.slot(field) = value.to_string();
        self.touched.insert(field.wire_name().to_string());
    }

    pub fn specs(&self) -> &BTreeMap<String, String> {
        &self.specs
    }

    pub fn spec(&self, key: &str) -> Option<&str> {
        self.specs.get(key).map(|v| v.as_str())
    }

    /// Insert or replace a technical spec. Returns false for reserved keys.
    pub(crate) fn insert_spec(&mut self, key: &str, value: &str) -> bool {
        if is_reserved_field(key) {
            return false;
        }
        self.specs.insert(key.to_string(), value.to_string());
        self.touched.insert(key.to_string());
        true
    }

    pub(crate) fn remove_spec(&mut self, key: &str) -> Option<String> {
        let removed = self.specs.remove(key);
        if removed.is_some() {
            self.touched.insert(key.to_string());
        }
        removed
    }

    pub fn pending_spec(&self) -> &PendingSpec {
        &self.pending
    }

    pub fn is_missing_category(&self) -> bool {
        self.values.category.trim().is_empty()
    }

    /// True once any field or spec has been set or removed since ingestion,
    /// even if it was set back to the ingested value
    pub fn is_edited(&self) -> bool {
        !self.touched.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_field_from_str() {
        assert_eq!("fkIdCategory".parse::<RowField>(), Ok(RowField::Category));
        assert_eq!("category".parse::<RowField>(), Ok(RowField::Category));
        assert_eq!("Minimum Stock".parse::<RowField>(), Ok(RowField::MinimumStock));
        assert_eq!("QUANTITY".parse::<RowField>(), Ok(RowField::Quantity));
        assert_eq!("name".parse::<RowField>(), Err("name".to_string()));
    }

    #[test]
    fn test_reserved_names() {
        assert!(is_reserved_field("sapCode"));
        assert!(is_reserved_field(" Quantity "));
        assert!(is_reserved_field("technicalspecs"));
        assert!(!is_reserved_field("Voltage"));
    }

    #[test]
    fn test_from_ingested_splits_fixed_and_dynamic() {
        let source = IngestedRow::new()
            .with("name", "Drill")
            .with("sapCode", "A1")
            .with("brand", "Bosch")
            .with("quantity", json!(5))
            .with("fkIdCategory", json!(2))
            .with("Voltage", "18V")
            .with("Weight", "  ")
            .with("isEdited", true);

        let row = ImportRow::from_ingested(&source);

        assert_eq!(row.name(), "Drill");
        assert_eq!(row.sap_code(), "A1");
        assert_eq!(row.get(RowField::Brand), "Bosch");
        assert_eq!(row.get(RowField::Quantity), "5");
        assert_eq!(row.get(RowField::Category), "2");
        assert_eq!(row.get(RowField::Description), "");
        assert_eq!(row.spec("Voltage"), Some("18V"));
        assert_eq!(row.specs().len(), 1);
        assert!(!row.is_missing_category());
        assert!(!row.is_edited());
    }

    #[test]
    fn test_flags_are_derived_from_values() {
        let mut row = ImportRow::new("Drill", "A1").with(RowField::Category, "1");
        assert!(!row.is_missing_category());

        row.set(RowField::Category, "  ");
        assert!(row.is_missing_category());
        assert!(row.is_edited());

        row.set(RowField::Category, "1");
        assert!(!row.is_missing_category());
    }

    #[test]
    fn test_restoring_a_value_still_counts_as_edited() {
        let mut row = ImportRow::new("Drill", "A1")
            .with(RowField::Quantity, "5")
            .with_spec("Voltage", "18V");
        assert!(!row.is_edited());

        row.set(RowField::Quantity, "5");
        assert_eq!(row.get(RowField::Quantity), "5");
        assert!(row.is_edited());

        let mut row = ImportRow::new("Drill", "A1").with_spec("Voltage", "18V");
        assert_eq!(row.remove_spec("Weight"), None);
        assert!(!row.is_edited());
        assert!(row.insert_spec("Voltage", "18V"));
        assert!(row.is_edited());
    }

    #[test]
    fn test_reserved_keys_never_become_specs() {
        let mut row = ImportRow::new("Drill", "A1").with_spec("quantity", "9");
        assert!(row.specs().is_empty());
        assert!(!row.insert_spec("brand", "x"));
        assert!(row.insert_spec("Voltage", "18V"));
        assert_eq!(row.get(RowField::Brand), "");
        assert_eq!(row.spec("Voltage"), Some("18V"));
    }
}
