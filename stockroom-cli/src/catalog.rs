//! Lookup catalogs (categories, locations, technical specifications)
//!
//! Fetched once when an import session opens and read-only afterwards.

use async_trait::async_trait;

use crate::api::error::ApiError;
use crate::api::models::CatalogEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Categories,
    Locations,
    TechnicalSpecs,
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogKind::Categories => write!(f, "categories"),
            CatalogKind::Locations => write!(f, "locations"),
            CatalogKind::TechnicalSpecs => write!(f, "technical specifications"),
        }
    }
}

/// Source of lookup catalogs
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, ApiError>;
}

/// One of the catalogs could not be fetched
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogLoadError {
    pub kind: CatalogKind,
    pub error: ApiError,
}

impl std::fmt::Display for CatalogLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.kind, self.error)
    }
}

impl std::error::Error for CatalogLoadError {}

/// Read-only snapshot of the three lookup catalogs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalogs {
    pub categories: Vec<CatalogEntry>,
    pub locations: Vec<CatalogEntry>,
    pub technical_specs: Vec<CatalogEntry>,
}

impl Catalogs {
    pub fn new(
        categories: Vec<CatalogEntry>,
        locations: Vec<CatalogEntry>,
        technical_specs: Vec<CatalogEntry>,
    ) -> Self {
        Self {
            categories,
            locations,
            technical_specs,
        }
    }

    /// Fetch all three catalogs; the first failure wins
    pub async fn load<S>(source: &S) -> Result<Self, CatalogLoadError>
    where
        S: CatalogSource + ?Sized,
    {
        let fetch = |kind: CatalogKind| async move {
            source
                .fetch(kind)
                .await
                .map_err(|error| CatalogLoadError { kind, error })
        };

        let (categories, locations, technical_specs) = tokio::try_join!(
            fetch(CatalogKind::Categories),
            fetch(CatalogKind::Locations),
            fetch(CatalogKind::TechnicalSpecs),
        )?;

        log::info!(
            "Loaded catalogs: {} categories, {} locations, {} technical specs",
            categories.len(),
            locations.len(),
            technical_specs.len()
        );

        Ok(Self {
            categories,
            locations,
            technical_specs,
        })
    }

    pub fn entries(&self, kind: CatalogKind) -> &[CatalogEntry] {
        match kind {
            CatalogKind::Categories => &self.categories,
            CatalogKind::Locations => &self.locations,
            CatalogKind::TechnicalSpecs => &self.technical_specs,
        }
    }

    pub fn category(&self, id: i64) -> Option<&CatalogEntry> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn location(&self, id: i64) -> Option<&CatalogEntry> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn spec(&self, id: i64) -> Option<&CatalogEntry> {
        self.technical_specs.iter().find(|s| s.id == id)
    }

    /// Technical spec whose key (label) is `key`: exact match first, then
    /// case-insensitive
    pub fn spec_by_key(&self, key: &str) -> Option<&CatalogEntry> {
        let key = key.trim();
        self.technical_specs
            .iter()
            .find(|s| s.label == key)
            .or_else(|| {
                self.technical_specs
                    .iter()
                    .find(|s| s.label.eq_ignore_ascii_case(key))
            })
    }

    /// Display label for an id stored as raw row text
    pub fn label_for(&self, kind: CatalogKind, raw_id: &str) -> Option<&str> {
        let id: i64 = raw_id.trim().parse().ok()?;
        self.entries(kind)
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.label.as_str())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory catalog source; kinds listed in `failing` answer with a 500
    #[derive(Default)]
    pub struct FakeCatalogs {
        pub entries: HashMap<&'static str, Vec<CatalogEntry>>,
        pub failing: Vec<CatalogKind>,
    }

    impl FakeCatalogs {
        pub fn standard() -> Self {
            let mut entries = HashMap::new();
            entries.insert(
                "categories",
                vec![CatalogEntry::new(1, "Power tools"), CatalogEntry::new(2, "Safety")],
            );
            entries.insert(
                "locations",
                vec![CatalogEntry::new(10, "Warehouse A"), CatalogEntry::new(11, "Lab")],
            );
            entries.insert(
                "technical specifications",
                vec![
                    CatalogEntry::new(100, "Voltage"),
                    CatalogEntry::new(101, "Weight"),
                    CatalogEntry::new(102, "Color"),
                ],
            );
            Self {
                entries,
                failing: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl CatalogSource for FakeCatalogs {
        async fn fetch(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, ApiError> {
            if self.failing.contains(&kind) {
                return Err(ApiError::Status {
                    status: 500,
                    details: "catalog unavailable".to_string(),
                    code: None,
                });
            }
            let key: &str = match kind {
                CatalogKind::Categories => "categories",
                CatalogKind::Locations => "locations",
                CatalogKind::TechnicalSpecs => "technical specifications",
            };
            Ok(self.entries.get(key).cloned().unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn test_load_all_catalogs() {
        let catalogs = Catalogs::load(&FakeCatalogs::standard()).await.unwrap();
        assert_eq!(catalogs.categories.len(), 2);
        assert_eq!(catalogs.locations.len(), 2);
        assert_eq!(catalogs.technical_specs.len(), 3);
        assert_eq!(catalogs.category(2).map(|c| c.label.as_str()), Some("Safety"));
        assert_eq!(catalogs.location(10).map(|c| c.label.as_str()), Some("Warehouse A"));
    }

    #[tokio::test]
    async fn test_load_reports_failing_catalog() {
        let mut source = FakeCatalogs::standard();
        source.failing.push(CatalogKind::Locations);

        let err = Catalogs::load(&source).await.unwrap_err();
        assert_eq!(err.kind, CatalogKind::Locations);
        assert!(err.to_string().contains("locations"));
    }

    #[test]
    fn test_spec_by_key() {
        let catalogs = Catalogs::new(
            vec![],
            vec![],
            vec![CatalogEntry::new(1, "Voltage"), CatalogEntry::new(2, "voltage")],
        );
        assert_eq!(catalogs.spec_by_key("voltage").map(|s| s.id), Some(2));
        assert_eq!(catalogs.spec_by_key("VOLTAGE").map(|s| s.id), Some(1));
        assert_eq!(catalogs.spec_by_key(" Voltage ").map(|s| s.id), Some(1));
        assert!(catalogs.spec_by_key("Amperage").is_none());
    }

    #[test]
    fn test_label_for_raw_id() {
        let catalogs = Catalogs::new(vec![CatalogEntry::new(4, "Cables")], vec![], vec![]);
        assert_eq!(catalogs.label_for(CatalogKind::Categories, " 4 "), Some("Cables"));
        assert_eq!(catalogs.label_for(CatalogKind::Categories, "x"), None);
        assert_eq!(catalogs.label_for(CatalogKind::Locations, "4"), None);
    }
}
