//! API endpoint paths and header names

pub const LOGIN_PATH: &str = "/auth/login";
pub const CATEGORIES_PATH: &str = "/categories";
pub const LOCATIONS_PATH: &str = "/locations";
pub const TECHNICAL_SPECS_PATH: &str = "/technical-specs";
pub const ITEMS_PATH: &str = "/items";
pub const IMPORT_PREVIEW_PATH: &str = "/items/import/preview";

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Multipart field carrying the uploaded spreadsheet
pub const UPLOAD_FIELD: &str = "file";
