//! Inventory API client
//!
//! Typed access to the inventory backend: login, the lookup catalogs, item
//! creation and the server-side spreadsheet preview.

pub mod client;
pub mod constants;
pub mod error;
pub mod models;
pub mod resilience;

pub use client::InventoryClient;
pub use error::{ApiError, DUPLICATE_CODE_ERROR};
pub use models::CatalogEntry;
pub use resilience::{RetryConfig, RetryPolicy};
