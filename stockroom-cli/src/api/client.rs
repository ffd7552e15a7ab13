//! HTTP client for the inventory API
//!
//! One `reqwest::Client` shared by every call. Requests carry the session's
//! bearer token and, unless disabled in config, a fresh `X-Request-Id` so
//! server logs can be matched against ours.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;

use super::constants::*;
use super::error::{ApiError, error_from_body};
use super::models::{CatalogEntry, CatalogResponse, CreateItemResponse, LoginRequest, LoginResponse};
use super::resilience::RetryPolicy;
use crate::catalog::{CatalogKind, CatalogSource};
use crate::config::Config;
use crate::import::{ItemPayload, ItemSink};
use crate::ingest::{IngestionResult, Ingestor};
use crate::session::{Session, SessionContext};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Clone)]
pub struct InventoryClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    correlation_ids: bool,
    retry: RetryPolicy,
}

impl InventoryClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            token: None,
            correlation_ids: config.api.correlation_ids,
            retry: RetryPolicy::new(config.retry.clone()),
        })
    }

    /// Client authenticated with whatever token the session holds
    pub fn for_session<S: SessionContext + ?Sized>(config: &Config, session: &S) -> anyhow::Result<Self> {
        let client = Self::new(config)?;
        Ok(match session.token() {
            Some(token) => client.with_token(token),
            None => client,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, self.url(path));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        if self.correlation_ids {
            builder = builder.header(REQUEST_ID_HEADER, uuid::Uuid::new_v4().to_string());
        }
        builder
    }

    fn require_token(&self) -> Result<(), ApiError> {
        match &self.token {
            Some(token) if !token.trim().is_empty() => Ok(()),
            _ => Err(ApiError::MissingToken),
        }
    }

    /// Decode a JSON body, turning non-success statuses into `ApiError::Status`
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_body(status.as_u16(), &body));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Exchange credentials for a session
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        log::debug!("POST {} for {}", LOGIN_PATH, email);
        let response = self
            .request(Method::POST, LOGIN_PATH)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        let body: LoginResponse = Self::read_json(response).await?;
        log::info!("Logged in as {}", body.user.email);
        Ok(body.into())
    }

    async fn get_catalog(&self, path: &str) -> Result<Vec<CatalogEntry>, ApiError> {
        self.require_token()?;
        let response = self.request(Method::GET, path).send().await?;
        let body: CatalogResponse = Self::read_json(response).await?;
        Ok(body.into_entries())
    }
}

pub fn catalog_path(kind: CatalogKind) -> &'static str {
    match kind {
        CatalogKind::Categories => CATEGORIES_PATH,
        CatalogKind::Locations => LOCATIONS_PATH,
        CatalogKind::TechnicalSpecs => TECHNICAL_SPECS_PATH,
    }
}

#[async_trait]
impl CatalogSource for InventoryClient {
    async fn fetch(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, ApiError> {
        let path = catalog_path(kind);
        let label = format!("GET {}", path);
        let entries = self.retry.execute(&label, || self.get_catalog(path)).await?;
        log::debug!("Fetched {} {}", entries.len(), kind);
        Ok(entries)
    }
}

#[async_trait]
impl ItemSink for InventoryClient {
    /// Never retried: a timed-out create may still have gone through
    async fn create_item(&self, payload: &ItemPayload) -> Result<String, ApiError> {
        self.require_token()?;
        let response = self
            .request(Method::POST, ITEMS_PATH)
            .json(payload)
            .send()
            .await?;

        let body: CreateItemResponse = Self::read_json(response).await?;
        if !body.success {
            return Err(ApiError::Rejected(body.message));
        }
        Ok(body.message)
    }
}

#[async_trait]
impl Ingestor for InventoryClient {
    async fn ingest(&self, path: &Path) -> anyhow::Result<IngestionResult> {
        self.require_token()?;
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read spreadsheet: {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.xlsx".to_string());

        log::info!("Uploading {} ({} bytes) for preview", file_name, bytes.len());
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(XLSX_MIME)
            .context("Invalid upload content type")?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .request(Method::POST, IMPORT_PREVIEW_PATH)
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::from)?;

        let result: IngestionResult = Self::read_json(response)
            .await
            .context("Spreadsheet preview failed")?;
        log::info!(
            "Preview returned {} valid and {} invalid rows",
            result.valid_rows.len(),
            result.invalid_rows.len()
        );
        Ok(result)
    }
}
