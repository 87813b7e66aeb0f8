//! REST client for the Billed backend
//!
//! Endpoints:
//! - `GET /bills` → bill list
//! - `POST /bills` (JSON) → create a bill
//! - `PATCH /bills/{key}` (JSON) → complete the record a receipt upload created
//! - `PATCH /bills/{id}` (JSON) → update a bill
//! - `POST /bills` (multipart `file` + `email`) → upload a receipt

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use std::time::Duration;

use super::{BillsResource, FilesResource, RemoteStore, StoreError, StoreResult};
use crate::model::{Bill, Created, FileUpload, NewBill, UploadResult};

/// Configuration for the HTTP store
#[derive(Debug, Clone)]
pub struct HttpStoreConfig {
    /// Backend base URL (e.g., "http://localhost:5678")
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Bearer token sent with every request
    pub token: Option<String>,
}

impl Default for HttpStoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5678".to_string(),
            timeout_secs: 30,
            token: None,
        }
    }
}

/// Remote store backed by the REST API
pub struct HttpStore {
    client: Client,
    config: HttpStoreConfig,
}

impl HttpStore {
    pub fn new(config: HttpStoreConfig) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpStoreConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.config.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> StoreResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            tracing::warn!(status = status.as_u16(), url = %response.url(), "Store request failed");
            return Err(StoreError::Status(status.as_u16()));
        }
        Ok(response)
    }
}

impl HttpStore {
    fn create_request(&self, bill: &NewBill) -> RequestBuilder {
        match &bill.file_key {
            Some(key) => self.request(Method::PATCH, &format!("bills/{}", key)),
            None => self.request(Method::POST, "bills"),
        }
        .json(bill)
    }
}

/// Decode a bill list record by record. Records that do not decode are
/// skipped, so one bad record never hides the others.
pub fn decode_bills(records: Vec<serde_json::Value>) -> Vec<Bill> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Bill>(record) {
            Ok(bill) => Some(bill),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping undecodable bill record");
                None
            }
        })
        .collect()
}

impl RemoteStore for HttpStore {
    fn bills(&self) -> &dyn BillsResource {
        self
    }

    fn files(&self) -> &dyn FilesResource {
        self
    }
}

#[async_trait]
impl BillsResource for HttpStore {
    async fn list(&self) -> StoreResult<Vec<Bill>> {
        let response = self.send(self.request(Method::GET, "bills")).await?;
        let records: Vec<serde_json::Value> = response.json().await?;
        Ok(decode_bills(records))
    }

    async fn create(&self, bill: NewBill) -> StoreResult<Created> {
        let response = self.send(self.create_request(&bill)).await?;
        Ok(response.json().await?)
    }

    async fn update(&self, id: &str, bill: Bill) -> StoreResult<Created> {
        let response = self
            .send(
                self.request(Method::PATCH, &format!("bills/{}", id))
                    .json(&bill),
            )
            .await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl FilesResource for HttpStore {
    async fn create(&self, file: FileUpload, email: &str) -> StoreResult<UploadResult> {
        let part = reqwest::multipart::Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(&file.mime_type)?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("email", email.to_string());

        let response = self
            .send(self.request(Method::POST, "bills").multipart(form))
            .await?;
        Ok(response.json().await?)
    }
}
