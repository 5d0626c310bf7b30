//! HTTP client for the Firestore v1 REST API.

mod value;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::StoreError;
use crate::retry::retry_with_backoff;
use crate::{Document, DocumentFields, DocumentStore};

const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Maximum number of pages to fetch per enumeration before returning an
/// error. Prevents infinite loops on cycling page tokens.
const MAX_PAGES: usize = 100;

/// Firestore caps `pageSize` at 300.
const PAGE_SIZE: u32 = 300;

/// Client for the Firestore v1 REST API.
///
/// Handles authentication, the typed-value wire format, list pagination, and
/// HTTP status mapping into [`StoreError`]. Use [`FirestoreClient::new`] for
/// production or [`FirestoreClient::with_base_url`] to point at the emulator
/// or a mock server in tests.
///
/// Transient errors (429, 5xx, network failures) are retried with exponential
/// backoff only when a retry policy is configured; the default is zero
/// retries, so every failure surfaces immediately.
pub struct FirestoreClient {
    client: Client,
    /// Normalized base URL without a trailing slash, e.g.
    /// `https://firestore.googleapis.com/v1`.
    base_url: String,
    /// `projects/{project}/databases/{database}/documents`.
    documents_root: String,
    auth_token: Option<String>,
    max_retries: u32,
    backoff_base_ms: u64,
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

impl FirestoreClient {
    /// Creates a client pointed at the production Firestore endpoint.
    ///
    /// `auth_token` is the bearer token granting write access; pass `None`
    /// when targeting the emulator.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        project_id: &str,
        database_id: &str,
        auth_token: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, StoreError> {
        Self::with_base_url(project_id, database_id, auth_token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (emulator, wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`StoreError::InvalidUrl`] if `base_url`
    /// does not parse.
    pub fn with_base_url(
        project_id: &str,
        database_id: &str,
        auth_token: Option<&str>,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("precio/0.1 (catalog-maintenance)")
            .build()?;

        let normalized = base_url.trim_end_matches('/').to_owned();
        Url::parse(&normalized).map_err(|e| StoreError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: normalized,
            documents_root: format!("projects/{project_id}/databases/{database_id}/documents"),
            auth_token: auth_token.map(str::to_owned),
            max_retries: 0,
            backoff_base_ms: 500,
        })
    }

    /// Sets the retry policy: `max_retries` additional attempts after the
    /// first failure for transient errors, with `backoff_base_ms * 2^n`
    /// exponential back-off. Zero disables retries.
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    fn collection_url(&self, collection: &str) -> Result<Url, StoreError> {
        parse_url(format!(
            "{}/{}/{collection}",
            self.base_url, self.documents_root
        ))
    }

    fn document_url(&self, collection: &str, id: &str) -> Result<Url, StoreError> {
        parse_url(format!(
            "{}/{}/{collection}/{id}",
            self.base_url, self.documents_root
        ))
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Maps non-2xx statuses to typed errors and passes 2xx responses through.
    fn check_status(
        response: reqwest::Response,
        url: &str,
    ) -> Result<reqwest::Response, StoreError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StoreError::Unauthorized {
                status: status.as_u16(),
            });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound {
                path: url.to_owned(),
            });
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(StoreError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            return Err(StoreError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response)
    }

    async fn fetch_page(
        &self,
        collection: &str,
        page_token: Option<&str>,
    ) -> Result<ListDocumentsResponse, StoreError> {
        let mut url = self.collection_url(collection)?;
        url.query_pairs_mut()
            .append_pair("pageSize", &PAGE_SIZE.to_string());
        if let Some(token) = page_token {
            url.query_pairs_mut().append_pair("pageToken", token);
        }

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self.request(Method::GET, url.clone()).send().await?;
                let response = Self::check_status(response, url.as_str())?;
                let body = response.text().await?;
                serde_json::from_str(&body).map_err(|e| StoreError::Deserialize {
                    context: format!("document page from {url}"),
                    source: e,
                })
            }
        })
        .await
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            if pages >= MAX_PAGES {
                return Err(StoreError::PaginationLimit {
                    collection: collection.to_owned(),
                    max_pages: MAX_PAGES,
                });
            }
            let page = self.fetch_page(collection, page_token.as_deref()).await?;
            pages += 1;

            for raw in &page.documents {
                documents.push(Document {
                    id: document_id(&raw.name)?,
                    fields: value::decode_fields(&raw.fields)?,
                });
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(documents)
    }

    async fn add_document(
        &self,
        collection: &str,
        fields: DocumentFields,
    ) -> Result<String, StoreError> {
        let url = self.collection_url(collection)?;
        let body = json!({ "fields": value::encode_fields(&fields)? });

        // A retried create can duplicate a document if the first attempt
        // committed but the response was lost; retries default to 0.
        let created: FirestoreDocument =
            retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
                let url = url.clone();
                let body = body.clone();
                async move {
                    let response = self
                        .request(Method::POST, url.clone())
                        .json(&body)
                        .send()
                        .await?;
                    let response = Self::check_status(response, url.as_str())?;
                    let text = response.text().await?;
                    serde_json::from_str(&text).map_err(|e| StoreError::Deserialize {
                        context: format!("created document in {collection}"),
                        source: e,
                    })
                }
            })
            .await?;

        document_id(&created.name)
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: DocumentFields,
    ) -> Result<(), StoreError> {
        let mut url = self.document_url(collection, id)?;
        // The exists precondition turns a write to a vanished document into
        // a 404 instead of silently recreating it.
        url.query_pairs_mut()
            .append_pair("currentDocument.exists", "true");
        let body = json!({ "fields": value::encode_fields(&fields)? });

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            let body = body.clone();
            async move {
                let response = self
                    .request(Method::PATCH, url.clone())
                    .json(&body)
                    .send()
                    .await?;
                Self::check_status(response, url.as_str())?;
                Ok(())
            }
        })
        .await
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let url = self.document_url(collection, id)?;

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self.request(Method::DELETE, url.clone()).send().await?;
                Self::check_status(response, url.as_str())?;
                Ok(())
            }
        })
        .await
    }
}

fn parse_url(raw: String) -> Result<Url, StoreError> {
    Url::parse(&raw).map_err(|e| StoreError::InvalidUrl {
        reason: e.to_string(),
        url: raw,
    })
}

/// Extracts the store-assigned identifier from a full resource name like
/// `projects/p/databases/(default)/documents/products/AbC123`.
fn document_id(name: &str) -> Result<String, StoreError> {
    name.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && *segment != name)
        .map(str::to_owned)
        .ok_or_else(|| StoreError::InvalidDocumentName {
            name: name.to_owned(),
        })
}

#[cfg(test)]
#[path = "../firestore_test.rs"]
mod tests;
