use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request rejected with HTTP {status}; check FIRESTORE_AUTH_TOKEN")]
    Unauthorized { status: u16 },

    #[error("document not found: {path}")]
    NotFound { path: String },

    #[error("rate limited (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported {kind} value in field {field}: documents are flat scalar maps")]
    UnsupportedValue { field: String, kind: String },

    #[error("pagination limit reached listing {collection}: exceeded {max_pages} pages")]
    PaginationLimit {
        collection: String,
        max_pages: usize,
    },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("malformed document name: {name}")]
    InvalidDocumentName { name: String },
}
