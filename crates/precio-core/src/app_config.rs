/// Runtime configuration for the catalog maintenance jobs, loaded from the
/// environment by [`crate::config::load_app_config`].
#[derive(Clone)]
pub struct AppConfig {
    pub project_id: String,
    pub database_id: String,
    /// Bearer token granting write access to the target store. Unset when
    /// running against the local emulator.
    pub auth_token: Option<String>,
    /// Override of the production endpoint, for the emulator and for tests.
    pub base_url: Option<String>,
    pub collection: String,
    pub request_timeout_secs: u64,
    /// Additional attempts after a first transient failure. `0` keeps the
    /// stop-at-first-error contract of the batch jobs.
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("project_id", &self.project_id)
            .field("database_id", &self.database_id)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[redacted]"))
            .field("base_url", &self.base_url)
            .field("collection", &self.collection)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("log_level", &self.log_level)
            .finish()
    }
}
