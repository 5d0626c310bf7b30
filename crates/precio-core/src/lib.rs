//! Core domain types and configuration for the precio catalog tools.
//!
//! Holds the product record model, the sample-catalog generator used by the
//! reseed job, and environment-driven application configuration. Nothing in
//! this crate talks to the document store; persistence lives in
//! `precio-store` and orchestration in `precio-cli`.

use thiserror::Error;

pub mod app_config;
pub mod catalog;
pub mod config;
pub mod product;

pub use app_config::AppConfig;
pub use catalog::{generate_products, perturbed_price, ProductTemplate, BASE_TEMPLATES, CATEGORIES, STORES};
pub use config::{load_app_config, load_app_config_from_env};
pub use product::{lowercase_name, FieldError, ProductRecord};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
