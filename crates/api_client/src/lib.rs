//! # Sierpinski API Client
//!
//! Async HTTP client for the Sierpinski Triangle Blockchain backend.
//!
//! This crate provides:
//! - [`ApiClient`] with one method per backend endpoint
//! - Typed request/response models
//! - Per-request hooks for timing and logging
//!
//! ## Example
//!
//! ```rust,ignore
//! use sierpinski_api_client::ApiClient;
//!
//! let client = ApiClient::new("http://localhost:8001")?;
//! let token = client.get_token().await?;
//! println!("{} ({})", token.token_name, token.symbol);
//! ```

pub mod builder;
pub mod client;
pub mod error;
pub mod hooks;
pub mod models;

// Re-exports
pub use builder::ApiClientBuilder;
pub use client::{ApiClient, DEFAULT_HTTP_TIMEOUT};
pub use error::{ApiError, ApiResult};
pub use hooks::{ApiClientHooks, RequestOutcome};
pub use models::*;
pub use url::Url;
