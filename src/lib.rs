//! # sierpinski-rs
//!
//! Terminal client for the Sierpinski Triangle Blockchain backend.
//!
//! - [`config`]: TOML configuration with environment overrides
//! - [`api`]: typed HTTP client for the backend's JSON endpoints
//! - [`dashboard`]: view state, poll loops, the static ticker and text rendering
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sierpinski_rs::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DashboardConfig::default();
//!     let client = ApiClient::new(&config.api.base_url)?;
//!     let dashboard = Dashboard::new(client, &config);
//!     dashboard.mount().await;
//!
//!     let state = dashboard.snapshot().await;
//!     let scene = compose(&state.stats, &mut rand::thread_rng());
//!     println!("{}", render_dashboard(&state, &scene));
//!
//!     dashboard.unmount().await;
//!     Ok(())
//! }
//! ```

pub use sierpinski_api_client as api;
pub use sierpinski_config as config;
pub use sierpinski_dashboard as dashboard;

/// Current version of sierpinski-rs
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commonly used types
pub mod prelude {
    pub use sierpinski_api_client::{ApiClient, ApiError, ApiResult};
    pub use sierpinski_config::DashboardConfig;
    pub use sierpinski_dashboard::{
        compose, render_dashboard, render_ticker, ActionOutcome, Dashboard, DashboardState,
        Ticker, TickerSource,
    };
}
