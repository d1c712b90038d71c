//! # Sierpinski Dashboard
//!
//! Client-side view of the Sierpinski Triangle Blockchain backend.
//!
//! - [`Dashboard`]: view state, poll loops, mining toggle and user actions
//! - [`Ticker`]: the static poller writing a handful of text slots
//! - [`fractal`]: the decorative triangle canvas
//! - [`render`]: plain-text rendering of both views

pub mod dashboard;
pub mod format;
pub mod fractal;
pub mod render;
pub mod state;
pub mod tasks;
pub mod ticker;

// Re-exports
pub use dashboard::{ActionOutcome, Dashboard};
pub use format::format_number;
pub use fractal::{compose, Scene, Shape, TextCanvas};
pub use render::{render_dashboard, render_dashboard_with, render_ticker};
pub use state::{Busy, DashboardState, SharedState};
pub use tasks::{PollLoop, PollTasks};
pub use ticker::{RateTracker, Ticker, TickerSource, TickerView};
