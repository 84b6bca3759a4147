pub mod controllers;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod services;

use std::env;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub use dashboard::Dashboard;
pub use error::{DashboardError, Result};

/// Install the global subscriber. Filter comes from `SCHOOLDESK_LOG`
/// (default `schooldesk=info,warn`); `SCHOOLDESK_LOG_FORMAT=json` switches to
/// JSON lines. Later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("SCHOOLDESK_LOG")
        .unwrap_or_else(|_| EnvFilter::new("schooldesk=info,warn"));

    let format = env::var("SCHOOLDESK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    let _ = match format.as_str() {
        "json" => registry.with(fmt::layer().json().with_ansi(false)).try_init(),
        _ => registry.with(fmt::layer().compact()).try_init(),
    };
}
