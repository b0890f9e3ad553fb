// Library interface for sunburst-rs.
// The viewer binary and the headless tools share these modules.

pub mod app;
pub mod config;
pub mod data;
pub mod layout;
pub mod render;
pub mod tree;
pub mod ui;

/// Install the `tracing` subscriber used by every binary. `RUST_LOG`
/// overrides the default `sunburst_rs=info` filter.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sunburst_rs=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
