//! Tracing subscriber setup.

use std::sync::OnceLock;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const DEFAULT_FILTER: &str = "todo_server=info,tower_http=info";

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Install a console subscriber filtered by `RUST_LOG` (or `DEFAULT_FILTER`).
/// Safe to call more than once, and tolerant of a subscriber installed by
/// someone else.
pub fn init() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_filter(filter),
        );

        if subscriber.try_init().is_err() {
            tracing::debug!("global tracing subscriber already installed");
        }
    });
}
