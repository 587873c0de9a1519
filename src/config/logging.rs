use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::AppConfig;

/// `RUST_LOG` wins; otherwise the crate logs at `LOG_LEVEL` and actix at info
pub fn env_filter(app: &AppConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "mobigo={},actix_web=info,sqlx=warn",
            app.log_level
        ))
    })
}

/// Install the global subscriber: JSON lines for `LOG_FORMAT=json`, human-readable otherwise
pub fn init_tracing(app: &AppConfig) {
    let registry = tracing_subscriber::registry().with(env_filter(app));

    if app.log_format == "json" {
        registry
            .with(fmt::layer().json().with_current_span(true))
            .init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
