use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_LEVEL: &str = "info";

/// Level the loggers start at: `--verbose` raises it to at least `debug`,
/// otherwise the configured level (or `info`) applies.
pub fn resolve_level<'a>(configured: Option<&'a str>, verbose: bool) -> &'a str {
    match (configured, verbose) {
        (Some("trace"), _) => "trace",
        (_, true) => "debug",
        (Some(level), false) => level,
        (None, false) => DEFAULT_LEVEL,
    }
}

/// `EnvFilter` directive used when `RUST_LOG` is unset. Dependencies are let
/// through at `info` once the crate itself logs at `debug` or below.
pub fn filter_directive(level: &str) -> String {
    match level {
        "debug" | "trace" => format!("vehicle_store={},info", level),
        _ => format!("vehicle_store={}", level),
    }
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive(level)))
}

pub fn init_cli_logger(level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// Same filter as the CLI logger but emits one JSON object per event.
pub fn init_json_logger(level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}
