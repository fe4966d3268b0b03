//! Logger setup for the CLI.

use std::sync::Once;

/// Filter used when neither `--log-level` nor `RUST_LOG` is given.
pub const DEFAULT_FILTER: &str = "warn";

static INIT: Once = Once::new();

/// Picks the filter: an explicit flag wins over `RUST_LOG`, which wins
/// over [`DEFAULT_FILTER`].
pub fn resolve_filter(flag: Option<&str>, env: Option<String>) -> String {
    match (flag, env) {
        (Some(flag), _) => flag.to_string(),
        (None, Some(env)) if !env.trim().is_empty() => env,
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Initializes the global logger once. Later calls are ignored.
///
/// `flag` follows the `env_logger` filter syntax (e.g. "info",
/// "bandplot_core=debug").
pub fn init_logging(flag: Option<&str>) {
    INIT.call_once(|| {
        let filter = resolve_filter(flag, std::env::var("RUST_LOG").ok());
        env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(env_logger::WriteStyle::Auto)
            .init();
        log::debug!("logging initialized with filter '{filter}'");
    });
}
