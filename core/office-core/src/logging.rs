//! Log filter shared by the server and the CLI.

use std::env;

use tracing_subscriber::EnvFilter;

/// Set to `1`, `true` or `yes` to force debug output regardless of `RUST_LOG`.
pub const DEBUG_LOG_ENV: &str = "STAR_OFFICE_DEBUG_LOG";

/// Builds the filter: debug when [`DEBUG_LOG_ENV`] is set, else `RUST_LOG`,
/// else `info`.
pub fn env_filter() -> EnvFilter {
    if debug_requested(env::var(DEBUG_LOG_ENV).ok().as_deref()) {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

fn debug_requested(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "true" | "TRUE" | "yes" | "YES"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_values() {
        for value in ["1", "true", "TRUE", "yes", "YES"] {
            assert!(debug_requested(Some(value)), "{value}");
        }
        for value in ["", "0", "false", "no", "on"] {
            assert!(!debug_requested(Some(value)), "{value}");
        }
        assert!(!debug_requested(None));
    }
}
