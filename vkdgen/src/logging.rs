//! Tracing setup for the binary.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "VKDGEN_LOG";

const CRATES: &[&str] = &["vkdgen", "vkdgen_codegen", "vkdgen_registry"];

/// Expand a plain level into a per-crate filter; anything else is used as is.
pub fn filter_directives(filter: &str) -> String {
    let filter = filter.trim();
    let is_level = matches!(
        filter.to_ascii_lowercase().as_str(),
        "off" | "error" | "warn" | "info" | "debug" | "trace"
    );
    if is_level {
        CRATES
            .iter()
            .map(|krate| format!("{krate}={filter}"))
            .collect::<Vec<_>>()
            .join(",")
    } else {
        filter.to_string()
    }
}

/// Install the stderr subscriber. `VKDGEN_LOG` wins over `--verbose`.
pub fn init(verbose: bool) {
    let filter = std::env::var(LOG_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| if verbose { "debug" } else { "warn" }.to_string());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    if tracing_subscriber::registry()
        .with(EnvFilter::new(filter_directives(&filter)))
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("warning: tracing subscriber already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_expands_per_crate() {
        assert_eq!(
            filter_directives("debug"),
            "vkdgen=debug,vkdgen_codegen=debug,vkdgen_registry=debug"
        );
    }

    #[test]
    fn test_full_spec_is_kept() {
        assert_eq!(
            filter_directives("vkdgen_registry=trace,warn"),
            "vkdgen_registry=trace,warn"
        );
    }
}
