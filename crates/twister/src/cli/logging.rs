//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;
use twister::TwisterConfig;

const WORKSPACE_CRATES: [&str; 8] = [
    "twister",
    "twister_core",
    "twister_error",
    "twister_interface",
    "twister_rate_limit",
    "twister_models",
    "twister_story",
    "twister_publish",
];

/// Keeps telemetry alive until the end of `main`.
#[derive(Debug, Default)]
pub struct LoggingGuard {
    #[cfg(feature = "observability")]
    _telemetry: Option<twister::observability::TelemetryGuard>,
}

/// Filter used when `RUST_LOG` is unset.
///
/// `--verbose` raises only the workspace crates to `debug`, leaving HTTP
/// internals at `info`.
pub(crate) fn default_directives(verbose: bool) -> String {
    let mut directives = vec!["info".to_string()];
    if verbose {
        directives.extend(WORKSPACE_CRATES.iter().map(|name| format!("{}=debug", name)));
    }
    directives.join(",")
}

/// `RUST_LOG` first, then the `--verbose` default.
pub(crate) fn log_filter(verbose: bool) -> Result<EnvFilter, Box<dyn std::error::Error>> {
    Ok(EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(verbose)))?)
}

/// Install the global subscriber. Logs go to stderr so stdout stays parseable.
#[cfg_attr(not(feature = "observability"), allow(unused_variables))]
pub fn init_logging(
    verbose: bool,
    json_logs: bool,
    config: &TwisterConfig,
) -> Result<LoggingGuard, Box<dyn std::error::Error>> {
    let filter = log_filter(verbose)?;

    #[cfg(feature = "observability")]
    {
        use twister::observability::{ObservabilityConfig, init_observability};

        let telemetry = init_observability(
            ObservabilityConfig::new()
                .with_json_logs(json_logs)
                .with_attribute("twister.completion.model", config.completion.model.clone()),
            filter,
        )?;
        Ok(LoggingGuard {
            _telemetry: Some(telemetry),
        })
    }

    #[cfg(not(feature = "observability"))]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false);
        if json_logs {
            builder.json().try_init().map_err(|e| e as Box<dyn std::error::Error>)?;
        } else {
            builder.try_init().map_err(|e| e as Box<dyn std::error::Error>)?;
        }
        Ok(LoggingGuard::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_default_is_info() {
        assert_eq!(default_directives(false), "info");
    }

    #[test]
    fn test_verbose_raises_workspace_crates_only() {
        let directives = default_directives(true);
        assert!(directives.starts_with("info,"));
        assert!(directives.contains("twister_story=debug"));
        assert!(!directives.contains("reqwest"));
        assert!(EnvFilter::try_new(&directives).is_ok());
    }
}
