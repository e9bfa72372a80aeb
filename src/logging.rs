// Logging, powered by tracing-subscriber.
//
// Events go to stderr so stdout stays reserved for the stats JSON. The writer
// clears the progress spinner around each event so lines never interleave.
// `RUST_LOG` takes precedence over the --verbose flag.

use tracing_subscriber::EnvFilter;

use crate::ui::SpinnerAwareStderr;

// Dependency targets capped at warn.
const NOISY_TARGETS: &[&str] = &["hyper", "hyper_util", "reqwest", "h2", "rustls"];

fn build_env_filter(verbose: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let level = if verbose { "debug" } else { "info" };
    let directives = std::iter::once(level.to_string())
        .chain(NOISY_TARGETS.iter().map(|target| format!("{target}=warn")))
        .collect::<Vec<_>>()
        .join(",");
    EnvFilter::new(directives)
}

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(verbose))
        .with_writer(SpinnerAwareStderr::default)
        .with_target(verbose)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_includes_noisy_overrides() {
        // Only meaningful when RUST_LOG is unset.
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let rendered = build_env_filter(false).to_string();
        assert!(rendered.contains("info"));
        assert!(rendered.contains("hyper=warn"));

        let verbose = build_env_filter(true).to_string();
        assert!(verbose.contains("debug"));
    }

    #[test]
    fn init_twice_does_not_panic() {
        init(false);
        init(true);
    }
}
