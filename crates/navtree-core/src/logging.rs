//! Subscriber setup for hosts that do not install their own.
//!
//! Filters come from `NAVTREE_LOG` (falling back to `RUST_LOG`, then
//! `info`), using the usual `EnvFilter` directive syntax such as
//! `navtree_core=debug`.

use tracing_subscriber::EnvFilter;

pub const ENV_LOG: &str = "NAVTREE_LOG";

type InitResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;

fn env_filter() -> EnvFilter {
    env_filter_with(|key| std::env::var(key).ok())
}

/// First of `NAVTREE_LOG`, `RUST_LOG` that parses, else `info`.
fn env_filter_with<F>(get: F) -> EnvFilter
where
    F: Fn(&str) -> Option<String>,
{
    [ENV_LOG, EnvFilter::DEFAULT_ENV]
        .into_iter()
        .filter_map(&get)
        .find_map(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Install a global JSON subscriber. Fails if one is already installed.
pub fn init_json() -> InitResult {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter())
        .with_current_span(false)
        .try_init()
}

/// Install a global human-readable subscriber. Fails if one is already
/// installed.
pub fn init_pretty() -> InitResult {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + '_ {
        move |key: &str| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_owned())
        }
    }

    #[test]
    fn navtree_log_takes_precedence() {
        let filter = env_filter_with(lookup(&[
            ("NAVTREE_LOG", "navtree_core=trace"),
            ("RUST_LOG", "warn"),
        ]));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
        assert!(filter.to_string().to_lowercase().contains("navtree_core=trace"));
    }

    #[test]
    fn falls_back_to_rust_log_then_info() {
        let filter = env_filter_with(lookup(&[("RUST_LOG", "warn")]));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));

        let filter = env_filter_with(lookup(&[]));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn unparsable_navtree_log_is_skipped() {
        let filter = env_filter_with(lookup(&[
            ("NAVTREE_LOG", "navtree_core=loud"),
            ("RUST_LOG", "debug"),
        ]));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn second_init_fails_once_installed() {
        assert!(init_json().is_ok());
        tracing::info!(target: "navtree_core", "json subscriber installed");
        assert!(init_pretty().is_err());
        assert!(init_json().is_err());
    }
}
