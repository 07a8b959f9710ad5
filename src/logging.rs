use tracing_subscriber::EnvFilter;

const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// HTTP crates that get clamped to at most `warn`
const NOISY_CRATES: &[&str] = &["hyper", "hyper_util", "reqwest"];

/// Filter directives for a `-v` count: 0 errors only, 1 warnings, 2 info,
/// 3 debug, 4+ trace.
pub fn filter_directives(verbosity: u8) -> String {
    let level = LEVELS[usize::from(verbosity).min(LEVELS.len() - 1)];
    let noisy = if verbosity <= 1 { level } else { "warn" };

    let mut directives = vec![level.to_string()];
    directives.extend(NOISY_CRATES.iter().map(|c| format!("{}={}", c, noisy)));
    directives.join(",")
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `verbosity`.
pub fn init_logging(verbosity: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(verbosity)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 3);

    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}
