use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding an explicit filter, e.g. `reveal.refresh=debug`.
pub const LOG_ENV: &str = "REVEAL_LOG";

/// Conventional filter variable, consulted when [`LOG_ENV`] is unset.
pub const RUST_LOG_ENV: &str = "RUST_LOG";

/// Installs the stderr subscriber.
///
/// `REVEAL_LOG`, then `RUST_LOG`, win over `-v`; without any of them only
/// warnings are shown.
pub fn init_logging(verbosity: u8) {
	let directive = filter_directive(verbosity, |key| std::env::var(key).ok());
	let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

	let _ = tracing_subscriber::registry()
		.with(fmt::layer().with_writer(std::io::stderr).with_target(verbosity > 1))
		.with(filter)
		.try_init();
}

fn filter_directive(verbosity: u8, env: impl Fn(&str) -> Option<String>) -> String {
	[LOG_ENV, RUST_LOG_ENV]
		.into_iter()
		.filter_map(|key| env(key))
		.find(|value| !value.trim().is_empty())
		.unwrap_or_else(|| default_directive(verbosity).to_string())
}

fn default_directive(verbosity: u8) -> &'static str {
	match verbosity {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	}
}
