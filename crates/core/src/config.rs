//! Client configuration.

use std::time::Duration;

use crate::error::{Error, Result};
use crate::poller::DEFAULT_MAX_CONSECUTIVE_FAILURES;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_API_URL: &str = "REVEAL_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "REVEAL_TIMEOUT_SECS";

/// Settings for [`RevealClient`](crate::RevealClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
	pub base_url: String,
	/// Applied to every HTTP call; a timeout is a `Network` error.
	pub request_timeout: Duration,
	pub scan_poll_interval: Duration,
	pub task_poll_interval: Duration,
	pub report_poll_interval: Duration,
	pub scoring_poll_interval: Duration,
	/// Delay before polling again after a failed fetch.
	pub poll_retry_delay: Duration,
	/// `None` keeps polling through any number of failures.
	pub max_consecutive_poll_failures: Option<u32>,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_API_URL.to_string(),
			request_timeout: DEFAULT_TIMEOUT,
			scan_poll_interval: Duration::from_secs(3),
			task_poll_interval: Duration::from_secs(3),
			report_poll_interval: Duration::from_secs(5),
			scoring_poll_interval: Duration::from_secs(5),
			poll_retry_delay: Duration::from_secs(3),
			max_consecutive_poll_failures: Some(DEFAULT_MAX_CONSECUTIVE_FAILURES),
		}
	}
}

impl ClientConfig {
	pub fn new(base_url: impl Into<String>) -> Self {
		Self::default().with_base_url(base_url)
	}

	/// Defaults overridden by `REVEAL_API_URL` and `REVEAL_TIMEOUT_SECS`.
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Like [`from_env`](Self::from_env) with a custom variable source.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
		let mut config = Self::default();

		if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
			config.base_url = url.trim().to_string();
		}

		if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
			let secs: u64 = raw
				.trim()
				.parse()
				.map_err(|_| Error::validation(0, format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got {raw:?}")))?;
			config.request_timeout = Duration::from_secs(secs);
		}

		Ok(config)
	}

	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;
		self
	}

	pub fn with_scan_poll_interval(mut self, interval: Duration) -> Self {
		self.scan_poll_interval = interval;
		self
	}

	pub fn with_task_poll_interval(mut self, interval: Duration) -> Self {
		self.task_poll_interval = interval;
		self
	}

	pub fn with_report_poll_interval(mut self, interval: Duration) -> Self {
		self.report_poll_interval = interval;
		self
	}

	pub fn with_scoring_poll_interval(mut self, interval: Duration) -> Self {
		self.scoring_poll_interval = interval;
		self
	}

	pub fn with_poll_retry_delay(mut self, delay: Duration) -> Self {
		self.poll_retry_delay = delay;
		self
	}

	pub fn with_max_consecutive_poll_failures(mut self, max: Option<u32>) -> Self {
		self.max_consecutive_poll_failures = max;
		self
	}
}
