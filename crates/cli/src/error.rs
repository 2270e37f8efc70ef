use std::path::PathBuf;

use thiserror::Error;

use crate::config::PASSWORD_ENV;

#[derive(Error, Debug)]
pub enum CliError {
	#[error(transparent)]
	Api(#[from] reveal::Error),

	#[error("No password provided: set {PASSWORD_ENV}")]
	MissingPassword,

	#[error("No email provided: pass --email, set REVEAL_EMAIL, or run `reveal config set email <address>`")]
	MissingEmail,

	#[error("Invalid value for {key}: {reason}")]
	InvalidConfig { key: &'static str, reason: String },

	#[error("Failed to read config file {path}: {reason}")]
	ConfigFile { path: PathBuf, reason: String },

	#[error("{0}")]
	PollFailed(String),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Anyhow(#[from] anyhow::Error),
}

impl CliError {
	/// Machine-readable code printed alongside the message.
	pub fn code(&self) -> String {
		match self {
			CliError::Api(err) => err.code().map(str::to_string).unwrap_or_else(|| err.kind().to_string()),
			CliError::MissingPassword | CliError::MissingEmail => "MISSING_CREDENTIALS".to_string(),
			CliError::InvalidConfig { .. } | CliError::ConfigFile { .. } => "CONFIG_ERROR".to_string(),
			CliError::PollFailed(_) => "POLL_FAILED".to_string(),
			CliError::Io(_) => "IO_ERROR".to_string(),
			CliError::Json(_) => "JSON_ERROR".to_string(),
			CliError::Anyhow(_) => "LOCAL_ERROR".to_string(),
		}
	}

	/// Process exit status: 2 for usage and configuration problems, 1 otherwise.
	pub fn exit_code(&self) -> i32 {
		match self {
			CliError::MissingPassword | CliError::MissingEmail | CliError::InvalidConfig { .. } | CliError::ConfigFile { .. } => 2,
			_ => 1,
		}
	}
}

pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn api_errors_prefer_server_code() {
		let err = CliError::from(reveal::Error::validation(404, "Scan not found").with_code(Some("SCAN_NOT_FOUND".into())));
		assert_eq!(err.code(), "SCAN_NOT_FOUND");
		assert_eq!(err.exit_code(), 1);

		let err = CliError::from(reveal::Error::auth("expired"));
		assert_eq!(err.code(), "AUTH_ERROR");
	}

	#[test]
	fn credential_problems_are_usage_errors() {
		assert_eq!(CliError::MissingPassword.exit_code(), 2);
		assert_eq!(CliError::MissingPassword.code(), "MISSING_CREDENTIALS");
		assert!(CliError::MissingPassword.to_string().contains(PASSWORD_ENV));
	}
}
