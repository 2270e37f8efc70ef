//! Persistent CLI settings in `~/.config/reveal/config.json`.
//!
//! Only non-secret settings live here. Access tokens exist in memory for the
//! duration of one command and the password is always read from
//! [`PASSWORD_ENV`].

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use reveal::ClientConfig;
use reveal::config::{ENV_API_URL, ENV_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

pub const PASSWORD_ENV: &str = "REVEAL_PASSWORD";

/// Settings file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub api_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timeout_secs: Option<u64>,
}

/// Keys accepted by `reveal config set`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
	ApiUrl,
	Email,
	TimeoutSecs,
}

impl ConfigKey {
	pub fn as_str(&self) -> &'static str {
		match self {
			ConfigKey::ApiUrl => "api-url",
			ConfigKey::Email => "email",
			ConfigKey::TimeoutSecs => "timeout-secs",
		}
	}
}

impl CliConfig {
	pub fn default_path() -> PathBuf {
		dirs::config_dir()
			.unwrap_or_else(|| PathBuf::from("."))
			.join("reveal")
			.join("config.json")
	}

	/// Loads `path`; a missing file yields the defaults.
	pub fn load(path: &Path) -> Result<Self> {
		let content = match fs::read_to_string(path) {
			Ok(content) => content,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
			Err(err) => {
				return Err(CliError::ConfigFile {
					path: path.to_path_buf(),
					reason: err.to_string(),
				});
			}
		};

		serde_json::from_str(&content).map_err(|err| CliError::ConfigFile {
			path: path.to_path_buf(),
			reason: err.to_string(),
		})
	}

	pub fn save(&self, path: &Path) -> Result<()> {
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)?;
		}
		let json = serde_json::to_string_pretty(self)?;
		fs::write(path, json)?;
		Ok(())
	}

	/// Validates and stores one setting.
	pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
		let value = value.trim();
		match key {
			ConfigKey::ApiUrl => {
				if !(value.starts_with("http://") || value.starts_with("https://")) {
					return Err(CliError::InvalidConfig {
						key: key.as_str(),
						reason: format!("'{value}' is not an http(s) URL"),
					});
				}
				self.api_url = Some(value.trim_end_matches('/').to_string());
			}
			ConfigKey::Email => {
				if !value.contains('@') {
					return Err(CliError::InvalidConfig {
						key: key.as_str(),
						reason: format!("'{value}' is not an email address"),
					});
				}
				self.email = Some(value.to_string());
			}
			ConfigKey::TimeoutSecs => {
				let secs = value.parse::<u64>().ok().filter(|secs| *secs > 0).ok_or_else(|| CliError::InvalidConfig {
					key: key.as_str(),
					reason: format!("'{value}' is not a positive number of seconds"),
				})?;
				self.timeout_secs = Some(secs);
			}
		}
		Ok(())
	}

	/// File value for one of the client's environment keys.
	fn lookup(&self, env_key: &str) -> Option<String> {
		match env_key {
			ENV_API_URL => self.api_url.clone(),
			ENV_TIMEOUT_SECS => self.timeout_secs.map(|secs| secs.to_string()),
			_ => None,
		}
	}

	/// Builds the client configuration: flag, then environment, then this file, then defaults.
	pub fn client_config(&self, api_url_flag: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Result<ClientConfig> {
		let config = ClientConfig::from_lookup(|key| env(key).or_else(|| self.lookup(key)))?;
		Ok(match api_url_flag {
			Some(url) => config.with_base_url(url),
			None => config,
		})
	}

	/// Email to sign in with: flag, then environment, then this file.
	pub fn resolve_email(&self, email_flag: Option<&str>) -> Result<String> {
		email_flag
			.map(str::to_string)
			.or_else(|| self.email.clone())
			.filter(|email| !email.trim().is_empty())
			.ok_or(CliError::MissingEmail)
	}
}
