use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::cli::ConfigAction;
use crate::config::CliConfig;
use crate::error::Result;
use crate::output::Printer;

/// Settings after applying flags and environment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EffectiveSettings {
	config_file: PathBuf,
	api_url: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	email: Option<String>,
	timeout_secs: u64,
	stored: CliConfig,
}

pub fn execute(action: ConfigAction, mut settings: CliConfig, path: &Path, api_url: Option<&str>, email: Option<&str>, printer: &Printer) -> Result<()> {
	match action {
		ConfigAction::Show => {
			let client = settings.client_config(api_url, |key| std::env::var(key).ok())?;
			let effective = EffectiveSettings {
				config_file: path.to_path_buf(),
				api_url: client.base_url,
				email: settings.resolve_email(email).ok(),
				timeout_secs: client.request_timeout.as_secs(),
				stored: settings,
			};
			printer.success(&effective, |e| {
				format!(
					"config file: {}\napi url:     {}\nemail:       {}\ntimeout:     {}s",
					e.config_file.display(),
					e.api_url,
					e.email.as_deref().unwrap_or("(not set)"),
					e.timeout_secs
				)
			});
			Ok(())
		}
		ConfigAction::Set { key, value } => {
			settings.set(key, &value)?;
			settings.save(path)?;
			info!(target = "reveal", key = key.as_str(), path = %path.display(), "setting saved");
			printer.success(&settings, |_| format!("{} saved to {}", key.as_str(), path.display()));
			Ok(())
		}
		ConfigAction::Path => {
			printer.success(&path, |path| path.display().to_string());
			Ok(())
		}
	}
}
