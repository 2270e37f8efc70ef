//! Result envelope and text/JSON rendering.

use std::io::{self, Write};
use std::time::Instant;

use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use reveal::protocol::{ReportStatus, ScanStatus, TaskStatus};
use reveal::scoring::ScoreBand;
use serde::Serialize;

use crate::error::CliError;

/// Output format for command results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text
	#[default]
	Text,
	/// One JSON document per command
	Json,
}

impl std::fmt::Display for OutputFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			OutputFormat::Text => write!(f, "text"),
			OutputFormat::Json => write!(f, "json"),
		}
	}
}

/// The result envelope printed in JSON mode.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T: Serialize> {
	pub ok: bool,
	pub command: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,
	pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
	pub code: String,
	pub message: String,
}

/// Prints results for one command invocation.
pub struct Printer {
	format: OutputFormat,
	command: &'static str,
	started: Instant,
}

impl Printer {
	pub fn new(format: OutputFormat, command: &'static str) -> Self {
		Self {
			format,
			command,
			started: Instant::now(),
		}
	}

	pub fn is_text(&self) -> bool {
		self.format == OutputFormat::Text
	}

	/// Prints `data` as the JSON envelope, or `text` lines in text mode.
	pub fn success<T: Serialize>(&self, data: &T, text: impl FnOnce(&T) -> String) {
		match self.format {
			OutputFormat::Json => self.print_json(&CommandResult {
				ok: true,
				command: self.command.to_string(),
				data: Some(data),
				error: None,
				duration_ms: self.elapsed_ms(),
			}),
			OutputFormat::Text => {
				let mut stdout = io::stdout().lock();
				let _ = writeln!(stdout, "{}", text(data));
			}
		}
	}

	/// Progress line shown only in text mode.
	pub fn progress(&self, line: impl std::fmt::Display) {
		if self.is_text() {
			let mut stdout = io::stdout().lock();
			let _ = writeln!(stdout, "{line}");
		}
	}

	/// JSON envelope on stdout, or a colored line on stderr in text mode.
	pub fn failure(&self, error: &CliError) {
		let error = CommandError {
			code: error.code(),
			message: error.to_string(),
		};
		match self.format {
			OutputFormat::Json => self.print_json(&CommandResult::<()> {
				ok: false,
				command: self.command.to_string(),
				data: None,
				error: Some(error),
				duration_ms: self.elapsed_ms(),
			}),
			OutputFormat::Text => {
				eprintln!("{} [{}]: {}", "Error".red().bold(), error.code, error.message);
			}
		}
	}

	fn print_json<T: Serialize>(&self, result: &CommandResult<T>) {
		if let Ok(json) = serde_json::to_string_pretty(result) {
			println!("{json}");
		}
	}

	fn elapsed_ms(&self) -> u64 {
		self.started.elapsed().as_millis() as u64
	}
}

pub fn scan_status(status: ScanStatus) -> ColoredString {
	match status {
		ScanStatus::Pending => status.as_str().dimmed(),
		ScanStatus::Running => status.as_str().yellow(),
		ScanStatus::Completed => status.as_str().green(),
		ScanStatus::Failed => status.as_str().red(),
		ScanStatus::Aborted => status.as_str().magenta(),
	}
}

pub fn task_status(status: TaskStatus) -> ColoredString {
	let label = status.to_string();
	match status {
		TaskStatus::Pending => label.dimmed(),
		TaskStatus::Running => label.yellow(),
		TaskStatus::Completed => label.green(),
		TaskStatus::Failed => label.red(),
	}
}

pub fn report_status(status: ReportStatus) -> ColoredString {
	match status {
		ReportStatus::Generating => status.as_str().yellow(),
		ReportStatus::Ready => status.as_str().green(),
		ReportStatus::Failed => status.as_str().red(),
	}
}

pub fn score(value: f64, band: ScoreBand) -> ColoredString {
	let label = format!("{value:>5.1}");
	match band {
		ScoreBand::Good => label.green(),
		ScoreBand::Warning => label.yellow(),
		ScoreBand::Critical => label.red(),
	}
}
