use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use reveal::RevealClient;
use reveal::protocol::{ReportData, ReportFormat, ReportStatus};
use serde::Serialize;
use tracing::info;

use super::follow;
use crate::cli::ReportAction;
use crate::error::{CliError, Result};
use crate::output::{self, Printer};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Downloaded {
	job_id: String,
	format: ReportFormat,
	path: PathBuf,
	bytes: usize,
}

pub async fn execute(action: ReportAction, client: &RevealClient, printer: &Printer) -> Result<()> {
	match action {
		ReportAction::Generate { job_id, format, wait } => {
			let format = ReportFormat::from(format);
			let generated = client.reports().generate(&job_id, format).await?;
			info!(target = "reveal", %job_id, report_id = %generated.report_id, %format, "report requested");

			if !wait {
				printer.success(&generated, |generated| format!("Generating {format} report {}", generated.report_id.bold()));
				return Ok(());
			}

			let report = match follow(client.watch_report(&job_id), printer, render).await? {
				Some(report) => report,
				None => client.reports().status(&job_id).await?,
			};
			if report.status == ReportStatus::Failed {
				return Err(CliError::PollFailed(format!("Report generation failed for scan {job_id}")));
			}
			if !printer.is_text() {
				printer.success(&report, render);
			}
			Ok(())
		}
		ReportAction::Status { job_id } => {
			let report = client.reports().status(&job_id).await?;
			printer.success(&report, render);
			Ok(())
		}
		ReportAction::Download { job_id, format, output } => {
			let format = ReportFormat::from(format);
			let path = output.unwrap_or_else(|| default_path(&job_id, format));
			let bytes = client.reports().download(&job_id, format).await?;

			tokio::fs::write(&path, &bytes)
				.await
				.with_context(|| format!("failed to write report to {}", path.display()))?;
			info!(target = "reveal", %job_id, path = %path.display(), bytes = bytes.len(), "report saved");

			let downloaded = Downloaded {
				job_id,
				format,
				path,
				bytes: bytes.len(),
			};
			printer.success(&downloaded, |d| format!("Saved {} ({} bytes)", d.path.display(), d.bytes));
			Ok(())
		}
	}
}

fn default_path(job_id: &str, format: ReportFormat) -> PathBuf {
	let safe: String = job_id
		.chars()
		.map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
		.collect();
	Path::new(".").join(format!("report-{safe}.{}", format.extension()))
}

fn render(report: &ReportData) -> String {
	let mut line = format!("{} {} report: {}", report.job_id.bold(), report.format, output::report_status(report.status));
	if let Some(url) = &report.download_url {
		line.push_str(&format!("  {url}"));
	}
	line
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_path_is_sanitized() {
		assert_eq!(default_path("job-1", ReportFormat::Pdf), Path::new(".").join("report-job-1.pdf"));
		assert_eq!(default_path("../etc/x", ReportFormat::Html), Path::new(".").join("report-___etc_x.html"));
	}
}
