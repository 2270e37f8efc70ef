use colored::Colorize;
use reveal::RevealClient;
use reveal::protocol::{PageRequest, PaginatedResponse, ScanJob, ScanTask};
use serde_json::json;
use tracing::info;

use super::follow;
use crate::cli::ScanAction;
use crate::error::Result;
use crate::output::{self, Printer};

pub async fn execute(action: ScanAction, client: &RevealClient, printer: &Printer) -> Result<()> {
	match action {
		ScanAction::Start { targets, watch } => start(client, targets, watch, printer).await,
		ScanAction::Status { job_id, watch } => status(client, &job_id, watch, printer).await,
		ScanAction::Tasks { job_id, watch } => tasks(client, &job_id, watch, printer).await,
		ScanAction::Abort { job_id } => {
			client.scans().abort(&job_id).await?;
			info!(target = "reveal", %job_id, "scan aborted");
			printer.success(&json!({ "jobId": job_id, "aborted": true }), |_| format!("Aborted scan {job_id}"));
			Ok(())
		}
		ScanAction::List { page } => {
			let scans = client.scans().list(PageRequest::new(page.page, page.page_size)).await?;
			printer.success(&scans, render_page);
			Ok(())
		}
	}
}

async fn start(client: &RevealClient, targets: Vec<String>, watch: bool, printer: &Printer) -> Result<()> {
	let created = client.scans().create(targets).await?;
	info!(target = "reveal", job_id = %created.job_id, "scan started");

	if !watch {
		printer.success(&created, |created| format!("Started scan {}", created.job_id.bold()));
		return Ok(());
	}

	printer.progress(format!("Started scan {}", created.job_id.bold()));
	status(client, &created.job_id, true, printer).await
}

async fn status(client: &RevealClient, job_id: &str, watch: bool, printer: &Printer) -> Result<()> {
	let job = if watch {
		match follow(client.watch_scan(job_id), printer, render_job).await? {
			Some(job) => job,
			None => client.scans().status(job_id).await?,
		}
	} else {
		client.scans().status(job_id).await?
	};

	// progress lines already showed the final state in text mode
	if watch && printer.is_text() {
		return Ok(());
	}
	printer.success(&job, render_job);
	Ok(())
}

async fn tasks(client: &RevealClient, job_id: &str, watch: bool, printer: &Printer) -> Result<()> {
	let tasks = if watch {
		match follow(client.watch_scan_tasks(job_id), printer, |tasks| render_tasks(tasks)).await? {
			Some(tasks) => tasks,
			None => client.scans().tasks(job_id).await?,
		}
	} else {
		client.scans().tasks(job_id).await?
	};

	if watch && printer.is_text() {
		return Ok(());
	}
	printer.success(&tasks, |tasks| render_tasks(tasks));
	Ok(())
}

fn render_job(job: &ScanJob) -> String {
	let targets: Vec<&str> = job.targets.iter().map(|target| target.value.as_str()).collect();
	format!(
		"{}  {:<10} {:>3.0}%  {}",
		job.id.bold(),
		output::scan_status(job.status),
		job.progress,
		targets.join(", ")
	)
}

fn render_tasks(tasks: &[ScanTask]) -> String {
	if tasks.is_empty() {
		return "No tasks scheduled yet".dimmed().to_string();
	}
	tasks
		.iter()
		.map(|task| {
			let error = task.error.as_deref().map(|e| format!("  {}", e.red())).unwrap_or_default();
			format!("{:<24} {:<10} {:>3.0}%{error}", task.name, output::task_status(task.status), task.progress)
		})
		.collect::<Vec<_>>()
		.join("\n")
}

fn render_page(page: &PaginatedResponse<ScanJob>) -> String {
	let mut lines: Vec<String> = page.data.iter().map(render_job).collect();
	lines.push(format!("page {}/{} ({} scans)", page.page, page.total_pages.max(1), page.total).dimmed().to_string());
	lines.join("\n")
}

#[cfg(test)]
mod tests {
	use reveal::protocol::{ScanStatus, TaskStatus};

	use super::*;

	fn task(name: &str, status: TaskStatus, error: Option<&str>) -> ScanTask {
		ScanTask {
			id: name.into(),
			job_id: "job-1".into(),
			name: name.into(),
			status,
			progress: 50.0,
			started_at: None,
			completed_at: None,
			error: error.map(str::to_string),
		}
	}

	#[test]
	fn task_table_lists_errors() {
		colored::control::set_override(false);
		let text = render_tasks(&[task("whois", TaskStatus::Completed, None), task("dns", TaskStatus::Failed, Some("timeout"))]);
		let lines: Vec<&str> = text.lines().collect();
		assert_eq!(lines.len(), 2);
		assert!(lines[0].starts_with("whois"));
		assert!(lines[1].ends_with("timeout"));
	}

	#[test]
	fn empty_task_list_is_explained() {
		colored::control::set_override(false);
		assert_eq!(render_tasks(&[]), "No tasks scheduled yet");
	}

	#[test]
	fn job_line_has_status_and_progress() {
		colored::control::set_override(false);
		let job = ScanJob {
			id: "job-1".into(),
			targets: vec![],
			status: ScanStatus::Running,
			progress: 42.0,
			created_at: String::new(),
			updated_at: String::new(),
			completed_at: None,
		};
		let line = render_job(&job);
		assert!(line.contains("running"));
		assert!(line.contains(" 42%"));
	}
}
