use std::path::Path;

use anyhow::{Context, anyhow};
use colored::Colorize;
use reveal::RevealClient;
use reveal::protocol::{PageRequest, PaginatedResponse, UploadFile};
use serde_json::json;
use tracing::info;

use crate::cli::UploadAction;
use crate::error::Result;
use crate::output::Printer;

pub async fn execute(action: UploadAction, client: &RevealClient, printer: &Printer) -> Result<()> {
	match action {
		UploadAction::Add { file, content_type } => {
			let file_name = file
				.file_name()
				.and_then(|name| name.to_str())
				.ok_or_else(|| anyhow!("{} has no usable file name", file.display()))?
				.to_string();
			let content_type = content_type.unwrap_or_else(|| guess_content_type(&file).to_string());
			let bytes = tokio::fs::read(&file)
				.await
				.with_context(|| format!("failed to read {}", file.display()))?;

			info!(target = "reveal", %file_name, %content_type, bytes = bytes.len(), "uploading");
			let uploaded = client.uploads().upload(&file_name, &content_type, bytes).await?;
			printer.success(&uploaded, render_file);
			Ok(())
		}
		UploadAction::List { page } => {
			let files = client.uploads().list(PageRequest::new(page.page, page.page_size)).await?;
			printer.success(&files, render_page);
			Ok(())
		}
		UploadAction::Rm { id } => {
			client.uploads().delete(&id).await?;
			printer.success(&json!({ "id": id, "deleted": true }), |_| format!("Deleted {id}"));
			Ok(())
		}
	}
}

fn guess_content_type(path: &Path) -> &'static str {
	match path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase).as_deref() {
		Some("csv") => "text/csv",
		Some("txt") => "text/plain",
		Some("json") => "application/json",
		Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
		_ => "application/octet-stream",
	}
}

fn render_file(file: &UploadFile) -> String {
	format!("{}  {:<28} {:>9} B  {}", file.id.bold(), file.filename, file.size, file.status)
}

fn render_page(page: &PaginatedResponse<UploadFile>) -> String {
	let mut lines: Vec<String> = page.data.iter().map(render_file).collect();
	lines.push(format!("page {}/{} ({} files)", page.page, page.total_pages.max(1), page.total).dimmed().to_string());
	lines.join("\n")
}
