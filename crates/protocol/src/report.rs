//! Report generation jobs.

use serde::{Deserialize, Serialize};

/// Output format of a generated report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
	#[default]
	Pdf,
	Html,
}

impl ReportFormat {
	pub fn as_str(&self) -> &'static str {
		match self {
			ReportFormat::Pdf => "pdf",
			ReportFormat::Html => "html",
		}
	}

	/// File extension used when saving a downloaded report.
	pub fn extension(&self) -> &'static str {
		self.as_str()
	}
}

impl std::fmt::Display for ReportFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl std::str::FromStr for ReportFormat {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"pdf" => Ok(ReportFormat::Pdf),
			"html" => Ok(ReportFormat::Html),
			_ => Err(format!("unknown report format: {s}")),
		}
	}
}

/// Status of a report job.
///
/// `generating -> {ready, failed}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
	Generating,
	Ready,
	Failed,
}

impl ReportStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			ReportStatus::Generating => "generating",
			ReportStatus::Ready => "ready",
			ReportStatus::Failed => "failed",
		}
	}
}

impl std::fmt::Display for ReportStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Report state for a scan job (`GET /api/reports/{id}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
	pub job_id: String,
	pub status: ReportStatus,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub download_url: Option<String>,
	pub format: ReportFormat,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub generated_at: Option<String>,
}

/// Body of `POST /api/reports/{id}/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportRequest {
	pub format: ReportFormat,
}

/// Payload returned by `POST /api/reports/{id}/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportResponse {
	pub report_id: String,
}
