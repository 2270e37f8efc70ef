//! Scan jobs, their targets and per-job tasks.

use serde::{Deserialize, Serialize};

/// Kind of a scan target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
	Domain,
	Ip,
	Email,
	Phone,
}

/// A single target attached to a scan job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanTarget {
	pub id: String,
	pub value: String,
	#[serde(rename = "type")]
	pub target_type: TargetType,
}

/// Status of a scan job.
///
/// `pending -> running -> {completed, failed, aborted}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
	Pending,
	Running,
	Completed,
	Failed,
	Aborted,
}

impl ScanStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			ScanStatus::Pending => "pending",
			ScanStatus::Running => "running",
			ScanStatus::Completed => "completed",
			ScanStatus::Failed => "failed",
			ScanStatus::Aborted => "aborted",
		}
	}
}

impl std::fmt::Display for ScanStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Server-tracked scan job (`GET /api/scans/{id}/status`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanJob {
	pub id: String,
	#[serde(default)]
	pub targets: Vec<ScanTarget>,
	pub status: ScanStatus,
	#[serde(default)]
	pub progress: f64,
	pub created_at: String,
	pub updated_at: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub completed_at: Option<String>,
}

/// Status of an individual scan task.
///
/// `pending -> running -> {completed, failed}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
	Pending,
	Running,
	Completed,
	Failed,
}

impl TaskStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			TaskStatus::Pending => "pending",
			TaskStatus::Running => "running",
			TaskStatus::Completed => "completed",
			TaskStatus::Failed => "failed",
		}
	}
}

impl std::fmt::Display for TaskStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One unit of work inside a scan job (`GET /api/scans/{id}/tasks`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanTask {
	pub id: String,
	pub job_id: String,
	pub name: String,
	pub status: TaskStatus,
	#[serde(default)]
	pub progress: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub started_at: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub completed_at: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

/// Body of `POST /api/scan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScanRequest {
	pub targets: Vec<String>,
}

/// Payload returned by `POST /api/scan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScanResponse {
	pub job_id: String,
}
