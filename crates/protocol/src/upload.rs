//! Uploaded evidence files.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
	Uploading,
	Uploaded,
	Failed,
}

impl std::fmt::Display for UploadStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			UploadStatus::Uploading => write!(f, "uploading"),
			UploadStatus::Uploaded => write!(f, "uploaded"),
			UploadStatus::Failed => write!(f, "failed"),
		}
	}
}

/// File metadata returned by the upload endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFile {
	pub id: String,
	pub filename: String,
	pub size: u64,
	#[serde(rename = "type")]
	pub content_type: String,
	pub uploaded_at: String,
	pub status: UploadStatus,
}
