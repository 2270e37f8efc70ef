use std::sync::Arc;

use reveal_protocol::{CreateScanRequest, CreateScanResponse, PageRequest, PaginatedResponse, ScanJob, ScanTask};
use serde_json::Value;

use super::segment;
use crate::error::Result;
use crate::pipeline::RequestPipeline;

/// `/api/scan` and `/api/scans/*`.
#[derive(Clone)]
pub struct ScansApi {
	pipeline: Arc<RequestPipeline>,
}

impl ScansApi {
	pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
		Self { pipeline }
	}

	/// Starts a scan over `targets` (domains, IPs, emails, phone numbers).
	pub async fn create(&self, targets: Vec<String>) -> Result<CreateScanResponse> {
		self.pipeline.post_json("/api/scan", &CreateScanRequest { targets }).await
	}

	pub async fn status(&self, job_id: &str) -> Result<ScanJob> {
		self.pipeline.get_json(&format!("/api/scans/{}/status", segment(job_id))).await
	}

	pub async fn tasks(&self, job_id: &str) -> Result<Vec<ScanTask>> {
		self.pipeline.get_json(&format!("/api/scans/{}/tasks", segment(job_id))).await
	}

	pub async fn abort(&self, job_id: &str) -> Result<()> {
		let _: Value = self.pipeline.post_empty(&format!("/api/scans/{}/abort", segment(job_id))).await?;
		Ok(())
	}

	pub async fn list(&self, page: PageRequest) -> Result<PaginatedResponse<ScanJob>> {
		self.pipeline.get_json(&format!("/api/scans?{}", page.query())).await
	}
}
