use std::sync::Arc;

use reveal_protocol::{GenerateReportRequest, GenerateReportResponse, ReportData, ReportFormat};

use super::segment;
use crate::error::Result;
use crate::pipeline::{RequestOptions, RequestPipeline};
use crate::transport::HttpRequest;

/// `/api/reports/*`.
#[derive(Clone)]
pub struct ReportsApi {
	pipeline: Arc<RequestPipeline>,
}

impl ReportsApi {
	pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
		Self { pipeline }
	}

	pub async fn generate(&self, job_id: &str, format: ReportFormat) -> Result<GenerateReportResponse> {
		self.pipeline
			.post_json(&format!("/api/reports/{}/generate", segment(job_id)), &GenerateReportRequest { format })
			.await
	}

	pub async fn status(&self, job_id: &str) -> Result<ReportData> {
		self.pipeline.get_json(&format!("/api/reports/{}", segment(job_id))).await
	}

	/// Downloads the rendered report as raw bytes.
	pub async fn download(&self, job_id: &str, format: ReportFormat) -> Result<Vec<u8>> {
		let path = format!("/api/reports/{}/download?format={}", segment(job_id), format.as_str());
		self.pipeline.bytes(HttpRequest::get(path), RequestOptions::binary()).await
	}
}
