use std::sync::Arc;

use reveal_protocol::{PageRequest, PaginatedResponse, UploadFile};
use serde_json::Value;

use super::segment;
use crate::error::Result;
use crate::pipeline::{RequestOptions, RequestPipeline};
use crate::transport::{Body, HttpRequest, MultipartFile};

const UPLOAD_PATH: &str = "/api/upload";

/// `/api/upload*`.
#[derive(Clone)]
pub struct UploadsApi {
	pipeline: Arc<RequestPipeline>,
}

impl UploadsApi {
	pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
		Self { pipeline }
	}

	/// Uploads one file as the multipart `file` field.
	pub async fn upload(&self, file_name: &str, content_type: &str, bytes: Vec<u8>) -> Result<UploadFile> {
		let body = Body::Multipart(MultipartFile {
			field: "file".to_string(),
			file_name: file_name.to_string(),
			content_type: content_type.to_string(),
			bytes,
		});
		self.pipeline.json(HttpRequest::post(UPLOAD_PATH).with_body(body), RequestOptions::default()).await
	}

	pub async fn list(&self, page: PageRequest) -> Result<PaginatedResponse<UploadFile>> {
		self.pipeline.get_json(&format!("{UPLOAD_PATH}?{}", page.query())).await
	}

	pub async fn delete(&self, file_id: &str) -> Result<()> {
		let _: Value = self.pipeline.delete(&format!("{UPLOAD_PATH}/{}", segment(file_id))).await?;
		Ok(())
	}
}
