use std::sync::Arc;

use reveal_protocol::{AdminLogEntry, AdminSettings, NewUser, PageRequest, PaginatedResponse, User, UserUpdate};
use serde_json::Value;

use super::segment;
use crate::error::Result;
use crate::pipeline::RequestPipeline;

/// Admin log pages default to 50 entries.
pub const DEFAULT_LOG_PAGE: PageRequest = PageRequest::new(1, 50);

/// `/api/admin/*`. Requires the `admin` role server-side.
#[derive(Clone)]
pub struct AdminApi {
	pipeline: Arc<RequestPipeline>,
}

impl AdminApi {
	pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
		Self { pipeline }
	}

	pub async fn users(&self, page: PageRequest) -> Result<PaginatedResponse<User>> {
		self.pipeline.get_json(&format!("/api/admin/users?{}", page.query())).await
	}

	pub async fn create_user(&self, user: &NewUser) -> Result<User> {
		self.pipeline.post_json("/api/admin/users", user).await
	}

	pub async fn update_user(&self, user_id: &str, update: &UserUpdate) -> Result<User> {
		self.pipeline.put_json(&format!("/api/admin/users/{}", segment(user_id)), update).await
	}

	pub async fn delete_user(&self, user_id: &str) -> Result<()> {
		let _: Value = self.pipeline.delete(&format!("/api/admin/users/{}", segment(user_id))).await?;
		Ok(())
	}

	pub async fn settings(&self) -> Result<AdminSettings> {
		self.pipeline.get_json("/api/admin/settings").await
	}

	pub async fn update_settings(&self, settings: &AdminSettings) -> Result<AdminSettings> {
		self.pipeline.put_json("/api/admin/settings", settings).await
	}

	pub async fn logs(&self, page: PageRequest) -> Result<PaginatedResponse<AdminLogEntry>> {
		self.pipeline.get_json(&format!("/api/admin/logs?{}", page.query())).await
	}
}
