use std::sync::Arc;

use reveal_protocol::{AuthResponse, LoginCredentials, RegisterCredentials, User};
use serde_json::Value;

use crate::error::Result;
use crate::pipeline::{RequestOptions, RequestPipeline};
use crate::token::AccessToken;
use crate::transport::{Body, HttpRequest};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";
pub const LOGOUT_PATH: &str = "/api/auth/logout";
pub const ME_PATH: &str = "/api/auth/me";

/// `/api/auth/*`.
#[derive(Clone)]
pub struct AuthApi {
	pipeline: Arc<RequestPipeline>,
}

impl AuthApi {
	pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
		Self { pipeline }
	}

	/// Exchanges credentials for an access token. Never refreshes on 401.
	pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse> {
		let request = HttpRequest::post(LOGIN_PATH).with_body(Body::json(credentials)?);
		self.pipeline.json(request, RequestOptions::anonymous()).await
	}

	pub async fn register(&self, credentials: &RegisterCredentials) -> Result<AuthResponse> {
		let request = HttpRequest::post(REGISTER_PATH).with_body(Body::json(credentials)?);
		self.pipeline.json(request, RequestOptions::anonymous()).await
	}

	pub async fn logout(&self) -> Result<()> {
		let _: Value = self.pipeline.post_empty(LOGOUT_PATH).await?;
		Ok(())
	}

	/// Mints a new access token from the refresh cookie.
	///
	/// Shares the pipeline's single in-flight refresh.
	pub async fn refresh(&self) -> Result<AccessToken> {
		self.pipeline.refresh_token().await
	}

	pub async fn me(&self) -> Result<User> {
		self.pipeline.get_json(ME_PATH).await
	}
}
