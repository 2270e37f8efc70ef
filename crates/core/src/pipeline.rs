//! Request pipeline: every outbound API call goes through here.
//!
//! Stages, applied in order for each attempt:
//!
//! 1. [`attach_auth`] - copy the logical request and add `Authorization: Bearer`
//! 2. transport - send; no response -> [`classify::transport_failure`]
//! 3. [`RequestPipeline::send`] - on 401 with [`RequestState::Fresh`], refresh
//!    once (single-flight) and re-issue the untouched logical request as
//!    [`RequestState::RetriedAfterRefresh`]; a second 401 ends the session
//! 4. [`classify::error_response`] for any remaining non-2xx status
//! 5. [`decode_envelope`] unwraps `{data, error, message}` for JSON calls
//!
//! A logical request is retried at most once for authorization. Timeouts
//! and other transport failures are classified as `Network` errors and do
//! not consume that retry.

use std::sync::Arc;

use reveal_protocol::RawEnvelope;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::classify;
use crate::context::{SessionContext, SessionEnd};
use crate::error::Result;
use crate::refresh::RefreshCoordinator;
use crate::token::AccessToken;
use crate::transport::{AUTHORIZATION, Body, HttpRequest, HttpResponse, Transport};

/// Whether a request carries the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
	/// Attach the bearer token and recover from one 401 via refresh.
	#[default]
	Bearer,
	/// Never attach a token; a 401 is final (login, register).
	Anonymous,
}

/// How the success body is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseKind {
	/// JSON envelope, unwrapped to its `data`.
	#[default]
	Json,
	/// Raw bytes (report downloads).
	Binary,
}

/// Per-call options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestOptions {
	pub auth: AuthMode,
	pub response: ResponseKind,
}

impl RequestOptions {
	pub fn anonymous() -> Self {
		Self {
			auth: AuthMode::Anonymous,
			response: ResponseKind::Json,
		}
	}

	pub fn binary() -> Self {
		Self {
			auth: AuthMode::Bearer,
			response: ResponseKind::Binary,
		}
	}
}

/// Authorization-retry state carried with one logical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
	/// No 401 seen yet; one refresh-and-retry is still available.
	Fresh,
	/// Already retried with a refreshed token; another 401 is final.
	RetriedAfterRefresh,
}

impl RequestState {
	pub fn may_refresh(&self) -> bool {
		matches!(self, RequestState::Fresh)
	}
}

/// Executes API calls with the session's credentials.
pub struct RequestPipeline {
	transport: Arc<dyn Transport>,
	session: Arc<SessionContext>,
	refresh: RefreshCoordinator,
}

impl RequestPipeline {
	pub fn new(transport: Arc<dyn Transport>, session: Arc<SessionContext>) -> Self {
		Self {
			transport,
			session,
			refresh: RefreshCoordinator::new(),
		}
	}

	pub fn session(&self) -> &Arc<SessionContext> {
		&self.session
	}

	/// The single-flight refresh coordinator used by this pipeline.
	pub fn refresher(&self) -> &RefreshCoordinator {
		&self.refresh
	}

	/// Explicitly refreshes the access token (used when restoring a session).
	pub async fn refresh_token(&self) -> Result<AccessToken> {
		let stale = self.session.tokens().get();
		self.refresh.refresh(&self.transport, &self.session, stale.as_ref()).await
	}

	/// Runs `request` through auth, refresh-and-retry and classification.
	///
	/// Resolves with the raw 2xx response; the body is not inspected.
	pub async fn send(&self, request: HttpRequest, options: RequestOptions) -> Result<HttpResponse> {
		let mut state = RequestState::Fresh;

		loop {
			let token = match options.auth {
				AuthMode::Bearer => self.session.tokens().get(),
				AuthMode::Anonymous => None,
			};
			let prepared = attach_auth(&request, token.as_ref());

			let response = self.transport.execute(prepared).await.map_err(|err| {
				let classified = classify::transport_failure(&err);
				debug!(
					target = "reveal.pipeline",
					method = %request.method,
					path = %request.path,
					error = %err,
					"no response"
				);
				classified
			})?;

			if response.status == 401 && options.auth == AuthMode::Bearer {
				if state.may_refresh() {
					debug!(
						target = "reveal.pipeline",
						method = %request.method,
						path = %request.path,
						"401 received; refreshing token"
					);
					self.refresh.refresh(&self.transport, &self.session, token.as_ref()).await?;
					state = RequestState::RetriedAfterRefresh;
					continue;
				}

				warn!(
					target = "reveal.pipeline",
					method = %request.method,
					path = %request.path,
					"401 after refresh; ending session"
				);
				let err = classify::error_response(&response);
				self.session.end(SessionEnd::Expired {
					reason: err.message().to_string(),
				});
				return Err(err);
			}

			if !response.is_success() {
				let err = classify::error_response(&response);
				debug!(
					target = "reveal.pipeline",
					method = %request.method,
					path = %request.path,
					status = response.status,
					kind = %err.kind(),
					"request failed"
				);
				return Err(err);
			}

			return Ok(response);
		}
	}

	/// Sends `request` and unwraps the JSON envelope into `T`.
	pub async fn json<T: DeserializeOwned>(&self, request: HttpRequest, options: RequestOptions) -> Result<T> {
		let route = request.route().to_string();
		let response = self.send(request, RequestOptions { response: ResponseKind::Json, ..options }).await?;
		decode_envelope(&route, &response)
	}

	/// Sends `request` and returns the raw success body.
	pub async fn bytes(&self, request: HttpRequest, options: RequestOptions) -> Result<Vec<u8>> {
		let response = self.send(request, RequestOptions { response: ResponseKind::Binary, ..options }).await?;
		Ok(response.body)
	}

	pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
		self.json(HttpRequest::get(path), RequestOptions::default()).await
	}

	pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
		self.json(HttpRequest::post(path).with_body(Body::json(body)?), RequestOptions::default()).await
	}

	pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
		self.json(HttpRequest::post(path), RequestOptions::default()).await
	}

	pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
		self.json(HttpRequest::put(path).with_body(Body::json(body)?), RequestOptions::default()).await
	}

	pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
		self.json(HttpRequest::delete(path), RequestOptions::default()).await
	}
}

/// Copies `request` and attaches the bearer token, if any.
///
/// The logical request is never mutated, so a retry replays the original
/// method, path and body exactly.
pub fn attach_auth(request: &HttpRequest, token: Option<&AccessToken>) -> HttpRequest {
	match token {
		Some(token) => request.clone().with_header(AUTHORIZATION, token.bearer()),
		None => request.clone(),
	}
}

/// Unwraps a 2xx JSON envelope into `T`.
///
/// An envelope `error` fails the call even on a 2xx status. A missing or
/// `null` `data` decodes as JSON `null`, which suits `()` and `Option<_>`.
pub fn decode_envelope<T: DeserializeOwned>(route: &str, response: &HttpResponse) -> Result<T> {
	let envelope: RawEnvelope = if response.body.iter().all(u8::is_ascii_whitespace) {
		RawEnvelope::ok(Value::Null)
	} else {
		serde_json::from_slice(&response.body).map_err(|e| classify::decode_failure(route, &e))?
	};

	if envelope.is_error() {
		return Err(classify::envelope_failure(response.status, &envelope));
	}

	let data = envelope.data.unwrap_or(Value::Null);
	serde_json::from_value(data).map_err(|e| classify::decode_failure(route, &e))
}
