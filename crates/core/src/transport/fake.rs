//! Fake transport for exercising the pipeline, refresh and polling without a server.
//!
//! Requests are answered by a handler closure and recorded, so tests can
//! assert on exactly what went over the "wire".
//!
//! # Example
//!
//! ```ignore
//! let (transport, controller) = FakeTransportBuilder::new()
//!     .respond(|req| match req.route() {
//!         "/api/auth/me" => fake::ok(json!({"id": "1", ...})),
//!         _ => fake::status(404, "not found"),
//!     })
//!     .build();
//!
//! let pipeline = RequestPipeline::new(Arc::new(transport), session);
//! pipeline.get_json::<User>("/api/auth/me").await?;
//! assert_eq!(controller.count("/api/auth/me"), 1);
//! ```

use std::future::Future;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use serde_json::{Value, json};

use super::{HttpRequest, HttpResponse, Method, Transport, TransportError, TransportFuture};

type Handler = Arc<dyn Fn(HttpRequest) -> BoxFuture<'static, Result<HttpResponse, TransportError>> + Send + Sync>;

/// Builder for creating fake transport instances.
pub struct FakeTransportBuilder {
	handler: Option<Handler>,
}

impl FakeTransportBuilder {
	/// Create a new fake transport builder.
	///
	/// Without a handler every request is answered with `404`.
	pub fn new() -> Self {
		Self { handler: None }
	}

	/// Answers requests synchronously.
	pub fn respond<F>(self, f: F) -> Self
	where
		F: Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static,
	{
		self.handle(move |req| {
			let response = f(&req);
			async move { Ok(response) }
		})
	}

	/// Answers requests with an async handler that may fail at the transport level.
	pub fn handle<F, Fut>(mut self, f: F) -> Self
	where
		F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<HttpResponse, TransportError>> + Send + 'static,
	{
		self.handler = Some(Arc::new(move |req| f(req).boxed()));
		self
	}

	/// Build the fake transport and return both it and a controller.
	///
	/// The [`FakeTransportController`] inspects requests after the transport
	/// has been moved into a pipeline.
	pub fn build(self) -> (FakeTransport, FakeTransportController) {
		let sent = Arc::new(Mutex::new(Vec::new()));
		let handler: Handler = match self.handler {
			Some(handler) => handler,
			None => Arc::new(|_req: HttpRequest| async { Ok::<_, TransportError>(status(404, "no handler configured")) }.boxed()),
		};

		let transport = FakeTransport {
			handler,
			sent: Arc::clone(&sent),
		};
		let controller = FakeTransportController { sent };
		(transport, controller)
	}
}

impl Default for FakeTransportBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// In-memory [`Transport`].
pub struct FakeTransport {
	handler: Handler,
	sent: Arc<Mutex<Vec<HttpRequest>>>,
}

impl Transport for FakeTransport {
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_> {
		self.sent.lock().push(request.clone());
		(self.handler)(request)
	}
}

/// Inspects requests seen by a [`FakeTransport`].
#[derive(Clone)]
pub struct FakeTransportController {
	sent: Arc<Mutex<Vec<HttpRequest>>>,
}

impl FakeTransportController {
	/// Snapshot of every request sent so far, in order.
	pub fn sent(&self) -> Vec<HttpRequest> {
		self.sent.lock().clone()
	}

	/// Take all sent requests, clearing the buffer.
	pub fn take_sent(&self) -> Vec<HttpRequest> {
		std::mem::take(&mut *self.sent.lock())
	}

	/// Number of requests whose route (path without query) equals `route`.
	pub fn count(&self, route: &str) -> usize {
		self.sent.lock().iter().filter(|req| req.route() == route).count()
	}

	/// Number of requests matching both method and route.
	pub fn count_method(&self, method: Method, route: &str) -> usize {
		self.sent.lock().iter().filter(|req| req.method == method && req.route() == route).count()
	}

	/// Requests sent to `route`, in order.
	pub fn requests_to(&self, route: &str) -> Vec<HttpRequest> {
		self.sent.lock().iter().filter(|req| req.route() == route).cloned().collect()
	}
}

/// `200` envelope carrying `data`.
pub fn ok(data: Value) -> HttpResponse {
	HttpResponse::json(200, &json!({ "data": data }))
}

/// Envelope with an `error` field and the given status.
pub fn status(code: u16, error: &str) -> HttpResponse {
	HttpResponse::json(code, &json!({ "error": error }))
}

/// `401` as the API sends it for an expired or missing bearer token.
pub fn unauthorized() -> HttpResponse {
	status(401, "Unauthorized")
}

/// `200` refresh response carrying `token`.
pub fn refreshed(token: &str) -> HttpResponse {
	ok(json!({ "accessToken": token }))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn records_requests_and_answers_with_handler() {
		let (transport, controller) = FakeTransportBuilder::new()
			.respond(|req| if req.route() == "/api/auth/me" { ok(json!({"id": "1"})) } else { status(404, "missing") })
			.build();

		let response = transport.execute(HttpRequest::get("/api/auth/me")).await.unwrap();
		assert_eq!(response.status, 200);

		let response = transport.execute(HttpRequest::get("/api/nope?x=1")).await.unwrap();
		assert_eq!(response.status, 404);

		assert_eq!(controller.count("/api/auth/me"), 1);
		assert_eq!(controller.count("/api/nope"), 1);
		assert_eq!(controller.take_sent().len(), 2);
		assert!(controller.sent().is_empty());
	}

	#[tokio::test]
	async fn default_handler_returns_not_found() {
		let (transport, _controller) = FakeTransportBuilder::new().build();
		let response = transport.execute(HttpRequest::post("/api/scan")).await.unwrap();
		assert_eq!(response.status, 404);
	}
}
