//! Transport layer: the raw HTTP exchange underneath the request pipeline.
//!
//! A [`Transport`] takes a fully prepared [`HttpRequest`] and returns the
//! raw [`HttpResponse`] or a [`TransportError`] when no response arrived.
//! It knows nothing about tokens, envelopes or retries; those live in
//! [`crate::pipeline`].
//!
//! Two implementations ship with the crate:
//! - [`http::HttpTransport`] - reqwest-backed, with a cookie jar for the
//!   server-held refresh cookie and a fixed request timeout
//! - [`fake::FakeTransport`] - in-memory, handler-driven, for tests

pub mod fake;
pub mod http;

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

pub use self::http::HttpTransport;

/// Header carrying the bearer token.
pub const AUTHORIZATION: &str = "Authorization";

/// HTTP method subset used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
	Get,
	Post,
	Put,
	Delete,
}

impl Method {
	pub fn as_str(&self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Delete => "DELETE",
		}
	}
}

impl std::fmt::Display for Method {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A file sent as `multipart/form-data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartFile {
	pub field: String,
	pub file_name: String,
	pub content_type: String,
	pub bytes: Vec<u8>,
}

/// Request payload.
///
/// Bodies are held as owned bytes so a retried request replays exactly what
/// the first attempt sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
	Json(Vec<u8>),
	Multipart(MultipartFile),
}

impl Body {
	/// Serializes `value` into a JSON body.
	pub fn json<T: serde::Serialize + ?Sized>(value: &T) -> serde_json::Result<Self> {
		serde_json::to_vec(value).map(Body::Json)
	}
}

/// A request as handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
	pub method: Method,
	/// Path plus optional query, relative to the API base URL.
	pub path: String,
	pub headers: Vec<(String, String)>,
	pub body: Option<Body>,
}

impl HttpRequest {
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			headers: Vec::new(),
			body: None,
		}
	}

	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::Get, path)
	}

	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::Post, path)
	}

	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::Put, path)
	}

	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::Delete, path)
	}

	pub fn with_body(mut self, body: Body) -> Self {
		self.body = Some(body);
		self
	}

	/// Sets a header, replacing any existing value (names compare case-insensitively).
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		let name = name.into();
		self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
		self.headers.push((name, value.into()));
		self
	}

	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(existing, _)| existing.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}

	pub fn authorization(&self) -> Option<&str> {
		self.header(AUTHORIZATION)
	}

	/// Path without the query string.
	pub fn route(&self) -> &str {
		self.path.split('?').next().unwrap_or(&self.path)
	}

	/// JSON body bytes, if the body is JSON.
	pub fn json_body(&self) -> Option<&[u8]> {
		match &self.body {
			Some(Body::Json(bytes)) => Some(bytes),
			_ => None,
		}
	}
}

/// A raw response as received from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
	pub status: u16,
	pub content_type: Option<String>,
	pub body: Vec<u8>,
}

impl HttpResponse {
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self {
			status,
			content_type: None,
			body: body.into(),
		}
	}

	/// Builds a JSON response from any serializable value.
	pub fn json(status: u16, value: &serde_json::Value) -> Self {
		Self {
			status,
			content_type: Some("application/json".to_string()),
			body: value.to_string().into_bytes(),
		}
	}

	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Failure where no HTTP response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
	#[error("request timed out: {0}")]
	Timeout(String),

	#[error("connection failed: {0}")]
	Connect(String),

	#[error("transport I/O error: {0}")]
	Io(String),
}

/// Boxed future returned by [`Transport::execute`].
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = std::result::Result<HttpResponse, TransportError>> + Send + 'a>>;

/// Executes prepared HTTP requests.
///
/// Implementations must be shareable across tasks; the pipeline holds them
/// behind an `Arc` and issues overlapping requests.
pub trait Transport: Send + Sync {
	/// Send `request` and resolve with the raw response.
	///
	/// Every non-2xx status is a successful exchange at this layer; only
	/// the absence of a response is a [`TransportError`].
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_>;
}
