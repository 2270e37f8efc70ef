//! reqwest-backed transport.
//!
//! The client keeps a cookie jar so the HTTP-only refresh cookie set by the
//! login endpoint is replayed on `POST /api/auth/refresh`. Every request
//! carries the same fixed timeout; an elapsed timeout surfaces as
//! [`TransportError::Timeout`].

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use tracing::trace;
use url::Url;

use super::{Body, HttpRequest, HttpResponse, Method, Transport, TransportError, TransportFuture};
use crate::error::{Error, Result};

/// HTTP transport talking to the real API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
	client: reqwest::Client,
	base_url: String,
}

impl HttpTransport {
	/// Creates a transport for `base_url` with the given per-request timeout.
	///
	/// # Errors
	///
	/// Returns [`Error::Validation`] if `base_url` is not an absolute http(s)
	/// URL, or [`Error::Unknown`] if the TLS backend cannot be initialized.
	pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
		let parsed = Url::parse(base_url).map_err(|e| Error::validation(0, format!("Invalid API base URL '{base_url}': {e}")))?;
		if !matches!(parsed.scheme(), "http" | "https") {
			return Err(Error::validation(0, format!("Unsupported API URL scheme '{}'", parsed.scheme())));
		}

		let client = reqwest::Client::builder()
			.cookie_store(true)
			.timeout(timeout)
			.build()
			.map_err(|e| Error::unknown(format!("Failed to build HTTP client: {e}")))?;

		Ok(Self {
			client,
			base_url: base_url.trim_end_matches('/').to_string(),
		})
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	fn url_for(&self, path: &str) -> std::result::Result<Url, TransportError> {
		let joined = format!("{}{}", self.base_url, path);
		Url::parse(&joined).map_err(|e| TransportError::Io(format!("invalid request URL '{joined}': {e}")))
	}

	async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
		let url = self.url_for(&request.path)?;
		let mut builder = self.client.request(to_reqwest_method(request.method), url);

		for (name, value) in &request.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}

		builder = match request.body {
			Some(Body::Json(bytes)) => builder.header(CONTENT_TYPE, "application/json").body(bytes),
			Some(Body::Multipart(file)) => {
				let part = Part::bytes(file.bytes)
					.file_name(file.file_name)
					.mime_str(&file.content_type)
					.map_err(|e| TransportError::Io(format!("invalid content type: {e}")))?;
				builder.multipart(Form::new().part(file.field, part))
			}
			None => builder,
		};

		let response = builder.send().await.map_err(map_reqwest_error)?;
		let status = response.status().as_u16();
		let content_type = response
			.headers()
			.get(CONTENT_TYPE)
			.and_then(|value| value.to_str().ok())
			.map(str::to_string);
		let body = response.bytes().await.map_err(map_reqwest_error)?.to_vec();

		trace!(
			target = "reveal.transport",
			method = %request.method,
			path = %request.path,
			status,
			bytes = body.len(),
			"response received"
		);

		Ok(HttpResponse { status, content_type, body })
	}
}

impl Transport for HttpTransport {
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_> {
		Box::pin(self.send(request))
	}
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
	match method {
		Method::Get => reqwest::Method::GET,
		Method::Post => reqwest::Method::POST,
		Method::Put => reqwest::Method::PUT,
		Method::Delete => reqwest::Method::DELETE,
	}
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
	if err.is_timeout() {
		TransportError::Timeout(err.to_string())
	} else if err.is_connect() {
		TransportError::Connect(err.to_string())
	} else {
		TransportError::Io(err.to_string())
	}
}
