//! Error classification: turns transport and protocol failures into [`Error`].
//!
//! | Input | Classified as |
//! |---|---|
//! | no response (connect, I/O) | `Network` (`NETWORK_ERROR`) |
//! | timeout | `Network` (`TIMEOUT`) |
//! | 401 | `Auth` |
//! | other 4xx | `Validation` |
//! | 5xx | `Server` |
//! | 2xx with envelope `error` | `Validation` |
//! | undecodable payload, 1xx/3xx | `Unknown` |

use reveal_protocol::RawEnvelope;

use crate::error::Error;
use crate::transport::{HttpResponse, TransportError};

const MAX_TEXT_MESSAGE: usize = 200;

/// Classifies a failure where no response was received.
pub fn transport_failure(err: &TransportError) -> Error {
	match err {
		TransportError::Timeout(_) => Error::timeout("Request timed out - please check your connection"),
		TransportError::Connect(_) | TransportError::Io(_) => Error::network("Network error - please check your connection"),
	}
}

/// Classifies a non-2xx response from its status and envelope body.
pub fn error_response(response: &HttpResponse) -> Error {
	let details = ServerDetails::from_body(&response.body);
	let status = response.status;

	let error = match status {
		401 => Error::auth(details.message.unwrap_or_else(|| "Authentication required".to_string())),
		400..=499 => Error::validation(status, details.message.unwrap_or_else(|| format!("Request failed with status {status}"))),
		500..=599 => Error::server(status, details.message.unwrap_or_else(|| format!("Server error ({status})"))),
		_ => Error::unknown(details.message.unwrap_or_else(|| format!("Unexpected response status {status}"))),
	};

	match details.code {
		Some(code) => error.with_code(Some(code)),
		None => error,
	}
}

/// Classifies a 2xx response whose envelope nevertheless carries `error`.
pub fn envelope_failure(status: u16, envelope: &RawEnvelope) -> Error {
	let details = ServerDetails::from_envelope(envelope);
	Error::validation(status, details.message.unwrap_or_else(|| "An error occurred".to_string())).with_code(details.code)
}

/// Classifies a payload that could not be decoded into the expected type.
pub fn decode_failure(route: &str, err: &serde_json::Error) -> Error {
	Error::unknown(format!("Unexpected response from {route}: {err}"))
}

/// Display message and machine code lifted from a response body.
#[derive(Debug, Default, PartialEq, Eq)]
struct ServerDetails {
	message: Option<String>,
	code: Option<String>,
}

impl ServerDetails {
	fn from_body(body: &[u8]) -> Self {
		if body.is_empty() {
			return Self::default();
		}

		if let Ok(envelope) = serde_json::from_slice::<RawEnvelope>(body) {
			return Self::from_envelope(&envelope);
		}

		let text = String::from_utf8_lossy(body);
		let text = text.trim();
		if text.is_empty() || text.starts_with('<') {
			return Self::default();
		}

		let message = if text.chars().count() > MAX_TEXT_MESSAGE {
			let truncated: String = text.chars().take(MAX_TEXT_MESSAGE).collect();
			format!("{truncated}...")
		} else {
			text.to_string()
		};

		Self {
			message: Some(message),
			code: None,
		}
	}

	/// `message` wins over `error`, which wins over `detail`. When both
	/// `message` and `error` are present, `error` doubles as the code.
	fn from_envelope(envelope: &RawEnvelope) -> Self {
		let message = non_empty(&envelope.message)
			.or_else(|| non_empty(&envelope.error))
			.or_else(|| non_empty(&envelope.detail));

		let code = non_empty(&envelope.code).or_else(|| {
			if non_empty(&envelope.message).is_some() {
				non_empty(&envelope.error)
			} else {
				None
			}
		});

		Self { message, code }
	}
}

fn non_empty(value: &Option<String>) -> Option<String> {
	value.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}
