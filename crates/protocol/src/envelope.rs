//! The response envelope every JSON endpoint wraps its payload in.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response envelope returned by the API.
///
/// ```json
/// { "data": { "jobId": "j-1" } }
/// { "error": "Invalid credentials" }
/// { "error": "VALIDATION_FAILED", "message": "targets must not be empty", "code": "E_TARGETS" }
/// ```
///
/// A present `error` means the call failed even when the HTTP status was 2xx.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
	#[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	/// Machine-readable error code, when the server supplies one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code: Option<String>,
	/// Framework-style error text (`{"detail": "..."}`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub detail: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub details: Option<Value>,
}

impl<T> ApiEnvelope<T> {
	/// Wraps a successful payload.
	pub fn ok(data: T) -> Self {
		Self {
			data: Some(data),
			error: None,
			message: None,
			code: None,
			detail: None,
			details: None,
		}
	}

	/// Builds a failure envelope carrying only an `error` string.
	pub fn failure(error: impl Into<String>) -> Self {
		Self {
			data: None,
			error: Some(error.into()),
			message: None,
			code: None,
			detail: None,
			details: None,
		}
	}

	/// Attaches a human-readable message.
	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}

	/// Attaches a machine-readable code.
	pub fn with_code(mut self, code: impl Into<String>) -> Self {
		self.code = Some(code.into());
		self
	}

	/// Returns `true` when the envelope reports a failure.
	pub fn is_error(&self) -> bool {
		self.error.is_some()
	}
}

/// Envelope with an untyped payload, used when only the failure fields matter.
pub type RawEnvelope = ApiEnvelope<Value>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_fields_default_to_none() {
		let env: RawEnvelope = serde_json::from_str("{}").unwrap();
		assert!(env.data.is_none());
		assert!(!env.is_error());
	}

	#[test]
	fn error_on_success_payload_is_detected() {
		let env: ApiEnvelope<Value> = serde_json::from_str(r#"{"data": {"x": 1}, "error": "quota exceeded"}"#).unwrap();
		assert!(env.is_error());
		assert_eq!(env.data.unwrap()["x"], 1);
	}

	#[test]
	fn null_data_is_none() {
		let env: ApiEnvelope<Value> = serde_json::from_str(r#"{"data": null}"#).unwrap();
		assert!(env.data.is_none());
	}

	#[test]
	fn builder_serializes_only_present_fields() {
		let env: ApiEnvelope<()> = ApiEnvelope::failure("nope").with_code("E_NOPE");
		let json = serde_json::to_value(&env).unwrap();
		assert_eq!(json, serde_json::json!({"error": "nope", "code": "E_NOPE"}));
	}
}
