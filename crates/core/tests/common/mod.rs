#![allow(dead_code)]

use std::sync::Arc;

use reveal::protocol::User;
use reveal::{AccessToken, HttpRequest, SessionContext};
use serde_json::{Value, json};

pub fn user_json() -> Value {
	json!({
		"id": "u-1",
		"email": "analyst@reveal.me",
		"name": "Ana Lyst",
		"role": "analyst",
		"createdAt": "2024-01-01T00:00:00Z",
		"updatedAt": "2024-01-01T00:00:00Z"
	})
}

pub fn user() -> User {
	serde_json::from_value(user_json()).expect("fixture user should parse")
}

/// Session context already holding `token`.
pub fn signed_in(token: &str) -> Arc<SessionContext> {
	let ctx = SessionContext::new();
	ctx.establish(AccessToken::new(token), user());
	ctx
}

pub fn bearer(token: &str) -> String {
	format!("Bearer {token}")
}

pub fn has_bearer(req: &HttpRequest, token: &str) -> bool {
	req.authorization() == Some(bearer(token).as_str())
}

pub fn scan_job_json(id: &str, status: &str) -> Value {
	json!({
		"id": id,
		"targets": [{"id": "t-1", "value": "example.com", "type": "domain"}],
		"status": status,
		"progress": if status == "completed" { 100 } else { 40 },
		"createdAt": "2024-01-01T00:00:00Z",
		"updatedAt": "2024-01-01T00:00:00Z"
	})
}

pub fn task_json(id: &str, status: &str) -> Value {
	json!({
		"id": id,
		"jobId": "job-1",
		"name": format!("task {id}"),
		"status": status,
		"progress": 0
	})
}
