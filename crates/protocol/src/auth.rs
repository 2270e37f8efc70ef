//! Authentication payloads and the user profile.

use serde::{Deserialize, Serialize};

/// Account role assigned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	Admin,
	Analyst,
	Viewer,
}

impl std::fmt::Display for Role {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Role::Admin => write!(f, "admin"),
			Role::Analyst => write!(f, "analyst"),
			Role::Viewer => write!(f, "viewer"),
		}
	}
}

impl std::str::FromStr for Role {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"admin" => Ok(Role::Admin),
			"analyst" => Ok(Role::Analyst),
			"viewer" => Ok(Role::Viewer),
			_ => Err(format!("unknown role: {s}")),
		}
	}
}

/// Authenticated user profile (`GET /api/auth/me`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	pub id: String,
	pub email: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	pub role: Role,
	pub created_at: String,
	pub updated_at: String,
}

/// Body of `POST /api/auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
	pub email: String,
	pub password: String,
}

impl LoginCredentials {
	pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self {
			email: email.into(),
			password: password.into(),
		}
	}
}

/// Body of `POST /api/auth/register`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCredentials {
	pub email: String,
	pub password: String,
	pub role: Role,
}

impl std::fmt::Debug for LoginCredentials {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LoginCredentials").field("email", &self.email).field("password", &"<redacted>").finish()
	}
}

impl std::fmt::Debug for RegisterCredentials {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RegisterCredentials")
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.field("role", &self.role)
			.finish()
	}
}

/// Payload returned by login and register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
	pub access_token: String,
	pub user: User,
}

/// Payload returned by `POST /api/auth/refresh`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
	pub access_token: String,
}
