//! Administration payloads: users, connector settings and audit logs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::Role;

/// Body of `POST /api/admin/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
	pub email: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	pub role: Role,
}

/// Body of `PUT /api/admin/users/{id}`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub role: Option<Role>,
}

/// Credentials and toggle for one third-party OSINT connector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorSettings {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub api_key: Option<String>,
	pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsintConnectors {
	pub shodan: ConnectorSettings,
	pub virustotal: ConnectorSettings,
	pub greynoise: ConnectorSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
	pub max_concurrent_scans: u32,
	pub default_scan_timeout: u64,
	pub retention_days: u32,
}

/// Server-wide settings (`GET /api/admin/settings`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSettings {
	pub osint_connectors: OsintConnectors,
	pub system_settings: SystemSettings,
}

/// Audit log entry. The server owns the schema; the client treats it as opaque.
pub type AdminLogEntry = Value;
