//! Binary behavior that needs no API server.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

fn reveal_binary() -> PathBuf {
	PathBuf::from(env!("CARGO_BIN_EXE_reveal"))
}

struct Run {
	code: Option<i32>,
	stdout: String,
	stderr: String,
}

impl Run {
	fn json(&self) -> Value {
		serde_json::from_str(&self.stdout).unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {}", self.stdout))
	}
}

fn run_reveal(config: &Path, args: &[&str], env: &[(&str, &str)]) -> Run {
	let mut command = Command::new(reveal_binary());
	command
		.arg("--config")
		.arg(config)
		.args(args)
		.env_remove("REVEAL_API_URL")
		.env_remove("REVEAL_EMAIL")
		.env_remove("REVEAL_PASSWORD")
		.env_remove("REVEAL_TIMEOUT_SECS")
		.env_remove("REVEAL_LOG")
		.env_remove("RUST_LOG")
		.env("NO_COLOR", "1");
	for (key, value) in env {
		command.env(key, value);
	}

	let output = command.output().expect("failed to execute reveal");
	Run {
		code: output.status.code(),
		stdout: String::from_utf8_lossy(&output.stdout).to_string(),
		stderr: String::from_utf8_lossy(&output.stderr).to_string(),
	}
}

fn config_path(tmp: &TempDir) -> PathBuf {
	tmp.path().join("reveal").join("config.json")
}

#[test]
fn config_show_uses_defaults_without_file() {
	let tmp = TempDir::new().expect("temp dir should be created");

	let run = run_reveal(&config_path(&tmp), &["-f", "json", "config", "show"], &[]);
	assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);

	let json = run.json();
	assert_eq!(json["ok"], true);
	assert_eq!(json["command"], "config.show");
	assert_eq!(json["data"]["apiUrl"], "http://localhost:8000");
	assert_eq!(json["data"]["timeoutSecs"], 30);
	assert!(json["data"].get("email").is_none());
}

#[test]
fn config_set_persists_and_show_reads_it_back() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let path = config_path(&tmp);

	let run = run_reveal(&path, &["config", "set", "api-url", "https://reveal.example/"], &[]);
	assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
	let run = run_reveal(&path, &["config", "set", "email", "analyst@reveal.me"], &[]);
	assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);

	let stored: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
	assert_eq!(stored["apiUrl"], "https://reveal.example");
	assert_eq!(stored["email"], "analyst@reveal.me");
	assert_eq!(stored.as_object().unwrap().len(), 2, "only non-secret settings are stored: {stored}");

	let json = run_reveal(&path, &["-f", "json", "config", "show"], &[]).json();
	assert_eq!(json["data"]["apiUrl"], "https://reveal.example");
	assert_eq!(json["data"]["email"], "analyst@reveal.me");
}

#[test]
fn flag_beats_env_beats_file() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let path = config_path(&tmp);
	run_reveal(&path, &["config", "set", "api-url", "http://file.example"], &[]);

	let env = [("REVEAL_API_URL", "http://env.example")];
	let json = run_reveal(&path, &["-f", "json", "config", "show"], &env).json();
	assert_eq!(json["data"]["apiUrl"], "http://env.example");

	let json = run_reveal(&path, &["-f", "json", "--api-url", "http://flag.example", "config", "show"], &env).json();
	assert_eq!(json["data"]["apiUrl"], "http://flag.example");
}

#[test]
fn invalid_setting_is_rejected_with_usage_exit_code() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let path = config_path(&tmp);

	let run = run_reveal(&path, &["-f", "json", "config", "set", "timeout-secs", "0"], &[]);

	assert_eq!(run.code, Some(2));
	let json = run.json();
	assert_eq!(json["ok"], false);
	assert_eq!(json["error"]["code"], "CONFIG_ERROR");
	assert!(!path.exists());
}

#[test]
fn missing_password_fails_before_any_request() {
	let tmp = TempDir::new().expect("temp dir should be created");

	let run = run_reveal(&config_path(&tmp), &["-f", "json", "--email", "analyst@reveal.me", "whoami"], &[]);

	assert_eq!(run.code, Some(2));
	let json = run.json();
	assert_eq!(json["command"], "whoami");
	assert_eq!(json["error"]["code"], "MISSING_CREDENTIALS");
	assert!(json["error"]["message"].as_str().unwrap().contains("REVEAL_PASSWORD"));
}

#[test]
fn text_mode_errors_go_to_stderr() {
	let tmp = TempDir::new().expect("temp dir should be created");

	let run = run_reveal(&config_path(&tmp), &["scan", "status", "job-1"], &[("REVEAL_PASSWORD", "pw")]);

	assert_eq!(run.code, Some(2));
	assert!(run.stdout.is_empty(), "stdout: {}", run.stdout);
	assert!(run.stderr.contains("MISSING_CREDENTIALS"), "stderr: {}", run.stderr);
}

#[test]
fn unreachable_api_is_a_network_error() {
	let tmp = TempDir::new().expect("temp dir should be created");

	let run = run_reveal(
		&config_path(&tmp),
		&["-f", "json", "--api-url", "http://127.0.0.1:1", "--email", "analyst@reveal.me", "whoami"],
		&[("REVEAL_PASSWORD", "pw")],
	);

	assert_eq!(run.code, Some(1), "stderr: {}", run.stderr);
	assert_eq!(run.json()["error"]["code"], "NETWORK_ERROR");
}
