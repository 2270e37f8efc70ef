//! Typed endpoint groups against an in-memory API.

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use reveal::protocol::{PageRequest, ReportFormat, ReportStatus, ScanStatus, ScoringWeights, UploadStatus};
use reveal::transport::fake::{self, FakeTransportBuilder, FakeTransportController};
use reveal::transport::{Body, HttpRequest};
use reveal::{AccessToken, ClientConfig, ErrorKind, HttpResponse, Method, RevealClient};
use serde_json::{Value, json};

use common::{scan_job_json, task_json, user};

fn client(builder: FakeTransportBuilder) -> (RevealClient, FakeTransportController) {
	let (transport, controller) = builder.build();
	let client = RevealClient::with_transport(ClientConfig::default(), Arc::new(transport));
	client.context().establish(AccessToken::new("live"), user());
	(client, controller)
}

fn scoring_json(job_id: &str, weights: &Value) -> Value {
	json!({
		"jobId": job_id,
		"weights": weights,
		"scores": { "overall": 70, "osint": 80, "technical": 60, "reputation": 40, "behavioral": 100 },
		"chartData": []
	})
}

/// Stateful scoring endpoint: `POST .../weights` replaces what `GET` returns.
fn scoring_server() -> FakeTransportBuilder {
	let store: Arc<Mutex<HashMap<String, Value>>> = Arc::default();
	FakeTransportBuilder::new().respond(move |req| {
		let Some(rest) = req.route().strip_prefix("/api/scoring/") else {
			return fake::status(404, "not found");
		};
		match (req.method, rest.strip_suffix("/weights")) {
			(Method::Post, Some(job)) => {
				let weights: Value = serde_json::from_slice(req.json_body().unwrap_or_default()).unwrap_or_default();
				store.lock().insert(job.to_string(), weights.clone());
				fake::ok(scoring_json(job, &weights))
			}
			(Method::Get, None) => {
				let weights = store.lock().get(rest).cloned().unwrap_or_else(|| json!({"osint": 25, "technical": 25, "reputation": 25, "behavioral": 25}));
				fake::ok(scoring_json(rest, &weights))
			}
			_ => fake::status(405, "method not allowed"),
		}
	})
}

#[tokio::test]
async fn scoring_weights_round_trip() {
	let (client, _) = client(scoring_server());
	let scoring = client.scoring();

	let initial = scoring.get("job-1").await.unwrap();
	assert_eq!(initial.weights, ScoringWeights::default());

	let weights = ScoringWeights::new(40.0, 30.0, 20.5, 9.5);
	let updated = scoring.update_weights("job-1", &weights).await.unwrap();
	assert_eq!(updated.weights, weights);

	let refetched = scoring.get("job-1").await.unwrap();
	assert_eq!(refetched.weights, weights);

	// writing the same weights again changes nothing
	scoring.update_weights("job-1", &weights).await.unwrap();
	assert_eq!(scoring.get("job-1").await.unwrap().weights, weights);
	assert_eq!(reveal::scoring::weighted_score(&refetched.scores, &refetched.weights), 68);
}

#[tokio::test]
async fn invalid_weights_are_rejected_before_sending() {
	let (client, controller) = client(scoring_server());

	let err = client.scoring().update_weights("job-1", &ScoringWeights::new(-5.0, 25.0, 25.0, 25.0)).await.unwrap_err();

	assert_eq!(err.kind(), ErrorKind::ValidationError);
	assert!(controller.sent().is_empty());
}

#[tokio::test]
async fn scan_endpoints_decode_envelopes() {
	let (client, controller) = client(FakeTransportBuilder::new().respond(|req| match (req.method, req.route()) {
		(Method::Post, "/api/scan") => fake::ok(json!({ "jobId": "job-1" })),
		(Method::Get, "/api/scans/job-1/status") => fake::ok(scan_job_json("job-1", "running")),
		(Method::Get, "/api/scans/job-1/tasks") => fake::ok(json!([task_json("a", "completed"), task_json("b", "running")])),
		(Method::Post, "/api/scans/job-1/abort") => fake::ok(json!({ "aborted": true })),
		(Method::Get, "/api/scans") => fake::ok(json!({
			"data": [scan_job_json("job-1", "running")],
			"total": 21, "page": 2, "pageSize": 10, "totalPages": 3
		})),
		_ => fake::status(404, "not found"),
	}));
	let scans = client.scans();

	let created = scans.create(vec!["example.com".into(), "8.8.8.8".into()]).await.unwrap();
	assert_eq!(created.job_id, "job-1");
	let body: Value = serde_json::from_slice(controller.requests_to("/api/scan")[0].json_body().unwrap()).unwrap();
	assert_eq!(body, json!({ "targets": ["example.com", "8.8.8.8"] }));

	assert_eq!(scans.status("job-1").await.unwrap().status, ScanStatus::Running);
	assert_eq!(scans.tasks("job-1").await.unwrap().len(), 2);
	scans.abort("job-1").await.unwrap();

	let page = scans.list(PageRequest::new(2, 10)).await.unwrap();
	assert_eq!(page.total, 21);
	assert!(page.has_next());
	assert_eq!(controller.requests_to("/api/scans")[0].path, "/api/scans?page=2&pageSize=10");
}

#[tokio::test]
async fn ids_are_percent_encoded() {
	let (client, controller) = client(FakeTransportBuilder::new().respond(|_| fake::ok(scan_job_json("x", "pending"))));

	client.scans().status("../admin/users?x=1").await.unwrap();

	assert_eq!(controller.sent()[0].path, "/api/scans/..%2Fadmin%2Fusers%3Fx%3D1/status");
}

#[tokio::test]
async fn missing_resource_is_validation_with_server_message() {
	let (client, _) = client(FakeTransportBuilder::new().respond(|_| HttpResponse::json(404, &json!({ "message": "Scan not found", "code": "SCAN_NOT_FOUND" }))));

	let err = client.scans().status("nope").await.unwrap_err();

	assert_eq!(err.kind(), ErrorKind::ValidationError);
	assert_eq!(err.message(), "Scan not found");
	assert_eq!(err.code(), Some("SCAN_NOT_FOUND"));
}

#[tokio::test]
async fn report_generate_status_and_binary_download() {
	let pdf = b"%PDF-1.7 fake".to_vec();
	let payload = pdf.clone();
	let (client, controller) = client(FakeTransportBuilder::new().respond(move |req| match req.route() {
		"/api/reports/job-1/generate" => fake::ok(json!({ "reportId": "r-1" })),
		"/api/reports/job-1" => fake::ok(json!({ "jobId": "job-1", "status": "ready", "format": "pdf", "downloadUrl": "/files/r-1.pdf" })),
		"/api/reports/job-1/download" => HttpResponse::new(200, payload.clone()),
		_ => fake::status(404, "not found"),
	}));
	let reports = client.reports();

	assert_eq!(reports.generate("job-1", ReportFormat::Html).await.unwrap().report_id, "r-1");
	let body: Value = serde_json::from_slice(controller.requests_to("/api/reports/job-1/generate")[0].json_body().unwrap()).unwrap();
	assert_eq!(body, json!({ "format": "html" }));

	let status = reports.status("job-1").await.unwrap();
	assert_eq!(status.status, ReportStatus::Ready);

	let bytes = reports.download("job-1", ReportFormat::Pdf).await.unwrap();
	assert_eq!(bytes, pdf);
	assert_eq!(controller.requests_to("/api/reports/job-1/download")[0].path, "/api/reports/job-1/download?format=pdf");
}

#[tokio::test]
async fn binary_download_failure_is_classified_from_envelope() {
	let (client, _) = client(FakeTransportBuilder::new().respond(|_| fake::status(409, "Report is still generating")));

	let err = client.reports().download("job-1", ReportFormat::Pdf).await.unwrap_err();

	assert_eq!(err.kind(), ErrorKind::ValidationError);
	assert_eq!(err.message(), "Report is still generating");
}

#[tokio::test]
async fn upload_sends_multipart_file() {
	let (client, controller) = client(FakeTransportBuilder::new().respond(|req| match (req.method, req.route()) {
		(Method::Post, "/api/upload") => fake::ok(json!({
			"id": "f-1", "filename": "targets.csv", "size": 12, "type": "text/csv",
			"uploadedAt": "2024-01-01T00:00:00Z", "status": "uploaded"
		})),
		(Method::Delete, "/api/upload/f-1") => fake::ok(json!(null)),
		_ => fake::status(404, "not found"),
	}));
	let uploads = client.uploads();

	let file = uploads.upload("targets.csv", "text/csv", b"example.com\n".to_vec()).await.unwrap();
	assert_eq!(file.status, UploadStatus::Uploaded);

	match &controller.requests_to("/api/upload")[0].body {
		Some(Body::Multipart(part)) => {
			assert_eq!(part.field, "file");
			assert_eq!(part.file_name, "targets.csv");
			assert_eq!(part.bytes, b"example.com\n");
		}
		other => panic!("expected multipart body, got {other:?}"),
	}

	uploads.delete("f-1").await.unwrap();
}

#[tokio::test]
async fn admin_settings_round_trip() {
	let settings = json!({
		"osintConnectors": {
			"shodan": { "apiKey": "k", "enabled": true },
			"virustotal": { "enabled": false },
			"greynoise": { "enabled": false }
		},
		"systemSettings": { "maxConcurrentScans": 4, "defaultScanTimeout": 600, "retentionDays": 30 }
	});
	let stored = Arc::new(Mutex::new(settings));
	let (client, _) = client(FakeTransportBuilder::new().respond(move |req| match req.method {
		Method::Put => {
			*stored.lock() = serde_json::from_slice(req.json_body().unwrap_or_default()).unwrap_or_default();
			fake::ok(stored.lock().clone())
		}
		_ => fake::ok(stored.lock().clone()),
	}));
	let admin = client.admin();

	let mut current = admin.settings().await.unwrap();
	assert!(current.osint_connectors.shodan.enabled);
	current.system_settings.retention_days = 90;
	admin.update_settings(&current).await.unwrap();

	assert_eq!(admin.settings().await.unwrap().system_settings.retention_days, 90);
}

#[tokio::test]
async fn raw_pipeline_request_reaches_transport_unchanged() {
	let (client, controller) = client(FakeTransportBuilder::new().respond(|_| fake::ok(json!(1))));

	let request = HttpRequest::put("/api/admin/users/u-1").with_header("X-Trace", "abc");
	let n: u32 = client.pipeline().json(request, Default::default()).await.unwrap();

	assert_eq!(n, 1);
	let sent = &controller.sent()[0];
	assert_eq!(sent.header("x-trace"), Some("abc"));
	assert_eq!(sent.authorization(), Some("Bearer live"));
}
