//! Refresh-and-retry behavior of the request pipeline.

mod common;

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use parking_lot::Mutex;
use reveal::protocol::ScoringWeights;
use reveal::transport::fake::{self, FakeTransportBuilder};
use reveal::transport::{Body, HttpRequest};
use reveal::{ErrorKind, HttpResponse, Method, RequestOptions, RequestPipeline, SessionEnd, SessionEvent, TransportError};
use serde_json::{Value, json};

use common::{has_bearer, signed_in};

const REFRESH: &str = "/api/auth/refresh";

/// Server that accepts only `valid` and mints `fresh` after `refresh_delay`.
fn rotating_server(refresh_delay: Duration) -> (FakeTransportBuilder, Arc<Mutex<String>>) {
	let valid = Arc::new(Mutex::new("fresh".to_string()));
	let handler_valid = Arc::clone(&valid);
	let builder = FakeTransportBuilder::new().handle(move |req| {
		let valid = Arc::clone(&handler_valid);
		async move {
			if req.route() == REFRESH {
				tokio::time::sleep(refresh_delay).await;
				return Ok::<_, TransportError>(fake::refreshed(&valid.lock()));
			}
			let token = valid.lock().clone();
			if has_bearer(&req, &token) {
				Ok(fake::ok(json!({ "path": req.path })))
			} else {
				Ok(fake::unauthorized())
			}
		}
	});
	(builder, valid)
}

#[tokio::test]
async fn concurrent_401s_share_one_refresh() {
	let (builder, _) = rotating_server(Duration::from_millis(50));
	let (transport, controller) = builder.build();
	let session = signed_in("stale");
	let pipeline = Arc::new(RequestPipeline::new(Arc::new(transport), session.clone()));

	let paths: Vec<String> = (0..8).map(|i| format!("/api/scans/job-{i}/status")).collect();
	let results = join_all(paths.iter().map(|path| pipeline.get_json::<Value>(path))).await;

	for (path, result) in paths.iter().zip(results) {
		let value = result.unwrap_or_else(|e| panic!("{path} failed: {e}"));
		assert_eq!(value["path"], path.as_str());
	}

	assert_eq!(controller.count(REFRESH), 1);
	assert_eq!(pipeline.refresher().refresh_calls(), 1);

	for path in &paths {
		let sent = controller.requests_to(path);
		assert_eq!(sent.len(), 2, "{path} should be sent exactly twice");
		assert!(has_bearer(&sent[0], "stale"));
		assert!(has_bearer(&sent[1], "fresh"));
	}
	assert_eq!(session.tokens().get().unwrap().expose(), "fresh");
}

#[tokio::test]
async fn late_401_reuses_token_refreshed_by_someone_else() {
	let valid = Arc::new(Mutex::new("fresh".to_string()));
	let handler_valid = Arc::clone(&valid);
	let (transport, controller) = FakeTransportBuilder::new()
		.handle(move |req| {
			let valid = Arc::clone(&handler_valid);
			async move {
				match req.route() {
					REFRESH => {
						tokio::time::sleep(Duration::from_millis(20)).await;
						Ok::<_, TransportError>(fake::refreshed("fresh"))
					}
					"/api/slow" if has_bearer(&req, "stale") => {
						// answers long after the refresh above has finished
						tokio::time::sleep(Duration::from_millis(200)).await;
						Ok(fake::unauthorized())
					}
					_ if has_bearer(&req, &valid.lock()) => Ok(fake::ok(json!(true))),
					_ => Ok(fake::unauthorized()),
				}
			}
		})
		.build();
	let pipeline = RequestPipeline::new(Arc::new(transport), signed_in("stale"));

	let (slow, fast) = tokio::join!(pipeline.get_json::<bool>("/api/slow"), pipeline.get_json::<bool>("/api/fast"));

	assert!(slow.unwrap());
	assert!(fast.unwrap());
	assert_eq!(controller.count(REFRESH), 1);
	assert!(has_bearer(&controller.requests_to("/api/slow")[1], "fresh"));
}

#[tokio::test]
async fn retry_preserves_method_path_and_body() {
	let (builder, _) = rotating_server(Duration::ZERO);
	let (transport, controller) = builder.build();
	let pipeline = RequestPipeline::new(Arc::new(transport), signed_in("stale"));

	let weights = ScoringWeights::new(40.0, 30.0, 20.0, 10.0);
	let path = "/api/scoring/job%2F1/weights?dry=1";
	let request = HttpRequest::post(path).with_body(Body::json(&weights).unwrap());
	pipeline.send(request.clone(), RequestOptions::default()).await.unwrap();

	let sent = controller.requests_to("/api/scoring/job%2F1/weights");
	assert_eq!(sent.len(), 2);
	for attempt in &sent {
		assert_eq!(attempt.method, Method::Post);
		assert_eq!(attempt.path, path);
		assert_eq!(attempt.body, request.body);
	}
	assert_ne!(sent[0].authorization(), sent[1].authorization());
}

#[tokio::test]
async fn second_401_ends_session_without_another_refresh() {
	let (transport, controller) = FakeTransportBuilder::new()
		.respond(|req| if req.route() == REFRESH { fake::refreshed("fresh") } else { fake::unauthorized() })
		.build();
	let session = signed_in("stale");
	let mut events = session.events();
	let pipeline = RequestPipeline::new(Arc::new(transport), session.clone());

	let err = pipeline.get_json::<Value>("/api/auth/me").await.unwrap_err();

	assert_eq!(err.kind(), ErrorKind::AuthError);
	assert_eq!(controller.count(REFRESH), 1);
	assert_eq!(controller.count("/api/auth/me"), 2);
	assert!(!session.tokens().is_present());
	assert!(!session.is_authenticated());

	assert_eq!(events.recv().await.unwrap(), SessionEvent::TokenRefreshed);
	assert!(matches!(events.recv().await.unwrap(), SessionEvent::LoginRequired { .. }));
}

#[tokio::test]
async fn failed_refresh_surfaces_auth_error_and_clears_store() {
	let (transport, controller) = FakeTransportBuilder::new()
		.respond(|req| {
			if req.route() == REFRESH {
				fake::status(401, "Refresh token expired")
			} else {
				fake::unauthorized()
			}
		})
		.build();
	let session = signed_in("stale");
	let mut events = session.events();
	let pipeline = RequestPipeline::new(Arc::new(transport), session.clone());

	let err = pipeline.get_json::<Value>("/api/scans/job-1/tasks").await.unwrap_err();

	assert_eq!(err.kind(), ErrorKind::AuthError);
	assert_eq!(err.code(), Some(reveal::refresh::REFRESH_FAILED_CODE));
	assert!(err.message().contains("Refresh token expired"));
	assert_eq!(controller.count("/api/scans/job-1/tasks"), 1);
	assert_eq!(controller.count(REFRESH), 1);
	assert!(!session.tokens().is_present());
	assert_eq!(
		events.recv().await.unwrap(),
		SessionEvent::LoginRequired {
			reason: "Refresh token expired".into()
		}
	);
}

#[tokio::test]
async fn unreachable_refresh_is_a_network_error_and_clears_store() {
	let (transport, controller) = FakeTransportBuilder::new()
		.handle(|req| async move {
			if req.route() == REFRESH {
				Err(TransportError::Timeout("30s elapsed".into()))
			} else {
				Ok::<_, TransportError>(fake::unauthorized())
			}
		})
		.build();
	let session = signed_in("stale");
	let mut events = session.events();
	let pipeline = RequestPipeline::new(Arc::new(transport), session.clone());

	let err = pipeline.get_json::<Value>("/api/scans/job-1/status").await.unwrap_err();

	assert_eq!(err.kind(), ErrorKind::NetworkError);
	assert!(err.is_timeout());
	assert_ne!(err.code(), Some(reveal::refresh::REFRESH_FAILED_CODE));
	assert_eq!(controller.count(REFRESH), 1);
	assert_eq!(controller.count("/api/scans/job-1/status"), 1);
	assert!(!session.tokens().is_present());
	assert!(!session.is_authenticated());
	assert!(matches!(events.recv().await.unwrap(), SessionEvent::LoginRequired { .. }));
}

#[tokio::test]
async fn refresh_is_sent_without_bearer() {
	let (builder, _) = rotating_server(Duration::ZERO);
	let (transport, controller) = builder.build();
	let pipeline = RequestPipeline::new(Arc::new(transport), signed_in("stale"));

	pipeline.get_json::<Value>("/api/auth/me").await.unwrap();

	let refresh = controller.requests_to(REFRESH);
	assert_eq!(refresh.len(), 1);
	assert_eq!(refresh[0].method, Method::Post);
	assert_eq!(refresh[0].authorization(), None);
}

#[tokio::test]
async fn timeout_is_network_and_keeps_the_session() {
	let (transport, controller) = FakeTransportBuilder::new()
		.handle(|req| async move {
			if req.route() == REFRESH {
				return Ok::<_, TransportError>(fake::refreshed("fresh"));
			}
			if has_bearer(&req, "fresh") {
				Err(TransportError::Timeout("30s elapsed".into()))
			} else {
				Ok(fake::unauthorized())
			}
		})
		.build();
	let session = signed_in("stale");
	let pipeline = RequestPipeline::new(Arc::new(transport), session.clone());

	let err = pipeline.get_json::<Value>("/api/scans/job-1/status").await.unwrap_err();

	assert_eq!(err.kind(), ErrorKind::NetworkError);
	assert!(err.is_timeout());
	assert_eq!(controller.count(REFRESH), 1);
	assert_eq!(session.tokens().get().unwrap().expose(), "fresh");
	assert!(session.is_authenticated());
}

#[tokio::test]
async fn timeout_before_any_401_never_refreshes() {
	let (transport, controller) = FakeTransportBuilder::new()
		.handle(|_req| async { Err::<HttpResponse, _>(TransportError::Timeout("30s elapsed".into())) })
		.build();
	let pipeline = RequestPipeline::new(Arc::new(transport), signed_in("live"));

	let err = pipeline.get_json::<Value>("/api/auth/me").await.unwrap_err();
	assert!(err.is_timeout());
	assert_eq!(controller.count(REFRESH), 0);
	assert_eq!(controller.count("/api/auth/me"), 1);
}

#[tokio::test]
async fn anonymous_401_is_final() {
	let (transport, controller) = FakeTransportBuilder::new()
		.respond(|_| fake::status(401, "Invalid credentials"))
		.build();
	let pipeline = RequestPipeline::new(Arc::new(transport), signed_in("live"));

	let request = HttpRequest::post("/api/auth/login").with_body(Body::json(&json!({"email": "a", "password": "b"})).unwrap());
	let err = pipeline.json::<Value>(request, RequestOptions::anonymous()).await.unwrap_err();

	assert_eq!(err.kind(), ErrorKind::AuthError);
	assert_eq!(err.message(), "Invalid credentials");
	assert_eq!(controller.count(REFRESH), 0);
	assert_eq!(controller.sent()[0].authorization(), None);
}

#[tokio::test]
async fn session_ended_mid_flight_does_not_refresh() {
	let (transport, controller) = FakeTransportBuilder::new()
		.handle(|req| async move {
			if req.route() == REFRESH {
				return Ok::<_, TransportError>(fake::refreshed("fresh"));
			}
			tokio::time::sleep(Duration::from_millis(100)).await;
			Ok(fake::unauthorized())
		})
		.build();
	let session = signed_in("stale");
	let pipeline = RequestPipeline::new(Arc::new(transport), session.clone());

	let logout = async {
		tokio::time::sleep(Duration::from_millis(10)).await;
		session.end(SessionEnd::SignedOut);
	};
	let (result, ()) = tokio::join!(pipeline.get_json::<Value>("/api/scans"), logout);

	assert_eq!(result.unwrap_err().kind(), ErrorKind::AuthError);
	assert_eq!(controller.count(REFRESH), 0);
}

#[tokio::test]
async fn error_statuses_are_classified() {
	let (transport, _) = FakeTransportBuilder::new()
		.respond(|req| match req.route() {
			"/api/bad" => fake::status(422, "targets must not be empty"),
			"/api/boom" => fake::status(500, "database unavailable"),
			"/api/quota" => HttpResponse::json(200, &json!({"data": null, "error": "quota exceeded"})),
			_ => fake::status(404, "not found"),
		})
		.build();
	let pipeline = RequestPipeline::new(Arc::new(transport), signed_in("live"));

	let bad = pipeline.get_json::<Value>("/api/bad").await.unwrap_err();
	assert_eq!(bad.kind(), ErrorKind::ValidationError);
	assert_eq!(bad.message(), "targets must not be empty");
	assert_eq!(bad.status(), Some(422));

	let boom = pipeline.get_json::<Value>("/api/boom").await.unwrap_err();
	assert_eq!(boom.kind(), ErrorKind::ServerError);
	assert_eq!(boom.status(), Some(500));

	let quota = pipeline.get_json::<Value>("/api/quota").await.unwrap_err();
	assert_eq!(quota.kind(), ErrorKind::ValidationError);
	assert_eq!(quota.message(), "quota exceeded");
}
