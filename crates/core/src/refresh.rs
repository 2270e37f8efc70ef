//! Single-flight access token refresh.
//!
//! When several requests hit a 401 while the same token is live, exactly one
//! `POST /api/auth/refresh` goes over the wire. The first caller creates a
//! [`Shared`] future and parks it in the coordinator; every later caller
//! clones and awaits the same future, so all of them observe the same
//! outcome exactly once.
//!
//! A refresh is keyed on the token the failing request was sent with:
//! - the store already holds a newer token -> retry with it, no network call
//! - the session ended since the request was sent -> `Auth` error, no network call
//! - otherwise -> join the in-flight refresh or start one

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use reveal_protocol::RefreshResponse;
use tracing::{debug, warn};

use crate::classify;
use crate::context::{SessionContext, SessionEnd};
use crate::error::{Error, Result};
use crate::pipeline::decode_envelope;
use crate::token::AccessToken;
use crate::transport::{HttpRequest, Transport};

/// Endpoint minting a new access token from the refresh cookie.
pub const REFRESH_PATH: &str = "/api/auth/refresh";

/// Machine code attached to errors caused by a failed refresh.
pub const REFRESH_FAILED_CODE: &str = "REFRESH_FAILED";

type RefreshFuture = Shared<BoxFuture<'static, Result<AccessToken>>>;

struct InFlight {
	id: u64,
	future: RefreshFuture,
}

/// De-duplicates concurrent refresh attempts.
#[derive(Default)]
pub struct RefreshCoordinator {
	in_flight: Mutex<Option<InFlight>>,
	next_id: AtomicU64,
	calls: AtomicU64,
}

impl RefreshCoordinator {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of refresh calls actually sent.
	pub fn refresh_calls(&self) -> u64 {
		self.calls.load(Ordering::SeqCst)
	}

	/// Returns a fresh token for a request that was rejected while carrying `stale`.
	///
	/// # Errors
	///
	/// Returns [`Error::Auth`] if the refresh endpoint rejects the cookie or
	/// the session ended before this call, and the [`Error::Network`] itself
	/// if the endpoint cannot be reached or times out. In every such case the
	/// session has been cleared and
	/// [`SessionEvent::LoginRequired`](crate::SessionEvent::LoginRequired) emitted.
	pub async fn refresh(&self, transport: &Arc<dyn Transport>, session: &Arc<SessionContext>, stale: Option<&AccessToken>) -> Result<AccessToken> {
		let (id, future) = {
			let mut slot = self.in_flight.lock();
			match slot.as_ref() {
				Some(in_flight) => {
					debug!(target = "reveal.refresh", id = in_flight.id, "joining in-flight refresh");
					(in_flight.id, in_flight.future.clone())
				}
				None => {
					match (session.tokens().get(), stale) {
						(Some(current), Some(stale)) if &current != stale => {
							debug!(target = "reveal.refresh", "token already refreshed; reusing");
							return Ok(current);
						}
						(Some(current), None) => {
							return Ok(current);
						}
						(None, Some(_)) => {
							return Err(Error::auth("Session expired - please log in again").with_code(Some(REFRESH_FAILED_CODE.to_string())));
						}
						_ => {}
					}

					let id = self.next_id.fetch_add(1, Ordering::SeqCst);
					self.calls.fetch_add(1, Ordering::SeqCst);
					debug!(target = "reveal.refresh", id, "starting refresh");
					let future = refresh_once(Arc::clone(transport), Arc::clone(session)).boxed().shared();
					*slot = Some(InFlight { id, future: future.clone() });
					(id, future)
				}
			}
		};

		let result = future.await;

		let mut slot = self.in_flight.lock();
		if slot.as_ref().is_some_and(|in_flight| in_flight.id == id) {
			*slot = None;
		}

		result
	}
}

async fn refresh_once(transport: Arc<dyn Transport>, session: Arc<SessionContext>) -> Result<AccessToken> {
	let outcome = match transport.execute(HttpRequest::post(REFRESH_PATH)).await {
		Ok(response) if response.is_success() => decode_envelope::<RefreshResponse>(REFRESH_PATH, &response),
		Ok(response) => Err(classify::error_response(&response)),
		Err(err) => Err(classify::transport_failure(&err)),
	};

	match outcome {
		Ok(refreshed) => {
			let token = AccessToken::new(refreshed.access_token);
			session.token_refreshed(token.clone());
			Ok(token)
		}
		Err(err) => {
			warn!(target = "reveal.refresh", kind = %err.kind(), error = %err, "refresh failed");
			session.end(SessionEnd::Expired {
				reason: err.message().to_string(),
			});
			if err.is_network() {
				return Err(err);
			}
			Err(Error::auth(format!("Session expired - please log in again ({})", err.message())).with_code(Some(REFRESH_FAILED_CODE.to_string())))
		}
	}
}
