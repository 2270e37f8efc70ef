//! Login, logout and startup restore on top of the [`SessionContext`].

use std::sync::Arc;

use reveal_protocol::{AuthResponse, LoginCredentials, RegisterCredentials, User};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::api::AuthApi;
use crate::context::{Session, SessionContext, SessionEnd, SessionEvent};
use crate::error::Result;
use crate::pipeline::RequestPipeline;
use crate::token::AccessToken;

/// Drives the session lifecycle.
#[derive(Clone)]
pub struct SessionManager {
	auth: AuthApi,
	context: Arc<SessionContext>,
}

impl SessionManager {
	pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
		let context = Arc::clone(pipeline.session());
		Self {
			auth: AuthApi::new(pipeline),
			context,
		}
	}

	/// Signs in and stores the access token in memory.
	///
	/// # Errors
	///
	/// Bad credentials surface as [`Error::Auth`](crate::Error::Auth) with the
	/// server's message; the session is left untouched.
	pub async fn login(&self, credentials: &LoginCredentials) -> Result<User> {
		let response = self.auth.login(credentials).await?;
		Ok(self.establish(response))
	}

	/// Creates an account and signs in with it.
	pub async fn register(&self, credentials: &RegisterCredentials) -> Result<User> {
		let response = self.auth.register(credentials).await?;
		Ok(self.establish(response))
	}

	/// Rebuilds the session from the refresh cookie: refresh, then fetch the profile.
	///
	/// On failure the token and session are cleared and the error returned.
	pub async fn restore(&self) -> Result<User> {
		let outcome = async {
			self.auth.refresh().await?;
			self.auth.me().await
		}
		.await;

		match outcome {
			Ok(user) => {
				info!(target = "reveal.session", user = %user.email, "session restored");
				self.context.set_user(user.clone());
				Ok(user)
			}
			Err(err) => {
				debug!(target = "reveal.session", error = %err, "no session to restore");
				if self.context.tokens().is_present() || self.context.is_authenticated() {
					self.context.end(SessionEnd::Expired {
						reason: err.message().to_string(),
					});
				}
				Err(err)
			}
		}
	}

	/// Best-effort server logout; local state is always cleared.
	pub async fn logout(&self) {
		if let Err(err) = self.auth.logout().await {
			warn!(target = "reveal.session", kind = %err.kind(), error = %err, "logout request failed; clearing local session anyway");
		}
		self.context.end(SessionEnd::SignedOut);
	}

	/// Fetches the profile for the current token and updates the session.
	pub async fn refresh_profile(&self) -> Result<User> {
		let user = self.auth.me().await?;
		self.context.set_user(user.clone());
		Ok(user)
	}

	pub fn current(&self) -> Session {
		self.context.session()
	}

	pub fn user(&self) -> Option<User> {
		self.context.session().user
	}

	pub fn is_authenticated(&self) -> bool {
		self.context.is_authenticated()
	}

	pub fn subscribe(&self) -> watch::Receiver<Session> {
		self.context.subscribe()
	}

	pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
		self.context.events()
	}

	fn establish(&self, response: AuthResponse) -> User {
		self.context.establish(AccessToken::new(response.access_token), response.user.clone());
		response.user
	}
}
