//! Explicit session context shared by the pipeline, refresh and session manager.
//!
//! Instead of a hidden process-wide token variable, one [`SessionContext`]
//! is created per client and passed (as an `Arc`) to every component that
//! needs credentials. It owns the [`AccessTokenStore`], the observable
//! [`Session`] view and the [`SessionEvent`] broadcast.

use std::sync::Arc;

use reveal_protocol::User;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

use crate::token::{AccessToken, AccessTokenStore};

const EVENT_CAPACITY: usize = 32;

/// Derived view of the authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
	pub authenticated: bool,
	pub user: Option<User>,
}

impl Session {
	pub fn anonymous() -> Self {
		Self::default()
	}

	pub fn signed_in(user: User) -> Self {
		Self {
			authenticated: true,
			user: Some(user),
		}
	}
}

/// Notifications about session transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
	/// Login, registration or restore produced a session.
	SignedIn { user: User },
	/// The refresh endpoint minted a new access token.
	TokenRefreshed,
	/// The user logged out.
	SignedOut,
	/// Refresh failed or a retried request was rejected again.
	///
	/// Collaborators should navigate to the login entry point.
	LoginRequired { reason: String },
}

/// Why a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
	SignedOut,
	Expired { reason: String },
}

/// Per-client credential and session state.
#[derive(Debug)]
pub struct SessionContext {
	tokens: AccessTokenStore,
	state: watch::Sender<Session>,
	events: broadcast::Sender<SessionEvent>,
}

impl SessionContext {
	pub fn new() -> Arc<Self> {
		let (state, _) = watch::channel(Session::anonymous());
		let (events, _) = broadcast::channel(EVENT_CAPACITY);
		Arc::new(Self {
			tokens: AccessTokenStore::new(),
			state,
			events,
		})
	}

	pub fn tokens(&self) -> &AccessTokenStore {
		&self.tokens
	}

	/// Snapshot of the current session.
	pub fn session(&self) -> Session {
		self.state.borrow().clone()
	}

	pub fn is_authenticated(&self) -> bool {
		self.state.borrow().authenticated
	}

	/// Watch stream of session snapshots.
	pub fn subscribe(&self) -> watch::Receiver<Session> {
		self.state.subscribe()
	}

	/// Stream of session transitions.
	pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
		self.events.subscribe()
	}

	/// Stores `token` and marks `user` as signed in.
	pub fn establish(&self, token: AccessToken, user: User) {
		self.tokens.set(Some(token));
		info!(target = "reveal.session", user = %user.email, role = %user.role, "session established");
		self.state.send_replace(Session::signed_in(user.clone()));
		self.emit(SessionEvent::SignedIn { user });
	}

	/// Records the user profile for an already-stored token.
	pub fn set_user(&self, user: User) {
		self.state.send_replace(Session::signed_in(user.clone()));
		self.emit(SessionEvent::SignedIn { user });
	}

	/// Replaces the token after a successful refresh.
	pub fn token_refreshed(&self, token: AccessToken) {
		self.tokens.set(Some(token));
		debug!(target = "reveal.session", "access token refreshed");
		self.emit(SessionEvent::TokenRefreshed);
	}

	/// Clears the token and the session view.
	pub fn end(&self, reason: SessionEnd) {
		self.tokens.clear();
		self.state.send_replace(Session::anonymous());
		match reason {
			SessionEnd::SignedOut => {
				info!(target = "reveal.session", "signed out");
				self.emit(SessionEvent::SignedOut);
			}
			SessionEnd::Expired { reason } => {
				info!(target = "reveal.session", %reason, "session expired; login required");
				self.emit(SessionEvent::LoginRequired { reason });
			}
		}
	}

	fn emit(&self, event: SessionEvent) {
		// No subscribers is fine.
		let _ = self.events.send(event);
	}
}
