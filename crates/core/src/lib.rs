//! Authenticated session layer for the Reveal.me OSINT scanning API.
//!
//! The crate keeps a short-lived access token in memory, recovers from token
//! expiry with a single shared refresh, classifies every failure into a
//! small taxonomy and tracks long-running jobs by polling.
//!
//! ```text
//! caller ──► RequestPipeline ──► Transport (reqwest / fake)
//!               │   ▲
//!               │   └── RefreshCoordinator (one in-flight refresh)
//!               ▼
//!          SessionContext { AccessTokenStore, Session, events }
//!
//! JobPoller ──► endpoint group ──► RequestPipeline
//! ```
//!
//! # Quick start
//!
//! ```ignore
//! use reveal::{ClientConfig, RevealClient};
//! use reveal::protocol::LoginCredentials;
//!
//! let client = RevealClient::new(ClientConfig::from_env()?)?;
//! client.session().login(&LoginCredentials::new(email, password)).await?;
//! let scoring = client.scoring().get("job-1").await?;
//! println!("{}", reveal::scoring::weighted_score(&scoring.scores, &scoring.weights));
//! client.session().logout().await;
//! ```

pub mod api;
pub mod classify;
mod client;
pub mod config;
mod context;
mod error;
pub mod lifecycle;
pub mod pipeline;
pub mod poller;
pub mod refresh;
pub mod scoring;
mod session;
mod token;
pub mod transport;

pub use client::RevealClient;
pub use config::ClientConfig;
pub use context::{Session, SessionContext, SessionEnd, SessionEvent};
pub use error::{Error, ErrorKind, NETWORK_ERROR_CODE, Result, TIMEOUT_CODE, UNKNOWN_ERROR_CODE};
pub use lifecycle::{Lifecycle, StatusGuard};
pub use pipeline::{AuthMode, RequestOptions, RequestPipeline, RequestState, ResponseKind};
pub use poller::{PollConfig, PollEvent, PollInterval, PollSubscription, StopReason};
pub use refresh::RefreshCoordinator;
pub use session::SessionManager;
pub use token::{AccessToken, AccessTokenStore};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, Transport, TransportError};

/// Wire types, re-exported from `reveal-protocol`.
pub use reveal_protocol as protocol;
