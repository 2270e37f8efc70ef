//! Wire types for the Reveal.me scanning API.
//!
//! This crate contains the serde-serializable types exchanged with the
//! remote OSINT-scanning service over JSON/HTTPS. These types represent the
//! "protocol layer" - the shapes of data as they appear on the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond serialization/deserialization and display
//! * 1:1 with the wire: camelCase fields, lowercase enum values
//! * Stable: Changes only when the server contract changes
//!
//! Session handling, refresh, polling and scoring are built on top of these
//! types in `reveal-rs`.

pub mod admin;
pub mod auth;
pub mod envelope;
pub mod page;
pub mod report;
pub mod scan;
pub mod scoring;
pub mod upload;

pub use admin::*;
pub use auth::*;
pub use envelope::*;
pub use page::*;
pub use report::*;
pub use scan::*;
pub use scoring::*;
pub use upload::*;
