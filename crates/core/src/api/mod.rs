//! Typed endpoint groups over the [`RequestPipeline`].
//!
//! Each group is a cheap `Clone` handle around the shared pipeline so it can
//! be moved into poll fetchers. Ids interpolated into paths are
//! percent-encoded.

mod admin;
mod auth;
mod reports;
mod scans;
mod scoring;
mod uploads;

use std::borrow::Cow;

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use reports::ReportsApi;
pub use scans::ScansApi;
pub use scoring::ScoringApi;
pub use uploads::UploadsApi;

/// Percent-encodes an id for use as a single path segment.
pub(crate) fn segment(id: &str) -> Cow<'_, str> {
	urlencoding::encode(id)
}
