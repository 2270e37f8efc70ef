//! Job status state machines.
//!
//! ```text
//! ScanStatus:   pending -> running -> {completed, failed, aborted}
//! TaskStatus:   pending -> running -> {completed, failed}
//! ReportStatus: generating -> {ready, failed}
//! ```
//!
//! Transitions only move forward. Skipping ahead (e.g. `pending -> completed`)
//! is allowed because a poll may miss intermediate states; moving back or
//! leaving a terminal state is not.

use reveal_protocol::{ReportStatus, ScanStatus, TaskStatus};

use crate::error::Error;

/// A status drawn from a closed, forward-only transition graph.
pub trait Lifecycle: Copy + Eq + std::fmt::Debug + std::fmt::Display + Send + Sync + 'static {
	/// Position along the graph; terminal states share the highest rank.
	fn rank(&self) -> u8;

	fn is_terminal(&self) -> bool;

	/// Whether `next` may be observed after `self`. Staying put is allowed.
	fn can_transition_to(&self, next: Self) -> bool {
		if *self == next {
			return true;
		}
		!self.is_terminal() && next.rank() > self.rank()
	}
}

impl Lifecycle for ScanStatus {
	fn rank(&self) -> u8 {
		match self {
			ScanStatus::Pending => 0,
			ScanStatus::Running => 1,
			ScanStatus::Completed | ScanStatus::Failed | ScanStatus::Aborted => 2,
		}
	}

	fn is_terminal(&self) -> bool {
		matches!(self, ScanStatus::Completed | ScanStatus::Failed | ScanStatus::Aborted)
	}
}

impl Lifecycle for TaskStatus {
	fn rank(&self) -> u8 {
		match self {
			TaskStatus::Pending => 0,
			TaskStatus::Running => 1,
			TaskStatus::Completed | TaskStatus::Failed => 2,
		}
	}

	fn is_terminal(&self) -> bool {
		matches!(self, TaskStatus::Completed | TaskStatus::Failed)
	}
}

impl Lifecycle for ReportStatus {
	fn rank(&self) -> u8 {
		match self {
			ReportStatus::Generating => 0,
			ReportStatus::Ready | ReportStatus::Failed => 1,
		}
	}

	fn is_terminal(&self) -> bool {
		matches!(self, ReportStatus::Ready | ReportStatus::Failed)
	}
}

/// `true` once every status in `statuses` is terminal. An empty set is not done.
pub fn all_terminal<S: Lifecycle>(statuses: impl IntoIterator<Item = S>) -> bool {
	let mut any = false;
	for status in statuses {
		if !status.is_terminal() {
			return false;
		}
		any = true;
	}
	any
}

/// A status observed out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regression<S> {
	pub from: S,
	pub to: S,
}

impl<S: Lifecycle> From<Regression<S>> for Error {
	fn from(regression: Regression<S>) -> Self {
		Error::unknown(format!("Status went backwards from {} to {}", regression.from, regression.to))
	}
}

/// Tracks the last accepted status and rejects regressions.
#[derive(Debug, Clone)]
pub struct StatusGuard<S> {
	last: Option<S>,
}

impl<S: Lifecycle> StatusGuard<S> {
	pub fn new() -> Self {
		Self { last: None }
	}

	pub fn last(&self) -> Option<S> {
		self.last
	}

	/// Accepts `next` if it is a legal successor of the last accepted status.
	pub fn observe(&mut self, next: S) -> Result<S, Regression<S>> {
		match self.last {
			Some(from) if !from.can_transition_to(next) => Err(Regression { from, to: next }),
			_ => {
				self.last = Some(next);
				Ok(next)
			}
		}
	}
}

impl<S: Lifecycle> Default for StatusGuard<S> {
	fn default() -> Self {
		Self::new()
	}
}
