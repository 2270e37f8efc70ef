//! Recurring fetch of a resource until it reaches a terminal state.
//!
//! [`spawn`] starts a tokio task that alternates fetch and sleep. After each
//! successful fetch the [`PollInterval`] decides the next delay; `None`
//! means the resource is terminal and polling stops. Failed fetches are
//! reported as [`PollEvent::FetchFailed`] and polling continues until
//! `max_consecutive_failures` failures in a row.
//!
//! Events are buffered up to [`EVENT_BUFFER`]; while the buffer is full,
//! new updates and failures are dropped and only [`PollSubscription::latest`]
//! tracks them. The final [`PollEvent::Stopped`] is always delivered.
//!
//! Cancellation is checked, biased, before every fetch and while sleeping,
//! so once [`PollSubscription::cancel`] returns no further fetch starts.
//! A fetch already in flight is dropped and its result never delivered.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

type IntervalFn<T> = Arc<dyn Fn(&T) -> Option<Duration> + Send + Sync>;

/// Delay before the next fetch.
pub enum PollInterval<T> {
	/// Same delay after every fetch; never stops by itself.
	Fixed(Duration),
	/// Delay computed from the latest value; `None` stops polling.
	Dynamic(IntervalFn<T>),
}

impl<T> PollInterval<T> {
	pub fn dynamic<F>(f: F) -> Self
	where
		F: Fn(&T) -> Option<Duration> + Send + Sync + 'static,
	{
		PollInterval::Dynamic(Arc::new(f))
	}

	/// Polls every `every` until `is_done` holds for the latest value.
	pub fn until<F>(every: Duration, is_done: F) -> Self
	where
		F: Fn(&T) -> bool + Send + Sync + 'static,
	{
		Self::dynamic(move |value| if is_done(value) { None } else { Some(every) })
	}

	fn next(&self, value: &T) -> Option<Duration> {
		match self {
			PollInterval::Fixed(every) => Some(*every),
			PollInterval::Dynamic(f) => f(value),
		}
	}
}

impl<T> Clone for PollInterval<T> {
	fn clone(&self) -> Self {
		match self {
			PollInterval::Fixed(every) => PollInterval::Fixed(*every),
			PollInterval::Dynamic(f) => PollInterval::Dynamic(Arc::clone(f)),
		}
	}
}

impl<T> std::fmt::Debug for PollInterval<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			PollInterval::Fixed(every) => f.debug_tuple("Fixed").field(every).finish(),
			PollInterval::Dynamic(_) => f.write_str("Dynamic(..)"),
		}
	}
}

/// Poll settings for one subscription.
#[derive(Debug, Clone)]
pub struct PollConfig<T> {
	/// Identifier used in logs (usually the job id).
	pub resource: String,
	pub interval: PollInterval<T>,
	/// Delay after a failed fetch.
	pub retry_delay: Duration,
	/// Stop after this many failed fetches in a row; `None` never gives up.
	pub max_consecutive_failures: Option<u32>,
	/// Cancelling this token also cancels the subscription.
	pub parent: Option<CancellationToken>,
}

impl<T> PollConfig<T> {
	pub fn new(resource: impl Into<String>, interval: PollInterval<T>, retry_delay: Duration) -> Self {
		Self {
			resource: resource.into(),
			interval,
			retry_delay,
			max_consecutive_failures: Some(DEFAULT_MAX_CONSECUTIVE_FAILURES),
			parent: None,
		}
	}

	pub fn with_max_consecutive_failures(mut self, max: Option<u32>) -> Self {
		self.max_consecutive_failures = max;
		self
	}

	pub fn with_parent(mut self, parent: &CancellationToken) -> Self {
		self.parent = Some(parent.clone());
		self
	}
}

/// Default consecutive fetch failures tolerated before giving up.
pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 5;

/// Unread events kept per subscription.
pub const EVENT_BUFFER: usize = 32;

/// Why a subscription ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
	/// The latest value was terminal.
	Terminal,
	/// The subscriber cancelled or dropped the subscription.
	Cancelled,
	/// Too many fetches failed in a row.
	TooManyFailures { failures: u32, last_error: Error },
}

/// Notification delivered to the subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent<T> {
	Update(T),
	FetchFailed { error: Error, consecutive: u32 },
	Stopped(StopReason),
}

/// Handle to a running poll.
///
/// Dropping the handle cancels the poll.
pub struct PollSubscription<T> {
	resource: String,
	events: mpsc::Receiver<PollEvent<T>>,
	stopped: Option<oneshot::Receiver<StopReason>>,
	latest: watch::Receiver<Option<T>>,
	cancel: CancellationToken,
	task: Option<JoinHandle<StopReason>>,
}

impl<T: Clone> PollSubscription<T> {
	pub fn resource(&self) -> &str {
		&self.resource
	}

	/// Next event, or `None` once the poll has stopped and all events were read.
	///
	/// Buffered events come first; [`PollEvent::Stopped`] is always last.
	pub async fn next_event(&mut self) -> Option<PollEvent<T>> {
		if let Some(event) = self.events.recv().await {
			return Some(event);
		}
		let stopped = self.stopped.take()?;
		stopped.await.ok().map(PollEvent::Stopped)
	}

	/// Last successfully fetched value.
	pub fn latest(&self) -> Option<T> {
		self.latest.borrow().clone()
	}

	/// Watch stream of the last successfully fetched value.
	pub fn watch(&self) -> watch::Receiver<Option<T>> {
		self.latest.clone()
	}

	/// Requests cancellation; no fetch starts after this returns.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Waits for the poll task to finish.
	pub async fn join(mut self) -> StopReason {
		match self.task.take() {
			Some(task) => task.await.unwrap_or(StopReason::Cancelled),
			None => StopReason::Cancelled,
		}
	}
}

impl<T> Drop for PollSubscription<T> {
	fn drop(&mut self) {
		self.cancel.cancel();
	}
}

/// Starts polling with `fetch` on the current tokio runtime.
pub fn spawn<T, F, Fut>(config: PollConfig<T>, mut fetch: F) -> PollSubscription<T>
where
	T: Clone + Send + Sync + 'static,
	F: FnMut() -> Fut + Send + 'static,
	Fut: Future<Output = Result<T>> + Send + 'static,
{
	let cancel = match &config.parent {
		Some(parent) => parent.child_token(),
		None => CancellationToken::new(),
	};
	let (events_tx, events) = mpsc::channel(EVENT_BUFFER);
	let (stopped_tx, stopped) = oneshot::channel();
	let (latest_tx, latest) = watch::channel(None);

	let resource = config.resource.clone();
	let token = cancel.clone();
	let task = tokio::spawn(async move {
		let reason = run(&config, &mut fetch, &token, &events_tx, &latest_tx).await;
		debug!(target = "reveal.poll", resource = %config.resource, ?reason, "poll stopped");
		drop(events_tx);
		let _ = stopped_tx.send(reason.clone());
		reason
	});

	PollSubscription {
		resource,
		events,
		stopped: Some(stopped),
		latest,
		cancel,
		task: Some(task),
	}
}

async fn run<T, F, Fut>(
	config: &PollConfig<T>,
	fetch: &mut F,
	cancel: &CancellationToken,
	events: &mpsc::Sender<PollEvent<T>>,
	latest: &watch::Sender<Option<T>>,
) -> StopReason
where
	T: Clone,
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<T>>,
{
	let mut consecutive_failures = 0u32;

	loop {
		if cancel.is_cancelled() {
			return StopReason::Cancelled;
		}

		let outcome = tokio::select! {
			biased;
			_ = cancel.cancelled() => return StopReason::Cancelled,
			outcome = fetch() => outcome,
		};

		let delay = match outcome {
			Ok(value) => {
				consecutive_failures = 0;
				let next = config.interval.next(&value);
				latest.send_replace(Some(value.clone()));
				deliver(events, &config.resource, PollEvent::Update(value));
				match next {
					Some(delay) => delay,
					None => return StopReason::Terminal,
				}
			}
			Err(error) => {
				consecutive_failures += 1;
				warn!(
					target = "reveal.poll",
					resource = %config.resource,
					consecutive = consecutive_failures,
					kind = %error.kind(),
					%error,
					"fetch failed"
				);
				deliver(
					events,
					&config.resource,
					PollEvent::FetchFailed {
						error: error.clone(),
						consecutive: consecutive_failures,
					},
				);
				if config.max_consecutive_failures.is_some_and(|max| consecutive_failures >= max) {
					return StopReason::TooManyFailures {
						failures: consecutive_failures,
						last_error: error,
					};
				}
				config.retry_delay
			}
		};

		tokio::select! {
			biased;
			_ = cancel.cancelled() => return StopReason::Cancelled,
			_ = tokio::time::sleep(delay) => {}
		}
	}
}

fn deliver<T>(events: &mpsc::Sender<PollEvent<T>>, resource: &str, event: PollEvent<T>) {
	if let Err(mpsc::error::TrySendError::Full(_)) = events.try_send(event) {
		trace!(target = "reveal.poll", resource, "event buffer full; dropping event");
	}
}
