//! [`RevealClient`]: one session, its endpoint groups and job watchers.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use reveal_protocol::{ReportData, ReportStatus, ScanJob, ScanStatus, ScanTask, ScoringData, TaskStatus};
use tokio_util::sync::CancellationToken;

use crate::api::{AdminApi, AuthApi, ReportsApi, ScansApi, ScoringApi, UploadsApi};
use crate::config::ClientConfig;
use crate::context::SessionContext;
use crate::error::{Error, Result};
use crate::lifecycle::{Lifecycle, StatusGuard, all_terminal};
use crate::pipeline::RequestPipeline;
use crate::poller::{self, PollConfig, PollInterval, PollSubscription};
use crate::session::SessionManager;
use crate::transport::{HttpTransport, Transport};

/// Entry point for talking to the Reveal API.
///
/// Owns one [`SessionContext`]; every endpoint group and watcher created from
/// the same client shares its token and refresh coordinator.
///
/// # Example
///
/// ```ignore
/// let client = RevealClient::new(ClientConfig::from_env()?)?;
/// client.session().login(&LoginCredentials::new("analyst@reveal.me", password)).await?;
///
/// let job = client.scans().create(vec!["example.com".into()]).await?;
/// let mut watch = client.watch_scan(&job.job_id);
/// while let Some(event) = watch.next_event().await {
///     // render progress
/// }
/// ```
pub struct RevealClient {
	config: ClientConfig,
	pipeline: Arc<RequestPipeline>,
	session: SessionManager,
	shutdown: CancellationToken,
}

impl RevealClient {
	/// Creates a client backed by [`HttpTransport`].
	pub fn new(config: ClientConfig) -> Result<Self> {
		let transport = HttpTransport::new(&config.base_url, config.request_timeout)?;
		Ok(Self::with_transport(config, Arc::new(transport)))
	}

	/// Creates a client over any [`Transport`].
	pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
		let pipeline = Arc::new(RequestPipeline::new(transport, SessionContext::new()));
		let session = SessionManager::new(Arc::clone(&pipeline));
		Self {
			config,
			pipeline,
			session,
			shutdown: CancellationToken::new(),
		}
	}

	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	pub fn pipeline(&self) -> &Arc<RequestPipeline> {
		&self.pipeline
	}

	pub fn context(&self) -> &Arc<SessionContext> {
		self.pipeline.session()
	}

	pub fn session(&self) -> &SessionManager {
		&self.session
	}

	pub fn auth(&self) -> AuthApi {
		AuthApi::new(Arc::clone(&self.pipeline))
	}

	pub fn scans(&self) -> ScansApi {
		ScansApi::new(Arc::clone(&self.pipeline))
	}

	pub fn scoring(&self) -> ScoringApi {
		ScoringApi::new(Arc::clone(&self.pipeline))
	}

	pub fn reports(&self) -> ReportsApi {
		ReportsApi::new(Arc::clone(&self.pipeline))
	}

	pub fn uploads(&self) -> UploadsApi {
		UploadsApi::new(Arc::clone(&self.pipeline))
	}

	pub fn admin(&self) -> AdminApi {
		AdminApi::new(Arc::clone(&self.pipeline))
	}

	/// Polls scan status until completed, failed or aborted.
	pub fn watch_scan(&self, job_id: &str) -> PollSubscription<ScanJob> {
		let interval = PollInterval::until(self.config.scan_poll_interval, |job: &ScanJob| job.status.is_terminal());
		let scans = self.scans();
		let id = job_id.to_string();
		let guard = Arc::new(Mutex::new(StatusGuard::<ScanStatus>::new()));

		poller::spawn(self.poll_config(job_id, interval), move || {
			let scans = scans.clone();
			let id = id.clone();
			let guard = Arc::clone(&guard);
			async move {
				let job = scans.status(&id).await?;
				guard.lock().observe(job.status)?;
				Ok::<_, Error>(job)
			}
		})
	}

	/// Polls the task list until every task is terminal.
	///
	/// An empty list keeps polling: tasks may not have been scheduled yet.
	pub fn watch_scan_tasks(&self, job_id: &str) -> PollSubscription<Vec<ScanTask>> {
		let interval = PollInterval::until(self.config.task_poll_interval, |tasks: &Vec<ScanTask>| {
			all_terminal(tasks.iter().map(|task| task.status))
		});
		let scans = self.scans();
		let id = job_id.to_string();
		let guards: Arc<Mutex<HashMap<String, StatusGuard<TaskStatus>>>> = Arc::default();

		poller::spawn(self.poll_config(job_id, interval), move || {
			let scans = scans.clone();
			let id = id.clone();
			let guards = Arc::clone(&guards);
			async move {
				let tasks = scans.tasks(&id).await?;
				let mut guards = guards.lock();
				for task in &tasks {
					guards.entry(task.id.clone()).or_default().observe(task.status)?;
				}
				Ok::<_, Error>(tasks)
			}
		})
	}

	/// Polls report status until ready or failed.
	pub fn watch_report(&self, job_id: &str) -> PollSubscription<ReportData> {
		let interval = PollInterval::until(self.config.report_poll_interval, |report: &ReportData| report.status.is_terminal());
		let reports = self.reports();
		let id = job_id.to_string();
		let guard = Arc::new(Mutex::new(StatusGuard::<ReportStatus>::new()));

		poller::spawn(self.poll_config(job_id, interval), move || {
			let reports = reports.clone();
			let id = id.clone();
			let guard = Arc::clone(&guard);
			async move {
				let report = reports.status(&id).await?;
				guard.lock().observe(report.status)?;
				Ok::<_, Error>(report)
			}
		})
	}

	/// Polls scoring data until cancelled; scores have no terminal state.
	pub fn watch_scoring(&self, job_id: &str) -> PollSubscription<ScoringData> {
		let interval = PollInterval::Fixed(self.config.scoring_poll_interval);
		let scoring = self.scoring();
		let id = job_id.to_string();

		poller::spawn(self.poll_config(job_id, interval), move || {
			let scoring = scoring.clone();
			let id = id.clone();
			async move { scoring.get(&id).await }
		})
	}

	/// Cancels every watcher created by this client.
	pub fn shutdown(&self) {
		self.shutdown.cancel();
	}

	fn poll_config<T>(&self, job_id: &str, interval: PollInterval<T>) -> PollConfig<T> {
		PollConfig::new(job_id, interval, self.config.poll_retry_delay)
			.with_max_consecutive_failures(self.config.max_consecutive_poll_failures)
			.with_parent(&self.shutdown)
	}
}
