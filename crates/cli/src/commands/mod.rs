mod config;
mod report;
mod scan;
mod scoring;
mod upload;
mod whoami;

use reveal::protocol::LoginCredentials;
use reveal::{PollEvent, PollSubscription, RevealClient, StopReason};
use tracing::{debug, info, warn};

use crate::cli::{Cli, Commands};
use crate::config::{CliConfig, PASSWORD_ENV};
use crate::error::{CliError, Result};
use crate::output::Printer;

pub async fn dispatch(cli: Cli, printer: &Printer) -> Result<()> {
	let config_path = cli.config.clone().unwrap_or_else(CliConfig::default_path);
	let settings = CliConfig::load(&config_path)?;

	match cli.command {
		Commands::Config { action } => config::execute(action, settings, &config_path, cli.api_url.as_deref(), cli.email.as_deref(), printer),
		command => {
			let client = sign_in(&settings, cli.api_url.as_deref(), cli.email.as_deref()).await?;
			let result = run(command, &client, printer).await;
			client.session().logout().await;
			client.shutdown();
			result
		}
	}
}

async fn run(command: Commands, client: &RevealClient, printer: &Printer) -> Result<()> {
	match command {
		Commands::Whoami => whoami::execute(client, printer).await,
		Commands::Scan { action } => scan::execute(action, client, printer).await,
		Commands::Scoring { action } => scoring::execute(action, client, printer).await,
		Commands::Report { action } => report::execute(action, client, printer).await,
		Commands::Upload { action } => upload::execute(action, client, printer).await,
		Commands::Config { .. } => unreachable!("config commands run without a session"),
	}
}

/// Logs in with the configured email and `REVEAL_PASSWORD`.
///
/// Tokens are never written to disk, so every invocation starts a new session.
async fn sign_in(settings: &CliConfig, api_url: Option<&str>, email: Option<&str>) -> Result<RevealClient> {
	let password = std::env::var(PASSWORD_ENV)
		.ok()
		.filter(|password| !password.is_empty())
		.ok_or(CliError::MissingPassword)?;
	let email = settings.resolve_email(email)?;
	let config = settings.client_config(api_url, |key| std::env::var(key).ok())?;

	info!(target = "reveal", api = %config.base_url, %email, "signing in");
	let client = RevealClient::new(config)?;
	let user = client.session().login(&LoginCredentials::new(email, password)).await?;
	debug!(target = "reveal", user = %user.id, role = %user.role, "signed in");
	Ok(client)
}

/// Prints every update from `subscription` until it stops.
///
/// Ctrl-C cancels the poll and returns the last value seen.
async fn follow<T>(mut subscription: PollSubscription<T>, printer: &Printer, mut render: impl FnMut(&T) -> String) -> Result<Option<T>>
where
	T: Clone + Send + Sync + 'static,
{
	loop {
		let event = tokio::select! {
			event = subscription.next_event() => event,
			_ = tokio::signal::ctrl_c(), if !subscription.is_cancelled() => {
				info!(target = "reveal", resource = subscription.resource(), "interrupted");
				subscription.cancel();
				continue;
			}
		};

		match event {
			Some(PollEvent::Update(value)) => printer.progress(render(&value)),
			Some(PollEvent::FetchFailed { error, consecutive }) => {
				warn!(target = "reveal", resource = subscription.resource(), consecutive, %error, "poll failed, retrying");
			}
			Some(PollEvent::Stopped(StopReason::TooManyFailures { failures, last_error })) => {
				return Err(CliError::PollFailed(format!(
					"Gave up on {} after {failures} failed polls: {last_error}",
					subscription.resource()
				)));
			}
			Some(PollEvent::Stopped(_)) | None => return Ok(subscription.latest()),
		}
	}
}
