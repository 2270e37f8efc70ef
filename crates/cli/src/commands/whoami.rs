use colored::Colorize;
use reveal::RevealClient;

use crate::error::Result;
use crate::output::Printer;

pub async fn execute(client: &RevealClient, printer: &Printer) -> Result<()> {
	let user = client.auth().me().await?;

	printer.success(&user, |user| {
		let name = user.name.as_deref().map(|name| format!(" - {name}")).unwrap_or_default();
		format!("{}{name} ({})", user.email.bold(), user.role)
	});
	Ok(())
}
