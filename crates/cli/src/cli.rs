use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use reveal::protocol::ReportFormat;

use crate::config::ConfigKey;
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "reveal")]
#[command(about = "Reveal.me OSINT scanner - run scans, watch jobs, fetch scores and reports")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug, -vvv trace)
	#[arg(short, long, global = true, action = ArgAction::Count)]
	pub verbose: u8,

	/// Output format
	#[arg(short = 'f', long, global = true, value_enum, default_value_t = OutputFormat::Text)]
	pub format: OutputFormat,

	/// API base URL
	#[arg(long, global = true, env = "REVEAL_API_URL", value_name = "URL")]
	pub api_url: Option<String>,

	/// Account email (password is read from REVEAL_PASSWORD)
	#[arg(long, global = true, env = "REVEAL_EMAIL")]
	pub email: Option<String>,

	/// Settings file (defaults to ~/.config/reveal/config.json)
	#[arg(long, global = true, env = "REVEAL_CONFIG", value_name = "FILE")]
	pub config: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Show the signed-in user
	Whoami,

	/// Start, inspect and abort scans
	Scan {
		#[command(subcommand)]
		action: ScanAction,
	},

	/// Show or adjust risk scoring weights
	Scoring {
		#[command(subcommand)]
		action: ScoringAction,
	},

	/// Generate and download reports
	Report {
		#[command(subcommand)]
		action: ReportAction,
	},

	/// Manage uploaded target lists
	Upload {
		#[command(subcommand)]
		action: UploadAction,
	},

	/// Read or change local settings
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

impl Commands {
	/// Dotted command name used in structured output.
	pub fn name(&self) -> &'static str {
		match self {
			Commands::Whoami => "whoami",
			Commands::Scan { action } => match action {
				ScanAction::Start { .. } => "scan.start",
				ScanAction::Status { .. } => "scan.status",
				ScanAction::Tasks { .. } => "scan.tasks",
				ScanAction::Abort { .. } => "scan.abort",
				ScanAction::List { .. } => "scan.list",
			},
			Commands::Scoring { action } => match action {
				ScoringAction::Show { .. } => "scoring.show",
				ScoringAction::Set { .. } => "scoring.set",
			},
			Commands::Report { action } => match action {
				ReportAction::Generate { .. } => "report.generate",
				ReportAction::Status { .. } => "report.status",
				ReportAction::Download { .. } => "report.download",
			},
			Commands::Upload { action } => match action {
				UploadAction::Add { .. } => "upload.add",
				UploadAction::List { .. } => "upload.list",
				UploadAction::Rm { .. } => "upload.rm",
			},
			Commands::Config { action } => match action {
				ConfigAction::Show => "config.show",
				ConfigAction::Set { .. } => "config.set",
				ConfigAction::Path => "config.path",
			},
		}
	}
}

#[derive(clap::Args, Debug, Clone, Copy)]
pub struct PageArgs {
	/// Page number (1-based)
	#[arg(long, default_value_t = 1)]
	pub page: u32,

	/// Items per page
	#[arg(long, default_value_t = 10)]
	pub page_size: u32,
}

#[derive(Subcommand, Debug)]
pub enum ScanAction {
	/// Start a scan over one or more targets (domain, IP, email or phone)
	Start {
		#[arg(required = true, num_args = 1..)]
		targets: Vec<String>,
		/// Follow the job until it finishes
		#[arg(short, long)]
		watch: bool,
	},

	/// Show job status
	Status {
		job_id: String,
		/// Follow the job until it finishes
		#[arg(short, long)]
		watch: bool,
	},

	/// Show per-task progress
	Tasks {
		job_id: String,
		/// Follow until every task finishes
		#[arg(short, long)]
		watch: bool,
	},

	/// Abort a running scan
	Abort { job_id: String },

	/// List scans
	#[command(alias = "ls")]
	List {
		#[command(flatten)]
		page: PageArgs,
	},
}

#[derive(Subcommand, Debug)]
pub enum ScoringAction {
	/// Show scores, weights and the weighted overall score
	Show { job_id: String },

	/// Replace the category weights
	Set {
		job_id: String,
		#[arg(long, default_value_t = 25.0)]
		osint: f64,
		#[arg(long, default_value_t = 25.0)]
		technical: f64,
		#[arg(long, default_value_t = 25.0)]
		reputation: f64,
		#[arg(long, default_value_t = 25.0)]
		behavioral: f64,
	},
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormatArg {
	#[default]
	Pdf,
	Html,
}

impl From<ReportFormatArg> for ReportFormat {
	fn from(value: ReportFormatArg) -> Self {
		match value {
			ReportFormatArg::Pdf => ReportFormat::Pdf,
			ReportFormatArg::Html => ReportFormat::Html,
		}
	}
}

#[derive(Subcommand, Debug)]
pub enum ReportAction {
	/// Request a report for a finished scan
	Generate {
		job_id: String,
		#[arg(long, value_enum, default_value_t = ReportFormatArg::Pdf)]
		format: ReportFormatArg,
		/// Wait until the report is ready
		#[arg(short, long)]
		wait: bool,
	},

	/// Show report status
	Status { job_id: String },

	/// Save a generated report to disk
	Download {
		job_id: String,
		#[arg(long, value_enum, default_value_t = ReportFormatArg::Pdf)]
		format: ReportFormatArg,
		/// Output file (defaults to report-<job>.<format>)
		#[arg(short, long)]
		output: Option<PathBuf>,
	},
}

#[derive(Subcommand, Debug)]
pub enum UploadAction {
	/// Upload a target list file
	Add {
		file: PathBuf,
		/// MIME type (guessed from the extension when omitted)
		#[arg(long)]
		content_type: Option<String>,
	},

	/// List uploaded files
	#[command(alias = "ls")]
	List {
		#[command(flatten)]
		page: PageArgs,
	},

	/// Delete an uploaded file
	Rm { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
	/// Print effective settings
	Show,

	/// Store a setting
	Set { key: ConfigKey, value: String },

	/// Print the settings file location
	Path,
}
