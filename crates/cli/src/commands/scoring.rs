use colored::Colorize;
use reveal::RevealClient;
use reveal::protocol::{ChartPoint, ScoringData, ScoringWeights};
use reveal::scoring;
use serde::Serialize;
use tracing::info;

use crate::cli::ScoringAction;
use crate::error::Result;
use crate::output::{self, Printer};

/// Scoring data plus the locally computed weighted view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoringView {
	#[serde(flatten)]
	data: ScoringData,
	weighted_score: i64,
	weight_total: f64,
	band: &'static str,
	points: Vec<ChartPoint>,
}

impl ScoringView {
	fn new(data: ScoringData) -> Self {
		let weighted_score = scoring::weighted_score(&data.scores, &data.weights);
		Self {
			weight_total: data.weights.total(),
			band: scoring::score_band(weighted_score as f64).as_str(),
			points: scoring::chart_points(&data.scores, &data.weights),
			weighted_score,
			data,
		}
	}
}

pub async fn execute(action: ScoringAction, client: &RevealClient, printer: &Printer) -> Result<()> {
	let data = match action {
		ScoringAction::Show { job_id } => client.scoring().get(&job_id).await?,
		ScoringAction::Set {
			job_id,
			osint,
			technical,
			reputation,
			behavioral,
		} => {
			let weights = ScoringWeights::new(osint, technical, reputation, behavioral);
			let data = client.scoring().update_weights(&job_id, &weights).await?;
			info!(target = "reveal", %job_id, total = weights.total(), "weights updated");
			data
		}
	};

	printer.success(&ScoringView::new(data), render);
	Ok(())
}

fn render(view: &ScoringView) -> String {
	let mut lines = vec![format!("{:<12} {:>5} {:>7} {:>8}", "category", "score", "weight", "weighted").dimmed().to_string()];

	for point in &view.points {
		let band = scoring::score_band(point.score);
		lines.push(format!(
			"{:<12} {} {:>7.1} {:>8.1}",
			point.category,
			output::score(point.score, band),
			point.weight,
			point.weighted_score.unwrap_or_default()
		));
	}

	let band = scoring::score_band(view.weighted_score as f64);
	lines.push(format!(
		"{:<12} {}  ({band}, server overall {:.0})",
		"weighted".bold(),
		output::score(view.weighted_score as f64, band),
		view.data.scores.overall
	));

	if view.weight_total == 0.0 {
		lines.push("All weights are zero; the weighted score falls back to 0".yellow().to_string());
	} else if (view.weight_total - 100.0).abs() > f64::EPSILON {
		lines.push(format!("Weights sum to {:.1}, not 100", view.weight_total).dimmed().to_string());
	}

	lines.join("\n")
}
