//! Weighted risk score computation.
//!
//! The overall score is `round(sum(score_i * weight_i) / sum(weight_i))`
//! over the four categories. Weights are relative: they need not sum to
//! 100. A zero weight sum has no meaningful average, so
//! [`weighted_score`] yields [`ZERO_WEIGHT_FALLBACK`] and
//! [`try_weighted_score`] rejects the configuration instead. Non-finite
//! scores or weights are rejected the same way.

use reveal_protocol::{CategoryScores, ChartPoint, ScoringWeights};

use crate::error::{Error, Result};

/// Score reported when the weights cannot produce an average.
pub const ZERO_WEIGHT_FALLBACK: i64 = 0;

/// Display names, in [`ScoringWeights::as_array`] order.
pub const CATEGORIES: [&str; 4] = ["OSINT", "Technical", "Reputation", "Behavioral"];

/// Rejects negative or non-finite weights.
pub fn validate_weights(weights: &ScoringWeights) -> Result<()> {
	for (name, weight) in CATEGORIES.iter().zip(weights.as_array()) {
		if !weight.is_finite() {
			return Err(Error::validation(0, format!("{name} weight must be a finite number")));
		}
		if weight < 0.0 {
			return Err(Error::validation(0, format!("{name} weight must not be negative (got {weight})")));
		}
	}
	Ok(())
}

/// Rejects category scores that are not finite numbers.
pub fn validate_scores(scores: &CategoryScores) -> Result<()> {
	match CATEGORIES.iter().zip(scores.as_array()).find(|(_, score)| !score.is_finite()) {
		Some((name, _)) => Err(Error::validation(0, format!("{name} score must be a finite number"))),
		None => Ok(()),
	}
}

/// Weighted average of the category scores, rounded to the nearest integer.
///
/// # Errors
///
/// Returns [`Error::Validation`] when a score or weight is invalid or all
/// weights are zero.
pub fn try_weighted_score(scores: &CategoryScores, weights: &ScoringWeights) -> Result<i64> {
	validate_weights(weights)?;
	validate_scores(scores)?;

	let total = weights.total();
	if total == 0.0 {
		return Err(Error::validation(0, "At least one scoring weight must be greater than zero"));
	}

	let sum: f64 = scores.as_array().iter().zip(weights.as_array()).map(|(score, weight)| score * weight).sum();
	Ok((sum / total).round() as i64)
}

/// Like [`try_weighted_score`], but yields [`ZERO_WEIGHT_FALLBACK`] for
/// weights that cannot produce an average.
pub fn weighted_score(scores: &CategoryScores, weights: &ScoringWeights) -> i64 {
	try_weighted_score(scores, weights).unwrap_or(ZERO_WEIGHT_FALLBACK)
}

/// Per-category chart data; `weighted_score` is `score * weight / 100`.
pub fn chart_points(scores: &CategoryScores, weights: &ScoringWeights) -> Vec<ChartPoint> {
	CATEGORIES
		.iter()
		.zip(scores.as_array())
		.zip(weights.as_array())
		.map(|((category, score), weight)| ChartPoint {
			category: (*category).to_string(),
			score,
			weight,
			weighted_score: Some(score * weight / 100.0),
		})
		.collect()
}

/// Traffic-light classification of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
	Good,
	Warning,
	Critical,
}

impl ScoreBand {
	pub fn as_str(&self) -> &'static str {
		match self {
			ScoreBand::Good => "good",
			ScoreBand::Warning => "warning",
			ScoreBand::Critical => "critical",
		}
	}
}

impl std::fmt::Display for ScoreBand {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

pub fn score_band(score: f64) -> ScoreBand {
	if score >= 80.0 {
		ScoreBand::Good
	} else if score >= 60.0 {
		ScoreBand::Warning
	} else {
		ScoreBand::Critical
	}
}
