//! Risk scoring data and user-adjustable category weights.

use serde::{Deserialize, Serialize};

/// Relative importance of each scoring category.
///
/// The fields need not sum to 100; the total is only surfaced as a hint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringWeights {
	pub osint: f64,
	pub technical: f64,
	pub reputation: f64,
	pub behavioral: f64,
}

impl ScoringWeights {
	pub const fn new(osint: f64, technical: f64, reputation: f64, behavioral: f64) -> Self {
		Self {
			osint,
			technical,
			reputation,
			behavioral,
		}
	}

	/// Weights in category order: osint, technical, reputation, behavioral.
	pub fn as_array(&self) -> [f64; 4] {
		[self.osint, self.technical, self.reputation, self.behavioral]
	}

	/// Sum of all weights.
	pub fn total(&self) -> f64 {
		self.as_array().iter().sum()
	}
}

impl Default for ScoringWeights {
	fn default() -> Self {
		Self::new(25.0, 25.0, 25.0, 25.0)
	}
}

/// Per-category scores (0-100) plus the server-computed overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScores {
	#[serde(default)]
	pub overall: f64,
	pub osint: f64,
	pub technical: f64,
	pub reputation: f64,
	pub behavioral: f64,
}

impl CategoryScores {
	/// Scores in category order: osint, technical, reputation, behavioral.
	pub fn as_array(&self) -> [f64; 4] {
		[self.osint, self.technical, self.reputation, self.behavioral]
	}
}

/// A single bar of the scoring chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
	pub category: String,
	pub score: f64,
	pub weight: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub weighted_score: Option<f64>,
}

/// Scoring state for one scan job (`GET /api/scoring/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringData {
	pub job_id: String,
	pub weights: ScoringWeights,
	pub scores: CategoryScores,
	#[serde(default)]
	pub chart_data: Vec<ChartPoint>,
}
