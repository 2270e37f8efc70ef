use std::sync::Arc;

use reveal_protocol::{ScoringData, ScoringWeights};

use super::segment;
use crate::error::Result;
use crate::pipeline::RequestPipeline;
use crate::scoring::validate_weights;

/// `/api/scoring/*`.
#[derive(Clone)]
pub struct ScoringApi {
	pipeline: Arc<RequestPipeline>,
}

impl ScoringApi {
	pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
		Self { pipeline }
	}

	pub async fn get(&self, job_id: &str) -> Result<ScoringData> {
		self.pipeline.get_json(&format!("/api/scoring/{}", segment(job_id))).await
	}

	/// Uploads new weights and returns the recomputed scoring data.
	///
	/// Negative or non-finite weights are rejected before any request is sent.
	pub async fn update_weights(&self, job_id: &str, weights: &ScoringWeights) -> Result<ScoringData> {
		validate_weights(weights)?;
		self.pipeline.post_json(&format!("/api/scoring/{}/weights", segment(job_id)), weights).await
	}
}
