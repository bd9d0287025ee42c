use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result, rerank::MatchExplain};

/// One ranked candidate. Lists of these are ordered by non-increasing `score`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct MatchResult {
	pub candidate_id: String,
	pub score: f32,
	pub metadata: Value,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub explain: Option<MatchExplain>,
}

/// A candidate vector borrowed from the catalog for one scoring pass.
#[derive(Clone, Debug)]
pub struct CandidateVector<'a> {
	pub id: &'a str,
	pub vector: &'a [f32],
	pub metadata: Value,
}

pub fn cosine_similarity(lhs: &[f32], rhs: &[f32]) -> Result<f32> {
	ensure_same_dimensions(lhs, rhs)?;

	let mut dot = 0.0_f32;
	let mut lhs_norm = 0.0_f32;
	let mut rhs_norm = 0.0_f32;

	for (l, r) in lhs.iter().zip(rhs.iter()) {
		dot += l * r;
		lhs_norm += l * l;
		rhs_norm += r * r;
	}

	if lhs_norm == 0.0 || rhs_norm == 0.0 {
		return Ok(0.0);
	}

	Ok((dot / (lhs_norm.sqrt() * rhs_norm.sqrt())).clamp(-1.0, 1.0))
}

pub fn euclidean_distance(lhs: &[f32], rhs: &[f32]) -> Result<f32> {
	ensure_same_dimensions(lhs, rhs)?;

	let sum = lhs
		.iter()
		.zip(rhs.iter())
		.map(|(l, r)| {
			let delta = l - r;

			delta * delta
		})
		.sum::<f32>();

	Ok(sum.sqrt())
}

/// Scores every candidate against `query` and keeps the best `k`. Equal scores keep input
/// order.
pub fn top_k_matches(
	query: &[f32],
	candidates: &[CandidateVector<'_>],
	k: usize,
) -> Result<Vec<MatchResult>> {
	let mut scored = Vec::with_capacity(candidates.len());

	for candidate in candidates {
		let score = cosine_similarity(query, candidate.vector)?;

		scored.push(MatchResult {
			candidate_id: candidate.id.to_string(),
			score,
			metadata: candidate.metadata.clone(),
			explain: None,
		});
	}

	scored.sort_by(|a, b| cmp_score_desc(a.score, b.score));
	scored.truncate(k);

	Ok(scored)
}

pub fn cmp_score_desc(a: f32, b: f32) -> Ordering {
	b.total_cmp(&a)
}

fn ensure_same_dimensions(lhs: &[f32], rhs: &[f32]) -> Result<()> {
	if lhs.len() != rhs.len() {
		return Err(Error::DimensionMismatch { left: lhs.len(), right: rhs.len() });
	}

	Ok(())
}
