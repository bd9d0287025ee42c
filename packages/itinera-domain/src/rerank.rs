use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{
	candidate::CandidateItem,
	query::PreferenceQuery,
	similarity::{MatchResult, cmp_score_desc},
};
use itinera_config::{
	Budget, Config, DEFAULT_BUDGET_PENALTY, DEFAULT_LANGUAGE_BOOST, DEFAULT_QUALITY_BOOST,
	TierAmounts,
};

/// Breakdown of how a reranked score was produced.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct MatchExplain {
	pub raw_score: f32,
	pub language_boost: f32,
	pub quality_boost: f32,
	pub budget_penalty: f32,
	pub interest_boost: f32,
}
impl MatchExplain {
	pub fn adjusted(&self) -> f32 {
		self.raw_score + self.language_boost + self.quality_boost + self.interest_boost
			- self.budget_penalty
	}
}

#[derive(Clone, Debug)]
pub struct RerankPolicy {
	pub language_boost: f32,
	pub quality_boost: f32,
	pub budget_penalty: f32,
	pub interest_boost: f32,
	pub quality_min_rating: Option<f32>,
	pub ceilings: TierAmounts,
}
impl RerankPolicy {
	pub fn from_config(cfg: &Config) -> Self {
		Self {
			language_boost: cfg.ranking.language_boost,
			quality_boost: cfg.ranking.quality_boost,
			budget_penalty: cfg.ranking.budget_penalty,
			interest_boost: cfg.ranking.interest_boost,
			quality_min_rating: cfg.ranking.quality_min_rating,
			ceilings: cfg.budget.ceilings.clone(),
		}
	}

	pub fn explain(
		&self,
		raw_score: f32,
		query: &PreferenceQuery,
		candidate: &CandidateItem,
	) -> MatchExplain {
		let shared_languages = count_shared(&query.languages, &candidate.languages);
		let shared_interests = count_shared(&query.interests, &candidate.tags);
		let quality_boost =
			if candidate.quality.is_top(self.quality_min_rating) { self.quality_boost } else { 0.0 };
		let over_budget = match (candidate.price, query.budget_tier.amount_in(&self.ceilings)) {
			(Some(price), Some(ceiling)) => price > ceiling,
			_ => false,
		};

		MatchExplain {
			raw_score,
			language_boost: self.language_boost * shared_languages as f32,
			quality_boost,
			budget_penalty: if over_budget { self.budget_penalty } else { 0.0 },
			interest_boost: self.interest_boost * shared_interests as f32,
		}
	}
}
impl Default for RerankPolicy {
	fn default() -> Self {
		Self {
			language_boost: DEFAULT_LANGUAGE_BOOST,
			quality_boost: DEFAULT_QUALITY_BOOST,
			budget_penalty: DEFAULT_BUDGET_PENALTY,
			interest_boost: 0.0,
			quality_min_rating: None,
			ceilings: Budget::default().ceilings,
		}
	}
}

/// Applies the business-rule adjustments to similarity results, clamps each score to
/// `[0, 1]`, and re-sorts. Results whose candidate is not in `candidates` keep their raw
/// score.
pub fn rerank(
	results: Vec<MatchResult>,
	query: &PreferenceQuery,
	candidates: &[CandidateItem],
	policy: &RerankPolicy,
) -> Vec<MatchResult> {
	let by_id: HashMap<&str, &CandidateItem> =
		candidates.iter().map(|candidate| (candidate.id.as_str(), candidate)).collect();
	let mut out: Vec<MatchResult> = results
		.into_iter()
		.map(|mut result| {
			let explain = match by_id.get(result.candidate_id.as_str()) {
				Some(candidate) => policy.explain(result.score, query, candidate),
				None => MatchExplain { raw_score: result.score, ..MatchExplain::default() },
			};

			result.score = explain.adjusted().clamp(0.0, 1.0);
			result.explain = Some(explain);

			result
		})
		.collect();

	out.sort_by(|a, b| cmp_score_desc(a.score, b.score));

	out
}

fn count_shared(lhs: &[String], rhs: &[String]) -> usize {
	let rhs: HashSet<String> = rhs.iter().map(|value| normalize_term(value)).collect();
	let lhs: HashSet<String> = lhs.iter().map(|value| normalize_term(value)).collect();

	lhs.iter().filter(|value| !value.is_empty() && rhs.contains(*value)).count()
}

fn normalize_term(value: &str) -> String {
	value.trim().to_lowercase()
}
