use std::collections::{HashMap, HashSet};

use itinera_domain::{
	assemble::assemble_itinerary,
	candidate::CandidateItem,
	fallback_plan::fallback_itinerary,
	itinerary::GeneratedItinerary,
	query::PreferenceQuery,
	validate::validate_itinerary,
};

use crate::{
	Error, ItineraService, Result,
	generate::{self, GenerationError},
	prompt::{self, RankedCandidate},
};

impl ItineraService {
	/// Produces a structurally valid itinerary for the query.
	///
	/// The generator is tried first, then the greedy assembler over the ranked candidates,
	/// then the fixed fallback plan. Only [`Error::InvalidQuery`] is ever returned.
	pub async fn build_itinerary(
		&self,
		query: &PreferenceQuery,
		candidates: &[CandidateItem],
	) -> Result<GeneratedItinerary> {
		query.validate(self.cfg.planning.max_trip_days)?;

		let ranked = self.planning_order(query, candidates).await?;
		let ranked_ids: Vec<String> =
			ranked.iter().map(|ranked| ranked.candidate.id.clone()).collect();
		let known_ids: HashSet<&str> =
			candidates.iter().map(|candidate| candidate.id.as_str()).collect();

		match self.generate_plan(query, &ranked, &known_ids).await {
			Ok(itinerary) => {
				tracing::info!(
					itinerary_id = %itinerary.id,
					days = itinerary.days.len(),
					items = itinerary.item_count(),
					"Using generated itinerary."
				);

				return Ok(itinerary);
			},
			Err(GenerationError::NotConfigured) => {
				tracing::debug!("No generator configured. Assembling from ranked candidates.");
			},
			Err(err) => {
				tracing::warn!(reason = %err, "Discarding generated itinerary.");
			},
		}

		let items: Vec<&CandidateItem> = ranked.iter().map(|ranked| ranked.candidate).collect();
		let assembled = assemble_itinerary(query, &items, &self.planning_policy);

		if assembled.item_count() == 0 {
			tracing::info!(
				candidates = candidates.len(),
				"No candidate fits the day window or budget. Using the fallback plan."
			);
		} else {
			match validate_itinerary(&assembled) {
				Ok(()) => return Ok(assembled),
				Err(err) => {
					tracing::warn!(reason = %err, "Discarding assembled itinerary.");
				},
			}
		}

		Ok(fallback_itinerary(ranked_ids))
	}

	/// Ranked candidates capped at the planning pool. Falls back to catalog order when the
	/// catalog holds vectors of the wrong dimensionality.
	async fn planning_order<'a>(
		&self,
		query: &PreferenceQuery,
		candidates: &'a [CandidateItem],
	) -> Result<Vec<RankedCandidate<'a>>> {
		let pool = (self.cfg.planning.candidate_pool as usize).max(1);

		match self.rank_candidates(query, candidates, pool).await {
			Ok(results) => {
				let by_id: HashMap<&str, &CandidateItem> = candidates
					.iter()
					.rev()
					.map(|candidate| (candidate.id.as_str(), candidate))
					.collect();

				Ok(results
					.iter()
					.filter_map(|result| {
						let candidate = *by_id.get(result.candidate_id.as_str())?;

						Some(RankedCandidate { candidate, score: Some(result.score) })
					})
					.collect())
			},
			Err(Error::DimensionMismatch { left, right }) => {
				tracing::error!(
					left,
					right,
					"Catalog vectors do not match the query vector. Planning in catalog order."
				);

				Ok(candidates
					.iter()
					.take(pool)
					.map(|candidate| RankedCandidate { candidate, score: None })
					.collect())
			},
			Err(err) => Err(err),
		}
	}

	async fn generate_plan(
		&self,
		query: &PreferenceQuery,
		ranked: &[RankedCandidate<'_>],
		known_ids: &HashSet<&str>,
	) -> Result<GeneratedItinerary, GenerationError> {
		if self.cfg.providers.generator.is_none() {
			return Err(GenerationError::NotConfigured);
		}

		let trip_days = self.planning_policy.trip_days(query);
		let day_budget = self.planning_policy.day_budget(query.budget_tier, query.group_size());
		let messages = prompt::build_plan_messages(
			query,
			ranked,
			trip_days,
			day_budget,
			(self.cfg.planning.day_start.as_str(), self.cfg.planning.day_end.as_str()),
		);
		let value = self.call_generator(&messages).await?;

		generate::parse_generated(value, known_ids, Some(trip_days))
	}
}
