use std::collections::HashSet;

use itinera_domain::itinerary::GeneratedItinerary;

use crate::{
	Error, ItineraService, Result,
	generate::{self, GenerationError},
	prompt,
};

impl ItineraService {
	/// Best-effort revision of `current` through the generator. Any backend or validation
	/// failure returns `current` unchanged; only empty feedback is an error.
	pub async fn refine_itinerary(
		&self,
		current: &GeneratedItinerary,
		feedback: &str,
	) -> Result<GeneratedItinerary> {
		if feedback.trim().is_empty() {
			return Err(Error::InvalidQuery { message: "feedback must be non-empty.".to_string() });
		}

		match self.regenerate(current, feedback).await {
			Ok(mut refined) => {
				refined.id = current.id.clone();

				tracing::info!(
					itinerary_id = %refined.id,
					days = refined.days.len(),
					items = refined.item_count(),
					"Refined itinerary."
				);

				Ok(refined)
			},
			Err(err) => {
				tracing::warn!(
					itinerary_id = %current.id,
					reason = %err,
					"Refinement failed. Keeping the current itinerary."
				);

				Ok(current.clone())
			},
		}
	}

	async fn regenerate(
		&self,
		current: &GeneratedItinerary,
		feedback: &str,
	) -> Result<GeneratedItinerary, GenerationError> {
		let known_ids: HashSet<&str> = current
			.recommended_candidate_ids
			.iter()
			.map(String::as_str)
			.chain(
				current
					.days
					.iter()
					.flat_map(|day| day.items.iter())
					.filter_map(|item| item.candidate_id.as_deref()),
			)
			.collect();
		let messages = prompt::build_refine_messages(current, feedback);
		let value = self.call_generator(&messages).await?;

		generate::parse_generated(value, &known_ids, None)
	}
}
