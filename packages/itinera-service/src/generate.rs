use std::{collections::HashSet, time::Duration};

use serde_json::Value;
use uuid::Uuid;

use crate::ItineraService;
use itinera_domain::{
	itinerary::{GeneratedItinerary, ItineraryOrigin},
	validate::{ValidationError, validate_itinerary},
};

/// Why a generated itinerary was discarded.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
	#[error("No generator is configured.")]
	NotConfigured,
	#[error("Generator unavailable: {message}")]
	Unavailable { message: String },
	#[error("Generated output is malformed: {message}")]
	Malformed { message: String },
	#[error("Generated itinerary is invalid: {0}")]
	Invalid(#[from] ValidationError),
}

impl ItineraService {
	/// Runs the generator under a deadline covering every attempt the adapter may make.
	pub(crate) async fn call_generator(
		&self,
		messages: &[Value],
	) -> Result<Value, GenerationError> {
		let Some(cfg) = self.cfg.providers.generator.as_ref() else {
			return Err(GenerationError::NotConfigured);
		};
		let attempts = u64::from(cfg.max_attempts.max(1));
		let deadline = Duration::from_millis(cfg.timeout_ms.saturating_mul(attempts));
		let call = self.providers.generator.generate(cfg, messages);

		match tokio::time::timeout(deadline, call).await {
			Ok(Ok(value)) => Ok(value),
			Ok(Err(err)) => Err(GenerationError::Unavailable { message: err.to_string() }),
			Err(_) => Err(GenerationError::Unavailable {
				message: format!("Generator timed out after {} ms.", deadline.as_millis()),
			}),
		}
	}
}

/// Turns untrusted generator output into an itinerary, or explains why it cannot be used.
///
/// Candidate references are restricted to `known_ids`. When `expected_days` is set the plan
/// must cover exactly that many days.
pub fn parse_generated(
	value: Value,
	known_ids: &HashSet<&str>,
	expected_days: Option<u32>,
) -> Result<GeneratedItinerary, GenerationError> {
	let mut itinerary: GeneratedItinerary = serde_json::from_value(value)
		.map_err(|err| GenerationError::Malformed { message: err.to_string() })?;

	if let Some(expected) = expected_days
		&& itinerary.days.len() != expected as usize
	{
		return Err(GenerationError::Malformed {
			message: format!("Expected {expected} days, got {}.", itinerary.days.len()),
		});
	}

	if itinerary.id.trim().is_empty() {
		itinerary.id = Uuid::new_v4().to_string();
	}

	itinerary.origin = ItineraryOrigin::Generated;

	for item in itinerary.days.iter_mut().flat_map(|day| day.items.iter_mut()) {
		if item.candidate_id.as_deref().is_some_and(|id| !known_ids.contains(id)) {
			item.candidate_id = None;
		}
	}

	let mut seen = HashSet::new();

	itinerary
		.recommended_candidate_ids
		.retain(|id| known_ids.contains(id.as_str()) && seen.insert(id.clone()));

	validate_itinerary(&itinerary)?;

	Ok(itinerary)
}
