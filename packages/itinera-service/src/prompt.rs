use serde_json::Value;

use itinera_domain::{
	candidate::CandidateItem, itinerary::GeneratedItinerary, query::PreferenceQuery,
};

const SYSTEM_PROMPT: &str = "You are a travel itinerary planner. \
Output must be valid JSON only and must match the provided schema exactly. \
Only schedule experiences from the supplied candidate list and reference them by candidate_id. \
Times use 24-hour HH:MM. end_time must equal start_time plus duration_minutes. \
Items within a day must not overlap. Day totals must equal the sum of their items, and \
total_cost must equal the sum of day totals. Do not add explanations or extra fields.";

/// A catalog entry in planning order. `score` is absent when ranking could not run.
#[derive(Clone, Copy, Debug)]
pub struct RankedCandidate<'a> {
	pub candidate: &'a CandidateItem,
	pub score: Option<f32>,
}

pub fn itinerary_schema() -> Value {
	serde_json::json!({
		"title": "string",
		"summary": "string",
		"days": [{
			"day": "integer, starting at 1",
			"items": [{
				"id": "string",
				"kind": "experience | place | meal | transport",
				"title": "string",
				"start_time": "HH:MM or null",
				"end_time": "HH:MM or null",
				"duration_minutes": "integer",
				"price": "number or null",
				"location_ref": "string or null",
				"candidate_id": "string or null"
			}],
			"total_duration": "integer",
			"total_cost": "number"
		}],
		"total_cost": "number",
		"highlights": ["string"],
		"tips": ["string"],
		"recommended_candidate_ids": ["string"]
	})
}

pub fn build_plan_messages(
	query: &PreferenceQuery,
	ranked: &[RankedCandidate<'_>],
	trip_days: u32,
	day_budget: Option<f64>,
	day_window: (&str, &str),
) -> Vec<Value> {
	let candidates: Vec<Value> = ranked
		.iter()
		.map(|RankedCandidate { candidate, score }| {
			serde_json::json!({
				"candidate_id": candidate.id,
				"kind": candidate.kind.as_str(),
				"title": candidate.title,
				"description": candidate.description,
				"tags": candidate.tags,
				"languages": candidate.languages,
				"price": candidate.price,
				"duration_minutes": candidate.duration_minutes,
				"location_ref": candidate.location_ref,
				"score": score,
			})
		})
		.collect();
	let budget = day_budget.map_or_else(|| "unbounded".to_string(), |amount| format!("{amount:.2}"));
	let user_prompt = format!(
		"Return JSON matching this exact schema:\n{schema}\nConstraints:\n- TRIP_DAYS = {trip_days}\n- DAY_WINDOW = {start}-{end}\n- DAY_BUDGET = {budget}\nTraveller preferences:\n{preferences}\nRanked candidates (best first):\n{candidates}",
		schema = schema_text(),
		start = day_window.0,
		end = day_window.1,
		preferences = preference_summary(query),
		candidates = Value::Array(candidates),
	);

	vec![
		serde_json::json!({ "role": "system", "content": SYSTEM_PROMPT }),
		serde_json::json!({ "role": "user", "content": user_prompt }),
	]
}

pub fn build_refine_messages(current: &GeneratedItinerary, feedback: &str) -> Vec<Value> {
	let current_text = serde_json::to_string_pretty(current).unwrap_or_default();
	let user_prompt = format!(
		"Return JSON matching this exact schema:\n{schema}\nRevise the current itinerary according to the traveller feedback. Keep every part the feedback does not mention.\nCurrent itinerary:\n{current_text}\nFeedback:\n{feedback}",
		schema = schema_text(),
		feedback = feedback.trim(),
	);

	vec![
		serde_json::json!({ "role": "system", "content": SYSTEM_PROMPT }),
		serde_json::json!({ "role": "user", "content": user_prompt }),
	]
}

/// Free-form preference summary handed to the generator.
pub fn preference_summary(query: &PreferenceQuery) -> String {
	let mut lines = vec![format!("Intent: {}", query.raw_intent_text.trim())];

	if !query.interests.is_empty() {
		lines.push(format!("Interests: {}", query.interests.join(", ")));
	}
	if !query.languages.is_empty() {
		lines.push(format!("Languages: {}", query.languages.join(", ")));
	}

	lines.push(format!("Budget tier: {}", query.budget_tier.as_str()));
	lines.push(format!("Group: {} of {}", query.group_type.as_str(), query.group_size()));

	if let Some(needs) = query.specific_needs.as_deref().map(str::trim)
		&& !needs.is_empty()
	{
		lines.push(format!("Specific needs: {needs}"));
	}

	lines.join("\n")
}

fn schema_text() -> String {
	serde_json::to_string_pretty(&itinerary_schema()).unwrap_or_else(|_| "{}".to_string())
}
