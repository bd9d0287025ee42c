use uuid::Uuid;

use crate::{
	Result,
	candidate::{CandidateItem, CandidateKind},
	itinerary::{
		DayPlan, GeneratedItinerary, ItemKind, ItineraryItem, ItineraryOrigin, clock_at, minutes_of,
	},
	query::{BudgetTier, PreferenceQuery},
};
use itinera_config::{Budget, Config, TierAmounts};

const MAX_HIGHLIGHTS: usize = 3;

#[derive(Clone, Debug)]
pub struct PlanningPolicy {
	/// Minutes after midnight.
	pub day_start: u32,
	/// Minutes after midnight.
	pub day_end: u32,
	pub buffer_minutes: u32,
	pub default_item_minutes: u32,
	pub default_trip_days: u32,
	/// Per traveller, per day.
	pub daily_budget: TierAmounts,
}
impl PlanningPolicy {
	pub fn from_config(cfg: &Config) -> Result<Self> {
		let day_start = itinera_config::parse_clock(&cfg.planning.day_start)?;
		let day_end = itinera_config::parse_clock(&cfg.planning.day_end)?;

		Ok(Self {
			day_start: minutes_of(day_start),
			day_end: minutes_of(day_end),
			buffer_minutes: cfg.planning.buffer_minutes,
			default_item_minutes: cfg.planning.default_item_minutes,
			default_trip_days: cfg.planning.default_trip_days,
			daily_budget: cfg.budget.daily.clone(),
		})
	}

	pub fn trip_days(&self, query: &PreferenceQuery) -> u32 {
		query.trip_days.unwrap_or(self.default_trip_days).max(1)
	}

	/// Money available per day for the whole group. `None` means unbounded.
	pub fn day_budget(&self, tier: BudgetTier, group_size: u32) -> Option<f64> {
		tier.amount_in(&self.daily_budget).map(|per_person| per_person * f64::from(group_size))
	}
}
impl Default for PlanningPolicy {
	fn default() -> Self {
		Self {
			day_start: 9 * 60,
			day_end: 21 * 60,
			buffer_minutes: 15,
			default_item_minutes: 120,
			default_trip_days: 1,
			daily_budget: Budget::default().daily,
		}
	}
}

struct DayCursor {
	now: u32,
	remaining_budget: Option<f64>,
}
impl DayCursor {
	fn fits(&self, minutes: u32, price: f64, day_end: u32) -> bool {
		let fits_time = self.now.checked_add(minutes).is_some_and(|end| end <= day_end);
		let fits_budget = self.remaining_budget.is_none_or(|remaining| price <= remaining);

		fits_time && fits_budget
	}
}

/// Greedily places ranked candidates into day slots. `ranked` is consumed in order, each
/// candidate is used at most once, and every requested day is emitted even when empty.
pub fn assemble_itinerary(
	query: &PreferenceQuery,
	ranked: &[&CandidateItem],
	policy: &PlanningPolicy,
) -> GeneratedItinerary {
	let trip_days = policy.trip_days(query);
	let day_budget = policy.day_budget(query.budget_tier, query.group_size());
	let mut used = vec![false; ranked.len()];
	let mut days = Vec::with_capacity(trip_days as usize);

	for day in 1..=trip_days {
		let mut cursor = DayCursor { now: policy.day_start, remaining_budget: day_budget };
		let mut items = Vec::new();

		while cursor.now < policy.day_end {
			let pick = ranked.iter().enumerate().find(|(index, candidate)| {
				!used[*index]
					&& is_placeable(candidate)
					&& cursor.fits(
						item_minutes(candidate, policy),
						candidate_cost(candidate),
						policy.day_end,
					)
			});
			let Some((index, candidate)) = pick else { break };
			let minutes = item_minutes(candidate, policy);
			let start = cursor.now;
			let end = start + minutes;

			used[index] = true;
			items.push(ItineraryItem {
				id: format!("day{day}-{}", candidate.id),
				kind: ItemKind::Experience,
				title: item_title(candidate),
				start_time: clock_at(start),
				end_time: clock_at(end),
				duration_minutes: minutes,
				price: candidate.price,
				location_ref: candidate.location_ref.clone(),
				candidate_id: Some(candidate.id.clone()),
			});

			cursor.now = end.saturating_add(policy.buffer_minutes);
			cursor.remaining_budget =
				cursor.remaining_budget.map(|remaining| remaining - candidate_cost(candidate));
		}

		days.push(DayPlan::from_items(day, items));
	}

	let recommended_candidate_ids: Vec<String> = days
		.iter()
		.flat_map(|day| day.items.iter())
		.filter_map(|item| item.candidate_id.clone())
		.collect();
	let total_cost = days.iter().map(|day| day.total_cost).sum();

	GeneratedItinerary {
		id: assembled_id(query, &recommended_candidate_ids),
		title: assembled_title(query, trip_days),
		summary: assembled_summary(query, trip_days, recommended_candidate_ids.len()),
		highlights: days
			.iter()
			.flat_map(|day| day.items.iter())
			.take(MAX_HIGHLIGHTS)
			.map(|item| item.title.clone())
			.collect(),
		tips: assembled_tips(query),
		days,
		total_cost,
		recommended_candidate_ids,
		origin: ItineraryOrigin::Assembled,
	}
}

fn item_minutes(candidate: &CandidateItem, policy: &PlanningPolicy) -> u32 {
	candidate.duration_minutes.unwrap_or(policy.default_item_minutes)
}

/// Rows that would make the assembled plan fail validation are never placed.
fn is_placeable(candidate: &CandidateItem) -> bool {
	let valid_price = candidate.price.is_none_or(|price| price.is_finite() && price >= 0.0);

	valid_price && !item_title(candidate).trim().is_empty()
}

fn candidate_cost(candidate: &CandidateItem) -> f64 {
	candidate.price.unwrap_or(0.0)
}

fn item_title(candidate: &CandidateItem) -> String {
	match candidate.kind {
		CandidateKind::Guide => format!("Guided outing with {}", candidate.title.trim()),
		CandidateKind::Experience => candidate.title.trim().to_string(),
	}
}

fn assembled_id(query: &PreferenceQuery, candidate_ids: &[String]) -> String {
	let seed = format!(
		"{}|{}|{}|{}",
		query.raw_intent_text.trim(),
		query.budget_tier.as_str(),
		query.group_size(),
		candidate_ids.join(",")
	);

	Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes()).to_string()
}

fn assembled_title(query: &PreferenceQuery, trip_days: u32) -> String {
	let interests: Vec<&str> = query
		.interests
		.iter()
		.map(|value| value.trim())
		.filter(|value| !value.is_empty())
		.collect();

	if interests.is_empty() {
		format!("{trip_days}-day itinerary")
	} else {
		format!("{trip_days}-day {} itinerary", interests.join(" and "))
	}
}

fn assembled_summary(query: &PreferenceQuery, trip_days: u32, placed: usize) -> String {
	let day_label = if trip_days == 1 { "day" } else { "days" };

	format!(
		"A {} plan for a {} group of {} over {trip_days} {day_label}, built from {placed} ranked experiences.",
		query.budget_tier.as_str(),
		query.group_type.as_str(),
		query.group_size(),
	)
}

fn assembled_tips(query: &PreferenceQuery) -> Vec<String> {
	let mut tips = Vec::new();

	match query.budget_tier {
		BudgetTier::Economy => {
			tips.push("Free walking routes and market lunches keep daily spend low.".to_string())
		},
		BudgetTier::Standard => {
			tips.push("Book popular experiences a few days ahead to hold the slot.".to_string())
		},
		BudgetTier::Premium | BudgetTier::Luxury => {
			tips.push("Ask guides about private or after-hours access.".to_string())
		},
	}

	if !query.languages.is_empty() {
		let languages = query.languages.join(", ");

		tips.push(format!("Confirm the guide language ({languages}) when booking."));
	}

	if let Some(needs) = query.specific_needs.as_deref().map(str::trim)
		&& !needs.is_empty()
	{
		tips.push(format!("Share your needs with each provider in advance: {needs}."));
	}

	tips.push("Leave the buffer between activities for transit and meals.".to_string());

	tips
}
