//! Hand-authored itinerary returned when neither generation nor assembly yields a valid plan.

use time::{Duration, Time, macros::time};

use crate::itinerary::{DayPlan, GeneratedItinerary, ItemKind, ItineraryItem, ItineraryOrigin};

pub const FALLBACK_ITINERARY_ID: &str = "fallback-classic-city-day";

struct Stop {
	id: &'static str,
	kind: ItemKind,
	title: &'static str,
	start: Time,
	minutes: u32,
	price: f64,
}

const STOPS: [Stop; 5] = [
	Stop {
		id: "fallback-old-town-walk",
		kind: ItemKind::Place,
		title: "Old town walking loop",
		start: time!(09:30),
		minutes: 120,
		price: 0.0,
	},
	Stop {
		id: "fallback-market-lunch",
		kind: ItemKind::Meal,
		title: "Lunch at a local market",
		start: time!(11:45),
		minutes: 60,
		price: 25.0,
	},
	Stop {
		id: "fallback-history-museum",
		kind: ItemKind::Place,
		title: "City history museum",
		start: time!(13:00),
		minutes: 90,
		price: 15.0,
	},
	Stop {
		id: "fallback-river-transit",
		kind: ItemKind::Transport,
		title: "Riverside transit to the viewpoint",
		start: time!(14:45),
		minutes: 30,
		price: 5.0,
	},
	Stop {
		id: "fallback-sunset-dinner",
		kind: ItemKind::Meal,
		title: "Sunset viewpoint and dinner",
		start: time!(18:30),
		minutes: 120,
		price: 40.0,
	},
];

/// A fixed single-day plan. It always validates and carries the caller's ranked candidate
/// ids so the user still sees what matched.
pub fn fallback_itinerary(recommended_candidate_ids: Vec<String>) -> GeneratedItinerary {
	let items: Vec<ItineraryItem> = STOPS
		.iter()
		.map(|stop| ItineraryItem {
			id: stop.id.to_string(),
			kind: stop.kind,
			title: stop.title.to_string(),
			start_time: Some(stop.start),
			end_time: Some(stop.start + Duration::minutes(i64::from(stop.minutes))),
			duration_minutes: stop.minutes,
			price: Some(stop.price),
			location_ref: None,
			candidate_id: None,
		})
		.collect();
	let day = DayPlan::from_items(1, items);
	let total_cost = day.total_cost;

	GeneratedItinerary {
		id: FALLBACK_ITINERARY_ID.to_string(),
		title: "A classic day in the city".to_string(),
		summary: "A relaxed walking day through the old town, a museum, and a sunset dinner."
			.to_string(),
		days: vec![day],
		total_cost,
		highlights: vec![
			"Old town walking loop".to_string(),
			"City history museum".to_string(),
			"Sunset viewpoint and dinner".to_string(),
		],
		tips: vec![
			"Wear comfortable shoes for the morning walk.".to_string(),
			"Check museum opening days before you go.".to_string(),
		],
		recommended_candidate_ids,
		origin: ItineraryOrigin::Fallback,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::validate::validate_itinerary;

	#[test]
	fn fallback_plan_is_valid() {
		let plan = fallback_itinerary(vec!["g1".to_string()]);

		assert_eq!(validate_itinerary(&plan), Ok(()));
		assert_eq!(plan.days.len(), 1);
		assert_eq!(plan.item_count(), 5);
		assert_eq!(plan.total_cost, 85.0);
		assert_eq!(plan.days[0].total_duration, 420);
		assert_eq!(plan.recommended_candidate_ids, vec!["g1"]);
		assert_eq!(plan.origin, ItineraryOrigin::Fallback);
	}

	#[test]
	fn fallback_plan_is_stable() {
		assert_eq!(fallback_itinerary(Vec::new()), fallback_itinerary(Vec::new()));
	}
}
