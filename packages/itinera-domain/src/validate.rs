use crate::{
	COST_TOLERANCE,
	itinerary::{DayPlan, GeneratedItinerary, ItineraryItem, minutes_of},
};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
	#[error("Itinerary title is empty.")]
	EmptyTitle,
	#[error("Itinerary has no days.")]
	NoDays,
	#[error("Day at position {position} is numbered {found}.")]
	DaySequence { position: u32, found: u32 },
	#[error("Item {item_id} on day {day} has an empty title.")]
	EmptyItemTitle { day: u32, item_id: String },
	#[error("Item {item_id} on day {day} has a negative or non-finite price.")]
	InvalidPrice { day: u32, item_id: String },
	#[error("Item {item_id} on day {day} has an end time inconsistent with its duration.")]
	TimeMismatch { day: u32, item_id: String },
	#[error("Item {item_id} on day {day} starts before the previous item ends.")]
	Overlap { day: u32, item_id: String },
	#[error("Item {item_id} on day {day} runs past the representable duration.")]
	DurationOverflow { day: u32, item_id: String },
	#[error("Day {day} totals do not match its items.")]
	DayTotals { day: u32 },
	#[error("Itinerary total cost {declared} does not match the day totals {computed}.")]
	TotalCost { declared: f64, computed: f64 },
}

/// Checks every structural invariant of an itinerary, whatever produced it.
pub fn validate_itinerary(itinerary: &GeneratedItinerary) -> Result<(), ValidationError> {
	if itinerary.title.trim().is_empty() {
		return Err(ValidationError::EmptyTitle);
	}
	if itinerary.days.is_empty() {
		return Err(ValidationError::NoDays);
	}

	for (index, day) in itinerary.days.iter().enumerate() {
		let position = index as u32 + 1;

		if day.day != position {
			return Err(ValidationError::DaySequence { position, found: day.day });
		}

		validate_day(day)?;
	}

	let computed: f64 = itinerary.days.iter().map(|day| day.total_cost).sum();

	if !itinerary.total_cost.is_finite() || (itinerary.total_cost - computed).abs() > COST_TOLERANCE
	{
		return Err(ValidationError::TotalCost { declared: itinerary.total_cost, computed });
	}

	Ok(())
}

fn validate_day(day: &DayPlan) -> Result<(), ValidationError> {
	let mut previous_end: Option<u32> = None;

	for item in &day.items {
		let item_id = || item.id.clone();

		if item.title.trim().is_empty() {
			return Err(ValidationError::EmptyItemTitle { day: day.day, item_id: item_id() });
		}
		if item.price.is_some_and(|price| !price.is_finite() || price < 0.0) {
			return Err(ValidationError::InvalidPrice { day: day.day, item_id: item_id() });
		}

		let start = item.start_time.map(minutes_of);
		let end = item.end_time.map(minutes_of);

		if let (Some(start), Some(end)) = (start, end)
			&& start.checked_add(item.duration_minutes) != Some(end)
		{
			return Err(ValidationError::TimeMismatch { day: day.day, item_id: item_id() });
		}

		// Untimed items are unscheduled and take no part in ordering.
		let Some(start) = start else { continue };

		if previous_end.is_some_and(|previous| start < previous) {
			return Err(ValidationError::Overlap { day: day.day, item_id: item_id() });
		}

		let end = match end {
			Some(end) => end,
			None => start.checked_add(item.duration_minutes).ok_or_else(|| {
				ValidationError::DurationOverflow { day: day.day, item_id: item_id() }
			})?,
		};

		previous_end = Some(end);
	}

	let total_duration = day
		.items
		.iter()
		.try_fold(0_u32, |sum, item| sum.checked_add(item.duration_minutes))
		.ok_or(ValidationError::DayTotals { day: day.day })?;
	let total_cost: f64 = day.items.iter().map(ItineraryItem::cost).sum();

	if day.total_duration != total_duration
		|| !day.total_cost.is_finite()
		|| (day.total_cost - total_cost).abs() > COST_TOLERANCE
	{
		return Err(ValidationError::DayTotals { day: day.day });
	}

	Ok(())
}
