use serde::{Deserialize, Serialize};
use time::Time;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
	Experience,
	Place,
	Meal,
	Transport,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItineraryOrigin {
	#[default]
	Generated,
	Assembled,
	Fallback,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ItineraryItem {
	pub id: String,
	pub kind: ItemKind,
	pub title: String,
	#[serde(default, with = "clock::option")]
	pub start_time: Option<Time>,
	#[serde(default, with = "clock::option")]
	pub end_time: Option<Time>,
	pub duration_minutes: u32,
	#[serde(default)]
	pub price: Option<f64>,
	#[serde(default)]
	pub location_ref: Option<String>,
	#[serde(default)]
	pub candidate_id: Option<String>,
}
impl ItineraryItem {
	pub fn cost(&self) -> f64 {
		self.price.unwrap_or(0.0)
	}
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct DayPlan {
	pub day: u32,
	pub items: Vec<ItineraryItem>,
	pub total_duration: u32,
	pub total_cost: f64,
}
impl DayPlan {
	/// Builds a day whose totals are summed from its items. The duration saturates at
	/// `u32::MAX`, which the validator rejects.
	pub fn from_items(day: u32, items: Vec<ItineraryItem>) -> Self {
		let total_duration =
			items.iter().fold(0_u32, |sum, item| sum.saturating_add(item.duration_minutes));
		let total_cost = items.iter().map(ItineraryItem::cost).sum();

		Self { day, items, total_duration, total_cost }
	}
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GeneratedItinerary {
	#[serde(default)]
	pub id: String,
	pub title: String,
	pub summary: String,
	pub days: Vec<DayPlan>,
	pub total_cost: f64,
	#[serde(default)]
	pub highlights: Vec<String>,
	#[serde(default)]
	pub tips: Vec<String>,
	#[serde(default)]
	pub recommended_candidate_ids: Vec<String>,
	#[serde(default)]
	pub origin: ItineraryOrigin,
}
impl GeneratedItinerary {
	pub fn item_count(&self) -> usize {
		self.days.iter().map(|day| day.items.len()).sum()
	}
}

pub(crate) fn minutes_of(time: Time) -> u32 {
	u32::from(time.hour()) * 60 + u32::from(time.minute())
}

pub(crate) fn clock_at(minutes: u32) -> Option<Time> {
	let hour = u8::try_from(minutes / 60).ok()?;
	let minute = (minutes % 60) as u8;

	Time::from_hms(hour, minute, 0).ok()
}

/// `HH:MM` serialization for wall-clock times.
pub mod clock {
	use serde::{Deserialize, Deserializer, Serializer};
	use time::{Time, format_description::BorrowedFormatItem, macros::format_description};

	const FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");

	pub fn serialize<S>(value: &Time, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let formatted = value.format(FORMAT).map_err(serde::ser::Error::custom)?;

		serializer.serialize_str(&formatted)
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Time, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		Time::parse(raw.trim(), FORMAT).map_err(serde::de::Error::custom)
	}

	pub mod option {
		use serde::{Deserialize as _, Deserializer, Serializer};
		use time::Time;

		pub fn serialize<S>(value: &Option<Time>, serializer: S) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			match value {
				Some(value) => super::serialize(value, serializer),
				None => serializer.serialize_none(),
			}
		}

		pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Time>, D::Error>
		where
			D: Deserializer<'de>,
		{
			let raw = Option::<String>::deserialize(deserializer)?;

			match raw {
				Some(value) => Time::parse(value.trim(), super::FORMAT)
					.map(Some)
					.map_err(serde::de::Error::custom),
				None => Ok(None),
			}
		}
	}
}
