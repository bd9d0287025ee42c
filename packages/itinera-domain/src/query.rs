use serde::{Deserialize, Serialize};

use crate::{Error, Result};
use itinera_config::TierAmounts;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetTier {
	Economy,
	#[default]
	Standard,
	Premium,
	Luxury,
}
impl BudgetTier {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Economy => "economy",
			Self::Standard => "standard",
			Self::Premium => "premium",
			Self::Luxury => "luxury",
		}
	}

	/// The configured amount for this tier. `None` means unbounded.
	pub fn amount_in(self, amounts: &TierAmounts) -> Option<f64> {
		match self {
			Self::Economy => amounts.economy,
			Self::Standard => amounts.standard,
			Self::Premium => amounts.premium,
			Self::Luxury => amounts.luxury,
		}
	}
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupType {
	#[default]
	Solo,
	Couple,
	Family,
	Friends,
	Business,
}
impl GroupType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Solo => "solo",
			Self::Couple => "couple",
			Self::Family => "family",
			Self::Friends => "friends",
			Self::Business => "business",
		}
	}

	pub fn default_size(self) -> u32 {
		match self {
			Self::Solo | Self::Business => 1,
			Self::Couple => 2,
			Self::Family | Self::Friends => 4,
		}
	}
}

/// What a visitor asked for. Built once per request and never modified.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PreferenceQuery {
	pub raw_intent_text: String,
	#[serde(default)]
	pub interests: Vec<String>,
	#[serde(default)]
	pub languages: Vec<String>,
	#[serde(default)]
	pub budget_tier: BudgetTier,
	#[serde(default)]
	pub group_type: GroupType,
	#[serde(default)]
	pub group_size: Option<u32>,
	#[serde(default)]
	pub trip_days: Option<u32>,
	#[serde(default)]
	pub specific_needs: Option<String>,
}
impl PreferenceQuery {
	pub fn new(raw_intent_text: impl Into<String>) -> Self {
		Self {
			raw_intent_text: raw_intent_text.into(),
			interests: Vec::new(),
			languages: Vec::new(),
			budget_tier: BudgetTier::default(),
			group_type: GroupType::default(),
			group_size: None,
			trip_days: None,
			specific_needs: None,
		}
	}

	pub fn validate(&self, max_trip_days: u32) -> Result<()> {
		if self.raw_intent_text.trim().is_empty() {
			return Err(Error::InvalidQuery {
				message: "raw_intent_text must be non-empty.".to_string(),
			});
		}
		if self.group_size == Some(0) {
			return Err(Error::InvalidQuery {
				message: "group_size must be greater than zero.".to_string(),
			});
		}

		if let Some(days) = self.trip_days
			&& (days == 0 || days > max_trip_days)
		{
			return Err(Error::InvalidQuery {
				message: format!("trip_days must be between 1 and {max_trip_days}."),
			});
		}

		Ok(())
	}

	pub fn group_size(&self) -> u32 {
		self.group_size.unwrap_or_else(|| self.group_type.default_size())
	}

	/// The single text embedded for this query.
	pub fn embedding_text(&self) -> String {
		let mut text = self.raw_intent_text.trim().to_string();

		if !self.interests.is_empty() {
			text.push_str("\nInterests: ");
			text.push_str(&self.interests.join(", "));
		}
		if let Some(needs) = self.specific_needs.as_deref().map(str::trim)
			&& !needs.is_empty()
		{
			text.push_str("\nNeeds: ");
			text.push_str(needs);
		}

		text
	}
}
