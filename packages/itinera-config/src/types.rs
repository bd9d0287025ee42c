use serde::Deserialize;
use serde_json::{Map, Value};

pub const DEFAULT_LANGUAGE_BOOST: f32 = 0.05;
pub const DEFAULT_QUALITY_BOOST: f32 = 0.10;
pub const DEFAULT_BUDGET_PENALTY: f32 = 0.15;
pub const DEFAULT_FALLBACK_DIMENSIONS: u32 = 384;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	#[serde(default)]
	pub providers: Providers,
	#[serde(default)]
	pub matching: Matching,
	#[serde(default)]
	pub ranking: Ranking,
	#[serde(default)]
	pub budget: Budget,
	#[serde(default)]
	pub planning: Planning,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Providers {
	/// Optional. When absent every embedding comes from the deterministic fallback embedder.
	pub embedding: Option<EmbeddingProviderConfig>,
	/// Optional. When absent itineraries are assembled from the catalog without generation.
	pub generator: Option<LlmProviderConfig>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default = "default_max_attempts")]
	pub max_attempts: u32,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Matching {
	pub default_top_k: u32,
	pub embed_concurrency: u32,
	pub fallback_dimensions: u32,
}
impl Default for Matching {
	fn default() -> Self {
		Self {
			default_top_k: 10,
			embed_concurrency: 8,
			fallback_dimensions: DEFAULT_FALLBACK_DIMENSIONS,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Ranking {
	pub language_boost: f32,
	pub quality_boost: f32,
	pub budget_penalty: f32,
	/// Additive boost per query interest found among a candidate's tags. Zero disables it.
	pub interest_boost: f32,
	/// Optional. Ratings at or above this value count as the top quality signal.
	pub quality_min_rating: Option<f32>,
}
impl Default for Ranking {
	fn default() -> Self {
		Self {
			language_boost: DEFAULT_LANGUAGE_BOOST,
			quality_boost: DEFAULT_QUALITY_BOOST,
			budget_penalty: DEFAULT_BUDGET_PENALTY,
			interest_boost: 0.0,
			quality_min_rating: None,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(from = "BudgetTables")]
pub struct Budget {
	/// Highest acceptable price of a single candidate per tier.
	pub ceilings: TierAmounts,
	/// Spend per traveller per day; multiplied by group size when planning.
	pub daily: TierAmounts,
}
impl Default for Budget {
	fn default() -> Self {
		Self {
			ceilings: TierAmounts {
				economy: Some(100.0),
				standard: Some(300.0),
				premium: Some(750.0),
				luxury: None,
			},
			daily: TierAmounts {
				economy: Some(150.0),
				standard: Some(400.0),
				premium: Some(1_000.0),
				luxury: None,
			},
		}
	}
}
impl From<BudgetTables> for Budget {
	fn from(tables: BudgetTables) -> Self {
		let defaults = Self::default();

		Self {
			ceilings: tables.ceilings.over(defaults.ceilings),
			daily: tables.daily.over(defaults.daily),
		}
	}
}

/// Per-tier amounts. `None` means unbounded.
#[derive(Clone, Debug, Default)]
pub struct TierAmounts {
	pub economy: Option<f64>,
	pub standard: Option<f64>,
	pub premium: Option<f64>,
	pub luxury: Option<f64>,
}
impl TierAmounts {
	pub fn in_tier_order(&self) -> [(&'static str, Option<f64>); 4] {
		[
			("economy", self.economy),
			("standard", self.standard),
			("premium", self.premium),
			("luxury", self.luxury),
		]
	}
}

/// `[budget]` as written. Omitted tiers keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BudgetTables {
	ceilings: TierOverrides,
	daily: TierOverrides,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TierOverrides {
	economy: Option<f64>,
	standard: Option<f64>,
	premium: Option<f64>,
	luxury: Option<f64>,
}
impl TierOverrides {
	fn over(self, defaults: TierAmounts) -> TierAmounts {
		TierAmounts {
			economy: self.economy.or(defaults.economy),
			standard: self.standard.or(defaults.standard),
			premium: self.premium.or(defaults.premium),
			luxury: self.luxury.or(defaults.luxury),
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Planning {
	/// Local start of the day window, formatted as `HH:MM`.
	pub day_start: String,
	/// Local end of the day window, formatted as `HH:MM`.
	pub day_end: String,
	pub buffer_minutes: u32,
	pub default_item_minutes: u32,
	pub default_trip_days: u32,
	pub max_trip_days: u32,
	pub candidate_pool: u32,
}
impl Default for Planning {
	fn default() -> Self {
		Self {
			day_start: "09:00".to_string(),
			day_end: "21:00".to_string(),
			buffer_minutes: 15,
			default_item_minutes: 120,
			default_trip_days: 1,
			max_trip_days: 14,
			candidate_pool: 20,
		}
	}
}

fn default_max_attempts() -> u32 {
	3
}
