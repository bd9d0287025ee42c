use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::embedding::Embedding;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
	Guide,
	#[default]
	Experience,
}
impl CandidateKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Guide => "guide",
			Self::Experience => "experience",
		}
	}
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct QualitySignal {
	#[serde(default)]
	pub certified: bool,
	#[serde(default)]
	pub rating: Option<f32>,
}
impl QualitySignal {
	/// Certification always qualifies; a rating qualifies only when a threshold is configured.
	pub fn is_top(&self, min_rating: Option<f32>) -> bool {
		if self.certified {
			return true;
		}

		match (self.rating, min_rating) {
			(Some(rating), Some(min)) => rating.is_finite() && rating >= min,
			_ => false,
		}
	}
}

/// A guide profile or bookable experience supplied by the catalog. Read-only to the engine.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CandidateItem {
	pub id: String,
	#[serde(default)]
	pub kind: CandidateKind,
	pub title: String,
	#[serde(default)]
	pub description: Option<String>,
	/// `None` until the catalog or the engine resolves a vector for this candidate.
	#[serde(default)]
	pub embedding: Option<Embedding>,
	#[serde(default)]
	pub tags: Vec<String>,
	#[serde(default)]
	pub languages: Vec<String>,
	/// Price per booking. `None` never fails a budget check.
	#[serde(default)]
	pub price: Option<f64>,
	#[serde(default)]
	pub quality: QualitySignal,
	#[serde(default)]
	pub duration_minutes: Option<u32>,
	#[serde(default)]
	pub location_ref: Option<String>,
}
impl CandidateItem {
	/// Text fed to an embedder when the candidate has no stored vector.
	pub fn embedding_text(&self) -> String {
		let mut parts = vec![self.title.trim().to_string()];

		if let Some(description) = self.description.as_deref().map(str::trim)
			&& !description.is_empty()
		{
			parts.push(description.to_string());
		}
		if !self.tags.is_empty() {
			parts.push(self.tags.join(" "));
		}

		parts.retain(|part| !part.is_empty());

		parts.join("\n")
	}

	/// Copy of the fields callers need to render a match without the full catalog.
	pub fn metadata(&self) -> Value {
		serde_json::json!({
			"title": self.title,
			"kind": self.kind.as_str(),
			"tags": self.tags,
			"languages": self.languages,
			"price": self.price,
			"certified": self.quality.certified,
			"rating": self.quality.rating,
			"duration_minutes": self.duration_minutes,
			"location_ref": self.location_ref,
		})
	}
}
