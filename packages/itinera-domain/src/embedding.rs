use serde::{Deserialize, Serialize};

use itinera_config::DEFAULT_FALLBACK_DIMENSIONS;

/// A fixed-length vector. `dimensions` always equals the vector length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEmbedding")]
pub struct Embedding {
	vector: Vec<f32>,
	dimensions: usize,
}
impl Embedding {
	pub fn new(vector: Vec<f32>) -> Self {
		let dimensions = vector.len();

		Self { vector, dimensions }
	}

	pub fn vector(&self) -> &[f32] {
		&self.vector
	}

	pub fn dimensions(&self) -> usize {
		self.dimensions
	}

	pub fn into_vector(self) -> Vec<f32> {
		self.vector
	}
}
impl TryFrom<RawEmbedding> for Embedding {
	type Error = String;

	fn try_from(raw: RawEmbedding) -> Result<Self, Self::Error> {
		if let Some(dimensions) = raw.dimensions
			&& dimensions != raw.vector.len()
		{
			return Err(format!(
				"Embedding declares {dimensions} dimensions but carries {} values.",
				raw.vector.len()
			));
		}

		Ok(Self::new(raw.vector))
	}
}

#[derive(Deserialize)]
struct RawEmbedding {
	vector: Vec<f32>,
	dimensions: Option<usize>,
}

/// Offline embedder producing reproducible vectors from character content alone.
#[derive(Clone, Copy, Debug)]
pub struct FallbackEmbedder {
	dimensions: usize,
}
impl FallbackEmbedder {
	pub fn new(dimensions: usize) -> Self {
		Self { dimensions: dimensions.max(1) }
	}

	pub fn dimensions(&self) -> usize {
		self.dimensions
	}

	/// Whitespace tokens are hashed character by character into
	/// `(code * token_index * char_index) mod dimensions`, weighted by `1 / (token_index + 1)`,
	/// and the result is L2-normalized. A zero vector stays zero.
	pub fn embed(&self, text: &str) -> Embedding {
		let mut vector = vec![0.0_f32; self.dimensions];
		let dimensions = self.dimensions as u64;

		for (token_index, token) in text.split_whitespace().enumerate() {
			let weight = 1.0 / (token_index as f32 + 1.0);

			for (char_index, ch) in token.chars().flat_map(char::to_lowercase).enumerate() {
				let bucket = u64::from(ch)
					.wrapping_mul(token_index as u64)
					.wrapping_mul(char_index as u64)
					% dimensions;

				vector[bucket as usize] += weight;
			}
		}

		let magnitude = vector.iter().map(|value| value * value).sum::<f32>().sqrt();

		if magnitude > 0.0 {
			for value in &mut vector {
				*value /= magnitude;
			}
		}

		Embedding::new(vector)
	}
}
impl Default for FallbackEmbedder {
	fn default() -> Self {
		Self::new(DEFAULT_FALLBACK_DIMENSIONS as usize)
	}
}
