use std::{
	collections::HashMap,
	sync::{PoisonError, RwLock},
};

use itinera_domain::embedding::Embedding;

/// Cache entry key. The fingerprint changes whenever the embedded text or the model does, so
/// an edited catalog entry never reuses a stale vector.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CacheKey {
	pub candidate_id: String,
	pub fingerprint: String,
}
impl CacheKey {
	pub fn new(candidate_id: &str, text: &str, model: &str) -> Self {
		Self { candidate_id: candidate_id.to_string(), fingerprint: fingerprint(text, model) }
	}
}

pub trait EmbeddingCache
where
	Self: Send + Sync,
{
	fn get(&self, key: &CacheKey) -> Option<Embedding>;

	fn put(&self, key: CacheKey, embedding: Embedding);
}

#[derive(Debug, Default)]
pub struct InMemoryEmbeddingCache {
	entries: RwLock<HashMap<CacheKey, Embedding>>,
}
impl InMemoryEmbeddingCache {
	pub fn len(&self) -> usize {
		self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
impl EmbeddingCache for InMemoryEmbeddingCache {
	fn get(&self, key: &CacheKey) -> Option<Embedding> {
		self.entries.read().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
	}

	fn put(&self, key: CacheKey, embedding: Embedding) {
		self.entries.write().unwrap_or_else(PoisonError::into_inner).insert(key, embedding);
	}
}

pub fn fingerprint(text: &str, model: &str) -> String {
	let payload = serde_json::json!({ "model": model, "text": text });

	blake3::hash(payload.to_string().as_bytes()).to_hex().to_string()
}

pub(crate) fn fingerprint_prefix(fingerprint: &str) -> &str {
	let len = fingerprint.len().min(12);

	&fingerprint[..len]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fingerprint_tracks_text_and_model() {
		let base = fingerprint("old town walk", "embed-small");

		assert_eq!(base, fingerprint("old town walk", "embed-small"));
		assert_ne!(base, fingerprint("old town walk!", "embed-small"));
		assert_ne!(base, fingerprint("old town walk", "embed-large"));
	}

	#[test]
	fn stores_and_returns_vectors() {
		let cache = InMemoryEmbeddingCache::default();
		let key = CacheKey::new("g1", "text", "model");

		assert!(cache.get(&key).is_none());

		cache.put(key.clone(), Embedding::new(vec![1.0, 0.0]));

		assert_eq!(cache.get(&key), Some(Embedding::new(vec![1.0, 0.0])));
		assert_eq!(cache.len(), 1);
		assert!(cache.get(&CacheKey::new("g1", "edited", "model")).is_none());
	}
}
