use std::{collections::HashMap, time::Duration};

use futures::{StreamExt, future, stream};

use crate::{
	CacheKey, Error, ItineraService, Result,
	cache::fingerprint_prefix,
};
use itinera_config::EmbeddingProviderConfig;
use itinera_domain::{candidate::CandidateItem, embedding::Embedding};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum VectorSource {
	Provider,
	Fallback,
}

pub(crate) struct QueryVector {
	pub(crate) embedding: Embedding,
	pub(crate) source: VectorSource,
}

impl ItineraService {
	/// Embeds the query text with the configured provider, or deterministically when the
	/// provider is absent, fails, or times out.
	pub(crate) async fn embed_query(&self, text: &str) -> QueryVector {
		if let Some(cfg) = self.cfg.providers.embedding.as_ref() {
			match self.provider_embedding(cfg, text).await {
				Ok(embedding) => {
					return QueryVector { embedding, source: VectorSource::Provider };
				},
				Err(err) => {
					tracing::warn!(
						error = %err,
						provider_id = %cfg.provider_id,
						"Query embedding failed. Falling back to the deterministic embedder."
					);
				},
			}
		}

		QueryVector { embedding: self.fallback_embedder.embed(text), source: VectorSource::Fallback }
	}

	/// Vectors for candidates that carry none, keyed by catalog position. Candidates are
	/// embedded by the same kind of embedder as the query so both sides share one vector
	/// space. A candidate the provider cannot embed is left out and will not be scored.
	pub(crate) async fn resolve_missing_vectors(
		&self,
		candidates: &[CandidateItem],
		source: VectorSource,
	) -> HashMap<usize, Embedding> {
		let missing = candidates
			.iter()
			.enumerate()
			.filter(|(_, candidate)| candidate.embedding.is_none());
		let Some(cfg) =
			self.cfg.providers.embedding.as_ref().filter(|_| source == VectorSource::Provider)
		else {
			return missing
				.map(|(index, candidate)| {
					(index, self.fallback_embedder.embed(&candidate.embedding_text()))
				})
				.collect();
		};
		let concurrency = (self.cfg.matching.embed_concurrency as usize).max(1);

		stream::iter(missing)
			.map(|(index, candidate)| async move {
				(index, candidate, self.cached_candidate_embedding(cfg, candidate).await)
			})
			.buffer_unordered(concurrency)
			.filter_map(|(index, candidate, result)| {
				future::ready(match result {
					Ok(embedding) => Some((index, embedding)),
					Err(err) => {
						tracing::warn!(
							error = %err,
							candidate_id = %candidate.id,
							"Candidate embedding failed. Candidate will not be scored."
						);

						None
					},
				})
			})
			.collect()
			.await
	}

	async fn cached_candidate_embedding(
		&self,
		cfg: &EmbeddingProviderConfig,
		candidate: &CandidateItem,
	) -> Result<Embedding> {
		let text = candidate.embedding_text();
		let key = CacheKey::new(&candidate.id, &text, &cfg.model);

		if let Some(embedding) = self.cache.get(&key) {
			tracing::debug!(
				candidate_id = %candidate.id,
				fingerprint = fingerprint_prefix(&key.fingerprint),
				"Embedding cache hit."
			);

			return Ok(embedding);
		}

		let embedding = self.provider_embedding(cfg, &text).await?;

		self.cache.put(key, embedding.clone());

		Ok(embedding)
	}

	async fn provider_embedding(
		&self,
		cfg: &EmbeddingProviderConfig,
		text: &str,
	) -> Result<Embedding> {
		if text.trim().is_empty() {
			return Err(Error::InvalidQuery {
				message: "Embedding input must be non-empty.".to_string(),
			});
		}

		let texts = vec![text.to_string()];
		let call = self.providers.embedding.embed(cfg, &texts);
		let vectors = match tokio::time::timeout(Duration::from_millis(cfg.timeout_ms), call).await
		{
			Ok(result) => result?,
			Err(_) => {
				return Err(Error::BackendUnavailable {
					message: format!("Embedding provider timed out after {} ms.", cfg.timeout_ms),
				});
			},
		};
		let Some(vector) = vectors.into_iter().next() else {
			return Err(Error::BackendUnavailable {
				message: "Embedding provider returned no vectors.".to_string(),
			});
		};

		if vector.len() != cfg.dimensions as usize {
			return Err(Error::BackendUnavailable {
				message: format!(
					"Embedding provider returned {} dimensions, expected {}.",
					vector.len(),
					cfg.dimensions
				),
			});
		}

		Ok(Embedding::new(vector))
	}
}
