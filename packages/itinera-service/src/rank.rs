use itinera_domain::{
	candidate::CandidateItem,
	query::PreferenceQuery,
	rerank,
	similarity::{self, CandidateVector, MatchResult},
};

use crate::{Error, ItineraService, Result};

impl ItineraService {
	/// Scores `candidates` against the query, keeps the best `k` by similarity, then applies
	/// the business-rule adjustments and re-sorts.
	///
	/// Only [`Error::InvalidQuery`] and [`Error::DimensionMismatch`] are returned; backend
	/// failures degrade to the deterministic embedder.
	pub async fn rank_candidates(
		&self,
		query: &PreferenceQuery,
		candidates: &[CandidateItem],
		k: usize,
	) -> Result<Vec<MatchResult>> {
		if k == 0 {
			return Err(Error::InvalidQuery { message: "k must be greater than zero.".to_string() });
		}

		query.validate(self.cfg.planning.max_trip_days)?;

		if candidates.is_empty() {
			return Ok(Vec::new());
		}

		let query_vector = self.embed_query(&query.embedding_text()).await;
		let resolved = self.resolve_missing_vectors(candidates, query_vector.source).await;
		let vectors: Vec<CandidateVector<'_>> = candidates
			.iter()
			.enumerate()
			.filter_map(|(index, candidate)| {
				let embedding = candidate.embedding.as_ref().or_else(|| resolved.get(&index))?;

				Some(CandidateVector {
					id: &candidate.id,
					vector: embedding.vector(),
					metadata: candidate.metadata(),
				})
			})
			.collect();
		let matches = similarity::top_k_matches(query_vector.embedding.vector(), &vectors, k)?;
		let ranked = rerank::rerank(matches, query, candidates, &self.rerank_policy);

		tracing::debug!(
			candidates = candidates.len(),
			scored = vectors.len(),
			returned = ranked.len(),
			source = ?query_vector.source,
			"Ranked candidates."
		);

		Ok(ranked)
	}
}
