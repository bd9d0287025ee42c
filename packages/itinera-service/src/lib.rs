pub mod cache;
pub mod generate;
pub mod plan;
pub mod prompt;
pub mod rank;
pub mod refine;

mod embed;
mod error;

pub use cache::{CacheKey, EmbeddingCache, InMemoryEmbeddingCache};
pub use error::{Error, Result};

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use itinera_config::{Config, EmbeddingProviderConfig, LlmProviderConfig};
use itinera_domain::{assemble::PlanningPolicy, embedding::FallbackEmbedder, rerank::RerankPolicy};
use itinera_providers::{embedding, generator};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

pub trait GeneratorProvider
where
	Self: Send + Sync,
{
	fn generate<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, Result<Value>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub generator: Arc<dyn GeneratorProvider>,
}
impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		generator: Arc<dyn GeneratorProvider>,
	) -> Self {
		Self { embedding, generator }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), generator: provider }
	}
}

/// Matching and itinerary engine. Holds no mutable state of its own; catalogs are passed in
/// per call and the embedding cache is an injected collaborator.
pub struct ItineraService {
	pub cfg: Config,
	pub providers: Providers,
	pub cache: Arc<dyn EmbeddingCache>,
	rerank_policy: RerankPolicy,
	planning_policy: PlanningPolicy,
	fallback_embedder: FallbackEmbedder,
}
impl ItineraService {
	pub fn new(cfg: Config) -> Result<Self> {
		Self::with_providers(cfg, Providers::default())
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Result<Self> {
		let rerank_policy = RerankPolicy::from_config(&cfg);
		let planning_policy = PlanningPolicy::from_config(&cfg)?;
		let fallback_embedder = FallbackEmbedder::new(cfg.matching.fallback_dimensions as usize);

		Ok(Self {
			cfg,
			providers,
			cache: Arc::new(InMemoryEmbeddingCache::default()),
			rerank_policy,
			planning_policy,
			fallback_embedder,
		})
	}

	pub fn with_cache(mut self, cache: Arc<dyn EmbeddingCache>) -> Self {
		self.cache = cache;

		self
	}

	pub fn planning_policy(&self) -> &PlanningPolicy {
		&self.planning_policy
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Ok(embedding::embed(cfg, texts).await?) })
	}
}
impl GeneratorProvider for DefaultProviders {
	fn generate<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, Result<Value>> {
		Box::pin(async move { Ok(generator::generate(cfg, messages).await?) })
	}
}
