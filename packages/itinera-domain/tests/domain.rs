use itinera_config::{Budget, Config, Matching, Planning, Providers, Ranking, Service};
use itinera_domain::{
	Error,
	assemble::{PlanningPolicy, assemble_itinerary},
	candidate::{CandidateItem, CandidateKind, QualitySignal},
	embedding::{Embedding, FallbackEmbedder},
	query::{BudgetTier, GroupType, PreferenceQuery},
	rerank::{RerankPolicy, rerank},
	similarity::{CandidateVector, top_k_matches},
	validate::validate_itinerary,
};

fn config() -> Config {
	Config {
		service: Service { log_level: "info".to_string() },
		providers: Providers::default(),
		matching: Matching::default(),
		ranking: Ranking::default(),
		budget: Budget::default(),
		planning: Planning::default(),
	}
}

fn candidate(id: &str, tags: &[&str], price: f64, certified: bool, score: f32) -> CandidateItem {
	CandidateItem {
		id: id.to_string(),
		kind: CandidateKind::Guide,
		title: format!("Guide {id}"),
		description: None,
		embedding: Some(Embedding::new(vec![score, (1.0 - score * score).sqrt()])),
		tags: tags.iter().map(|tag| tag.to_string()).collect(),
		languages: vec!["en".to_string()],
		price: Some(price),
		quality: QualitySignal { certified, rating: None },
		duration_minutes: Some(180),
		location_ref: Some(format!("loc-{id}")),
	}
}

fn vectors(catalog: &[CandidateItem]) -> Vec<CandidateVector<'_>> {
	catalog
		.iter()
		.filter_map(|candidate| {
			Some(CandidateVector {
				id: &candidate.id,
				vector: candidate.embedding.as_ref()?.vector(),
				metadata: candidate.metadata(),
			})
		})
		.collect()
}

#[test]
fn certified_history_guide_wins_after_reranking() {
	let cfg = config();
	let mut shopping = candidate("shopping", &["shopping"], 800.0, false, 0.64);
	let history = candidate("history", &["history"], 150.0, true, 0.60);

	shopping.languages.clear();

	let catalog = vec![shopping, history];
	let mut query = PreferenceQuery::new("history of the old town");

	query.languages = vec!["EN".to_string()];
	query.budget_tier = BudgetTier::Standard;

	let raw = top_k_matches(&[1.0, 0.0], &vectors(&catalog), 2).expect("Scoring must succeed.");

	assert_eq!(raw[0].candidate_id, "shopping");

	let ranked = rerank(raw, &query, &catalog, &RerankPolicy::from_config(&cfg));

	assert_eq!(ranked[0].candidate_id, "history");
	assert!(ranked[0].score > ranked[1].score);
}

#[test]
fn rating_threshold_counts_as_top_quality() {
	let mut cfg = config();

	cfg.ranking.quality_min_rating = Some(4.5);

	let policy = RerankPolicy::from_config(&cfg);
	let mut rated = candidate("rated", &[], 50.0, false, 0.5);

	rated.quality.rating = Some(4.8);

	let explain = policy.explain(0.5, &PreferenceQuery::new("anything"), &rated);

	assert!((explain.quality_boost - 0.10).abs() < 1e-6);
}

#[test]
fn ranked_guides_become_a_valid_family_itinerary() {
	let cfg = config();
	let policy = PlanningPolicy::from_config(&cfg).expect("Default planning must parse.");
	let catalog: Vec<CandidateItem> = (0..6)
		.map(|index| candidate(&format!("g{index}"), &["history"], 120.0, index % 2 == 0, 0.5))
		.collect();
	let ranked: Vec<&CandidateItem> = catalog.iter().collect();
	let mut query = PreferenceQuery::new("family history weekend");

	query.group_type = GroupType::Family;
	query.trip_days = Some(2);

	let itinerary = assemble_itinerary(&query, &ranked, &policy);

	assert_eq!(validate_itinerary(&itinerary), Ok(()));
	assert_eq!(itinerary.days.len(), 2);
	assert!(itinerary.days[0].items[0].title.starts_with("Guided outing with"));
	// Family of four on standard: 1600 per day, so the day window is the limit.
	assert_eq!(itinerary.days[0].items.len(), 3);
	assert_eq!(itinerary.days[1].items.len(), 3);
	assert_eq!(itinerary.total_cost, 720.0);
}

#[test]
fn fallback_and_provider_vectors_never_compare() {
	let fallback = FallbackEmbedder::default().embed("wine country day trip");
	let provider = Embedding::new(vec![0.0; 768]);
	let candidates = [CandidateVector {
		id: "provider",
		vector: provider.vector(),
		metadata: serde_json::Value::Null,
	}];

	assert_eq!(
		top_k_matches(fallback.vector(), &candidates, 1),
		Err(Error::DimensionMismatch { left: 384, right: 768 })
	);
}
