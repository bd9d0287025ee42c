use std::{
	env, fs,
	path::{Path, PathBuf},
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use clap::Parser;

use itinera::{Args, Command};
use itinera_service::ItineraService;

const OFFLINE_CONFIG: &str = r#"
[service]
log_level = "warn"

[planning]
day_start = "10:00"
day_end   = "18:00"
"#;

/// Scratch directory removed on drop, including when an assertion panics.
struct TestDir {
	path: PathBuf,
}
impl TestDir {
	fn new() -> Self {
		static COUNTER: AtomicU64 = AtomicU64::new(0);

		let nanos = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.expect("System time must be valid.")
			.as_nanos();
		let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
		let pid = std::process::id();
		let path = env::temp_dir().join(format!("itinera-cli-{pid}-{nanos}-{ordinal}"));

		fs::create_dir_all(&path).expect("Failed to create temp dir.");

		Self { path }
	}

	fn path(&self) -> &Path {
		&self.path
	}
}
impl Drop for TestDir {
	fn drop(&mut self) {
		let _ = fs::remove_dir_all(&self.path);
	}
}

fn write(dir: &Path, name: &str, payload: &str) -> PathBuf {
	let path = dir.join(name);

	fs::write(&path, payload).expect("Failed to write test input.");

	path
}

fn offline_service(dir: &Path) -> ItineraService {
	let config_path = write(dir, "config.toml", OFFLINE_CONFIG);
	let config = itinera_config::load(&config_path).expect("Config must load.");

	ItineraService::new(config).expect("Service must build.")
}

fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
	let query = write(
		dir,
		"query.json",
		r#"{
			"raw_intent_text": "Street food and local markets",
			"interests": ["food"],
			"languages": ["en"],
			"budget_tier": "economy",
			"group_type": "couple"
		}"#,
	);
	let catalog = write(
		dir,
		"catalog.json",
		r#"[
			{ "id": "market", "title": "Morning market tasting", "tags": ["food"],
			  "languages": ["en"], "price": 60.0, "duration_minutes": 150 },
			{ "id": "night", "title": "Night food walk", "tags": ["food"],
			  "price": 90.0, "duration_minutes": 180, "quality": { "certified": true } },
			{ "id": "opera", "title": "Opera gala", "tags": ["music"],
			  "price": 900.0, "duration_minutes": 200 }
		]"#,
	);

	(query, catalog)
}

#[test]
fn parses_subcommands() {
	let args = Args::try_parse_from([
		"itinera", "-c", "config.toml", "rank", "--query", "q.json", "--catalog", "c.json",
		"--k", "3",
	])
	.expect("Arguments must parse.");

	assert!(matches!(args.command, Command::Rank { k: Some(3), .. }));

	let args = Args::try_parse_from([
		"itinera", "--config", "config.toml", "refine", "--itinerary", "plan.json",
		"--feedback", "More food",
	])
	.expect("Arguments must parse.");

	assert!(matches!(args.command, Command::Refine { .. }));
}

#[tokio::test]
async fn plans_offline_within_the_configured_window() {
	let temp = TestDir::new();
	let dir = temp.path();
	let service = offline_service(dir);
	let (query, catalog) = write_inputs(dir);
	let output = itinera::execute(&service, &Command::Plan { query, catalog })
		.await
		.expect("Plan must succeed.");

	assert_eq!(output["origin"], "assembled");

	let items = output["days"][0]["items"].as_array().expect("Day must list items.");

	// Economy for a couple: 300 per day, so the opera never fits.
	assert_eq!(items.len(), 2);
	assert_eq!(items[0]["start_time"], "10:00");
	assert!(items.iter().all(|item| item["candidate_id"] != "opera"));
	assert_eq!(output["total_cost"], 150.0);
}

#[tokio::test]
async fn ranks_with_the_default_top_k() {
	let temp = TestDir::new();
	let dir = temp.path();
	let service = offline_service(dir);
	let (query, catalog) = write_inputs(dir);
	let output = itinera::execute(&service, &Command::Rank { query, catalog, k: None })
		.await
		.expect("Rank must succeed.");
	let results = output.as_array().expect("Rank output is a list.");

	assert_eq!(results.len(), 3);
	assert!(results.iter().all(|result| result["explain"].is_object()));
}

#[tokio::test]
async fn refine_without_generator_returns_the_input() {
	let temp = TestDir::new();
	let dir = temp.path();
	let service = offline_service(dir);
	let (query, catalog) = write_inputs(dir);
	let plan = itinera::execute(&service, &Command::Plan { query, catalog })
		.await
		.expect("Plan must succeed.");
	let itinerary = write(dir, "plan.json", &plan.to_string());
	let refined = itinera::execute(
		&service,
		&Command::Refine { itinerary, feedback: "Less walking".to_string() },
	)
	.await
	.expect("Refine must succeed.");

	assert_eq!(refined, plan);
}

#[tokio::test]
async fn missing_input_files_are_reported() {
	let temp = TestDir::new();
	let dir = temp.path();
	let service = offline_service(dir);
	let command =
		Command::Plan { query: dir.join("absent.json"), catalog: dir.join("absent-too.json") };
	let err = itinera::execute(&service, &command).await.expect_err("Missing input must fail.");

	assert!(err.to_string().contains("absent.json"));
}

#[test]
fn scratch_directories_are_removed_on_drop() {
	let temp = TestDir::new();
	let path = temp.path().to_path_buf();

	write(temp.path(), "note.txt", "scratch");

	assert!(path.exists());

	drop(temp);

	assert!(!path.exists());
}
