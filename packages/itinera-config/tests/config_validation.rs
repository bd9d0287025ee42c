use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::{Table, Value};

use itinera_config::{Config, DEFAULT_FALLBACK_DIMENSIONS, DEFAULT_LANGUAGE_BOOST, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_table() -> Table {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.")
}

fn section<'a>(root: &'a mut Table, path: &[&str]) -> &'a mut Table {
	let mut table = root;

	for key in path {
		table = table
			.get_mut(*key)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Template config must include [{key}]."));
	}

	table
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("itinera_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_table(table: &Table) -> itinera_config::Result<Config> {
	let payload = toml::to_string(table).expect("Failed to render test config.");
	let path = write_temp_config(payload);
	let result = itinera_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn expect_validation_error(table: &Table, needle: &str) {
	let err = load_table(table).expect_err("Expected validation error.");

	assert!(matches!(err, Error::Validation { .. }), "Unexpected error kind: {err:?}");

	let message = err.to_string();

	assert!(message.contains(needle), "Unexpected error message: {message}");
}

#[test]
fn sample_config_loads() {
	let cfg = load_table(&sample_table()).expect("Sample config must load.");
	let embedding = cfg.providers.embedding.as_ref().expect("Embedding provider must be set.");
	let generator = cfg.providers.generator.as_ref().expect("Generator provider must be set.");

	assert_eq!(embedding.dimensions, 768);
	assert_eq!(generator.max_attempts, 2);
	assert_eq!(cfg.planning.buffer_minutes, 15);
	assert_eq!(cfg.budget.ceilings.standard, Some(300.0));
	assert_eq!(cfg.budget.ceilings.luxury, None);
}

#[test]
fn service_section_alone_uses_defaults() {
	let path = write_temp_config("[service]\nlog_level = \"debug\"\n".to_string());
	let result = itinera_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Minimal config must load.");

	assert!(cfg.providers.embedding.is_none());
	assert!(cfg.providers.generator.is_none());
	assert_eq!(cfg.matching.fallback_dimensions, DEFAULT_FALLBACK_DIMENSIONS);
	assert_eq!(cfg.ranking.language_boost, DEFAULT_LANGUAGE_BOOST);
	assert_eq!(cfg.planning.day_start, "09:00");
	assert_eq!(cfg.planning.day_end, "21:00");
}

#[test]
fn api_base_trailing_slash_is_trimmed() {
	let mut table = sample_table();

	section(&mut table, &["providers", "embedding"])
		.insert("api_base".to_string(), Value::String("https://api.example.com/v1/ ".to_string()));

	let cfg = load_table(&table).expect("Config must load.");
	let embedding = cfg.providers.embedding.expect("Embedding provider must be set.");

	assert_eq!(embedding.api_base, "https://api.example.com/v1");
}

#[test]
fn empty_api_key_is_rejected() {
	let mut table = sample_table();

	section(&mut table, &["providers", "generator"])
		.insert("api_key".to_string(), Value::String("  ".to_string()));

	expect_validation_error(&table, "Provider generator api_key must be non-empty.");
}

#[test]
fn zero_fallback_dimensions_are_rejected() {
	let mut table = sample_table();

	section(&mut table, &["matching"])
		.insert("fallback_dimensions".to_string(), Value::Integer(0));

	expect_validation_error(&table, "matching.fallback_dimensions must be greater than zero.");
}

#[test]
fn negative_boost_is_rejected() {
	let mut table = sample_table();

	section(&mut table, &["ranking"]).insert("quality_boost".to_string(), Value::Float(-0.1));

	expect_validation_error(&table, "ranking.quality_boost must be zero or greater.");
}

#[test]
fn inverted_day_window_is_rejected() {
	let mut table = sample_table();
	let planning = section(&mut table, &["planning"]);

	planning.insert("day_start".to_string(), Value::String("18:00".to_string()));
	planning.insert("day_end".to_string(), Value::String("08:30".to_string()));

	expect_validation_error(&table, "planning.day_end must be later than planning.day_start.");
}

#[test]
fn malformed_clock_is_rejected() {
	let mut table = sample_table();

	section(&mut table, &["planning"])
		.insert("day_start".to_string(), Value::String("9am".to_string()));

	expect_validation_error(&table, "must be formatted as HH:MM.");
}

#[test]
fn decreasing_ceilings_are_rejected() {
	let mut table = sample_table();

	section(&mut table, &["budget", "ceilings"])
		.insert("premium".to_string(), Value::Float(50.0));

	expect_validation_error(&table, "budget.ceilings.premium must not be lower than");
}

#[test]
fn bounded_tier_after_unbounded_tier_is_rejected() {
	let mut cfg = load_table(&sample_table()).expect("Sample config must load.");

	cfg.budget.daily.standard = None;

	let err = itinera_config::validate(&cfg).expect_err("Expected validation error.");

	assert!(
		err.to_string().contains("budget.daily.premium must be unbounded"),
		"Unexpected error message: {err}"
	);
}

#[test]
fn omitted_tiers_keep_their_defaults() {
	let mut table = sample_table();
	let budget = section(&mut table, &["budget"]);
	let mut ceilings = Table::new();

	ceilings.insert("luxury".to_string(), Value::Float(5_000.0));
	budget.insert("ceilings".to_string(), Value::Table(ceilings));

	let daily = section(&mut table, &["budget", "daily"]);

	daily.clear();
	daily.insert("economy".to_string(), Value::Float(120.0));

	let cfg = load_table(&table).expect("Partial tier tables must load.");

	assert_eq!(cfg.budget.ceilings.economy, Some(100.0));
	assert_eq!(cfg.budget.ceilings.standard, Some(300.0));
	assert_eq!(cfg.budget.ceilings.premium, Some(750.0));
	assert_eq!(cfg.budget.ceilings.luxury, Some(5_000.0));
	assert_eq!(cfg.budget.daily.economy, Some(120.0));
	assert_eq!(cfg.budget.daily.standard, Some(400.0));
	assert_eq!(cfg.budget.daily.premium, Some(1_000.0));
	assert_eq!(cfg.budget.daily.luxury, None);
}

#[test]
fn missing_budget_section_uses_defaults() {
	let mut table = sample_table();

	table.remove("budget");

	let cfg = load_table(&table).expect("Config without [budget] must load.");

	assert_eq!(cfg.budget.ceilings.premium, Some(750.0));
	assert_eq!(cfg.budget.daily.standard, Some(400.0));
}

#[test]
fn default_trip_days_must_fit_max() {
	let mut table = sample_table();
	let planning = section(&mut table, &["planning"]);

	planning.insert("default_trip_days".to_string(), Value::Integer(5));
	planning.insert("max_trip_days".to_string(), Value::Integer(3));

	expect_validation_error(&table, "planning.default_trip_days must be between 1");
}

#[test]
fn parse_clock_accepts_padded_values() {
	let clock = itinera_config::parse_clock(" 07:45 ").expect("Clock must parse.");

	assert_eq!((clock.hour(), clock.minute()), (7, 45));
}
