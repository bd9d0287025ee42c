use std::{
	fs,
	path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{self, WrapErr};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use itinera_domain::{
	candidate::CandidateItem, itinerary::GeneratedItinerary, query::PreferenceQuery,
};
use itinera_service::ItineraService;

#[derive(Debug, Parser)]
#[command(
	version = itinera_cli::VERSION,
	rename_all = "kebab",
	styles = itinera_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Rank catalog candidates against a preference query.
	Rank {
		#[arg(long, value_name = "FILE")]
		query: PathBuf,
		#[arg(long, value_name = "FILE")]
		catalog: PathBuf,
		/// Defaults to `matching.default_top_k`.
		#[arg(long)]
		k: Option<usize>,
	},
	/// Build an itinerary for a preference query.
	Plan {
		#[arg(long, value_name = "FILE")]
		query: PathBuf,
		#[arg(long, value_name = "FILE")]
		catalog: PathBuf,
	},
	/// Revise an existing itinerary with free-form feedback.
	Refine {
		#[arg(long, value_name = "FILE")]
		itinerary: PathBuf,
		#[arg(long, value_name = "TEXT")]
		feedback: String,
	},
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = itinera_config::load(&args.config)?;

	init_tracing(&config)?;

	let service = ItineraService::new(config)?;
	let output = execute(&service, &args.command).await?;

	println!("{}", serde_json::to_string_pretty(&output)?);

	Ok(())
}

/// Runs one subcommand and returns its JSON output.
pub async fn execute(service: &ItineraService, command: &Command) -> color_eyre::Result<Value> {
	match command {
		Command::Rank { query, catalog, k } => {
			let query: PreferenceQuery = read_json(query)?;
			let catalog: Vec<CandidateItem> = read_json(catalog)?;
			let k = k.unwrap_or(service.cfg.matching.default_top_k as usize);
			let ranked = service.rank_candidates(&query, &catalog, k).await?;

			Ok(serde_json::to_value(ranked)?)
		},
		Command::Plan { query, catalog } => {
			let query: PreferenceQuery = read_json(query)?;
			let catalog: Vec<CandidateItem> = read_json(catalog)?;
			let itinerary = service.build_itinerary(&query, &catalog).await?;

			tracing::info!(
				itinerary_id = %itinerary.id,
				origin = ?itinerary.origin,
				"Itinerary ready."
			);

			Ok(serde_json::to_value(itinerary)?)
		},
		Command::Refine { itinerary, feedback } => {
			let current: GeneratedItinerary = read_json(itinerary)?;
			let refined = service.refine_itinerary(&current, feedback).await?;

			Ok(serde_json::to_value(refined)?)
		},
	}
}

fn read_json<T>(path: &Path) -> color_eyre::Result<T>
where
	T: DeserializeOwned,
{
	let raw =
		fs::read_to_string(path).wrap_err_with(|| format!("Failed to read {}.", path.display()))?;

	serde_json::from_str(&raw)
		.map_err(|err| eyre::eyre!("Failed to parse {}: {err}", path.display()))
}

fn init_tracing(config: &itinera_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_writer(std::io::stderr).with_env_filter(filter).init();

	Ok(())
}
