mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Budget, Config, DEFAULT_BUDGET_PENALTY, DEFAULT_FALLBACK_DIMENSIONS, DEFAULT_LANGUAGE_BOOST,
	DEFAULT_QUALITY_BOOST, EmbeddingProviderConfig, LlmProviderConfig, Matching, Planning,
	Providers, Ranking, Service, TierAmounts,
};

use std::{fs, path::Path};

use time::{Time, macros::format_description};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

/// Parses a wall-clock value formatted as `HH:MM`.
pub fn parse_clock(raw: &str) -> Result<Time> {
	Time::parse(raw.trim(), format_description!("[hour]:[minute]")).map_err(|_| {
		Error::Validation { message: format!("Clock value {raw:?} must be formatted as HH:MM.") }
	})
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}

	if let Some(embedding) = cfg.providers.embedding.as_ref() {
		if embedding.dimensions == 0 {
			return Err(Error::Validation {
				message: "providers.embedding.dimensions must be greater than zero.".to_string(),
			});
		}
		if embedding.timeout_ms == 0 {
			return Err(Error::Validation {
				message: "providers.embedding.timeout_ms must be greater than zero.".to_string(),
			});
		}
	}
	if let Some(generator) = cfg.providers.generator.as_ref() {
		if !generator.temperature.is_finite() || generator.temperature < 0.0 {
			return Err(Error::Validation {
				message: "providers.generator.temperature must be a finite number, zero or greater."
					.to_string(),
			});
		}
		if generator.timeout_ms == 0 {
			return Err(Error::Validation {
				message: "providers.generator.timeout_ms must be greater than zero.".to_string(),
			});
		}
		if generator.max_attempts == 0 {
			return Err(Error::Validation {
				message: "providers.generator.max_attempts must be greater than zero.".to_string(),
			});
		}
	}

	for (label, provider) in [
		("embedding", cfg.providers.embedding.as_ref().map(|p| (&p.api_base, &p.api_key))),
		("generator", cfg.providers.generator.as_ref().map(|p| (&p.api_base, &p.api_key))),
	] {
		let Some((api_base, api_key)) = provider else { continue };

		if api_base.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_base must be non-empty."),
			});
		}
		if api_key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	if cfg.matching.default_top_k == 0 {
		return Err(Error::Validation {
			message: "matching.default_top_k must be greater than zero.".to_string(),
		});
	}
	if cfg.matching.embed_concurrency == 0 {
		return Err(Error::Validation {
			message: "matching.embed_concurrency must be greater than zero.".to_string(),
		});
	}
	if cfg.matching.fallback_dimensions == 0 {
		return Err(Error::Validation {
			message: "matching.fallback_dimensions must be greater than zero.".to_string(),
		});
	}

	for (label, weight) in [
		("ranking.language_boost", cfg.ranking.language_boost),
		("ranking.quality_boost", cfg.ranking.quality_boost),
		("ranking.budget_penalty", cfg.ranking.budget_penalty),
		("ranking.interest_boost", cfg.ranking.interest_boost),
	] {
		if !weight.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if weight < 0.0 {
			return Err(Error::Validation { message: format!("{label} must be zero or greater.") });
		}
	}

	if let Some(rating) = cfg.ranking.quality_min_rating
		&& (!rating.is_finite() || rating < 0.0)
	{
		return Err(Error::Validation {
			message: "ranking.quality_min_rating must be a finite number, zero or greater."
				.to_string(),
		});
	}

	validate_tier_amounts("budget.ceilings", &cfg.budget.ceilings)?;
	validate_tier_amounts("budget.daily", &cfg.budget.daily)?;

	let day_start = parse_clock(&cfg.planning.day_start)?;
	let day_end = parse_clock(&cfg.planning.day_end)?;

	if day_end <= day_start {
		return Err(Error::Validation {
			message: "planning.day_end must be later than planning.day_start.".to_string(),
		});
	}
	if cfg.planning.default_item_minutes == 0 {
		return Err(Error::Validation {
			message: "planning.default_item_minutes must be greater than zero.".to_string(),
		});
	}
	if cfg.planning.max_trip_days == 0 {
		return Err(Error::Validation {
			message: "planning.max_trip_days must be greater than zero.".to_string(),
		});
	}
	if cfg.planning.default_trip_days == 0
		|| cfg.planning.default_trip_days > cfg.planning.max_trip_days
	{
		return Err(Error::Validation {
			message: "planning.default_trip_days must be between 1 and planning.max_trip_days."
				.to_string(),
		});
	}
	if cfg.planning.candidate_pool == 0 {
		return Err(Error::Validation {
			message: "planning.candidate_pool must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn validate_tier_amounts(label: &str, amounts: &TierAmounts) -> Result<()> {
	let mut previous: Option<(&str, f64)> = None;
	let mut unbounded_seen = false;

	for (tier, amount) in amounts.in_tier_order() {
		let Some(amount) = amount else {
			unbounded_seen = true;

			continue;
		};

		if !amount.is_finite() || amount < 0.0 {
			return Err(Error::Validation {
				message: format!("{label}.{tier} must be a finite number, zero or greater."),
			});
		}
		if unbounded_seen {
			return Err(Error::Validation {
				message: format!(
					"{label}.{tier} must be unbounded when a cheaper tier is unbounded."
				),
			});
		}
		if let Some((previous_tier, previous_amount)) = previous
			&& amount < previous_amount
		{
			return Err(Error::Validation {
				message: format!("{label}.{tier} must not be lower than {label}.{previous_tier}."),
			});
		}

		previous = Some((tier, amount));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if let Some(embedding) = cfg.providers.embedding.as_mut() {
		embedding.api_base = embedding.api_base.trim().trim_end_matches('/').to_string();
	}
	if let Some(generator) = cfg.providers.generator.as_mut() {
		generator.api_base = generator.api_base.trim().trim_end_matches('/').to_string();
	}

	cfg.planning.day_start = cfg.planning.day_start.trim().to_string();
	cfg.planning.day_end = cfg.planning.day_end.trim().to_string();
}
