use std::{sync::LazyLock, time::Duration};

use regex::Regex;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::{Error, Result};

const RETRY_BASE_DELAY_MS: u64 = 200;

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?s)^\s*```[A-Za-z]*\s*(.*?)\s*```\s*$")
		.expect("Code fence pattern must compile.")
});

/// Sends a chat completion and returns the JSON object carried in the first choice.
///
/// Malformed content and transient transport failures are retried up to `max_attempts`
/// times with exponential backoff; any other HTTP failure is returned immediately.
pub async fn generate(
	cfg: &itinera_config::LlmProviderConfig,
	messages: &[Value],
) -> Result<Value> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let headers = crate::auth_headers(&cfg.api_key, &cfg.default_headers)?;
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": messages,
		"response_format": { "type": "json_object" },
	});
	let attempts = cfg.max_attempts.max(1);
	let mut last_err = Error::InvalidResponse { message: "Generator was never called.".to_string() };

	for attempt in 0..attempts {
		if attempt > 0 {
			tokio::time::sleep(backoff(attempt)).await;
		}

		let res = client.post(&url).headers(headers.clone()).json(&body).send().await;
		let json = match res.and_then(|res| res.error_for_status()) {
			Ok(res) => res.json::<Value>().await,
			Err(err) if is_transient(&err) => {
				last_err = err.into();

				continue;
			},
			Err(err) => return Err(err.into()),
		};
		let outcome = match json {
			Ok(json) => parse_generator_json(json),
			Err(err) => Err(err.into()),
		};

		match outcome {
			Ok(parsed) => return Ok(parsed),
			Err(err) => last_err = err,
		}
	}

	Err(last_err)
}

/// Pulls the JSON object out of a chat completion, tolerating a markdown code fence around
/// the content.
pub fn parse_generator_json(json: Value) -> Result<Value> {
	if let Some(content) = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
	{
		let parsed: Value = serde_json::from_str(strip_code_fence(content)).map_err(|_| {
			Error::InvalidResponse { message: "Generator content is not valid JSON.".to_string() }
		})?;

		if !parsed.is_object() {
			return Err(Error::InvalidResponse {
				message: "Generator content must be a JSON object.".to_string(),
			});
		}

		return Ok(parsed);
	}

	Err(Error::InvalidResponse {
		message: "Generator response is missing message content.".to_string(),
	})
}

pub fn strip_code_fence(content: &str) -> &str {
	CODE_FENCE
		.captures(content)
		.and_then(|captures| captures.get(1))
		.map(|inner| inner.as_str())
		.unwrap_or(content.trim())
}

fn is_transient(err: &reqwest::Error) -> bool {
	if err.is_timeout() || err.is_connect() {
		return true;
	}

	err.status()
		.is_some_and(|status| status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS)
}

fn backoff(attempt: u32) -> Duration {
	Duration::from_millis(RETRY_BASE_DELAY_MS.saturating_mul(1 << attempt.min(5)))
}
