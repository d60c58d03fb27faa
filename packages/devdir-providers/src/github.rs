use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityLookup {
	Found { name: Option<String>, avatar_url: Option<String> },
	NotFound,
}

#[derive(Deserialize)]
struct UserResponse {
	#[serde(default)]
	name: Option<String>,
	#[serde(default)]
	avatar_url: Option<String>,
}

pub async fn lookup(cfg: &devdir_config::Identity, username: &str) -> Result<IdentityLookup> {
	if !is_username(username) {
		return Err(Error::InvalidConfig {
			message: format!("{username:?} is not a valid GitHub username."),
		});
	}

	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}/users/{username}", cfg.api_base);
	let res = client
		.get(url)
		.headers(crate::github_headers(&cfg.user_agent, cfg.token.as_deref())?)
		.send()
		.await?;

	if res.status() == StatusCode::NOT_FOUND {
		return Ok(IdentityLookup::NotFound);
	}

	let json: Value = res.error_for_status()?.json().await?;

	parse_user_response(json)
}

/// GitHub logins: ASCII alphanumerics and single inner hyphens, at most 39 characters.
pub fn is_username(username: &str) -> bool {
	!username.is_empty()
		&& username.len() <= 39
		&& !username.starts_with('-')
		&& !username.ends_with('-')
		&& !username.contains("--")
		&& username.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn parse_user_response(json: Value) -> Result<IdentityLookup> {
	if !json.is_object() {
		return Err(Error::InvalidResponse {
			message: "GitHub user response must be a JSON object.".to_string(),
		});
	}

	let user: UserResponse = serde_json::from_value(json)?;

	Ok(IdentityLookup::Found {
		name: non_blank(user.name),
		avatar_url: non_blank(user.avatar_url),
	})
}

fn non_blank(value: Option<String>) -> Option<String> {
	value.map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}
