pub mod github;

mod error;

pub use error::{Error, Result};

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};

pub const GITHUB_ACCEPT: &str = "application/vnd.github+json";

pub fn github_headers(user_agent: &str, token: Option<&str>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
	headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));

	if let Some(token) = token {
		let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;

		value.set_sensitive(true);
		headers.insert(AUTHORIZATION, value);
	}

	Ok(headers)
}
