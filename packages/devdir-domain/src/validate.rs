//! Write-side validation boundary.
//!
//! Inbound payloads pass through here before they reach the repository, which trusts
//! field formats from then on.

use regex::Regex;

use crate::{NewProfile, ProfilePatch};

pub const MAX_FULL_NAME_CHARS: usize = 50;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
	pub field: String,
	pub message: String,
}
impl ValidationError {
	fn new(field: &str, message: impl Into<String>) -> Self {
		Self { field: field.to_string(), message: message.into() }
	}
}

pub fn normalize_new_profile(mut input: NewProfile) -> Result<NewProfile, ValidationError> {
	input.full_name = normalize_full_name(input.full_name)?;
	input.email = normalize_email(input.email)?;
	input.github_username = trim_to_none(input.github_username);
	input.github_avatar = normalize_avatar(input.github_avatar)?;
	input.tags = input.tags.map(normalize_tags);

	if input.github_username.is_none() && input.email.is_none() {
		return Err(ValidationError::new(
			"$.github_username",
			"github_username or email is required.",
		));
	}
	if input.password.as_deref().is_some_and(|password| password.is_empty()) {
		return Err(ValidationError::new("$.password", "password must not be empty."));
	}

	Ok(input)
}

pub fn normalize_patch(mut patch: ProfilePatch) -> Result<ProfilePatch, ValidationError> {
	patch.github_username = patch.github_username.trim().to_string();

	if patch.github_username.is_empty() {
		return Err(ValidationError::new("$.github_username", "github_username is required."));
	}

	patch.full_name = normalize_full_name(patch.full_name)?;
	patch.email = normalize_email(patch.email)?;
	patch.github_avatar = normalize_avatar(patch.github_avatar)?;
	patch.tags = patch.tags.map(normalize_tags);

	if patch.password.as_deref().is_some_and(|password| password.is_empty()) {
		return Err(ValidationError::new("$.password", "password must not be empty."));
	}

	Ok(patch)
}

pub fn is_valid_email(email: &str) -> bool {
	Regex::new(EMAIL_PATTERN).map(|re| re.is_match(email)).unwrap_or(false)
}

fn normalize_full_name(value: Option<String>) -> Result<Option<String>, ValidationError> {
	let Some(name) = trim_to_none(value) else {
		return Ok(None);
	};

	if name.chars().count() > MAX_FULL_NAME_CHARS {
		return Err(ValidationError::new(
			"$.full_name",
			format!("full_name must be at most {MAX_FULL_NAME_CHARS} characters."),
		));
	}

	Ok(Some(name))
}

fn normalize_email(value: Option<String>) -> Result<Option<String>, ValidationError> {
	let Some(email) = trim_to_none(value) else {
		return Ok(None);
	};

	if !is_valid_email(&email) {
		return Err(ValidationError::new("$.email", "email must be a valid address."));
	}

	Ok(Some(email))
}

fn normalize_avatar(value: Option<String>) -> Result<Option<String>, ValidationError> {
	let Some(url) = trim_to_none(value) else {
		return Ok(None);
	};

	if !(url.starts_with("https://") || url.starts_with("http://")) {
		return Err(ValidationError::new(
			"$.github_avatar",
			"github_avatar must be an http(s) URL.",
		));
	}

	Ok(Some(url))
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
	tags.into_iter()
		.map(|tag| tag.trim().to_string())
		.filter(|tag| !tag.is_empty())
		.collect()
}

fn trim_to_none(value: Option<String>) -> Option<String> {
	value.map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}
