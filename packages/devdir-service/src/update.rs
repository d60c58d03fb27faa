use serde_json::Value;
use time::OffsetDateTime;

use crate::{Error, ProfileRepository, Result};
use devdir_domain::{
	FIELD_EMAIL, FIELD_FULL_NAME, FIELD_GITHUB_AVATAR, FIELD_GITHUB_USERNAME, FIELD_PASSWORD,
	FIELD_TAGS, FIELD_UPDATED_AT, ProfilePatch, password, time_serde,
};
use devdir_storage::{Document, WriteAck, filter_eq};

impl ProfileRepository {
	/// Overwrites only the fields `patch` carries, in one conditional write keyed on
	/// `github_username`.
	pub async fn update(&self, patch: ProfilePatch) -> Result<WriteAck> {
		let username = patch.github_username.trim().to_string();

		if username.is_empty() {
			return Err(Error::InvalidRequest {
				message: "github_username is required.".to_string(),
			});
		}
		if patch.is_empty() {
			return Err(Error::InvalidRequest { message: "No updates provided.".to_string() });
		}

		let document = patch_document(patch, OffsetDateTime::now_utc())?;
		let filter = filter_eq(FIELD_GITHUB_USERNAME, username.as_str());
		let key = format!("{FIELD_GITHUB_USERNAME}={username}");
		let ack = self
			.store
			.update(self.collection(), &filter, document)
			.await
			.map_err(|err| Error::storage("update", self.collection(), key, err))?;

		if ack.matched == 0 {
			return Err(Error::NotFound { message: format!("Profile {username:?} not found.") });
		}

		tracing::info!(github_username = %username, "Profile updated.");

		Ok(ack)
	}
}

fn patch_document(patch: ProfilePatch, now: OffsetDateTime) -> Result<Document> {
	let mut document = Document::new();
	let mut set = |field: &str, value: Value| {
		document.insert(field.to_string(), value);
	};

	if let Some(full_name) = patch.full_name {
		set(FIELD_FULL_NAME, Value::String(full_name));
	}
	if let Some(email) = patch.email {
		set(FIELD_EMAIL, Value::String(email));
	}
	if let Some(avatar) = patch.github_avatar {
		set(FIELD_GITHUB_AVATAR, Value::String(avatar));
	}
	if let Some(tags) = patch.tags {
		set(FIELD_TAGS, Value::from(tags));
	}
	if let Some(plain) = patch.password {
		set(FIELD_PASSWORD, Value::String(password::hash_password(&plain)?));
	}

	let updated_at =
		time_serde::format(&now).map_err(|err| Error::Internal { message: err.to_string() })?;

	set(FIELD_UPDATED_AT, Value::String(updated_at));

	Ok(document)
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;

	use super::*;

	#[test]
	fn only_supplied_fields_are_written() {
		let mut patch = ProfilePatch::new("alice");

		patch.tags = Some(vec!["rust".to_string()]);

		let document =
			patch_document(patch, datetime!(2024-05-01 08:00 UTC)).expect("patch failed");
		let mut keys = document.keys().map(String::as_str).collect::<Vec<_>>();

		keys.sort_unstable();

		assert_eq!(keys, vec!["tags", "updated_at"]);
		assert_eq!(document["updated_at"], "2024-05-01T08:00:00.000000000Z");
	}

	#[test]
	fn passwords_are_hashed() {
		let mut patch = ProfilePatch::new("alice");

		patch.password = Some("hunter22".to_string());

		let document =
			patch_document(patch, datetime!(2024-05-01 08:00 UTC)).expect("patch failed");
		let stored = document["password"].as_str().expect("password missing");

		assert_ne!(stored, "hunter22");
		assert!(password::verify_password("hunter22", stored));
	}
}
