use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, ProfileRepository, Result};
use devdir_domain::{NewProfile, Profile, ProfileRecord, password, validate::MAX_FULL_NAME_CHARS};
use devdir_providers::github::IdentityLookup;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaveResponse {
	pub id: Uuid,
	pub acknowledged: bool,
}

impl ProfileRepository {
	/// Inserts a new profile. `input` is expected to have passed
	/// [`devdir_domain::validate::normalize_new_profile`].
	pub async fn save(&self, input: NewProfile) -> Result<SaveResponse> {
		let now = OffsetDateTime::now_utc();
		let NewProfile {
			mut full_name,
			email,
			github_username,
			mut github_avatar,
			tags,
			password,
			profile_views,
			profile_likes,
		} = input;

		if let Some(username) = github_username.as_deref() {
			if self.get_by_identity(username).await?.is_some() {
				return Err(Error::Conflict {
					message: format!("Profile {username:?} already exists."),
				});
			}
			if full_name.is_none() || github_avatar.is_none() {
				let (name, avatar_url) = self.lookup_identity(username).await;

				full_name = full_name.or(name);
				github_avatar = github_avatar.or(avatar_url);
			}
		}

		let plain = password.unwrap_or_else(password::generate_password);
		let record = ProfileRecord {
			profile: Profile {
				id: Uuid::new_v4(),
				full_name,
				email,
				github_username,
				github_avatar,
				tags,
				profile_views,
				profile_likes,
				created_at: now,
				updated_at: now,
			},
			password: password::hash_password(&plain)?,
		};
		let id = record.profile.id;
		let key = format!("id={id}");
		let ack = self
			.store
			.insert(self.collection(), crate::to_document(&record)?)
			.await
			.map_err(|err| Error::storage("insert", self.collection(), key, err))?;

		tracing::info!(profile_id = %id, acknowledged = ack.acknowledged, "Profile saved.");

		Ok(SaveResponse { id, acknowledged: ack.acknowledged })
	}

	/// Name and avatar from the identity provider. Any failure degrades to `(None, None)`.
	async fn lookup_identity(&self, username: &str) -> (Option<String>, Option<String>) {
		if !self.cfg.identity.enabled {
			return (None, None);
		}

		match self.identity.lookup(&self.cfg.identity, username).await {
			Ok(IdentityLookup::Found { name, avatar_url }) => {
				let name = name.map(|name| name.chars().take(MAX_FULL_NAME_CHARS).collect());
				let avatar_url = avatar_url
					.filter(|url| url.starts_with("https://") || url.starts_with("http://"));

				(name, avatar_url)
			},
			Ok(IdentityLookup::NotFound) => {
				tracing::debug!(github_username = username, "No identity found for profile.");

				(None, None)
			},
			Err(err) => {
				tracing::warn!(
					error = %err,
					github_username = username,
					"Identity lookup failed. Saving client-supplied fields only."
				);

				(None, None)
			},
		}
	}
}
