use std::fmt::{Debug, Formatter};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A stored profile as seen by read paths. The password never appears here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
	pub id: Uuid,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub full_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub github_username: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub github_avatar: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tags: Option<Vec<String>>,
	#[serde(default)]
	pub profile_views: u64,
	#[serde(default)]
	pub profile_likes: u64,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}

/// The document written on save: the profile plus its password hash.
#[derive(Clone, Serialize)]
pub struct ProfileRecord {
	#[serde(flatten)]
	pub profile: Profile,
	pub password: String,
}
impl Debug for ProfileRecord {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ProfileRecord")
			.field("profile", &self.profile)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Client input for registering a profile.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct NewProfile {
	#[serde(default)]
	pub full_name: Option<String>,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub github_username: Option<String>,
	#[serde(default)]
	pub github_avatar: Option<String>,
	#[serde(default)]
	pub tags: Option<Vec<String>>,
	#[serde(default)]
	pub password: Option<String>,
	#[serde(default)]
	pub profile_views: u64,
	#[serde(default)]
	pub profile_likes: u64,
}
impl Debug for NewProfile {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NewProfile")
			.field("full_name", &self.full_name)
			.field("email", &self.email)
			.field("github_username", &self.github_username)
			.field("github_avatar", &self.github_avatar)
			.field("tags", &self.tags)
			.field("password", &self.password.as_ref().map(|_| "<redacted>"))
			.field("profile_views", &self.profile_views)
			.field("profile_likes", &self.profile_likes)
			.finish()
	}
}

/// Partial update keyed on `github_username`. Only fields that are `Some` are written.
/// Counters are absent: `record_view` and `record_like` are their only writers.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProfilePatch {
	pub github_username: String,
	#[serde(default)]
	pub full_name: Option<String>,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub github_avatar: Option<String>,
	#[serde(default)]
	pub tags: Option<Vec<String>>,
	#[serde(default)]
	pub password: Option<String>,
}
impl ProfilePatch {
	pub fn new(github_username: impl Into<String>) -> Self {
		Self { github_username: github_username.into(), ..Default::default() }
	}

	pub fn is_empty(&self) -> bool {
		self.full_name.is_none()
			&& self.email.is_none()
			&& self.github_avatar.is_none()
			&& self.tags.is_none()
			&& self.password.is_none()
	}
}
impl Debug for ProfilePatch {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ProfilePatch")
			.field("github_username", &self.github_username)
			.field("full_name", &self.full_name)
			.field("email", &self.email)
			.field("github_avatar", &self.github_avatar)
			.field("tags", &self.tags)
			.field("password", &self.password.as_ref().map(|_| "<redacted>"))
			.finish()
	}
}
