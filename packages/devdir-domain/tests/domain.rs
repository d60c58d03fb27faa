use serde_json::json;
use time::macros::datetime;
use uuid::Uuid;

use devdir_domain::{
	NewProfile, Profile, ProfilePatch, ProfileRecord, REDACTED_FIELDS,
	validate::{self, MAX_FULL_NAME_CHARS},
};

fn sample_profile() -> Profile {
	Profile {
		id: Uuid::nil(),
		full_name: Some("Alice Doe".to_string()),
		email: Some("alice@example.com".to_string()),
		github_username: Some("alice".to_string()),
		github_avatar: None,
		tags: Some(vec!["rust".to_string()]),
		profile_views: 3,
		profile_likes: 1,
		created_at: datetime!(2024-01-02 03:04:05 UTC),
		updated_at: datetime!(2024-01-02 03:04:05 UTC),
	}
}

#[test]
fn full_name_is_trimmed() {
	let input = NewProfile {
		full_name: Some("  Alice Doe  ".to_string()),
		github_username: Some("alice".to_string()),
		..Default::default()
	};
	let normalized = validate::normalize_new_profile(input).expect("Expected valid profile.");

	assert_eq!(normalized.full_name.as_deref(), Some("Alice Doe"));
}

#[test]
fn full_name_length_is_measured_after_trimming() {
	let name = format!("  {}  ", "a".repeat(MAX_FULL_NAME_CHARS));
	let input = NewProfile {
		full_name: Some(name),
		github_username: Some("alice".to_string()),
		..Default::default()
	};

	validate::normalize_new_profile(input).expect("Fifty characters should be accepted.");

	let input = NewProfile {
		full_name: Some("a".repeat(MAX_FULL_NAME_CHARS + 1)),
		github_username: Some("alice".to_string()),
		..Default::default()
	};
	let err = validate::normalize_new_profile(input).expect_err("Expected length error.");

	assert_eq!(err.field, "$.full_name");
}

#[test]
fn invalid_email_is_rejected() {
	let input = NewProfile {
		email: Some("not-an-email".to_string()),
		github_username: Some("alice".to_string()),
		..Default::default()
	};
	let err = validate::normalize_new_profile(input).expect_err("Expected email error.");

	assert_eq!(err.field, "$.email");
}

#[test]
fn identity_field_is_required() {
	let input = NewProfile { full_name: Some("Nobody".to_string()), ..Default::default() };
	let err = validate::normalize_new_profile(input).expect_err("Expected identity error.");

	assert_eq!(err.field, "$.github_username");

	let input = NewProfile { email: Some("only@example.com".to_string()), ..Default::default() };

	validate::normalize_new_profile(input).expect("Email alone is a stable identity.");
}

#[test]
fn blank_username_counts_as_missing() {
	let input = NewProfile { github_username: Some("   ".to_string()), ..Default::default() };

	assert!(validate::normalize_new_profile(input).is_err());
}

#[test]
fn avatar_must_be_http_url() {
	let input = NewProfile {
		github_username: Some("alice".to_string()),
		github_avatar: Some("ftp://example.com/a.png".to_string()),
		..Default::default()
	};
	let err = validate::normalize_new_profile(input).expect_err("Expected avatar error.");

	assert_eq!(err.field, "$.github_avatar");
}

#[test]
fn patch_requires_username() {
	let err = validate::normalize_patch(ProfilePatch::new("  ")).expect_err("Expected error.");

	assert_eq!(err.field, "$.github_username");
}

#[test]
fn patch_emptiness_ignores_the_key() {
	let mut patch = ProfilePatch::new("alice");

	assert!(patch.is_empty());

	patch.tags = Some(vec!["go".to_string()]);

	assert!(!patch.is_empty());
}

#[test]
fn profile_document_round_trips_and_ignores_extra_keys() {
	let profile = sample_profile();
	let mut value = serde_json::to_value(&profile).expect("Failed to serialize profile.");

	assert_eq!(value["created_at"], json!("2024-01-02T03:04:05.000000000Z"));
	assert!(value.get("github_avatar").is_none(), "None fields should be omitted.");

	value["_id"] = json!("internal");
	value["password"] = json!("$argon2id$...");

	let decoded: Profile = serde_json::from_value(value).expect("Failed to decode profile.");

	assert_eq!(decoded, profile);
}

#[test]
fn record_carries_password_but_debug_hides_it() {
	let record = ProfileRecord { profile: sample_profile(), password: "secret-hash".to_string() };
	let value = serde_json::to_value(&record).expect("Failed to serialize record.");

	assert_eq!(value["password"], json!("secret-hash"));
	assert_eq!(value["github_username"], json!("alice"));
	assert!(!format!("{record:?}").contains("secret-hash"));
}

#[test]
fn redacted_fields_cover_email_and_password() {
	assert!(REDACTED_FIELDS.contains(&"email"));
	assert!(REDACTED_FIELDS.contains(&"password"));
}
