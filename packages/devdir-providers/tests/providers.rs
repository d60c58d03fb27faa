use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};

#[test]
fn builds_github_headers() {
	let headers = devdir_providers::github_headers("devdir", Some("secret"))
		.expect("Failed to build headers.");

	assert_eq!(headers.get(USER_AGENT).expect("Missing user agent header."), "devdir");
	assert_eq!(headers.get(ACCEPT).expect("Missing accept header."), "application/vnd.github+json");
	assert_eq!(headers.get(AUTHORIZATION).expect("Missing authorization header."), "Bearer secret");
}

#[test]
fn omits_authorization_without_token() {
	let headers =
		devdir_providers::github_headers("devdir", None).expect("Failed to build headers.");

	assert!(headers.get(AUTHORIZATION).is_none());
}

#[test]
fn rejects_unprintable_user_agent() {
	assert!(devdir_providers::github_headers("dev\ndir", None).is_err());
}
