use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use devdir_api::{routes, state::AppState};
use devdir_config::{Config, Identity, Service, Storage};

fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		storage: Storage {
			backend: "memory".to_string(),
			collection: "profiles".to_string(),
			postgres: None,
		},
		identity: Identity {
			enabled: false,
			api_base: "http://127.0.0.1:1".to_string(),
			user_agent: "devdir-tests".to_string(),
			token: None,
			timeout_ms: 1_000,
		},
	}
}

async fn app() -> Router {
	let state = AppState::new(test_config()).await.expect("Failed to initialize app state.");

	routes::router(state)
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
	let builder = Request::builder().method(method).uri(uri);
	let request = match body {
		Some(body) => builder
			.header("content-type", "application/json")
			.body(Body::from(body.to_string())),
		None => builder.body(Body::empty()),
	}
	.expect("Failed to build request.");
	let response = app.clone().oneshot(request).await.expect("Failed to call router.");
	let status = response.status();
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json = if bytes.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&bytes).expect("Failed to parse response.")
	};

	(status, json)
}

async fn register(app: &Router, username: &str, likes: u64, views: u64) -> Value {
	let payload = json!({
		"full_name": format!("  {username} example  "),
		"email": format!("{username}@example.com"),
		"github_username": username,
		"password": "correct horse",
		"profile_likes": likes,
		"profile_views": views,
	});
	let (status, json) = call(app, "POST", "/v1/profiles", Some(payload)).await;

	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(json["acknowledged"], true);

	json
}

#[tokio::test]
async fn health_ok() {
	let app = app().await;
	let (status, _) = call(&app, "GET", "/health", None).await;

	assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn register_then_fetch() {
	let app = app().await;
	let created = register(&app, "bob", 4, 9).await;
	let (status, json) = call(&app, "GET", "/v1/profiles/bob", None).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["id"], created["id"]);
	assert_eq!(json["full_name"], "bob example");
	assert!(json.get("password").is_none());

	let (status, json) = call(&app, "GET", "/v1/profiles/nobody", None).await;

	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(json["error_code"], "not_found");
}

#[tokio::test]
async fn invalid_payload_reports_field() {
	let app = app().await;
	let payload = json!({ "github_username": "bob", "email": "not-an-email" });
	let (status, json) = call(&app, "POST", "/v1/profiles", Some(payload)).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "invalid_request");
	assert_eq!(json["fields"][0], "$.email");
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
	let app = app().await;

	register(&app, "bob", 0, 0).await;

	let payload = json!({ "github_username": "bob" });
	let (status, json) = call(&app, "POST", "/v1/profiles", Some(payload)).await;

	assert_eq!(status, StatusCode::CONFLICT);
	assert_eq!(json["error_code"], "conflict");
}

#[tokio::test]
async fn hot_listing_is_ranked_and_redacted() {
	let app = app().await;

	register(&app, "ann", 1, 1).await;
	register(&app, "bob", 4, 9).await;

	let (status, json) = call(&app, "GET", "/v1/profiles?strategy=hot", None).await;

	assert_eq!(status, StatusCode::OK);

	let items = json.as_array().expect("Expected an array.");

	assert_eq!(items.len(), 2);
	assert_eq!(items[0]["github_username"], "bob");
	assert_eq!(items[0]["combined_score"], 6.0);
	assert_eq!(items[1]["combined_score"], 1.0);
	assert!(items.iter().all(|item| item.get("email").is_none() && item.get("password").is_none()));
}

#[tokio::test]
async fn listing_defaults_to_latest_and_rejects_unknown_strategies() {
	let app = app().await;

	register(&app, "ann", 0, 0).await;
	register(&app, "bob", 0, 0).await;

	let (status, json) = call(&app, "GET", "/v1/profiles", None).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json.as_array().map(Vec::len), Some(2));

	let (status, json) = call(&app, "GET", "/v1/profiles?strategy=bogus", None).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "unknown_strategy");
}

#[tokio::test]
async fn patch_updates_only_supplied_fields() {
	let app = app().await;

	register(&app, "bob", 4, 9).await;

	let payload = json!({ "github_username": "bob", "tags": ["rust"] });
	let (status, json) = call(&app, "PATCH", "/v1/profiles", Some(payload)).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["matched"], 1);

	let (_, json) = call(&app, "GET", "/v1/profiles/bob", None).await;

	assert_eq!(json["tags"], json!(["rust"]));
	assert_eq!(json["email"], "bob@example.com");
	assert_eq!(json["profile_likes"], 4);

	let payload = json!({ "github_username": "bob", "profile_views": 0 });
	let (status, json) = call(&app, "PATCH", "/v1/profiles", Some(payload)).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "invalid_request");

	let (_, json) = call(&app, "GET", "/v1/profiles/bob", None).await;

	assert_eq!(json["profile_views"], 9);

	let payload = json!({ "github_username": "ghost", "tags": ["rust"] });
	let (status, json) = call(&app, "PATCH", "/v1/profiles", Some(payload)).await;

	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(json["error_code"], "not_found");
}

#[tokio::test]
async fn counters_and_delete() {
	let app = app().await;
	let created = register(&app, "bob", 0, 0).await;

	let (status, _) = call(&app, "POST", "/v1/profiles/bob/view", None).await;

	assert_eq!(status, StatusCode::NO_CONTENT);

	let (status, _) = call(&app, "POST", "/v1/profiles/bob/like", None).await;

	assert_eq!(status, StatusCode::NO_CONTENT);

	let (_, json) = call(&app, "GET", "/v1/profiles/bob", None).await;

	assert_eq!(json["profile_views"], 1);
	assert_eq!(json["profile_likes"], 1);

	let (status, _) = call(&app, "POST", "/v1/profiles/ghost/like", None).await;

	assert_eq!(status, StatusCode::NOT_FOUND);

	let id = created["id"].as_str().expect("id missing");
	let uri = format!("/v1/profiles/{id}");
	let (status, _) = call(&app, "DELETE", &uri, None).await;

	assert_eq!(status, StatusCode::NO_CONTENT);

	let (status, json) = call(&app, "DELETE", &uri, None).await;

	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(json["error_code"], "not_found");

	let (status, json) = call(&app, "DELETE", "/v1/profiles/bob", None).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "invalid_request");
}
