use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;
use devdir_domain::{NewProfile, Profile, ProfilePatch, ValidationError, validate};
use devdir_service::{Criteria, Error as ServiceError, SaveResponse, Strategy};
use devdir_storage::Document;

#[derive(Debug, Deserialize)]
struct ListQuery {
	strategy: Option<String>,
}

#[derive(Debug, Serialize)]
struct UpdateResponse {
	matched: u64,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let message = err.to_string();

		match err {
			ServiceError::InvalidRequest { .. } =>
				Self::new(StatusCode::BAD_REQUEST, "invalid_request", message, None),
			ServiceError::UnknownStrategy { .. } =>
				Self::new(StatusCode::BAD_REQUEST, "unknown_strategy", message, None),
			ServiceError::NotFound { .. } =>
				Self::new(StatusCode::NOT_FOUND, "not_found", message, None),
			ServiceError::Conflict { .. } =>
				Self::new(StatusCode::CONFLICT, "conflict", message, None),
			ServiceError::Storage { .. } => {
				tracing::error!(error = %message, "Storage failure.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message, None)
			},
			ServiceError::Internal { .. } => {
				tracing::error!(error = %message, "Internal failure.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message, None)
			},
		}
	}
}
impl From<ValidationError> for ApiError {
	fn from(err: ValidationError) -> Self {
		let field = err.field.clone();

		Self::new(StatusCode::BAD_REQUEST, "invalid_request", err.to_string(), Some(vec![field]))
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/profiles", post(create_profile).get(list_profiles).patch(update_profile))
		.route("/v1/profiles/{key}", get(get_profile).delete(delete_profile))
		.route("/v1/profiles/{key}/view", post(record_view))
		.route("/v1/profiles/{key}/like", post(record_like))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn create_profile(
	State(state): State<AppState>,
	Json(payload): Json<NewProfile>,
) -> Result<(StatusCode, Json<SaveResponse>), ApiError> {
	let input = validate::normalize_new_profile(payload)?;
	let response = state.repository.save(input).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn list_profiles(
	State(state): State<AppState>,
	Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
	let criteria = match query.strategy.as_deref() {
		Some(token) => Criteria::parse_token(token)?,
		None => Criteria::Named(Strategy::Latest),
	};
	let documents = state.repository.filter(&criteria).await?;

	Ok(Json(documents))
}

async fn get_profile(
	State(state): State<AppState>,
	Path(github_username): Path<String>,
) -> Result<Json<Profile>, ApiError> {
	let profile = state.repository.get_by_identity(&github_username).await?.ok_or_else(|| {
		ApiError::new(
			StatusCode::NOT_FOUND,
			"not_found",
			format!("Profile {github_username:?} not found."),
			None,
		)
	})?;

	Ok(Json(profile))
}

async fn update_profile(
	State(state): State<AppState>,
	Json(payload): Json<ProfilePatch>,
) -> Result<Json<UpdateResponse>, ApiError> {
	let patch = validate::normalize_patch(payload)?;
	let ack = state.repository.update(patch).await?;

	Ok(Json(UpdateResponse { matched: ack.matched }))
}

async fn delete_profile(
	State(state): State<AppState>,
	Path(key): Path<String>,
) -> Result<StatusCode, ApiError> {
	let id = Uuid::parse_str(&key).map_err(|_| {
		ApiError::new(
			StatusCode::BAD_REQUEST,
			"invalid_request",
			format!("{key:?} is not a profile id."),
			Some(vec!["$.id".to_string()]),
		)
	})?;
	let ack = state.repository.delete(id).await?;

	if !ack.acknowledged() {
		return Err(ApiError::new(
			StatusCode::NOT_FOUND,
			"not_found",
			format!("Profile {id} not found."),
			None,
		));
	}

	Ok(StatusCode::NO_CONTENT)
}

async fn record_view(
	State(state): State<AppState>,
	Path(github_username): Path<String>,
) -> Result<StatusCode, ApiError> {
	state.repository.record_view(&github_username).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn record_like(
	State(state): State<AppState>,
	Path(github_username): Path<String>,
) -> Result<StatusCode, ApiError> {
	state.repository.record_like(&github_username).await?;

	Ok(StatusCode::NO_CONTENT)
}
