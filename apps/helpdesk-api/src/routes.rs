use axum::{
	Json, Router,
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use uuid::Uuid;

use helpdesk_domain::analysis::SolutionAnalysis;
use helpdesk_service::{
	AddSolutionRequest, AnswerRequest, AnswerResponse, Error as ServiceError, ErrorKind,
	FeedbackRequest, RefreshReport, SimilarSolution, SolutionStats,
};
use helpdesk_storage::models::{Feedback, Solution};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: &'static str,
	pub version: &'static str,
	pub timestamp: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchBody {
	pub query: String,
	/// Defaults to `search.solution_limit`.
	pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SimilarBody {
	pub problem: String,
	pub threshold: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RefreshBody {
	pub document_ids: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClearBody {
	pub key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ItemsResponse<T> {
	pub items: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct CacheReport {
	pub removed: usize,
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/answer", post(answer))
		.route("/v1/solutions", post(add_solution))
		.route("/v1/solutions/search", post(search_solutions))
		.route("/v1/solutions/similar", post(similar_solutions))
		.route("/v1/solutions/{id}", get(get_solution))
		.route("/v1/solutions/{id}/stats", get(solution_stats))
		.route("/v1/feedback", post(record_feedback))
		.route("/v1/analysis", get(analysis))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/v1/admin/documents/refresh", post(refresh_documents))
		.route("/v1/admin/cache/clear", post(clear_cache))
		.route("/v1/admin/cache/sweep", post(sweep_cache))
		.with_state(state)
}

async fn health() -> Json<HealthResponse> {
	let timestamp = OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default();

	Json(HealthResponse { status: "ok", version: helpdesk_cli::VERSION, timestamp })
}

async fn answer(
	State(state): State<AppState>,
	Json(payload): Json<AnswerRequest>,
) -> Json<AnswerResponse> {
	Json(state.service.answer(payload).await)
}

async fn add_solution(
	State(state): State<AppState>,
	Json(payload): Json<AddSolutionRequest>,
) -> Result<(StatusCode, Json<Solution>), ApiError> {
	let solution = state.service.add_solution(payload).await?;

	Ok((StatusCode::CREATED, Json(solution)))
}

async fn get_solution(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Json<Solution>, ApiError> {
	state.service.get_solution(id).await?.map(Json).ok_or_else(|| solution_not_found(id))
}

async fn search_solutions(
	State(state): State<AppState>,
	Json(payload): Json<SearchBody>,
) -> Result<Json<ItemsResponse<Solution>>, ApiError> {
	let limit = payload.limit.unwrap_or(state.service.cfg.search.solution_limit);
	let items = state.service.search_solutions(&payload.query, limit).await?;

	Ok(Json(ItemsResponse { items }))
}

async fn similar_solutions(
	State(state): State<AppState>,
	Json(payload): Json<SimilarBody>,
) -> Result<Json<ItemsResponse<SimilarSolution>>, ApiError> {
	let items = state.service.similar_solutions(&payload.problem, payload.threshold).await?;

	Ok(Json(ItemsResponse { items }))
}

async fn record_feedback(
	State(state): State<AppState>,
	Json(payload): Json<FeedbackRequest>,
) -> Result<(StatusCode, Json<Feedback>), ApiError> {
	let solution_id = payload.solution_id;
	let feedback =
		state.service.record_feedback(payload).await?.ok_or_else(|| solution_not_found(solution_id))?;

	Ok((StatusCode::CREATED, Json(feedback)))
}

async fn solution_stats(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Json<SolutionStats>, ApiError> {
	state.service.solution_stats(id).await?.map(Json).ok_or_else(|| solution_not_found(id))
}

async fn analysis(State(state): State<AppState>) -> Result<Json<SolutionAnalysis>, ApiError> {
	Ok(Json(state.service.analyze_solutions().await?))
}

async fn refresh_documents(
	State(state): State<AppState>,
	Json(payload): Json<RefreshBody>,
) -> Result<Json<RefreshReport>, ApiError> {
	Ok(Json(state.service.refresh_documents(payload.document_ids).await?))
}

async fn clear_cache(
	State(state): State<AppState>,
	Json(payload): Json<ClearBody>,
) -> Json<CacheReport> {
	let removed = state.service.cache.clear(payload.key.as_deref()).await;

	tracing::info!(key = ?payload.key, removed, "Cleared content cache.");

	Json(CacheReport { removed })
}

async fn sweep_cache(State(state): State<AppState>) -> Json<CacheReport> {
	let removed = state.service.cache.cleanup_expired().await;

	Json(CacheReport { removed })
}

fn solution_not_found(id: Uuid) -> ApiError {
	json_error(StatusCode::NOT_FOUND, ErrorKind::NotFound.code(), format!("Solution {id} not found."))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let kind = err.kind();
		let status = match kind {
			ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
			ErrorKind::NotFound => StatusCode::NOT_FOUND,
			ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
			ErrorKind::Provider => StatusCode::BAD_GATEWAY,
			ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
		};
		// Storage failures keep their details in the logs.
		let message = match kind {
			ErrorKind::Storage => {
				tracing::error!(error = %err, "Storage failure while serving request.");

				kind.user_message().to_string()
			},
			_ => err.to_string(),
		};

		json_error(status, kind.code(), message)
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError::new(status, code, message)
}
