//! REST surface for the Pacer backend.
//!
//! Thin handlers over the service layer: identity is resolved fail-soft from
//! the Authorization header, typed service errors map onto HTTP statuses,
//! and every response body is JSON.

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::auth::{self, Identity};
use crate::error::{AppError, AppResult};
use crate::models::{GroupMessage, User};
use crate::progress::dates;
use crate::repositories::UserRepository;
use crate::services::{GroupService, ProgressService, SpreadsheetService, TrainingService};

/// Everything the handlers need, shared across requests
pub struct ApiContext {
    pub auth_secret: String,
    pub user_repo: Arc<UserRepository>,
    pub group_service: Arc<GroupService>,
    pub progress_service: Arc<ProgressService>,
    pub training_service: Arc<TrainingService>,
    pub spreadsheet_service: Arc<SpreadsheetService>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub async fn start_server(ctx: Arc<ApiContext>, port: u16) -> anyhow::Result<()> {
    let app = Router::new()
        .route("/groups", post(handle_create_group).get(handle_list_groups))
        .route(
            "/group/members",
            get(handle_group_members).post(handle_invite_member),
        )
        .route(
            "/group/messages",
            get(handle_list_messages)
                .post(handle_post_message)
                .delete(handle_delete_message),
        )
        .route("/users/:id/training", put(handle_log_training))
        .route("/users/:id/emoji", post(handle_give_emoji))
        .route("/users/:id/progress", get(handle_progress))
        .route("/me", get(handle_me))
        .route("/spreadsheets/update", get(handle_sheet_update))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Resolve the caller from the Authorization header, failing soft.
///
/// A `Bearer` prefix is tolerated since most HTTP clients add one.
async fn caller(ctx: &ApiContext, headers: &HeaderMap) -> Identity {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.strip_prefix("Bearer ").unwrap_or(v));

    auth::resolve_identity(header, &ctx.auth_secret, &ctx.user_repo).await
}

/// Unwrap an identity for endpoints that mutate state
fn require_user(identity: Identity) -> AppResult<User> {
    match identity {
        Identity::Authenticated(user) => Ok(user),
        Identity::Anonymous { reason } => Err(AppError::Unauthorized(reason)),
    }
}

// ============================================================================
// Groups
// ============================================================================

#[derive(Deserialize)]
struct CreateGroupRequest {
    name: String,
    start_date: i32,
    end_date: i32,
    weekly_minutes_target: i32,
    day_of_week: Option<i16>,
}

async fn handle_create_group(
    State(ctx): State<Arc<ApiContext>>,
    headers: HeaderMap,
    Json(request): Json<CreateGroupRequest>,
) -> AppResult<impl IntoResponse> {
    let user = require_user(caller(&ctx, &headers).await)?;

    let group = ctx
        .group_service
        .create_group(
            &request.name,
            request.start_date,
            request.end_date,
            request.weekly_minutes_target,
            request.day_of_week,
            &user,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(group)))
}

async fn handle_list_groups(State(ctx): State<Arc<ApiContext>>) -> AppResult<impl IntoResponse> {
    let groups = ctx.group_service.all_groups().await?;
    Ok(Json(groups))
}

// ============================================================================
// Members
// ============================================================================

#[derive(Deserialize)]
struct GroupQuery {
    group_name: Option<String>,
}

async fn handle_group_members(
    State(ctx): State<Arc<ApiContext>>,
    headers: HeaderMap,
    Query(query): Query<GroupQuery>,
) -> AppResult<impl IntoResponse> {
    let user = require_user(caller(&ctx, &headers).await)?;

    let members = ctx
        .group_service
        .group_members(query.group_name.as_deref(), &user)
        .await?;

    Ok(Json(members))
}

#[derive(Deserialize)]
struct InviteRequest {
    user_id: Uuid,
}

async fn handle_invite_member(
    State(ctx): State<Arc<ApiContext>>,
    headers: HeaderMap,
    Query(query): Query<GroupQuery>,
    Json(request): Json<InviteRequest>,
) -> AppResult<impl IntoResponse> {
    let user = require_user(caller(&ctx, &headers).await)?;

    let (invited, member) = ctx
        .group_service
        .invite_member(query.group_name.as_deref(), request.user_id, &user)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "user": invited, "member": member })),
    ))
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Deserialize)]
struct MessagesQuery {
    group_name: Option<String>,
    #[serde(default)]
    since: i64,
}

async fn handle_list_messages(
    State(ctx): State<Arc<ApiContext>>,
    headers: HeaderMap,
    Query(query): Query<MessagesQuery>,
) -> AppResult<impl IntoResponse> {
    let user = require_user(caller(&ctx, &headers).await)?;

    let messages = ctx
        .group_service
        .messages_since(query.group_name.as_deref(), query.since, &user)
        .await?;

    Ok(Json(messages))
}

#[derive(Deserialize)]
struct PostMessageRequest {
    body: String,
}

async fn handle_post_message(
    State(ctx): State<Arc<ApiContext>>,
    headers: HeaderMap,
    Query(query): Query<GroupQuery>,
    Json(request): Json<PostMessageRequest>,
) -> AppResult<impl IntoResponse> {
    let user = require_user(caller(&ctx, &headers).await)?;
    let posted_at = chrono::Utc::now().timestamp_millis();

    let message = ctx
        .group_service
        .create_message(query.group_name.as_deref(), &request.body, &user, posted_at)
        .await?;

    Ok((StatusCode::CREATED, Json(message)))
}

async fn handle_delete_message(
    State(ctx): State<Arc<ApiContext>>,
    headers: HeaderMap,
    Json(message): Json<GroupMessage>,
) -> AppResult<impl IntoResponse> {
    let user = require_user(caller(&ctx, &headers).await)?;

    // Best-effort: failures are logged inside and the original comes back
    let message = ctx.group_service.delete_message(message, &user).await;
    Ok(Json(message))
}

// ============================================================================
// Training & progress
// ============================================================================

#[derive(Deserialize)]
struct LogTrainingRequest {
    date: i32,
    minutes: i32,
}

async fn handle_log_training(
    State(ctx): State<Arc<ApiContext>>,
    headers: HeaderMap,
    Path(user_id): Path<Uuid>,
    Json(request): Json<LogTrainingRequest>,
) -> AppResult<impl IntoResponse> {
    let user = require_user(caller(&ctx, &headers).await)?;

    ctx.training_service
        .log_minutes(user_id, request.date, request.minutes, &user)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
struct EmojiRequest {
    date: i32,
    emoji: String,
}

async fn handle_give_emoji(
    State(ctx): State<Arc<ApiContext>>,
    headers: HeaderMap,
    Path(user_id): Path<Uuid>,
    Json(request): Json<EmojiRequest>,
) -> AppResult<impl IntoResponse> {
    let user = require_user(caller(&ctx, &headers).await)?;

    let feedback = ctx
        .training_service
        .give_emoji(user_id, request.date, &request.emoji, &user)
        .await?;

    Ok((StatusCode::CREATED, Json(feedback)))
}

#[derive(Deserialize)]
struct ProgressQuery {
    group_name: String,
    /// YYYYMMDD override for "today"; defaults to the wall clock
    date: Option<i32>,
}

async fn handle_progress(
    State(ctx): State<Arc<ApiContext>>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<ProgressQuery>,
) -> AppResult<impl IntoResponse> {
    let today = match query.date {
        Some(encoded) => dates::decode(encoded)
            .ok_or_else(|| AppError::Validation(format!("Invalid date {}", encoded)))?,
        None => chrono::Utc::now().date_naive(),
    };

    let report = ctx
        .progress_service
        .weekly_progress(user_id, &query.group_name, today)
        .await?;

    Ok(Json(report))
}

// ============================================================================
// Identity & admin
// ============================================================================

async fn handle_me(
    State(ctx): State<Arc<ApiContext>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let identity = caller(&ctx, &headers).await;

    // Fail-soft: anonymous callers still get a renderable response
    Json(json!({
        "user": identity.user(),
        "authenticated": identity.is_authenticated(),
        "reason": identity.reason(),
    }))
}

#[derive(Deserialize)]
struct SheetUpdateQuery {
    week: Option<i32>,
    #[serde(rename = "getAllGroups", default)]
    get_all_groups: bool,
}

async fn handle_sheet_update(
    State(ctx): State<Arc<ApiContext>>,
    headers: HeaderMap,
    Query(query): Query<SheetUpdateQuery>,
) -> AppResult<impl IntoResponse> {
    let user = require_user(caller(&ctx, &headers).await)?;
    if !user.is_admin {
        return Err(AppError::Unauthorized(
            "Only staff may trigger sheet updates".into(),
        ));
    }

    let today = chrono::Utc::now().date_naive();
    let summary = ctx
        .spreadsheet_service
        .update(query.week, query.get_all_groups, today)
        .await?;

    Ok(Json(summary))
}

async fn handle_health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "pacer-backend",
        "timestamp": chrono::Utc::now(),
    }))
}
