//! Axum route handlers for posts and campaigns.

use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::dates::parse_calendar_date;
use crate::calendar::editor::{EditorAction, PostForm};
use crate::calendar::handlers::FilterQuery;
use crate::errors::{AppError, AppJson, AppPath, AppQuery};
use crate::models::{Campaign, NewCampaign, Post, PostPatch};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct PostListQuery {
    pub platform: Option<String>,
    pub campaign: Option<String>,
    pub status: Option<String>,
    /// Inclusive lower bound, `yyyy-MM-dd`.
    pub from: Option<String>,
    /// Inclusive upper bound, `yyyy-MM-dd`.
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteCampaignResponse {
    pub id: Uuid,
    pub orphaned_posts: u64,
}

fn optional_date(name: &str, raw: &Option<String>) -> Result<Option<NaiveDate>, AppError> {
    raw.as_deref()
        .map(|r| {
            parse_calendar_date(r)
                .ok_or_else(|| AppError::Validation(format!("{name} must be yyyy-MM-dd, got '{r}'")))
        })
        .transpose()
}

// ────────────────────────────────────────────────────────────────────────────
// Posts
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/posts
pub async fn handle_list_posts(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PostListQuery>,
) -> Result<Json<Vec<Post>>, AppError> {
    let filters = FilterQuery {
        platform: query.platform.clone(),
        campaign: query.campaign.clone(),
        status: query.status.clone(),
    }
    .to_selection()?;
    let from = optional_date("from", &query.from)?;
    let to = optional_date("to", &query.to)?;

    let posts = state
        .store
        .list_posts()
        .await?
        .into_iter()
        .filter(|p| filters.matches(p))
        .filter(|p| from.map_or(true, |f| p.date >= f) && to.map_or(true, |t| p.date <= t))
        .collect();
    Ok(Json(posts))
}

/// GET /api/v1/posts/:id
pub async fn handle_get_post(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Post>, AppError> {
    Ok(Json(state.store.get_post(id).await?))
}

/// POST /api/v1/posts
///
/// Accepts the editor form for a new post (no `id`).
pub async fn handle_create_post(
    State(state): State<AppState>,
    AppJson(form): AppJson<PostForm>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    if form.is_edit() {
        return Err(AppError::Validation(
            "a new post must not carry an id; use PUT /api/v1/posts/:id".to_string(),
        ));
    }
    match form.into_action()? {
        EditorAction::Create(new_post) => {
            let post = state.store.create_post(new_post).await?;
            Ok((StatusCode::CREATED, Json(post)))
        }
        _ => Err(AppError::Validation("expected a new post".to_string())),
    }
}

/// PUT /api/v1/posts/:id
///
/// Full-form update from the editor. The path id wins over any id in the body.
pub async fn handle_replace_post(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(mut form): AppJson<PostForm>,
) -> Result<Json<Post>, AppError> {
    form.id = Some(id);
    match form.into_action()? {
        EditorAction::Update { id, patch } => Ok(Json(state.store.update_post(id, patch).await?)),
        _ => Err(AppError::Validation("expected an existing post".to_string())),
    }
}

/// PATCH /api/v1/posts/:id
pub async fn handle_patch_post(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(patch): AppJson<PostPatch>,
) -> Result<Json<Post>, AppError> {
    patch.validate()?;
    Ok(Json(state.store.update_post(id, patch).await?))
}

/// DELETE /api/v1/posts/:id
pub async fn handle_delete_post(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.delete_post(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Campaigns
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/campaigns
pub async fn handle_list_campaigns(
    State(state): State<AppState>,
) -> Result<Json<Vec<Campaign>>, AppError> {
    Ok(Json(state.store.list_campaigns().await?))
}

/// POST /api/v1/campaigns
pub async fn handle_create_campaign(
    State(state): State<AppState>,
    AppJson(new_campaign): AppJson<NewCampaign>,
) -> Result<(StatusCode, Json<Campaign>), AppError> {
    new_campaign.validate()?;
    let campaign = state.store.create_campaign(new_campaign).await?;
    Ok((StatusCode::CREATED, Json(campaign)))
}

/// DELETE /api/v1/campaigns/:id
///
/// Posts referencing the campaign are kept and detached from it.
pub async fn handle_delete_campaign(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<DeleteCampaignResponse>, AppError> {
    let orphaned_posts = state.store.delete_campaign(id).await?;
    Ok(Json(DeleteCampaignResponse { id, orphaned_posts }))
}
