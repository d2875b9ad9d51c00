//! Approval workflow: draft → pending_approval → scheduled, or back to draft.
//!
//! Transitions are checked against the post's current status and written with
//! its version token, so two reviewers cannot both act on the same request.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::{AppError, AppPath};
use crate::models::{Post, PostPatch, PostStatus};
use crate::state::AppState;
use crate::store::CalendarStore;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Submit,
    Approve,
    Reject,
}

impl Transition {
    pub fn from_status(&self) -> PostStatus {
        match self {
            Transition::Submit => PostStatus::Draft,
            Transition::Approve | Transition::Reject => PostStatus::PendingApproval,
        }
    }

    pub fn to_status(&self) -> PostStatus {
        match self {
            Transition::Submit => PostStatus::PendingApproval,
            Transition::Approve => PostStatus::Scheduled,
            Transition::Reject => PostStatus::Draft,
        }
    }

    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw {
            "submit" => Ok(Transition::Submit),
            "approve" => Ok(Transition::Approve),
            "reject" => Ok(Transition::Reject),
            other => Err(AppError::NotFound(format!("Unknown approval action '{other}'"))),
        }
    }
}

pub async fn list_pending(store: &dyn CalendarStore) -> Result<Vec<Post>, AppError> {
    Ok(store
        .list_posts()
        .await?
        .into_iter()
        .filter(|p| p.status == PostStatus::PendingApproval)
        .collect())
}

pub async fn apply_transition(
    store: &dyn CalendarStore,
    id: Uuid,
    transition: Transition,
) -> Result<Post, AppError> {
    let post = store.get_post(id).await?;
    if post.status != transition.from_status() {
        return Err(AppError::Conflict(format!(
            "Post {id} is {}; {:?} needs {}",
            post.status,
            transition,
            transition.from_status()
        )));
    }

    let patch = PostPatch {
        expected_updated_at: Some(post.updated_at),
        ..PostPatch::status(transition.to_status())
    };
    let updated = store.update_post(id, patch).await?;
    info!("Post {id}: {} -> {}", post.status, updated.status);
    Ok(updated)
}

/// GET /api/v1/approvals
pub async fn handle_list_pending(
    State(state): State<AppState>,
) -> Result<Json<Vec<Post>>, AppError> {
    Ok(Json(list_pending(state.store.as_ref()).await?))
}

/// POST /api/v1/approvals/:id/:action
pub async fn handle_transition(
    State(state): State<AppState>,
    AppPath((id, action)): AppPath<(Uuid, String)>,
) -> Result<Json<Post>, AppError> {
    let transition = Transition::parse(&action)?;
    Ok(Json(
        apply_transition(state.store.as_ref(), id, transition).await?,
    ))
}
