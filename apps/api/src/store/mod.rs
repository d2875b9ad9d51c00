//! Data-fetch layer for the calendar: posts and campaigns behind one trait.
//!
//! `AppState` carries an `Arc<dyn CalendarStore>`; the backend is chosen at
//! startup from `STORE_BACKEND`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Campaign, NewCampaign, NewPost, Post, PostPatch};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgCalendarStore;

#[async_trait]
pub trait CalendarStore: Send + Sync {
    /// All posts ordered by `(date, time)`.
    async fn list_posts(&self) -> Result<Vec<Post>, AppError>;

    async fn get_post(&self, id: Uuid) -> Result<Post, AppError>;

    /// Inserts the post with a store-assigned id and returns the stored record.
    /// A `campaign_id` naming no campaign is a validation error.
    async fn create_post(&self, new_post: NewPost) -> Result<Post, AppError>;

    /// Overwrites the fields present in `patch`.
    ///
    /// With `patch.expected_updated_at` set, fails with `AppError::Conflict`
    /// when the stored record has moved on. Without it, last write wins.
    /// Attaching the post to a missing campaign is a validation error.
    async fn update_post(&self, id: Uuid, patch: PostPatch) -> Result<Post, AppError>;

    async fn delete_post(&self, id: Uuid) -> Result<(), AppError>;

    /// All campaigns ordered by start date.
    async fn list_campaigns(&self) -> Result<Vec<Campaign>, AppError>;

    async fn create_campaign(&self, new_campaign: NewCampaign) -> Result<Campaign, AppError>;

    /// Removes the campaign and detaches its posts. Returns how many posts
    /// were orphaned.
    async fn delete_campaign(&self, id: Uuid) -> Result<u64, AppError>;
}

pub(crate) fn post_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Post {id} not found"))
}

pub(crate) fn stale_write(id: Uuid) -> AppError {
    AppError::Conflict(format!(
        "Post {id} was modified since it was loaded; reload and retry"
    ))
}

pub(crate) fn unknown_campaign(id: Uuid) -> AppError {
    AppError::Validation(format!("campaign {id} does not exist"))
}
