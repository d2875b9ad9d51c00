use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::fixtures::build_fixtures;
use crate::models::{Campaign, NewCampaign, NewPost, Post, PostPatch};
use crate::store::{post_not_found, stale_write, unknown_campaign, CalendarStore};

#[derive(Default)]
struct Tables {
    posts: Vec<Post>,
    campaigns: Vec<Campaign>,
}

/// Process-local `CalendarStore`. Used for local development and tests.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(posts: Vec<Post>, campaigns: Vec<Campaign>) -> Self {
        Self {
            tables: RwLock::new(Tables { posts, campaigns }),
        }
    }

    /// Seeds the store with the deterministic fixture set for `month`.
    pub fn from_fixtures(seed: u64, month: NaiveDate) -> Self {
        let fixtures = build_fixtures(seed, month);
        info!(
            "Seeded in-memory store: {} campaigns, {} posts (seed {seed})",
            fixtures.campaigns.len(),
            fixtures.posts.len()
        );
        Self::with_data(fixtures.posts, fixtures.campaigns)
    }
}

impl Tables {
    fn check_campaign(&self, campaign_id: Option<Uuid>) -> Result<(), AppError> {
        match campaign_id {
            Some(id) if !self.campaigns.iter().any(|c| c.id == id) => Err(unknown_campaign(id)),
            _ => Ok(()),
        }
    }
}

/// Next `updated_at` for a write. Strictly increases so a stale token can
/// never match a newer version.
fn next_version(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[async_trait]
impl CalendarStore for InMemoryStore {
    async fn list_posts(&self) -> Result<Vec<Post>, AppError> {
        let tables = self.tables.read().await;
        let mut posts = tables.posts.clone();
        posts.sort_by_key(|p| (p.date, p.time));
        Ok(posts)
    }

    async fn get_post(&self, id: Uuid) -> Result<Post, AppError> {
        let tables = self.tables.read().await;
        tables
            .posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| post_not_found(id))
    }

    async fn create_post(&self, new_post: NewPost) -> Result<Post, AppError> {
        let mut tables = self.tables.write().await;
        tables.check_campaign(new_post.campaign_id)?;
        let post = new_post.into_post(Uuid::new_v4(), Utc::now());
        tables.posts.push(post.clone());
        debug!("Created post {} on {}", post.id, post.date);
        Ok(post)
    }

    async fn update_post(&self, id: Uuid, patch: PostPatch) -> Result<Post, AppError> {
        let mut tables = self.tables.write().await;
        tables.check_campaign(patch.campaign_id.flatten())?;
        let post = tables
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| post_not_found(id))?;

        if let Some(expected) = patch.expected_updated_at {
            if expected != post.updated_at {
                return Err(stale_write(id));
            }
        }

        patch.apply_to(post);
        post.updated_at = next_version(post.updated_at);
        Ok(post.clone())
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        if tables.posts.len() == before {
            return Err(post_not_found(id));
        }
        Ok(())
    }

    async fn list_campaigns(&self) -> Result<Vec<Campaign>, AppError> {
        let tables = self.tables.read().await;
        let mut campaigns = tables.campaigns.clone();
        campaigns.sort_by_key(|c| c.start_date);
        Ok(campaigns)
    }

    async fn create_campaign(&self, new_campaign: NewCampaign) -> Result<Campaign, AppError> {
        let campaign = new_campaign.into_campaign(Uuid::new_v4(), Utc::now());
        self.tables.write().await.campaigns.push(campaign.clone());
        Ok(campaign)
    }

    async fn delete_campaign(&self, id: Uuid) -> Result<u64, AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.campaigns.len();
        tables.campaigns.retain(|c| c.id != id);
        if tables.campaigns.len() == before {
            return Err(AppError::NotFound(format!("Campaign {id} not found")));
        }

        let mut orphaned = 0;
        for post in tables.posts.iter_mut().filter(|p| p.campaign_id == Some(id)) {
            post.campaign_id = None;
            post.updated_at = next_version(post.updated_at);
            orphaned += 1;
        }
        Ok(orphaned)
    }
}
