use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::post::PostRow;
use crate::models::{Campaign, NewCampaign, NewPost, Post, PostPatch};
use crate::store::{post_not_found, stale_write, unknown_campaign, CalendarStore};

const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Reports a `posts.campaign_id` foreign-key violation as a validation error.
fn campaign_reference_error(err: sqlx::Error, campaign_id: Option<Uuid>) -> AppError {
    let is_fk_violation = err
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == FOREIGN_KEY_VIOLATION);
    match campaign_id {
        Some(id) if is_fk_violation => unknown_campaign(id),
        _ => AppError::Database(err),
    }
}

/// `CalendarStore` over the `posts` and `campaigns` tables.
#[derive(Clone)]
pub struct PgCalendarStore {
    pool: PgPool,
}

impl PgCalendarStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_post(&self, id: Uuid) -> Result<Option<Post>, AppError> {
        let row = sqlx::query_as::<_, PostRow>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Post::try_from).transpose()
    }
}

#[async_trait]
impl CalendarStore for PgCalendarStore {
    async fn list_posts(&self) -> Result<Vec<Post>, AppError> {
        let rows = sqlx::query_as::<_, PostRow>("SELECT * FROM posts ORDER BY date ASC, time ASC")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Post::try_from).collect()
    }

    async fn get_post(&self, id: Uuid) -> Result<Post, AppError> {
        self.fetch_post(id).await?.ok_or_else(|| post_not_found(id))
    }

    async fn create_post(&self, new_post: NewPost) -> Result<Post, AppError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts
                (id, title, content, platform, content_type, date, time, status,
                 campaign_id, image_url, author_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_post.title)
        .bind(&new_post.content)
        .bind(new_post.platform.as_str())
        .bind(new_post.content_type.as_str())
        .bind(new_post.date)
        .bind(new_post.time)
        .bind(new_post.status.as_str())
        .bind(new_post.campaign_id)
        .bind(&new_post.image_url)
        .bind(new_post.author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| campaign_reference_error(e, new_post.campaign_id))?;

        info!("Created post {} on {}", row.id, row.date);
        Post::try_from(row)
    }

    async fn update_post(&self, id: Uuid, patch: PostPatch) -> Result<Post, AppError> {
        let mut post = self.fetch_post(id).await?.ok_or_else(|| post_not_found(id))?;

        if let Some(expected) = patch.expected_updated_at {
            if expected != post.updated_at {
                return Err(stale_write(id));
            }
        }

        let loaded_at: DateTime<Utc> = post.updated_at;
        patch.apply_to(&mut post);

        // Guarded on the version we just read so the read-modify-write cannot
        // silently undo a concurrent token-checked edit.
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts SET
                title = $2, content = $3, platform = $4, content_type = $5,
                date = $6, time = $7, status = $8, campaign_id = $9,
                image_url = $10, author_id = $11, updated_at = now()
            WHERE id = $1 AND ($12::timestamptz IS NULL OR updated_at = $12)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.platform.as_str())
        .bind(post.content_type.as_str())
        .bind(post.date)
        .bind(post.time)
        .bind(post.status.as_str())
        .bind(post.campaign_id)
        .bind(&post.image_url)
        .bind(post.author_id)
        .bind(patch.expected_updated_at.map(|_| loaded_at))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| campaign_reference_error(e, post.campaign_id))?;

        match row {
            Some(row) => Post::try_from(row),
            None if patch.expected_updated_at.is_some() => Err(stale_write(id)),
            None => Err(post_not_found(id)),
        }
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(post_not_found(id));
        }
        info!("Deleted post {id}");
        Ok(())
    }

    async fn list_campaigns(&self) -> Result<Vec<Campaign>, AppError> {
        Ok(
            sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns ORDER BY startdate ASC")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn create_campaign(&self, new_campaign: NewCampaign) -> Result<Campaign, AppError> {
        let campaign = sqlx::query_as::<_, Campaign>(
            r#"
            INSERT INTO campaigns (id, name, startdate, enddate, color, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_campaign.name)
        .bind(new_campaign.start_date)
        .bind(new_campaign.end_date)
        .bind(&new_campaign.color)
        .bind(&new_campaign.description)
        .fetch_one(&self.pool)
        .await?;

        info!("Created campaign {} ({})", campaign.id, campaign.name);
        Ok(campaign)
    }

    async fn delete_campaign(&self, id: Uuid) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        let orphaned = sqlx::query(
            "UPDATE posts SET campaign_id = NULL, updated_at = now() WHERE campaign_id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let deleted = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Err(AppError::NotFound(format!("Campaign {id} not found")));
        }

        tx.commit().await?;
        info!("Deleted campaign {id}, orphaned {orphaned} posts");
        Ok(orphaned)
    }
}
