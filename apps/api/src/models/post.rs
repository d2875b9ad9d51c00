use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Instagram,
    Twitter,
    Facebook,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Image,
    Video,
    Carousel,
    Text,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Draft,
    Scheduled,
    PendingApproval,
    Published,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Instagram, Platform::Twitter, Platform::Facebook];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Twitter => "twitter",
            Platform::Facebook => "facebook",
        }
    }
}

impl ContentType {
    pub const ALL: [ContentType; 4] = [
        ContentType::Image,
        ContentType::Video,
        ContentType::Carousel,
        ContentType::Text,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Image => "image",
            ContentType::Video => "video",
            ContentType::Carousel => "carousel",
            ContentType::Text => "text",
        }
    }
}

impl PostStatus {
    pub const ALL: [PostStatus; 4] = [
        PostStatus::Draft,
        PostStatus::Scheduled,
        PostStatus::PendingApproval,
        PostStatus::Published,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Scheduled => "scheduled",
            PostStatus::PendingApproval => "pending_approval",
            PostStatus::Published => "published",
        }
    }
}

macro_rules! impl_text_enum {
    ($ty:ty, $label:literal) => {
        impl FromStr for $ty {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim().to_ascii_lowercase();
                <$ty>::ALL
                    .into_iter()
                    .find(|v| v.as_str() == needle)
                    .ok_or_else(|| AppError::Validation(format!("unknown {}: '{}'", $label, s)))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_text_enum!(Platform, "platform");
impl_text_enum!(ContentType, "content type");
impl_text_enum!(PostStatus, "status");

/// A single scheduled piece of social content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub platform: Platform,
    pub content_type: ContentType,
    pub date: NaiveDate,
    #[serde(with = "time_of_day")]
    pub time: NaiveTime,
    pub status: PostStatus,
    pub campaign_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub author_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a post. The id is assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPost {
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub platform: Platform,
    pub content_type: ContentType,
    pub date: NaiveDate,
    #[serde(with = "time_of_day")]
    pub time: NaiveTime,
    pub status: PostStatus,
    #[serde(default)]
    pub campaign_id: Option<Uuid>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub author_id: Option<Uuid>,
}

/// Field overwrites for an existing post. Absent fields are left alone.
///
/// `expected_updated_at`, when set, must equal the stored `updated_at` or the
/// write is rejected as a conflict.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub platform: Option<Platform>,
    pub content_type: Option<ContentType>,
    pub date: Option<NaiveDate>,
    #[serde(default, with = "time_of_day::option")]
    pub time: Option<NaiveTime>,
    pub status: Option<PostStatus>,
    /// `Some(None)` detaches the post from its campaign.
    #[serde(default, deserialize_with = "double_option")]
    pub campaign_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub author_id: Option<Option<Uuid>>,
    pub expected_updated_at: Option<DateTime<Utc>>,
}

impl NewPost {
    /// Required-field check shared by the editor, the session and the API.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title is required".to_string()));
        }
        Ok(())
    }

    pub fn into_post(self, id: Uuid, now: DateTime<Utc>) -> Post {
        Post {
            id,
            title: self.title,
            content: self.content,
            platform: self.platform,
            content_type: self.content_type,
            date: self.date,
            time: self.time,
            status: self.status,
            campaign_id: self.campaign_id,
            image_url: self.image_url,
            author_id: self.author_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl PostPatch {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(AppError::Validation("title cannot be empty".to_string()));
            }
        }
        Ok(())
    }

    pub fn status(status: PostStatus) -> Self {
        PostPatch {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Applies the overwrites to `post` in place. Does not touch `updated_at`.
    pub fn apply_to(&self, post: &mut Post) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
        if let Some(platform) = self.platform {
            post.platform = platform;
        }
        if let Some(content_type) = self.content_type {
            post.content_type = content_type;
        }
        if let Some(date) = self.date {
            post.date = date;
        }
        if let Some(time) = self.time {
            post.time = time;
        }
        if let Some(status) = self.status {
            post.status = status;
        }
        if let Some(campaign_id) = self.campaign_id {
            post.campaign_id = campaign_id;
        }
        if let Some(image_url) = &self.image_url {
            post.image_url = image_url.clone();
        }
        if let Some(author_id) = self.author_id {
            post.author_id = author_id;
        }
    }
}

fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Parses a time of day in `HH:MM` or `HH:MM:SS` form.
pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, AppError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| AppError::Validation(format!("invalid time of day: '{raw}'")))
}

/// Formats as `HH:MM`, keeping seconds only when they are set.
pub fn format_time_of_day(time: &NaiveTime) -> String {
    if time.second() == 0 {
        time.format("%H:%M").to_string()
    } else {
        time.format("%H:%M:%S").to_string()
    }
}

/// Serde adapter accepting `HH:MM` as well as `HH:MM:SS`.
pub mod time_of_day {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_time_of_day(time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time_of_day(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            time: &Option<NaiveTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(t) => serializer.serialize_str(&super::super::format_time_of_day(t)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| super::super::parse_time_of_day(&raw).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

/// Row shape of the `posts` table. Enum columns are stored as text.
#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub platform: String,
    pub content_type: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: String,
    pub campaign_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub author_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for Post {
    type Error = AppError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        Ok(Post {
            id: row.id,
            title: row.title,
            content: row.content,
            platform: row.platform.parse()?,
            content_type: row.content_type.parse()?,
            date: row.date,
            time: row.time,
            status: row.status.parse()?,
            campaign_id: row.campaign_id,
            image_url: row.image_url,
            author_id: row.author_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
