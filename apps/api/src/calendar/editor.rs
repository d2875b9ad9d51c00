//! Post editor dialog: a controlled form over a single post.
//!
//! Create vs edit is decided by whether the bound form carries an id. Delete
//! goes through a confirmation step before it produces an action.
//!
//! `PostEditor` is the dialog state for embedding front ends; its actions feed
//! `CalendarSession`. The post routes reuse `PostForm::into_action` alone.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::dates::parse_calendar_date;
use crate::errors::AppError;
use crate::models::post::{format_time_of_day, parse_time_of_day};
use crate::models::{ContentType, NewPost, Platform, Post, PostPatch, PostStatus};

const DEFAULT_TIME: &str = "12:00";

/// Raw form fields. `date` and `time` hold whatever the inputs produced and
/// are normalized on submit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostForm {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub platform: Platform,
    pub content_type: ContentType,
    #[serde(default)]
    pub date: String,
    #[serde(default = "default_time")]
    pub time: String,
    pub status: PostStatus,
    #[serde(default)]
    pub campaign_id: Option<Uuid>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub author_id: Option<Uuid>,
    /// Version token of the record the form was loaded from.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_time() -> String {
    DEFAULT_TIME.to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    Create(NewPost),
    Update { id: Uuid, patch: PostPatch },
    Delete(Uuid),
}

impl PostForm {
    /// Defaults for a new post on `date`.
    pub fn new_on(date: NaiveDate) -> Self {
        Self {
            id: None,
            title: String::new(),
            content: String::new(),
            platform: Platform::Instagram,
            content_type: ContentType::Image,
            date: date.format("%Y-%m-%d").to_string(),
            time: default_time(),
            status: PostStatus::Draft,
            campaign_id: None,
            image_url: None,
            author_id: None,
            updated_at: None,
        }
    }

    pub fn from_post(post: &Post) -> Self {
        Self {
            id: Some(post.id),
            title: post.title.clone(),
            content: post.content.clone(),
            platform: post.platform,
            content_type: post.content_type,
            date: post.date.format("%Y-%m-%d").to_string(),
            time: format_time_of_day(&post.time),
            status: post.status,
            campaign_id: post.campaign_id,
            image_url: post.image_url.clone(),
            author_id: post.author_id,
            updated_at: Some(post.updated_at),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    /// Checks required fields, normalizes date and time, and yields the
    /// create or update action for this form.
    pub fn into_action(self) -> Result<EditorAction, AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title is required".to_string()));
        }
        if self.date.trim().is_empty() {
            return Err(AppError::Validation("date is required".to_string()));
        }
        let date = parse_calendar_date(&self.date)
            .ok_or_else(|| AppError::Validation(format!("invalid date: '{}'", self.date)))?;
        let time = parse_time_of_day(&self.time)?;
        let image_url = self.image_url.filter(|url| !url.trim().is_empty());

        Ok(match self.id {
            Some(id) => EditorAction::Update {
                id,
                patch: PostPatch {
                    title: Some(self.title),
                    content: Some(self.content),
                    platform: Some(self.platform),
                    content_type: Some(self.content_type),
                    date: Some(date),
                    time: Some(time),
                    status: Some(self.status),
                    campaign_id: Some(self.campaign_id),
                    image_url: Some(image_url),
                    author_id: Some(self.author_id),
                    expected_updated_at: self.updated_at,
                },
            },
            None => EditorAction::Create(NewPost {
                title: self.title,
                content: self.content,
                platform: self.platform,
                content_type: self.content_type,
                date,
                time,
                status: self.status,
                campaign_id: self.campaign_id,
                image_url,
                author_id: self.author_id,
            }),
        })
    }
}

/// Dialog state. `open` and `confirm_delete_open` are independent.
#[derive(Debug, Clone)]
pub struct PostEditor {
    open: bool,
    confirm_delete_open: bool,
    form: PostForm,
}

impl PostEditor {
    pub fn for_new(date: NaiveDate) -> Self {
        Self {
            open: true,
            confirm_delete_open: false,
            form: PostForm::new_on(date),
        }
    }

    pub fn for_post(post: &Post) -> Self {
        Self {
            open: true,
            confirm_delete_open: false,
            form: PostForm::from_post(post),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.confirm_delete_open
    }

    pub fn is_edit(&self) -> bool {
        self.form.is_edit()
    }

    pub fn form(&self) -> &PostForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PostForm {
        &mut self.form
    }

    pub fn close(&mut self) {
        self.open = false;
        self.confirm_delete_open = false;
    }

    /// On success the dialog closes; on a validation error it stays open.
    pub fn submit(&mut self) -> Result<EditorAction, AppError> {
        let action = self.form.clone().into_action()?;
        self.close();
        Ok(action)
    }

    /// Opens the confirmation step. Only an existing post can be deleted.
    pub fn request_delete(&mut self) -> Result<(), AppError> {
        if !self.is_edit() {
            return Err(AppError::Validation(
                "only a saved post can be deleted".to_string(),
            ));
        }
        self.confirm_delete_open = true;
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        self.confirm_delete_open = false;
    }

    /// Yields the delete action if, and only if, confirmation is open.
    pub fn confirm_delete(&mut self) -> Option<EditorAction> {
        if !self.confirm_delete_open {
            return None;
        }
        let id = self.form.id?;
        self.close();
        Some(EditorAction::Delete(id))
    }
}
