//! Calendar state container.
//!
//! Owns the displayed month, selected date, view mode, filter selection and the
//! in-memory post/campaign lists for one calendar page. Every write goes
//! through a `CalendarStore`; results are applied locally only on success and
//! only while the session's scope is still open.
//!
//! Embedding front ends hold one session per open page and drive the write
//! methods from their editor. The HTTP layer only uses `load` and `render`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calendar::dates::{first_of_month, shift_month};
use crate::calendar::editor::EditorAction;
use crate::calendar::filter::FilterSelection;
use crate::calendar::views::{render, CalendarView, RenderInput, ViewMode};
use crate::errors::AppError;
use crate::models::{Campaign, NewPost, Post, PostPatch};
use crate::store::CalendarStore;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

/// User-facing message produced by a session operation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    fn success(title: &str, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.to_string(),
            message: message.into(),
        }
    }

    fn error(title: &str, err: &AppError) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: title.to_string(),
            message: err.to_string(),
        }
    }
}

/// Lifetime marker shared between a session and whatever owns its view.
/// Closing it makes the session drop results of operations still in flight.
#[derive(Debug, Clone, Default)]
pub struct ScopeHandle(Arc<AtomicBool>);

impl ScopeHandle {
    pub fn close(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct CalendarSession {
    month: NaiveDate,
    selected_date: NaiveDate,
    view_mode: ViewMode,
    filters: FilterSelection,
    posts: Vec<Post>,
    campaigns: Vec<Campaign>,
    notifications: Vec<Notification>,
    scope: ScopeHandle,
}

impl CalendarSession {
    /// A session showing the month of `today`, with `today` selected.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            month: first_of_month(today),
            selected_date: today,
            view_mode: ViewMode::default(),
            filters: FilterSelection::default(),
            posts: Vec::new(),
            campaigns: Vec::new(),
            notifications: Vec::new(),
            scope: ScopeHandle::default(),
        }
    }

    pub fn with_data(today: NaiveDate, posts: Vec<Post>, campaigns: Vec<Campaign>) -> Self {
        Self {
            posts,
            campaigns,
            ..Self::new(today)
        }
    }

    pub fn month(&self) -> NaiveDate {
        self.month
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterSelection {
        &mut self.filters
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn scope(&self) -> ScopeHandle {
        self.scope.clone()
    }

    // ── navigation ─────────────────────────────────────────────────────────

    pub fn prev_month(&mut self) {
        self.month = shift_month(self.month, -1);
    }

    pub fn next_month(&mut self) {
        self.month = shift_month(self.month, 1);
    }

    /// Jumps the displayed month back to `today` and selects it.
    pub fn today(&mut self, today: NaiveDate) {
        self.month = first_of_month(today);
        self.selected_date = today;
    }

    /// Displays the month containing `day`.
    pub fn show_month(&mut self, day: NaiveDate) {
        self.month = first_of_month(day);
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = date;
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    // ── derived state ──────────────────────────────────────────────────────

    pub fn filtered_posts(&self) -> Vec<&Post> {
        self.filters.apply(&self.posts)
    }

    pub fn render(&self, today: NaiveDate) -> CalendarView {
        let posts = self.filtered_posts();
        render(
            self.view_mode,
            &RenderInput {
                posts: &posts,
                campaigns: &self.campaigns,
                month: self.month,
                selected_date: self.selected_date,
                today,
            },
        )
    }

    // ── store round trips ──────────────────────────────────────────────────

    /// Replaces the local lists with the store's. A failed fetch leaves that
    /// list empty and raises one error notification.
    pub async fn load(&mut self, store: &dyn CalendarStore) {
        let posts = store.list_posts().await;
        let campaigns = store.list_campaigns().await;
        if self.scope.is_closed() {
            debug!("Calendar scope closed; discarding load results");
            return;
        }

        self.posts = posts.unwrap_or_else(|e| {
            warn!("Failed to load posts: {e}");
            self.notifications
                .push(Notification::error("Could not load posts", &e));
            Vec::new()
        });
        self.campaigns = campaigns.unwrap_or_else(|e| {
            warn!("Failed to load campaigns: {e}");
            self.notifications
                .push(Notification::error("Could not load campaigns", &e));
            Vec::new()
        });
    }

    /// Runs an action produced by `PostEditor`. Returns whether it took effect.
    pub async fn apply(&mut self, store: &dyn CalendarStore, action: EditorAction) -> bool {
        match action {
            EditorAction::Create(new_post) => self.create_post(store, new_post).await.is_some(),
            EditorAction::Update { id, patch } => {
                self.update_post(store, id, patch).await.is_some()
            }
            EditorAction::Delete(id) => self.delete_post(store, id).await,
        }
    }

    pub async fn create_post(&mut self, store: &dyn CalendarStore, new_post: NewPost) -> Option<Post> {
        const TITLE: &str = "Could not create post";
        if let Err(e) = new_post.validate() {
            self.notifications.push(Notification::error(TITLE, &e));
            return None;
        }

        let result = store.create_post(new_post).await;
        if self.scope.is_closed() {
            debug!("Calendar scope closed; discarding created post");
            return None;
        }

        match result {
            Ok(post) => {
                info!("Post {} created for {}", post.id, post.date);
                self.posts.push(post.clone());
                self.notifications
                    .push(Notification::success("Post created", post.title.clone()));
                Some(post)
            }
            Err(e) => {
                warn!("Create post failed: {e}");
                self.notifications.push(Notification::error(TITLE, &e));
                None
            }
        }
    }

    pub async fn update_post(
        &mut self,
        store: &dyn CalendarStore,
        id: Uuid,
        patch: PostPatch,
    ) -> Option<Post> {
        const TITLE: &str = "Could not update post";
        if let Err(e) = patch.validate() {
            self.notifications.push(Notification::error(TITLE, &e));
            return None;
        }

        let result = store.update_post(id, patch).await;
        if self.scope.is_closed() {
            debug!("Calendar scope closed; discarding updated post {id}");
            return None;
        }

        match result {
            Ok(post) => {
                match self.posts.iter_mut().find(|p| p.id == post.id) {
                    Some(slot) => *slot = post.clone(),
                    None => self.posts.push(post.clone()),
                }
                self.notifications
                    .push(Notification::success("Post updated", post.title.clone()));
                Some(post)
            }
            Err(e) => {
                warn!("Update of post {id} failed: {e}");
                self.notifications.push(Notification::error(TITLE, &e));
                None
            }
        }
    }

    pub async fn delete_post(&mut self, store: &dyn CalendarStore, id: Uuid) -> bool {
        let result = store.delete_post(id).await;
        if self.scope.is_closed() {
            debug!("Calendar scope closed; discarding delete of post {id}");
            return false;
        }

        match result {
            Ok(()) => {
                self.posts.retain(|p| p.id != id);
                self.notifications
                    .push(Notification::success("Post deleted", id.to_string()));
                true
            }
            Err(e) => {
                warn!("Delete of post {id} failed: {e}");
                self.notifications
                    .push(Notification::error("Could not delete post", &e));
                false
            }
        }
    }
}
