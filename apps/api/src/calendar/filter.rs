use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Platform, Post, PostStatus};

/// User-selected subsets of platform, campaign and status values.
///
/// Each set narrows the list only when non-empty; all empty means no filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default)]
    pub platforms: HashSet<Platform>,
    #[serde(default)]
    pub campaigns: HashSet<Uuid>,
    #[serde(default)]
    pub statuses: HashSet<PostStatus>,
}

impl FilterSelection {
    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty() && self.campaigns.is_empty() && self.statuses.is_empty()
    }

    pub fn clear(&mut self) {
        self.platforms.clear();
        self.campaigns.clear();
        self.statuses.clear();
    }

    pub fn toggle_platform(&mut self, platform: Platform) {
        toggle(&mut self.platforms, platform);
    }

    pub fn toggle_campaign(&mut self, campaign_id: Uuid) {
        toggle(&mut self.campaigns, campaign_id);
    }

    pub fn toggle_status(&mut self, status: PostStatus) {
        toggle(&mut self.statuses, status);
    }

    pub fn matches(&self, post: &Post) -> bool {
        let platform_ok = self.platforms.is_empty() || self.platforms.contains(&post.platform);
        let campaign_ok = self.campaigns.is_empty()
            || post
                .campaign_id
                .map_or(false, |id| self.campaigns.contains(&id));
        let status_ok = self.statuses.is_empty() || self.statuses.contains(&post.status);
        platform_ok && campaign_ok && status_ok
    }

    /// Filtered view over `posts`, input order preserved.
    pub fn apply<'a>(&self, posts: &'a [Post]) -> Vec<&'a Post> {
        posts.iter().filter(|p| self.matches(p)).collect()
    }
}

fn toggle<T: std::hash::Hash + Eq>(set: &mut HashSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_post;

    #[test]
    fn test_empty_selection_keeps_everything() {
        let posts = vec![
            sample_post("a", "2024-06-01", Platform::Instagram, PostStatus::Draft),
            sample_post("b", "2024-06-02", Platform::Twitter, PostStatus::Published),
        ];
        assert_eq!(FilterSelection::default().apply(&posts).len(), 2);
    }

    #[test]
    fn test_platform_filter_keeps_only_members() {
        let posts = vec![
            sample_post("insta", "2024-06-01", Platform::Instagram, PostStatus::Draft),
            sample_post("tweet", "2024-06-01", Platform::Twitter, PostStatus::Draft),
        ];
        let mut filters = FilterSelection::default();
        filters.toggle_platform(Platform::Instagram);

        let kept = filters.apply(&posts);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "insta");
    }

    #[test]
    fn test_every_non_empty_set_must_match() {
        let mut scheduled_insta =
            sample_post("keep", "2024-06-01", Platform::Instagram, PostStatus::Scheduled);
        let campaign = Uuid::new_v4();
        scheduled_insta.campaign_id = Some(campaign);
        let draft_insta = sample_post("status", "2024-06-01", Platform::Instagram, PostStatus::Draft);
        let mut wrong_platform =
            sample_post("platform", "2024-06-01", Platform::Facebook, PostStatus::Scheduled);
        wrong_platform.campaign_id = Some(campaign);
        let loose = sample_post("campaign", "2024-06-01", Platform::Instagram, PostStatus::Scheduled);
        let posts = vec![scheduled_insta, draft_insta, wrong_platform, loose];

        let mut filters = FilterSelection::default();
        filters.toggle_platform(Platform::Instagram);
        filters.toggle_status(PostStatus::Scheduled);
        filters.toggle_campaign(campaign);

        let kept: Vec<_> = filters.apply(&posts).iter().map(|p| p.title.as_str()).collect();
        assert_eq!(kept, vec!["keep"]);

        // iff: every excluded post fails at least one non-empty set
        for post in &posts {
            let expected = filters.platforms.contains(&post.platform)
                && filters.statuses.contains(&post.status)
                && post.campaign_id.map_or(false, |c| filters.campaigns.contains(&c));
            assert_eq!(filters.matches(post), expected, "post {}", post.title);
        }
    }

    #[test]
    fn test_toggle_twice_and_clear() {
        let mut filters = FilterSelection::default();
        filters.toggle_status(PostStatus::Draft);
        filters.toggle_status(PostStatus::Draft);
        assert!(filters.is_empty());

        filters.toggle_platform(Platform::Facebook);
        filters.toggle_campaign(Uuid::new_v4());
        filters.clear();
        assert!(filters.is_empty());
    }
}
