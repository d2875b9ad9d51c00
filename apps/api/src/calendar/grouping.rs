use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::Post;

/// Buckets posts by calendar day. Each post lands in exactly one bucket and
/// keeps its relative order; buckets iterate in date order.
pub fn group_by_date<'a, I>(posts: I) -> BTreeMap<NaiveDate, Vec<&'a Post>>
where
    I: IntoIterator<Item = &'a Post>,
{
    let mut buckets: BTreeMap<NaiveDate, Vec<&'a Post>> = BTreeMap::new();
    for post in posts {
        buckets.entry(post.date).or_default().push(post);
    }
    buckets
}

/// Posts scheduled on `day`, earliest first.
pub fn posts_on<'a>(posts: &[&'a Post], day: NaiveDate) -> Vec<&'a Post> {
    let mut on_day: Vec<&Post> = posts.iter().copied().filter(|p| p.date == day).collect();
    on_day.sort_by_key(|p| p.time);
    on_day
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{build_fixtures, sample_post};
    use crate::models::{Platform, PostStatus};
    use std::collections::HashSet;

    #[test]
    fn test_grouping_partitions_the_input() {
        let month = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let fixtures = build_fixtures(7, month);
        let buckets = group_by_date(&fixtures.posts);

        let total: usize = buckets.values().map(Vec::len).sum();
        assert_eq!(total, fixtures.posts.len());

        let mut seen = HashSet::new();
        for (day, posts) in &buckets {
            for post in posts {
                assert_eq!(post.date, *day);
                assert!(seen.insert(post.id), "post {} in two buckets", post.id);
            }
        }
        let input: HashSet<_> = fixtures.posts.iter().map(|p| p.id).collect();
        assert_eq!(seen, input);
    }

    #[test]
    fn test_grouping_is_idempotent() {
        let posts = vec![
            sample_post("a", "2024-06-03", Platform::Instagram, PostStatus::Draft),
            sample_post("b", "2024-06-01", Platform::Twitter, PostStatus::Draft),
            sample_post("c", "2024-06-03", Platform::Facebook, PostStatus::Draft),
        ];
        let once = group_by_date(&posts);
        let flattened: Vec<&Post> = once.values().flatten().copied().collect();
        let twice = group_by_date(flattened);
        assert_eq!(once, twice);
        assert_eq!(once.keys().count(), 2);
    }

    #[test]
    fn test_posts_on_matches_calendar_day_only() {
        let posts = vec![
            sample_post("june 1", "2024-06-01", Platform::Instagram, PostStatus::Draft),
            sample_post("june 2", "2024-06-02", Platform::Instagram, PostStatus::Draft),
        ];
        let refs: Vec<&Post> = posts.iter().collect();
        let day = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        let found = posts_on(&refs, day);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "june 2");
    }
}
