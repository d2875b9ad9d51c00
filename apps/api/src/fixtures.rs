//! Deterministic seed data for local development and tests.
//!
//! The same `(seed, month)` always produces the same campaigns and posts,
//! ids included.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::calendar::dates::{first_of_month, last_of_month};
use crate::models::{Campaign, ContentType, Platform, Post, PostStatus};

const CAMPAIGN_NAMES: &[&str] = &[
    "Summer Escape",
    "Spa Weekend",
    "Chef's Table",
    "Rooftop Sessions",
    "Family Getaway",
    "Wellness Retreat",
];

const CAMPAIGN_COLORS: &[&str] = &["#f59e0b", "#10b981", "#6366f1", "#ef4444", "#0ea5e9"];

const POST_TITLES: &[&str] = &[
    "Sunset cocktails on the terrace",
    "Meet our head chef",
    "Suite upgrade giveaway",
    "Behind the scenes: housekeeping",
    "Weekend brunch menu",
    "Guest story of the week",
    "Poolside playlist",
    "Local gems near the hotel",
];

#[derive(Debug, Clone)]
pub struct Fixtures {
    pub campaigns: Vec<Campaign>,
    pub posts: Vec<Post>,
}

/// Builds campaigns and posts spread over the month containing `month`.
pub fn build_fixtures(seed: u64, month: NaiveDate) -> Fixtures {
    let mut rng = StdRng::seed_from_u64(seed);
    let first = first_of_month(month);
    let last = last_of_month(month);
    let days_in_month = (last - first).num_days() + 1;
    let created_at: DateTime<Utc> = first.and_time(NaiveTime::default()).and_utc();

    let campaign_count = rng.gen_range(2..=3);
    let mut names: Vec<&str> = CAMPAIGN_NAMES.to_vec();
    names.shuffle(&mut rng);

    let campaigns: Vec<Campaign> = names
        .into_iter()
        .take(campaign_count)
        .enumerate()
        .map(|(i, name)| {
            let start = first + Duration::days(rng.gen_range(0..days_in_month - 3));
            let end = (start + Duration::days(rng.gen_range(3..=10))).min(last);
            Campaign {
                id: seeded_uuid(&mut rng),
                name: name.to_string(),
                start_date: start,
                end_date: end,
                color: CAMPAIGN_COLORS[i % CAMPAIGN_COLORS.len()].to_string(),
                description: Some(format!("{name} promotion")),
                created_at,
            }
        })
        .collect();

    let post_count = rng.gen_range(12..=20);
    let mut posts = Vec::with_capacity(post_count);
    for _ in 0..post_count {
        let date = first + Duration::days(rng.gen_range(0..days_in_month));
        let time = NaiveTime::from_hms_opt(rng.gen_range(8..=20), 15 * rng.gen_range(0..4), 0)
            .unwrap_or_default();

        let active: Vec<&Campaign> = campaigns.iter().filter(|c| c.is_active_on(date)).collect();
        let campaign_id = match active.choose(&mut rng) {
            Some(c) if rng.gen_bool(0.7) => Some(c.id),
            _ => None,
        };

        let title = POST_TITLES.choose(&mut rng).copied().unwrap_or("Untitled");
        let platform = *Platform::ALL.choose(&mut rng).unwrap_or(&Platform::Instagram);
        let content_type = *ContentType::ALL.choose(&mut rng).unwrap_or(&ContentType::Text);
        let status = *PostStatus::ALL.choose(&mut rng).unwrap_or(&PostStatus::Draft);

        posts.push(Post {
            id: seeded_uuid(&mut rng),
            title: title.to_string(),
            content: format!("{title} #{}", platform.as_str()),
            platform,
            content_type,
            date,
            time,
            status,
            campaign_id,
            image_url: matches!(content_type, ContentType::Image | ContentType::Carousel)
                .then(|| format!("https://images.example.com/{}.jpg", rng.gen::<u32>())),
            author_id: None,
            created_at,
            updated_at: created_at,
        });
    }
    posts.sort_by_key(|p| (p.date, p.time));

    Fixtures { campaigns, posts }
}

fn seeded_uuid(rng: &mut StdRng) -> Uuid {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}

#[cfg(test)]
pub(crate) fn sample_post(title: &str, date: &str, platform: Platform, status: PostStatus) -> Post {
    let now = Utc::now();
    Post {
        id: Uuid::new_v4(),
        title: title.to_string(),
        content: String::new(),
        platform,
        content_type: ContentType::Image,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        status,
        campaign_id: None,
        image_url: None,
        author_id: None,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
pub(crate) fn sample_campaign(name: &str, start: &str, end: &str) -> Campaign {
    Campaign {
        id: Uuid::new_v4(),
        name: name.to_string(),
        start_date: NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap(),
        end_date: NaiveDate::parse_from_str(end, "%Y-%m-%d").unwrap(),
        color: "#f59e0b".to_string(),
        description: None,
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn june() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_same_seed_same_fixtures() {
        let a = build_fixtures(42, june());
        let b = build_fixtures(42, june());
        assert_eq!(a.posts, b.posts);
        assert_eq!(a.campaigns, b.campaigns);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = build_fixtures(1, june());
        let b = build_fixtures(2, june());
        assert_ne!(
            a.posts.iter().map(|p| p.id).collect::<Vec<_>>(),
            b.posts.iter().map(|p| p.id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_fixtures_stay_inside_the_month() {
        for seed in 0..20 {
            let fixtures = build_fixtures(seed, june());
            for post in &fixtures.posts {
                assert_eq!(first_of_month(post.date), june());
                if let Some(id) = post.campaign_id {
                    let campaign = fixtures.campaigns.iter().find(|c| c.id == id).unwrap();
                    assert!(campaign.is_active_on(post.date));
                }
            }
            for campaign in &fixtures.campaigns {
                assert!(campaign.start_date <= campaign.end_date);
                assert!(campaign.end_date <= last_of_month(june()));
            }
        }
    }
}
