//! Month / week / day renderers.
//!
//! Pure functions of (filtered posts, campaigns, selected date, today) to a
//! serializable `CalendarView`. No I/O and no knowledge of the filters.

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::banding::{active_campaigns, campaign_for};
use crate::calendar::dates::{month_grid, month_label, same_month, week_days};
use crate::calendar::grouping::group_by_date;
use crate::models::post::time_of_day;
use crate::models::{Campaign, ContentType, Platform, Post, PostStatus};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Month,
    Week,
    Day,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CalendarView {
    pub mode: ViewMode,
    pub label: String,
    pub month: NaiveDate,
    pub selected_date: NaiveDate,
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
    pub days: Vec<DayCell>,
    /// Present only in day view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<Vec<HourSlot>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub in_current_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    pub campaigns: Vec<CampaignBand>,
    pub posts: Vec<PostCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<Placeholder>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CampaignBand {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub starts_today: bool,
    pub ends_today: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PostCard {
    pub id: Uuid,
    pub title: String,
    pub platform: Platform,
    pub content_type: ContentType,
    pub status: PostStatus,
    #[serde(with = "time_of_day")]
    pub time: NaiveTime,
    pub campaign_id: Option<Uuid>,
    pub campaign_color: Option<String>,
    pub image_url: Option<String>,
}

/// Affordance rendered on a day without posts.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Placeholder {
    CreatePost { date: NaiveDate },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HourSlot {
    pub hour: u32,
    pub posts: Vec<PostCard>,
}

/// Everything a renderer reads. `posts` is already filtered.
pub struct RenderInput<'a> {
    pub posts: &'a [&'a Post],
    pub campaigns: &'a [Campaign],
    pub month: NaiveDate,
    pub selected_date: NaiveDate,
    pub today: NaiveDate,
}

pub fn render(mode: ViewMode, input: &RenderInput<'_>) -> CalendarView {
    match mode {
        ViewMode::Month => render_month(input),
        ViewMode::Week => render_week(input),
        ViewMode::Day => render_day(input),
    }
}

pub fn render_month(input: &RenderInput<'_>) -> CalendarView {
    let days = month_grid(input.month);
    build_view(ViewMode::Month, month_label(input.month), &days, input)
}

pub fn render_week(input: &RenderInput<'_>) -> CalendarView {
    let days = week_days(input.selected_date);
    let label = match (days.first(), days.last()) {
        (Some(first), Some(last)) => {
            format!("{} – {}", first.format("%b %-d"), last.format("%b %-d, %Y"))
        }
        _ => month_label(input.month),
    };
    build_view(ViewMode::Week, label, &days, input)
}

pub fn render_day(input: &RenderInput<'_>) -> CalendarView {
    let days = [input.selected_date];
    let label = input.selected_date.format("%A, %B %-d, %Y").to_string();
    let mut view = build_view(ViewMode::Day, label, &days, input);

    let mut hours: Vec<HourSlot> = (0..24)
        .map(|hour| HourSlot {
            hour,
            posts: Vec::new(),
        })
        .collect();
    if let Some(cell) = view.days.first() {
        for card in &cell.posts {
            hours[card.time.hour() as usize].posts.push(card.clone());
        }
    }
    view.hours = Some(hours);
    view
}

fn build_view(
    mode: ViewMode,
    label: String,
    days: &[NaiveDate],
    input: &RenderInput<'_>,
) -> CalendarView {
    let buckets = group_by_date(input.posts.iter().copied());

    let cells = days
        .iter()
        .map(|&date| {
            let mut on_day: Vec<&Post> = buckets.get(&date).cloned().unwrap_or_default();
            on_day.sort_by_key(|p| p.time);

            let posts: Vec<PostCard> = on_day
                .into_iter()
                .map(|p| post_card(p, input.campaigns))
                .collect();
            let placeholder = posts
                .is_empty()
                .then_some(Placeholder::CreatePost { date });

            DayCell {
                date,
                in_current_month: same_month(date, input.month),
                is_today: date == input.today,
                is_selected: date == input.selected_date,
                campaigns: active_campaigns(input.campaigns, date)
                    .into_iter()
                    .map(|c| CampaignBand {
                        id: c.id,
                        name: c.name.clone(),
                        color: c.color.clone(),
                        starts_today: c.start_date == date,
                        ends_today: c.end_date == date,
                    })
                    .collect(),
                posts,
                placeholder,
            }
        })
        .collect();

    CalendarView {
        mode,
        label,
        month: input.month,
        selected_date: input.selected_date,
        range_start: days.first().copied().unwrap_or(input.selected_date),
        range_end: days.last().copied().unwrap_or(input.selected_date),
        days: cells,
        hours: None,
    }
}

fn post_card(post: &Post, campaigns: &[Campaign]) -> PostCard {
    PostCard {
        id: post.id,
        title: post.title.clone(),
        platform: post.platform,
        content_type: post.content_type,
        status: post.status,
        time: post.time,
        campaign_id: post.campaign_id,
        campaign_color: campaign_for(post, campaigns).map(|c| c.color.clone()),
        image_url: post.image_url.clone(),
    }
}
