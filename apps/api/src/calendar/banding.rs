use chrono::NaiveDate;

use crate::models::{Campaign, Post};

/// Campaigns whose `[start_date, end_date]` contains `day`, in input order.
pub fn active_campaigns(campaigns: &[Campaign], day: NaiveDate) -> Vec<&Campaign> {
    campaigns.iter().filter(|c| c.is_active_on(day)).collect()
}

/// The campaign a post references, if it is still known.
pub fn campaign_for<'a>(post: &Post, campaigns: &'a [Campaign]) -> Option<&'a Campaign> {
    let id = post.campaign_id?;
    campaigns.iter().find(|c| c.id == id)
}
