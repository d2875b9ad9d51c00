use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

/// A named, time-bounded marketing initiative. Bands the calendar days it spans.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    #[sqlx(rename = "startdate")]
    pub start_date: NaiveDate,
    #[sqlx(rename = "enddate")]
    pub end_date: NaiveDate,
    pub color: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCampaign {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Campaign {
    /// Inclusive on both ends.
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }

    /// Whether `[start_date, end_date]` intersects `[from, to]`.
    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.start_date <= to && from <= self.end_date
    }
}

impl NewCampaign {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("campaign name is required".to_string()));
        }
        if self.start_date > self.end_date {
            return Err(AppError::Validation(format!(
                "campaign start date {} is after end date {}",
                self.start_date, self.end_date
            )));
        }
        if self.color.trim().is_empty() {
            return Err(AppError::Validation("campaign color is required".to_string()));
        }
        Ok(())
    }

    pub fn into_campaign(self, id: Uuid, now: DateTime<Utc>) -> Campaign {
        Campaign {
            id,
            name: self.name,
            start_date: self.start_date,
            end_date: self.end_date,
            color: self.color,
            description: self.description,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn june_campaign() -> Campaign {
        NewCampaign {
            name: "Summer Stays".to_string(),
            start_date: day("2024-06-01"),
            end_date: day("2024-06-10"),
            color: "#f59e0b".to_string(),
            description: None,
        }
        .into_campaign(Uuid::new_v4(), Utc::now())
    }

    #[test]
    fn test_active_is_inclusive_on_both_ends() {
        let campaign = june_campaign();
        assert!(campaign.is_active_on(day("2024-06-01")));
        assert!(campaign.is_active_on(day("2024-06-10")));
        assert!(!campaign.is_active_on(day("2024-06-11")));
        assert!(!campaign.is_active_on(day("2024-05-31")));
    }

    #[test]
    fn test_overlaps_month_boundaries() {
        let campaign = june_campaign();
        assert!(campaign.overlaps(day("2024-05-26"), day("2024-06-01")));
        assert!(!campaign.overlaps(day("2024-06-11"), day("2024-06-30")));
    }

    #[test]
    fn test_start_after_end_is_rejected() {
        let new = NewCampaign {
            name: "Backwards".to_string(),
            start_date: day("2024-06-10"),
            end_date: day("2024-06-01"),
            color: "#000".to_string(),
            description: None,
        };
        assert!(matches!(new.validate(), Err(AppError::Validation(_))));
    }
}
