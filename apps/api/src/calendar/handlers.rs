//! Axum route handlers for the rendered calendar.

use axum::{extract::State, Json};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::dates::{in_supported_range, parse_calendar_date};
use crate::calendar::filter::FilterSelection;
use crate::calendar::session::{CalendarSession, Notification};
use crate::calendar::views::{CalendarView, ViewMode};
use crate::errors::{AppError, AppQuery};
use crate::state::AppState;

/// Comma-separated filter lists, e.g. `?platform=instagram,twitter&status=draft`.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub platform: Option<String>,
    pub campaign: Option<String>,
    pub status: Option<String>,
}

impl FilterQuery {
    pub fn to_selection(&self) -> Result<FilterSelection, AppError> {
        let mut selection = FilterSelection::default();
        for raw in split_list(&self.platform) {
            selection.platforms.insert(raw.parse()?);
        }
        for raw in split_list(&self.status) {
            selection.statuses.insert(raw.parse()?);
        }
        for raw in split_list(&self.campaign) {
            let id = Uuid::parse_str(raw)
                .map_err(|_| AppError::Validation(format!("invalid campaign id: '{raw}'")))?;
            selection.campaigns.insert(id);
        }
        Ok(selection)
    }
}

fn split_list(raw: &Option<String>) -> impl Iterator<Item = &str> {
    raw.as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    pub view: Option<ViewMode>,
    /// Selected date; also picks the displayed month unless `month` is given.
    pub date: Option<String>,
    /// `yyyy-MM` or any date inside the month.
    pub month: Option<String>,
    /// Overrides the server's notion of today.
    pub today: Option<String>,
    pub platform: Option<String>,
    pub campaign: Option<String>,
    pub status: Option<String>,
}

impl CalendarQuery {
    fn filter_query(&self) -> FilterQuery {
        FilterQuery {
            platform: self.platform.clone(),
            campaign: self.campaign.clone(),
            status: self.status.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub view: CalendarView,
    pub filters: FilterSelection,
    pub notifications: Vec<Notification>,
}

fn parse_date_param(name: &str, raw: &str) -> Result<NaiveDate, AppError> {
    parse_calendar_date(raw)
        .ok_or_else(|| AppError::Validation(format!("{name} must be yyyy-MM-dd, got '{raw}'")))
}

fn parse_month_param(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .ok()
        .filter(|day| in_supported_range(*day))
        .or_else(|| parse_calendar_date(raw))
        .ok_or_else(|| AppError::Validation(format!("month must be yyyy-MM, got '{raw}'")))
}

/// GET /api/v1/calendar
///
/// Loads posts and campaigns, applies navigation and filters, and returns the
/// rendered month, week or day. A failed fetch still renders (empty) and
/// reports the failure in `notifications`.
pub async fn handle_get_calendar(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    let today = match query.today.as_deref() {
        Some(raw) => parse_date_param("today", raw)?,
        None => Utc::now().date_naive(),
    };
    let filters = query.filter_query().to_selection()?;

    let mut session = CalendarSession::new(today);
    if let Some(raw) = query.date.as_deref() {
        let date = parse_date_param("date", raw)?;
        session.select_date(date);
        session.show_month(date);
    }
    if let Some(raw) = query.month.as_deref() {
        session.show_month(parse_month_param(raw)?);
    }
    session.set_view_mode(query.view.unwrap_or_default());
    *session.filters_mut() = filters;

    session.load(state.store.as_ref()).await;

    let view = session.render(today);
    Ok(Json(CalendarResponse {
        view,
        filters: session.filters().clone(),
        notifications: session.drain_notifications(),
    }))
}
