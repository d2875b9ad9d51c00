pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::calendar::handlers as calendar;
use crate::content::{approvals, handlers as content};
use crate::reports::handlers as reports;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Calendar
        .route("/api/v1/calendar", get(calendar::handle_get_calendar))
        // Posts
        .route(
            "/api/v1/posts",
            get(content::handle_list_posts).post(content::handle_create_post),
        )
        .route(
            "/api/v1/posts/:id",
            get(content::handle_get_post)
                .put(content::handle_replace_post)
                .patch(content::handle_patch_post)
                .delete(content::handle_delete_post),
        )
        // Campaigns
        .route(
            "/api/v1/campaigns",
            get(content::handle_list_campaigns).post(content::handle_create_campaign),
        )
        .route(
            "/api/v1/campaigns/:id",
            axum::routing::delete(content::handle_delete_campaign),
        )
        // Approvals
        .route("/api/v1/approvals", get(approvals::handle_list_pending))
        .route(
            "/api/v1/approvals/:id/:action",
            post(approvals::handle_transition),
        )
        // Reports
        .route(
            "/api/v1/reports/generate",
            post(reports::handle_generate_report),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
        Router,
    };
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::build_router;
    use crate::config::Config;
    use crate::llm_client::LlmClient;
    use crate::state::AppState;
    use crate::store::InMemoryStore;

    fn app() -> Router {
        app_with(InMemoryStore::new())
    }

    fn app_with(store: InMemoryStore) -> Router {
        build_router(AppState {
            store: Arc::new(store),
            llm: LlmClient::new(Duration::from_secs(5)).unwrap(),
            config: Config::in_memory(),
        })
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn launch_form() -> Value {
        json!({
            "title": "Launch",
            "platform": "instagram",
            "content_type": "image",
            "date": "2024-07-01",
            "time": "10:00",
            "status": "draft"
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["store"], "memory");
    }

    #[tokio::test]
    async fn test_create_then_list_posts() {
        let app = app();
        let (status, created) = send(&app, Method::POST, "/api/v1/posts", Some(launch_form())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(created["id"].is_string());
        assert_eq!(created["date"], "2024-07-01");
        assert_eq!(created["time"], "10:00");

        let (_, listed) = send(&app, Method::GET, "/api/v1/posts", None).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (_, filtered) = send(&app, Method::GET, "/api/v1/posts?platform=twitter", None).await;
        assert!(filtered.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_without_title_is_400() {
        let mut form = launch_form();
        form["title"] = json!("");
        let (status, body) = send(&app(), Method::POST, "/api/v1/posts", Some(form)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_stale_put_is_409() {
        let app = app();
        let (_, created) = send(&app, Method::POST, "/api/v1/posts", Some(launch_form())).await;
        let id = created["id"].as_str().unwrap().to_string();
        let uri = format!("/api/v1/posts/{id}");

        let mut form = launch_form();
        form["title"] = json!("First edit");
        form["updated_at"] = created["updated_at"].clone();
        let (status, _) = send(&app, Method::PUT, &uri, Some(form.clone())).await;
        assert_eq!(status, StatusCode::OK);

        form["title"] = json!("Second edit from stale form");
        let (status, body) = send(&app, Method::PUT, &uri, Some(form)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");

        let (_, current) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(current["title"], "First edit");
    }

    #[tokio::test]
    async fn test_delete_post_then_404() {
        let app = app();
        let (_, created) = send(&app, Method::POST, "/api/v1/posts", Some(launch_form())).await;
        let uri = format!("/api/v1/posts/{}", created["id"].as_str().unwrap());

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_calendar_week_view_with_campaign_band() {
        let app = app();
        let (status, campaign) = send(
            &app,
            Method::POST,
            "/api/v1/campaigns",
            Some(json!({
                "name": "Summer Stays",
                "start_date": "2024-06-01",
                "end_date": "2024-06-10",
                "color": "#f59e0b"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let mut form = launch_form();
        form["date"] = json!("2024-06-10");
        form["campaign_id"] = campaign["id"].clone();
        send(&app, Method::POST, "/api/v1/posts", Some(form)).await;

        let (status, body) = send(
            &app,
            Method::GET,
            "/api/v1/calendar?view=week&date=2024-06-10&today=2024-06-12",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let days = body["view"]["days"].as_array().unwrap();
        assert_eq!(days.len(), 7);

        let tenth = days.iter().find(|d| d["date"] == "2024-06-10").unwrap();
        assert_eq!(tenth["campaigns"].as_array().unwrap().len(), 1);
        assert_eq!(tenth["posts"][0]["campaign_color"], "#f59e0b");
        assert!(tenth.get("placeholder").is_none());

        let eleventh = days.iter().find(|d| d["date"] == "2024-06-11").unwrap();
        assert!(eleventh["campaigns"].as_array().unwrap().is_empty());
        assert_eq!(eleventh["placeholder"]["action"], "create_post");
        assert!(body["notifications"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_calendar_month_view_from_fixtures() {
        let june = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let app = app_with(InMemoryStore::from_fixtures(42, june));

        let (status, body) = send(
            &app,
            Method::GET,
            "/api/v1/calendar?month=2024-06&today=2024-06-12&status=draft",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"]["label"], "June 2024");
        for day in body["view"]["days"].as_array().unwrap() {
            for card in day["posts"].as_array().unwrap() {
                assert_eq!(card["status"], "draft");
            }
        }
    }

    #[tokio::test]
    async fn test_calendar_rejects_bad_filter() {
        let (status, _) = send(&app(), Method::GET, "/api/v1/calendar?platform=myspace", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_calendar_rejects_out_of_range_dates() {
        let app = app();
        for uri in [
            "/api/v1/calendar?date=%2B262142-12-31",
            "/api/v1/calendar?view=week&date=%2B262142-12-31",
            "/api/v1/calendar?month=%2B262142-12",
            "/api/v1/calendar?today=-262143-01-01",
        ] {
            let (status, body) = send(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR", "{uri}");
        }

        let (status, body) = send(&app, Method::GET, "/api/v1/calendar?date=9999-12-31", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"]["days"].as_array().unwrap().len(), 42);
    }

    #[tokio::test]
    async fn test_malformed_bodies_use_error_envelope() {
        let app = app();
        let (_, created) = send(&app, Method::POST, "/api/v1/posts", Some(launch_form())).await;
        let uri = format!("/api/v1/posts/{}", created["id"].as_str().unwrap());

        let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "time": "25:99" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"].as_str().unwrap().contains("25:99"));

        let mut form = launch_form();
        form["platform"] = json!("tiktok");
        let (status, body) = send(&app, Method::POST, "/api/v1/posts", Some(form)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"].as_str().unwrap().contains("tiktok"));

        let (_, current) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(current["time"], "10:00");
    }

    #[tokio::test]
    async fn test_bad_path_and_query_use_error_envelope() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/api/v1/posts/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, body) = send(&app, Method::GET, "/api/v1/calendar?view=year", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_campaign_reference_is_400() {
        let app = app();
        let mut form = launch_form();
        form["campaign_id"] = json!(uuid::Uuid::new_v4().to_string());
        let (status, body) = send(&app, Method::POST, "/api/v1/posts", Some(form)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (_, listed) = send(&app, Method::GET, "/api/v1/posts", None).await;
        assert!(listed.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_campaign_reports_orphans() {
        let app = app();
        let (_, campaign) = send(
            &app,
            Method::POST,
            "/api/v1/campaigns",
            Some(json!({
                "name": "Spa Week",
                "start_date": "2024-07-01",
                "end_date": "2024-07-07",
                "color": "#10b981"
            })),
        )
        .await;
        let mut form = launch_form();
        form["campaign_id"] = campaign["id"].clone();
        let (_, post) = send(&app, Method::POST, "/api/v1/posts", Some(form)).await;

        let uri = format!("/api/v1/campaigns/{}", campaign["id"].as_str().unwrap());
        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["orphaned_posts"], 1);

        let post_uri = format!("/api/v1/posts/{}", post["id"].as_str().unwrap());
        let (_, post) = send(&app, Method::GET, &post_uri, None).await;
        assert!(post["campaign_id"].is_null());
    }

    #[tokio::test]
    async fn test_approval_routes() {
        let app = app();
        let (_, post) = send(&app, Method::POST, "/api/v1/posts", Some(launch_form())).await;
        let id = post["id"].as_str().unwrap().to_string();

        let (status, _) = send(&app, Method::POST, &format!("/api/v1/approvals/{id}/approve"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, submitted) =
            send(&app, Method::POST, &format!("/api/v1/approvals/{id}/submit"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(submitted["status"], "pending_approval");

        let (_, pending) = send(&app, Method::GET, "/api/v1/approvals", None).await;
        assert_eq!(pending.as_array().unwrap().len(), 1);

        let (_, approved) =
            send(&app, Method::POST, &format!("/api/v1/approvals/{id}/approve"), None).await;
        assert_eq!(approved["status"], "scheduled");
    }

    #[tokio::test]
    async fn test_report_without_api_key_is_400() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/v1/reports/generate",
            Some(json!({
                "dataSource": "Guests loved the rooftop bar.",
                "clientName": "Harbor Hotel",
                "quarter": "Q2",
                "year": 2024,
                "llmType": "openai"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"].as_str().unwrap().contains("llmApiKey"));
    }
}
