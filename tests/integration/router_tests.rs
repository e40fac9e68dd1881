//! Router tests over an in-memory festival store

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use festivals_server::{
    api,
    config::{AppConfig, PreviewConfig},
    models::{Festival, FestivalSlug, Filter, ProgramItem},
    repository::FestivalStore,
    AppError, AppResult, AppState,
};

/// Store applying only the `free` predicate and the date window
struct MemoryStore {
    festivals: Vec<Festival>,
}

impl MemoryStore {
    fn matching(&self, filter: &Filter) -> Vec<Festival> {
        self.festivals
            .iter()
            .filter(|f| filter.free.map_or(true, |free| f.is_free == Some(free)))
            .filter(|f| match (f.date_range(), filter.from) {
                (Some((_, end)), Some(from)) => end >= from,
                (None, Some(_)) => false,
                _ => true,
            })
            .filter(|f| match (f.start_date, filter.to) {
                (Some(start), Some(to)) => start <= to,
                (None, Some(_)) => false,
                _ => true,
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl FestivalStore for MemoryStore {
    async fn list(&self, filter: &Filter, page: i64, per_page: i64) -> AppResult<(Vec<Festival>, i64)> {
        let all = self.matching(filter);
        let total = all.len() as i64;
        let rows = all
            .into_iter()
            .skip(((page - 1) * per_page) as usize)
            .take(per_page as usize)
            .collect();
        Ok((rows, total))
    }

    async fn list_all(&self, filter: &Filter, limit: i64) -> AppResult<Vec<Festival>> {
        Ok(self.matching(filter).into_iter().take(limit as usize).collect())
    }

    async fn get_by_slug(&self, slug: &str) -> AppResult<Festival> {
        self.festivals
            .iter()
            .find(|f| f.slug == slug)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Festival {} not found", slug)))
    }

    async fn list_program(&self, festival_id: Uuid) -> AppResult<Vec<ProgramItem>> {
        Ok(vec![ProgramItem {
            id: Uuid::new_v4(),
            festival_id,
            day: None,
            start_time: None,
            end_time: None,
            title: "Opening concert".into(),
            stage: Some("Main".into()),
            description: None,
            position: 0,
        }])
    }

    async fn list_slugs(&self) -> AppResult<Vec<FestivalSlug>> {
        Ok(self
            .festivals
            .iter()
            .map(|f| FestivalSlug {
                slug: f.slug.clone(),
                updated_at: None,
            })
            .collect())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn seed() -> Vec<Festival> {
    vec![
        Festival {
            id: Uuid::new_v4(),
            slug: "jazz-fest-bansko".into(),
            title: "Jazz Fest, Bansko".into(),
            category: Some("jazz".into()),
            city: Some("Bansko".into()),
            start_date: Some(d("2099-08-08")),
            end_date: Some(d("2099-08-10")),
            is_free: Some(true),
            latitude: Some(41.84),
            longitude: Some(23.49),
            ..Default::default()
        },
        Festival {
            id: Uuid::new_v4(),
            slug: "rozhen".into(),
            title: "Rozhen".into(),
            category: Some("folk".into()),
            city: Some("Smolyan".into()),
            start_date: Some(d("2099-07-24")),
            end_date: Some(d("2099-07-26")),
            is_free: Some(false),
            ..Default::default()
        },
    ]
}

fn app_with(config: AppConfig) -> Router {
    let store = Arc::new(MemoryStore { festivals: seed() });
    api::create_router(AppState::new(config, store))
}

fn app() -> Router {
    app_with(AppConfig::default())
}

fn gated_config() -> AppConfig {
    AppConfig {
        preview: PreviewConfig {
            enabled: true,
            token: "letmein".into(),
            ..PreviewConfig::default()
        },
        ..AppConfig::default()
    }
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

#[tokio::test]
async fn test_list_defaults_to_free() {
    let response = get(app(), "/api/v1/festivals").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["festivals"][0]["slug"], "jazz-fest-bansko");
    assert_eq!(body["query"], "free=1");
    assert_eq!(body["metadata"]["og_type"], "website");
}

#[tokio::test]
async fn test_list_explicit_paid() {
    let body = body_json(get(app(), "/api/v1/festivals?free=0").await).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["festivals"][0]["slug"], "rozhen");
}

#[tokio::test]
async fn test_list_rejects_zero_page() {
    let response = get(app(), "/api/v1/festivals?page=0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_rejects_huge_page() {
    let response = get(app(), "/api/v1/festivals?page=9223372036854775807&per_page=100").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_detail_with_program() {
    let response = get(app(), "/api/v1/festivals/rozhen").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["festival"]["title"], "Rozhen");
    assert_eq!(body["program"][0]["title"], "Opening concert");
    assert!(body["metadata"]["canonical_url"]
        .as_str()
        .unwrap()
        .ends_with("/festivals/rozhen"));
}

#[tokio::test]
async fn test_detail_malformed_slug_is_not_found() {
    let response = get(app(), "/api/v1/festivals/--").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app(), "/api/v1/festivals/unknown").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_canonical_slug_redirects() {
    let response = get(app(), "/api/v1/festivals/Jazz_Fest_Bansko").await;
    assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/api/v1/festivals/jazz-fest-bansko"
    );

    // Cyrillic path segment, percent-encoded: "Рожен"
    let response = get(app(), "/api/v1/festivals/%D0%A0%D0%BE%D0%B6%D0%B5%D0%BD/calendar.ics").await;
    assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/api/v1/festivals/rozhen/calendar.ics"
    );
}

#[tokio::test]
async fn test_ics_export() {
    let response = get(app(), "/api/v1/festivals/jazz-fest-bansko/calendar.ics").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/calendar; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "inline; filename=\"jazz-fest-bansko.ics\""
    );

    let text = body_text(response).await;
    assert!(text.contains("DTSTART;VALUE=DATE:20990808\r\n"));
    assert!(text.contains("DTEND;VALUE=DATE:20990811\r\n"));
    assert!(text.contains("SUMMARY:Jazz Fest\\, Bansko\r\n"));
}

#[tokio::test]
async fn test_map_markers() {
    let body = body_json(get(app(), "/api/v1/festivals/map").await).await;
    assert_eq!(body["markers"].as_array().unwrap().len(), 1);
    assert_eq!(body["markers"][0]["slug"], "jazz-fest-bansko");
}

#[tokio::test]
async fn test_calendar_month() {
    let response = get(app(), "/api/v1/calendar/2099-07?free=0").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["month"], "2099-07");
    let days: Vec<&String> = body["days"].as_object().unwrap().keys().collect();
    assert_eq!(days, vec!["2099-07-24", "2099-07-25", "2099-07-26"]);
    assert_eq!(body["days"]["2099-07-25"][0]["slug"], "rozhen");
}

#[tokio::test]
async fn test_calendar_query_month() {
    let body = body_json(get(app(), "/api/v1/calendar?month=2099-08").await).await;
    assert_eq!(body["month"], "2099-08");
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_calendar_malformed_month() {
    let response = get(app(), "/api/v1/calendar/2099-13").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_facets() {
    let body = body_json(get(app(), "/api/v1/facets?free=0").await).await;
    assert_eq!(body["categories"][0]["label"], "folk");
    assert_eq!(body["cities"][0]["label"], "Smolyan");
}

#[tokio::test]
async fn test_robots_and_sitemap() {
    let text = body_text(get(app(), "/robots.txt").await).await;
    assert!(text.contains("Sitemap: http://localhost:8080/sitemap.xml"));

    let response = get(app(), "/sitemap.xml").await;
    assert_eq!(response.status(), StatusCode::OK);
    let text = body_text(response).await;
    assert!(text.contains("<loc>http://localhost:8080/festivals/rozhen</loc>"));
}

#[tokio::test]
async fn test_preview_gate_serves_placeholder() {
    let response = get(app_with(gated_config()), "/api/v1/festivals").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-robots-tag"], "noindex");
    assert!(body_text(response).await.contains("<!doctype html>"));

    // Health stays reachable
    let response = get(app_with(gated_config()), "/api/v1/health").await;
    assert_eq!(body_json(response).await["status"], "healthy");

    let text = body_text(get(app_with(gated_config()), "/robots.txt").await).await;
    assert_eq!(text, "User-agent: *\nDisallow: /\n");
}

#[tokio::test]
async fn test_preview_cookie_opens_site() {
    let request = Request::builder()
        .uri("/api/v1/festivals")
        .header(header::COOKIE, "preview=letmein")
        .body(Body::empty())
        .unwrap();
    let response = app_with(gated_config()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["festivals"].is_array());
}

#[tokio::test]
async fn test_preview_unlock() {
    let response = get(app_with(gated_config()), "/preview?token=letmein").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("preview=letmein"));
    assert!(cookie.contains("HttpOnly"));

    let response = get(app_with(gated_config()), "/preview?token=nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
