//! API integration tests against a running server with a seeded database

use reqwest::Client;
use serde_json::Value;

const SITE_URL: &str = "http://localhost:8080";
const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Slug of the first listed festival, if any
async fn first_slug(client: &Client) -> Option<String> {
    let body: Value = client
        .get(format!("{}/festivals?per_page=1", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    body["festivals"][0]["slug"].as_str().map(str::to_string)
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_list_festivals() {
    let client = Client::new();

    let response = client
        .get(format!("{}/festivals", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["festivals"].is_array());
    assert!(body["total"].is_number());
    assert_eq!(body["filter"]["free"], true);
    assert_eq!(body["query"], "free=1");
}

#[tokio::test]
#[ignore]
async fn test_list_paid_festivals_in_city() {
    let client = Client::new();

    let response = client
        .get(format!("{}/festivals?city=Sofia,Plovdiv&free=0", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["filter"]["free"], false);
    for festival in body["festivals"].as_array().expect("festivals array") {
        assert_eq!(festival["is_free"], false);
    }
}

#[tokio::test]
#[ignore]
async fn test_invalid_page_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/festivals?page=0", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_festival_detail_and_ics() {
    let client = Client::new();
    let Some(slug) = first_slug(&client).await else {
        return;
    };

    let response = client
        .get(format!("{}/festivals/{}", BASE_URL, slug))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["festival"]["slug"], slug.as_str());
    assert!(body["program"].is_array());
    assert_eq!(body["metadata"]["og_type"], "event");

    let response = client
        .get(format!("{}/festivals/{}/calendar.ics", BASE_URL, slug))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    assert_eq!(
        response.headers()["content-type"],
        "text/calendar; charset=utf-8"
    );
    let text = response.text().await.expect("Failed to read body");
    assert!(text.starts_with("BEGIN:VCALENDAR\r\n"));
}

#[tokio::test]
#[ignore]
async fn test_unknown_festival() {
    let client = Client::new();

    let response = client
        .get(format!("{}/festivals/no-such-festival-anywhere", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_calendar_month() {
    let client = Client::new();

    let response = client
        .get(format!("{}/calendar/2026-06", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["month"], "2026-06");
    assert_eq!(body["next_month"], "2026-07");
    assert!(body["days"].is_object());
}

#[tokio::test]
#[ignore]
async fn test_facets() {
    let client = Client::new();

    let response = client
        .get(format!("{}/facets", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["categories"].is_array());
    assert!(body["cities"].is_array());
    assert!(body["upcoming_months"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_sitemap_and_robots() {
    let client = Client::new();

    let response = client
        .get(format!("{}/sitemap.xml", SITE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let text = response.text().await.expect("Failed to read body");
    assert!(text.contains("<urlset"));

    let response = client
        .get(format!("{}/robots.txt", SITE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let text = response.text().await.expect("Failed to read body");
    assert!(text.starts_with("User-agent: *"));
}
