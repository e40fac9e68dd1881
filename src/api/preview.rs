//! Preview gate in front of the "coming soon" placeholder
//!
//! While `preview.enabled` is set, visitors without the preview cookie see the
//! placeholder page. Visiting `/preview?token=...` with the right token sets
//! the cookie.

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use cookie::{time::Duration, Cookie, SameSite};
use serde::Deserialize;

use crate::{config::PreviewConfig, error::AppError, AppState};

/// Paths reachable without the preview cookie
const OPEN_PATHS: &[&str] = &[
    "/health",
    "/ready",
    "/api/v1/health",
    "/api/v1/ready",
    "/robots.txt",
    "/preview",
];

const COMING_SOON: &str = r#"<!doctype html>
<html lang="bg">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta name="robots" content="noindex">
<title>Очаквайте скоро</title>
</head>
<body>
<main>
<h1>Очаквайте скоро</h1>
<p>Най-пълният календар на фестивалите в България.</p>
</main>
</body>
</html>
"#;

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub token: Option<String>,
}

/// Byte comparison whose duration does not depend on where the inputs differ
fn tokens_match(given: &str, expected: &str) -> bool {
    let (a, b) = (given.as_bytes(), expected.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn has_preview_cookie(headers: &HeaderMap, config: &PreviewConfig) -> bool {
    if config.token.is_empty() {
        return false;
    }
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value))
        .filter_map(Result::ok)
        .any(|c| c.name() == config.cookie_name && tokens_match(c.value(), &config.token))
}

fn coming_soon() -> Response {
    let mut response = Html(COMING_SOON).into_response();
    response
        .headers_mut()
        .insert("x-robots-tag", HeaderValue::from_static("noindex"));
    response
}

/// Middleware serving the placeholder to visitors without the preview cookie
pub async fn preview_gate(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let config = &state.config.preview;
    if !config.enabled
        || OPEN_PATHS.contains(&request.uri().path())
        || has_preview_cookie(request.headers(), config)
    {
        return next.run(request).await;
    }
    coming_soon()
}

/// Exchange the preview token for the preview cookie
pub async fn unlock(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Result<Response, AppError> {
    let config = &state.config.preview;
    if !config.enabled {
        return Ok(redirect_home(None));
    }

    let valid = !config.token.is_empty()
        && query
            .token
            .as_deref()
            .map(|t| tokens_match(t, &config.token))
            .unwrap_or(false);
    if !valid {
        tracing::warn!("Rejected preview token");
        return Err(AppError::NotFound("Not found".to_string()));
    }

    let secure = state.config.site.base_url.starts_with("https://");
    let cookie = Cookie::build((config.cookie_name.clone(), config.token.clone()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::days(config.cookie_max_age_days))
        .build();

    Ok(redirect_home(Some(cookie.to_string())))
}

fn redirect_home(set_cookie: Option<String>) -> Response {
    let mut response = (StatusCode::SEE_OTHER, [(header::LOCATION, "/")]).into_response();
    if let Some(value) = set_cookie.and_then(|c| HeaderValue::from_str(&c).ok()) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}
