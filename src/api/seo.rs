//! sitemap.xml and robots.txt

use axum::{extract::State, http::header, response::IntoResponse};

use crate::{error::AppResult, AppState};

/// XML sitemap of static pages and every published festival
#[utoipa::path(
    get,
    path = "/sitemap.xml",
    tag = "seo",
    responses(
        (status = 200, description = "Sitemap", content_type = "application/xml", body = String)
    )
)]
pub async fn sitemap(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let body = state.services.seo.sitemap().await?;
    Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], body))
}

/// robots.txt
#[utoipa::path(
    get,
    path = "/robots.txt",
    tag = "seo",
    responses(
        (status = 200, description = "Crawler rules", content_type = "text/plain", body = String)
    )
)]
pub async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.services.seo.robots(),
    )
}
