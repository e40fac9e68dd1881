//! Festival endpoints: list, map, detail, ICS export and facets

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    browse::ics,
    error::AppResult,
    models::{
        festival::{Festival, MapMarker, ProgramItem},
        filter::{Filter, PageQuery},
    },
    services::{
        festivals::{Facets, FestivalPage},
        seo::PageMetadata,
    },
    AppState,
};

use super::{check_slug, BrowseFilter};

/// Paginated festivals response
#[derive(Serialize, ToSchema)]
pub struct FestivalsListResponse {
    pub festivals: Vec<Festival>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
    /// Effective filter (defaults applied)
    pub filter: Filter,
    /// Canonical query string of the effective filter
    pub query: String,
    pub metadata: PageMetadata,
}

impl FestivalsListResponse {
    fn new(page: FestivalPage, metadata: PageMetadata) -> Self {
        Self {
            festivals: page.festivals,
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            total_pages: page.total_pages,
            filter: page.filter,
            query: page.query,
            metadata,
        }
    }
}

/// Map markers response
#[derive(Serialize, ToSchema)]
pub struct MapResponse {
    pub markers: Vec<MapMarker>,
    pub metadata: PageMetadata,
}

/// Festival detail response
#[derive(Serialize, ToSchema)]
pub struct FestivalResponse {
    pub festival: Festival,
    pub program: Vec<ProgramItem>,
    pub metadata: PageMetadata,
}

/// List festivals with filters and pagination
#[utoipa::path(
    get,
    path = "/festivals",
    tag = "festivals",
    params(
        PageQuery,
        ("city" = Option<String>, Query, description = "Comma-separated cities"),
        ("region" = Option<String>, Query, description = "Comma-separated regions"),
        ("cat" = Option<String>, Query, description = "Comma-separated categories"),
        ("from" = Option<String>, Query, description = "Window start (YYYY-MM-DD)"),
        ("to" = Option<String>, Query, description = "Window end (YYYY-MM-DD)"),
        ("free" = Option<String>, Query, description = "1 = free only, 0 = paid only (default 1)"),
        ("sort" = Option<String>, Query, description = "soonest | curated | nearest")
    ),
    responses(
        (status = 200, description = "Festivals list", body = FestivalsListResponse)
    )
)]
pub async fn list_festivals(
    State(state): State<AppState>,
    BrowseFilter(filter): BrowseFilter,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<FestivalsListResponse>> {
    page.validate()?;
    let today = Utc::now().date_naive();
    let result = state.services.festivals.list(filter, &page, today).await?;
    let metadata = state.services.seo.listing_metadata("/festivals", &result.filter);
    Ok(Json(FestivalsListResponse::new(result, metadata)))
}

/// Festivals with coordinates, as map markers
#[utoipa::path(
    get,
    path = "/festivals/map",
    tag = "festivals",
    params(
        ("city" = Option<String>, Query, description = "Comma-separated cities"),
        ("region" = Option<String>, Query, description = "Comma-separated regions"),
        ("cat" = Option<String>, Query, description = "Comma-separated categories"),
        ("from" = Option<String>, Query, description = "Window start (YYYY-MM-DD)"),
        ("to" = Option<String>, Query, description = "Window end (YYYY-MM-DD)"),
        ("free" = Option<String>, Query, description = "1 = free only, 0 = paid only (default 1)")
    ),
    responses(
        (status = 200, description = "Map markers", body = MapResponse)
    )
)]
pub async fn map_markers(
    State(state): State<AppState>,
    BrowseFilter(filter): BrowseFilter,
) -> AppResult<Json<MapResponse>> {
    let metadata = state.services.seo.listing_metadata("/map", &filter);
    let today = Utc::now().date_naive();
    let markers = state.services.festivals.map_markers(filter, today).await?;
    Ok(Json(MapResponse { markers, metadata }))
}

/// Get festival by slug, with its program
#[utoipa::path(
    get,
    path = "/festivals/{slug}",
    tag = "festivals",
    params(("slug" = String, Path, description = "Festival slug")),
    responses(
        (status = 200, description = "Festival details", body = FestivalResponse),
        (status = 308, description = "Redirect to the canonical slug"),
        (status = 404, description = "Festival not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_festival(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    if let Some(canonical) = check_slug(&slug)? {
        return Ok(Redirect::permanent(&format!("/api/v1/festivals/{}", canonical)).into_response());
    }
    let detail = state.services.festivals.detail(&slug).await?;
    let metadata = state.services.seo.festival_metadata(&detail.festival);
    Ok(Json(FestivalResponse {
        festival: detail.festival,
        program: detail.program,
        metadata,
    })
    .into_response())
}

/// Download a festival as an iCalendar file
#[utoipa::path(
    get,
    path = "/festivals/{slug}/calendar.ics",
    tag = "festivals",
    params(("slug" = String, Path, description = "Festival slug")),
    responses(
        (status = 200, description = "iCalendar file", content_type = "text/calendar", body = String),
        (status = 308, description = "Redirect to the canonical slug"),
        (status = 404, description = "Festival not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn festival_ics(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    if let Some(canonical) = check_slug(&slug)? {
        return Ok(Redirect::permanent(&format!(
            "/api/v1/festivals/{}/calendar.ics",
            canonical
        ))
        .into_response());
    }
    let body = state
        .services
        .festivals
        .calendar_file(&slug, Utc::now(), &state.config.site.uid_domain)
        .await?;
    Ok((
        [
            (header::CONTENT_TYPE, ics::CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, ics::content_disposition(&slug)),
        ],
        body,
    )
        .into_response())
}

/// Category, city and upcoming-month counts for the filtered set
#[utoipa::path(
    get,
    path = "/facets",
    tag = "festivals",
    params(
        ("city" = Option<String>, Query, description = "Comma-separated cities"),
        ("region" = Option<String>, Query, description = "Comma-separated regions"),
        ("cat" = Option<String>, Query, description = "Comma-separated categories"),
        ("free" = Option<String>, Query, description = "1 = free only, 0 = paid only (default 1)")
    ),
    responses(
        (status = 200, description = "Facet counts", body = Facets)
    )
)]
pub async fn facets(
    State(state): State<AppState>,
    BrowseFilter(filter): BrowseFilter,
) -> AppResult<Json<Facets>> {
    let today = Utc::now().date_naive();
    let facets = state.services.festivals.facets(filter, today).await?;
    Ok(Json(facets))
}
