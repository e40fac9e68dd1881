//! Calendar view endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    browse::query,
    error::{AppError, AppResult},
    models::filter::{Filter, MonthId},
    services::{calendar::CalendarMonth, seo::PageMetadata},
    AppState,
};

use super::BrowseFilter;

/// Calendar month response
#[derive(Serialize, ToSchema)]
pub struct CalendarResponse {
    #[serde(flatten)]
    pub calendar: CalendarMonth,
    pub metadata: PageMetadata,
}

/// Calendar for `?month=yyyy-mm`, or the current month
#[utoipa::path(
    get,
    path = "/calendar",
    tag = "calendar",
    params(
        ("month" = Option<String>, Query, description = "Month (yyyy-mm), defaults to the current month"),
        ("city" = Option<String>, Query, description = "Comma-separated cities"),
        ("region" = Option<String>, Query, description = "Comma-separated regions"),
        ("cat" = Option<String>, Query, description = "Comma-separated categories"),
        ("free" = Option<String>, Query, description = "1 = free only, 0 = paid only (default 1)")
    ),
    responses(
        (status = 200, description = "Calendar month", body = CalendarResponse)
    )
)]
pub async fn current_month(
    State(state): State<AppState>,
    BrowseFilter(filter): BrowseFilter,
) -> AppResult<Json<CalendarResponse>> {
    let month = filter
        .month
        .unwrap_or_else(|| MonthId::of(Utc::now().date_naive()));
    render(state, filter, month).await
}

/// Calendar for a month given in the path
#[utoipa::path(
    get,
    path = "/calendar/{month}",
    tag = "calendar",
    params(("month" = String, Path, description = "Month (yyyy-mm)")),
    responses(
        (status = 200, description = "Calendar month", body = CalendarResponse),
        (status = 404, description = "Malformed month", body = crate::error::ErrorResponse)
    )
)]
pub async fn month(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    BrowseFilter(filter): BrowseFilter,
) -> AppResult<Json<CalendarResponse>> {
    let month = query::parse_month(&raw).ok_or_else(|| {
        tracing::warn!(month = %raw, "rejected malformed calendar month");
        AppError::NotFound(format!("Month {} not found", raw))
    })?;
    render(state, filter, month).await
}

async fn render(
    state: AppState,
    filter: Filter,
    month: MonthId,
) -> AppResult<Json<CalendarResponse>> {
    let calendar = state.services.calendar.month(filter.clone(), month).await?;
    let metadata_filter = Filter {
        month: Some(month),
        ..filter
    };
    let metadata = state
        .services
        .seo
        .listing_metadata("/calendar", &metadata_filter);
    Ok(Json(CalendarResponse { calendar, metadata }))
}
