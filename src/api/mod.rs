//! HTTP handlers and router

pub mod calendar;
pub mod festivals;
pub mod health;
pub mod openapi;
pub mod preview;
pub mod seo;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    middleware,
    routing::get,
    Router,
};
use std::convert::Infallible;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{browse, error::AppError, models::filter::Filter, AppState};

/// Extractor decoding the browse [`Filter`] from the request query string
pub struct BrowseFilter(pub Filter);

#[async_trait]
impl<S> FromRequestParts<S> for BrowseFilter
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let filter = parts
            .uri
            .query()
            .map(browse::decode_query_string)
            .unwrap_or_default();
        Ok(BrowseFilter(filter))
    }
}

/// Check a slug path segment before touching the store.
///
/// `Ok(None)`: canonical, go ahead. `Ok(Some(slug))`: redirect to the
/// canonical slug. Segments with no slug form are rejected as not found.
pub(crate) fn check_slug(slug: &str) -> Result<Option<String>, AppError> {
    if browse::is_valid_slug(slug) {
        return Ok(None);
    }
    match browse::canonical_slug(slug) {
        Some(canonical) => {
            tracing::debug!(slug, %canonical, "redirecting to canonical slug");
            Ok(Some(canonical))
        }
        None => {
            tracing::warn!(slug, "rejected malformed slug");
            Err(AppError::NotFound(format!("Festival {} not found", slug)))
        }
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Festivals
        .route("/festivals", get(festivals::list_festivals))
        .route("/festivals/map", get(festivals::map_markers))
        .route("/festivals/:slug", get(festivals::get_festival))
        .route("/festivals/:slug/calendar.ics", get(festivals::festival_ics))
        .route("/facets", get(festivals::facets))
        // Calendar
        .route("/calendar", get(calendar::current_month))
        .route("/calendar/:month", get(calendar::month))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    let site = Router::new()
        .route("/robots.txt", get(seo::robots))
        .route("/sitemap.xml", get(seo::sitemap))
        .route("/preview", get(preview::unlock))
        .with_state(state.clone());

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(site)
        .merge(openapi)
        .layer(middleware::from_fn_with_state(state, preview::preview_gate))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
