//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{calendar, festivals, health, seo};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Festivals API",
        version = "1.0.0",
        description = "Festivals in Bulgaria - read-only discovery API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Festivals
        festivals::list_festivals,
        festivals::map_markers,
        festivals::get_festival,
        festivals::festival_ics,
        festivals::facets,
        // Calendar
        calendar::current_month,
        calendar::month,
        // SEO (served at the site root)
        seo::sitemap,
        seo::robots,
    ),
    components(
        schemas(
            // Festivals
            crate::models::festival::Festival,
            crate::models::festival::ProgramItem,
            crate::models::festival::MapMarker,
            crate::models::filter::Filter,
            crate::models::filter::SortMode,
            crate::models::filter::PageQuery,
            crate::browse::FacetCount,
            crate::services::festivals::Facets,
            crate::services::seo::PageMetadata,
            festivals::FestivalsListResponse,
            festivals::MapResponse,
            festivals::FestivalResponse,
            // Calendar
            crate::services::calendar::CalendarEntry,
            crate::services::calendar::CalendarMonth,
            calendar::CalendarResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "festivals", description = "Festival listing, map, detail and export"),
        (name = "calendar", description = "Calendar month view"),
        (name = "seo", description = "Sitemap and robots")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
