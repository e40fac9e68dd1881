//! Festivals service: listing, map, detail, facets and calendar export

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    browse::{self, FacetCount},
    config::{BrowseConfig, MapConfig},
    error::AppResult,
    models::{
        festival::{Festival, MapMarker, ProgramItem},
        filter::{Filter, PageQuery},
    },
    repository::FestivalStore,
};

/// Upper bound on festivals scanned for facet counts
const FACET_SCAN_LIMIT: i64 = 5000;

/// One page of the festival list
#[derive(Debug, Serialize, ToSchema)]
pub struct FestivalPage {
    pub festivals: Vec<Festival>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
    /// Filter after the default policy was applied
    pub filter: Filter,
    /// Canonical query string of `filter`
    pub query: String,
}

/// Festival with its program
#[derive(Debug, Serialize, ToSchema)]
pub struct FestivalDetail {
    pub festival: Festival,
    pub program: Vec<ProgramItem>,
}

/// Facet counts over the filtered result set
#[derive(Debug, Serialize, ToSchema)]
pub struct Facets {
    pub categories: Vec<FacetCount>,
    pub cities: Vec<FacetCount>,
    pub upcoming_months: Vec<FacetCount>,
}

#[derive(Clone)]
pub struct FestivalsService {
    store: Arc<dyn FestivalStore>,
    browse: BrowseConfig,
    map: MapConfig,
}

impl FestivalsService {
    pub fn new(store: Arc<dyn FestivalStore>, browse: BrowseConfig, map: MapConfig) -> Self {
        Self { store, browse, map }
    }

    /// Paginated list. Without any date bound only festivals still running on
    /// `today` or later are listed.
    pub async fn list(&self, filter: Filter, page: &PageQuery, today: NaiveDate) -> AppResult<FestivalPage> {
        let filter = browse::with_default_filters(filter);
        let (page, per_page) = page.resolve(self.browse.default_page_size, self.browse.max_page_size);

        let mut store_filter = filter.clone();
        if store_filter.from.is_none() && store_filter.to.is_none() {
            store_filter.from = Some(today);
        }

        let (festivals, total) = self.store.list(&store_filter, page, per_page).await?;
        let total_pages = (total + per_page - 1) / per_page;

        Ok(FestivalPage {
            festivals,
            total,
            page,
            per_page,
            total_pages,
            query: browse::encode(&filter),
            filter,
        })
    }

    /// Map markers for festivals that have coordinates
    pub async fn map_markers(&self, filter: Filter, today: NaiveDate) -> AppResult<Vec<MapMarker>> {
        let mut filter = browse::with_default_filters(filter);
        if filter.from.is_none() && filter.to.is_none() {
            filter.from = Some(today);
        }
        let festivals = self
            .store
            .list_all(&filter, self.map.max_markers as i64)
            .await?;
        let markers: Vec<MapMarker> = festivals.iter().filter_map(MapMarker::from_festival).collect();
        tracing::debug!(
            fetched = festivals.len(),
            markers = markers.len(),
            "built map markers"
        );
        Ok(markers)
    }

    /// Festival with its program
    pub async fn detail(&self, slug: &str) -> AppResult<FestivalDetail> {
        let festival = self.store.get_by_slug(slug).await?;
        let program = self.store.list_program(festival.id).await?;
        Ok(FestivalDetail { festival, program })
    }

    /// iCalendar file for one festival
    pub async fn calendar_file(&self, slug: &str, now: DateTime<Utc>, uid_domain: &str) -> AppResult<String> {
        let festival = self.store.get_by_slug(slug).await?;
        if festival.start_date.is_none() {
            tracing::warn!(slug, "exporting undated festival, DTSTART falls back to today");
        }
        Ok(browse::ics::serialize(&festival, now, uid_domain))
    }

    /// Category, city and upcoming-month counts
    pub async fn facets(&self, filter: Filter, today: NaiveDate) -> AppResult<Facets> {
        let filter = browse::with_default_filters(filter);
        let festivals = self.store.list_all(&filter, FACET_SCAN_LIMIT).await?;
        Ok(Facets {
            categories: browse::aggregate_categories(&festivals),
            cities: browse::aggregate_cities(&festivals),
            upcoming_months: browse::aggregate_upcoming_months(
                &festivals,
                today,
                self.browse.upcoming_months,
            ),
        })
    }
}
