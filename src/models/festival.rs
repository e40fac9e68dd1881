//! Festival model (read-only projection of the published catalogue)

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Festival record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Festival {
    pub id: Uuid,
    /// URL-safe unique identifier
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Free-form category tag (e.g. "folk", "jazz")
    pub category: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub address: Option<String>,
    /// First day of the festival
    pub start_date: Option<NaiveDate>,
    /// Last day of the festival (inclusive); absent for single-day festivals
    pub end_date: Option<NaiveDate>,
    /// Free entry (NULL = unknown)
    pub is_free: Option<bool>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub website_url: Option<String>,
    pub ticket_url: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Festival {
    /// Inclusive `(start, end)` range with a missing end read as the start
    /// and an end before the start clamped to the start.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let start = self.start_date?;
        let end = self.end_date.unwrap_or(start).max(start);
        Some((start, end))
    }

    /// "address, city" with whichever parts are present
    pub fn location_label(&self) -> Option<String> {
        let parts: Vec<&str> = [self.address.as_deref(), self.city.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some((lat, lng)),
            _ => None,
        }
    }
}

/// One entry of a festival's program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProgramItem {
    pub id: Uuid,
    pub festival_id: Uuid,
    /// Day of the performance
    pub day: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub title: String,
    /// Stage or venue inside the festival
    pub stage: Option<String>,
    pub description: Option<String>,
    /// Editorial order within a day
    pub position: i32,
}

/// Marker for the map view
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MapMarker {
    pub slug: String,
    pub title: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_free: Option<bool>,
}

impl MapMarker {
    pub fn from_festival(festival: &Festival) -> Option<Self> {
        let (latitude, longitude) = festival.coordinates()?;
        Some(Self {
            slug: festival.slug.clone(),
            title: festival.title.clone(),
            latitude,
            longitude,
            city: festival.city.clone(),
            category: festival.category.clone(),
            start_date: festival.start_date,
            end_date: festival.end_date,
            is_free: festival.is_free,
        })
    }
}

/// Sitemap entry
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct FestivalSlug {
    pub slug: String,
    pub updated_at: Option<DateTime<Utc>>,
}
