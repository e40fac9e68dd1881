//! Business logic services

pub mod calendar;
pub mod festivals;
pub mod seo;

use std::sync::Arc;

use crate::{config::AppConfig, repository::FestivalStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn FestivalStore>,
    pub festivals: festivals::FestivalsService,
    pub calendar: calendar::CalendarService,
    pub seo: seo::SeoService,
}

impl Services {
    /// Create all services over the given store
    pub fn new(store: Arc<dyn FestivalStore>, config: &AppConfig) -> Self {
        Self {
            festivals: festivals::FestivalsService::new(
                store.clone(),
                config.browse.clone(),
                config.map.clone(),
            ),
            calendar: calendar::CalendarService::new(store.clone(), config.calendar.clone()),
            seo: seo::SeoService::new(store.clone(), config.site.clone(), config.preview.enabled),
            store,
        }
    }
}
