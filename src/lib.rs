//! Festivals in Bulgaria
//!
//! Read-only discovery server for festivals: list, map and calendar views,
//! festival detail with program, facet counts, ICS export, SEO metadata,
//! sitemap/robots and a preview gate.

use std::sync::Arc;

pub mod api;
pub mod browse;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Build the state over any festival store
    pub fn new(config: AppConfig, store: Arc<dyn repository::FestivalStore>) -> Self {
        let services = services::Services::new(store, &config);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
