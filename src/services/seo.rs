//! SEO metadata, sitemap and robots.txt

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    browse,
    config::SiteConfig,
    error::AppResult,
    models::{
        festival::{Festival, FestivalSlug},
        filter::{Filter, MonthId},
    },
    repository::FestivalStore,
};

const DESCRIPTION_LIMIT: usize = 160;

/// Static pages listed in the sitemap, relative to the site base URL
const STATIC_PAGES: &[&str] = &["/", "/festivals", "/map", "/calendar"];

/// Page-level metadata for HTML head tags
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub canonical_url: String,
    pub og_image: Option<String>,
    /// Open Graph type (`website` or `event`)
    pub og_type: String,
}

#[derive(Clone)]
pub struct SeoService {
    store: Arc<dyn FestivalStore>,
    site: SiteConfig,
    preview_enabled: bool,
}

impl SeoService {
    pub fn new(store: Arc<dyn FestivalStore>, site: SiteConfig, preview_enabled: bool) -> Self {
        Self {
            store,
            site,
            preview_enabled,
        }
    }

    fn absolute(&self, path: &str) -> String {
        format!("{}{}", self.site.base_url.trim_end_matches('/'), path)
    }

    /// Metadata for a listing page (`path` is e.g. `/festivals` or `/map`)
    pub fn listing_metadata(&self, path: &str, filter: &Filter) -> PageMetadata {
        let mut heading = String::from("Festivals");
        if let Some(categories) = filter.categories.as_deref().filter(|c| !c.is_empty()) {
            heading = format!("{} festivals", categories.join(", "));
        }
        if let Some(cities) = filter.cities.as_deref().filter(|c| !c.is_empty()) {
            heading.push_str(&format!(" in {}", cities.join(", ")));
        } else if let Some(regions) = filter.regions.as_deref().filter(|r| !r.is_empty()) {
            heading.push_str(&format!(" in {} region", regions.join(", ")));
        } else {
            heading.push_str(" in Bulgaria");
        }
        if let Some(month) = filter.month {
            heading.push_str(&format!(" ({})", month_label(month)));
        }
        if filter.free == Some(true) {
            heading.push_str(" - free entry");
        }

        let query = browse::encode(filter);
        let canonical_url = if query.is_empty() {
            self.absolute(path)
        } else {
            format!("{}?{}", self.absolute(path), query)
        };

        PageMetadata {
            title: format!("{} | {}", heading, self.site.name),
            description: truncate(
                &format!("{}: dates, program, locations and tickets.", heading),
                DESCRIPTION_LIMIT,
            ),
            canonical_url,
            og_image: self.site.default_og_image.clone(),
            og_type: "website".to_string(),
        }
    }

    /// Metadata for a festival detail page
    pub fn festival_metadata(&self, festival: &Festival) -> PageMetadata {
        let mut title = festival.title.trim().to_string();
        if let Some(city) = festival.city.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            title.push_str(&format!(", {}", city));
        }
        if let Some((start, end)) = festival.date_range() {
            let year = start.format("%Y");
            title.push_str(&format!(" {}", year));
            if start == end {
                title.push_str(&format!(" ({})", start.format("%d.%m")));
            } else {
                title.push_str(&format!(" ({} - {})", start.format("%d.%m"), end.format("%d.%m")));
            }
        }

        let description = festival
            .description
            .as_deref()
            .map(|d| d.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format!("{}: dates, program and location.", festival.title.trim()));

        PageMetadata {
            title: format!("{} | {}", title, self.site.name),
            description: truncate(&description, DESCRIPTION_LIMIT),
            canonical_url: self.absolute(&format!("/festivals/{}", festival.slug)),
            og_image: festival
                .image_url
                .clone()
                .or_else(|| self.site.default_og_image.clone()),
            og_type: "event".to_string(),
        }
    }

    /// sitemap.xml body for the static pages and every visible festival
    pub async fn sitemap(&self) -> AppResult<String> {
        let slugs = self.store.list_slugs().await?;
        tracing::debug!(festivals = slugs.len(), "rendering sitemap");
        Ok(self.render_sitemap(&slugs))
    }

    fn render_sitemap(&self, slugs: &[FestivalSlug]) -> String {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
        );
        for page in STATIC_PAGES {
            xml.push_str(&format!(
                "  <url><loc>{}</loc></url>\n",
                xml_escape(&self.absolute(page))
            ));
        }
        for entry in slugs {
            let loc = xml_escape(&self.absolute(&format!("/festivals/{}", entry.slug)));
            match entry.updated_at {
                Some(updated) => xml.push_str(&format!(
                    "  <url><loc>{}</loc><lastmod>{}</lastmod></url>\n",
                    loc,
                    updated.format("%Y-%m-%d")
                )),
                None => xml.push_str(&format!("  <url><loc>{}</loc></url>\n", loc)),
            }
        }
        xml.push_str("</urlset>\n");
        xml
    }

    /// robots.txt body; everything is disallowed while the preview gate is on
    pub fn robots(&self) -> String {
        if self.preview_enabled {
            return "User-agent: *\nDisallow: /\n".to_string();
        }
        format!(
            "User-agent: *\nAllow: /\nDisallow: /api/\nDisallow: /preview\n\nSitemap: {}\n",
            self.absolute("/sitemap.xml")
        )
    }
}

/// Truncate on a char boundary, appending an ellipsis when shortened
fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let cut: String = text.chars().take(limit.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

fn month_label(month: MonthId) -> String {
    month.first_day().format("%B %Y").to_string()
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
