//! Festivals repository (read-only)

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::FestivalStore;
use crate::{
    error::{AppError, AppResult},
    models::{
        festival::{Festival, FestivalSlug, ProgramItem},
        filter::{Filter, SortMode},
    },
};

/// Only verified rows are ever visible
const VISIBLE: &str = "status = 'verified'";

const FESTIVAL_COLUMNS: &str = "id, slug, title, description, image_url, category, city, region, \
     address, start_date, end_date, is_free, latitude, longitude, website_url, ticket_url, updated_at";

/// A value bound to a positional parameter of a filter WHERE clause
#[derive(Debug, Clone, PartialEq)]
enum BindValue {
    Texts(Vec<String>),
    Date(NaiveDate),
    Bool(bool),
}

/// Apply `BindValue`s to a sqlx query builder in order
macro_rules! bind_all {
    ($builder:expr, $binds:expr) => {{
        let mut builder = $builder;
        for value in $binds.iter() {
            builder = match value {
                BindValue::Texts(v) => builder.bind(v.clone()),
                BindValue::Date(d) => builder.bind(*d),
                BindValue::Bool(b) => builder.bind(*b),
            };
        }
        builder
    }};
}

/// Build the WHERE clause for a filter.
///
/// Cities, regions and categories match case-insensitively (any of). The date
/// window keeps festivals whose `[start, end]` overlaps `[from, to]`.
fn where_clause(filter: &Filter) -> (String, Vec<BindValue>) {
    let mut conditions = vec![VISIBLE.to_string()];
    let mut binds = Vec::new();

    let mut push = |sql: &str, value: BindValue| {
        binds.push(value);
        conditions.push(sql.replace("$?", &format!("${}", binds.len())));
    };

    let lowered = |values: &Vec<String>| -> Vec<String> {
        values.iter().map(|v| v.trim().to_lowercase()).collect()
    };

    if let Some(cities) = &filter.cities {
        push("LOWER(city) = ANY($?)", BindValue::Texts(lowered(cities)));
    }
    if let Some(regions) = &filter.regions {
        push("LOWER(region) = ANY($?)", BindValue::Texts(lowered(regions)));
    }
    if let Some(categories) = &filter.categories {
        push("LOWER(category) = ANY($?)", BindValue::Texts(lowered(categories)));
    }
    if let Some(from) = filter.from {
        push(
            "start_date IS NOT NULL AND GREATEST(COALESCE(end_date, start_date), start_date) >= $?",
            BindValue::Date(from),
        );
    }
    if let Some(to) = filter.to {
        push("start_date <= $?", BindValue::Date(to));
    }
    if let Some(free) = filter.free {
        push("is_free = $?", BindValue::Bool(free));
    }

    (format!("WHERE {}", conditions.join(" AND ")), binds)
}

/// ORDER BY for a sort mode.
///
/// `curated` and `nearest` have no ranking data of their own and order like
/// `soonest`.
fn order_clause(sort: SortMode) -> &'static str {
    match sort {
        SortMode::Soonest | SortMode::Curated | SortMode::Nearest => {
            "ORDER BY start_date ASC NULLS LAST, title ASC"
        }
    }
}

#[derive(Clone)]
pub struct FestivalsRepository {
    pool: Pool<Postgres>,
}

/// Row offset of a 1-based page
fn page_offset(page: i64, per_page: i64) -> AppResult<i64> {
    (page.max(1) - 1)
        .checked_mul(per_page.max(1))
        .ok_or_else(|| AppError::BadRequest(format!("page {} is out of range", page)))
}

impl FestivalsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FestivalStore for FestivalsRepository {
    /// List festivals with filters and pagination
    async fn list(&self, filter: &Filter, page: i64, per_page: i64) -> AppResult<(Vec<Festival>, i64)> {
        let offset = page_offset(page, per_page)?;
        let (where_sql, binds) = where_clause(filter);

        let count_q = format!("SELECT COUNT(*) FROM festivals {}", where_sql);
        let count_builder = bind_all!(sqlx::query_scalar::<_, i64>(&count_q), binds);
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_q = format!(
            "SELECT {} FROM festivals {} {} LIMIT {} OFFSET {}",
            FESTIVAL_COLUMNS,
            where_sql,
            order_clause(filter.sort_mode()),
            per_page,
            offset
        );
        let builder = bind_all!(sqlx::query_as::<_, Festival>(&select_q), binds);
        let rows = builder.fetch_all(&self.pool).await?;

        tracing::debug!(total, returned = rows.len(), page, per_page, "listed festivals");
        Ok((rows, total))
    }

    /// Every festival matching the filter, up to `limit`
    async fn list_all(&self, filter: &Filter, limit: i64) -> AppResult<Vec<Festival>> {
        let (where_sql, binds) = where_clause(filter);
        let select_q = format!(
            "SELECT {} FROM festivals {} {} LIMIT {}",
            FESTIVAL_COLUMNS,
            where_sql,
            order_clause(filter.sort_mode()),
            limit
        );
        let builder = bind_all!(sqlx::query_as::<_, Festival>(&select_q), binds);
        let rows = builder.fetch_all(&self.pool).await?;
        if rows.len() as i64 == limit {
            tracing::warn!(limit, "festival result set truncated");
        }
        Ok(rows)
    }

    /// Get festival by slug
    async fn get_by_slug(&self, slug: &str) -> AppResult<Festival> {
        let q = format!(
            "SELECT {} FROM festivals WHERE slug = $1 AND {}",
            FESTIVAL_COLUMNS, VISIBLE
        );
        sqlx::query_as::<_, Festival>(&q)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Festival {} not found", slug)))
    }

    /// Program of a festival, ordered by day, start time, then editorial position
    async fn list_program(&self, festival_id: Uuid) -> AppResult<Vec<ProgramItem>> {
        let rows = sqlx::query_as::<_, ProgramItem>(
            r#"
            SELECT id, festival_id, day, start_time, end_time, title, stage, description, position
            FROM program_items
            WHERE festival_id = $1
            ORDER BY day ASC NULLS LAST, start_time ASC NULLS LAST, position ASC
            "#,
        )
        .bind(festival_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Slugs of all visible festivals (sitemap)
    async fn list_slugs(&self) -> AppResult<Vec<FestivalSlug>> {
        let q = format!(
            "SELECT slug, updated_at FROM festivals WHERE {} ORDER BY slug",
            VISIBLE
        );
        let rows = sqlx::query_as::<_, FestivalSlug>(&q)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
