use async_trait::async_trait;
use rust_decimal::Decimal;
use safari_core::repository::TourRepository;
use safari_core::{RepositoryResult, Tour};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::db_error;

pub struct PgTourRepository {
    pool: PgPool,
}

impl PgTourRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TourRow {
    id: Uuid,
    slug: String,
    title: String,
    location: String,
    description: String,
    short_description: String,
    highlights: Vec<String>,
    price: Decimal,
    duration_days: i32,
    image: String,
    is_active: bool,
}

impl From<TourRow> for Tour {
    fn from(row: TourRow) -> Self {
        Tour {
            id: row.id,
            slug: row.slug,
            title: row.title,
            location: row.location,
            description: row.description,
            short_description: row.short_description,
            highlights: row.highlights,
            price: row.price,
            duration_days: row.duration_days.max(0) as u32,
            image: row.image,
            is_active: row.is_active,
        }
    }
}

const TOUR_COLUMNS: &str =
    "id, slug, title, location, description, short_description, highlights, price, duration_days, image, is_active";

#[async_trait]
impl TourRepository for PgTourRepository {
    async fn list_tours(&self) -> RepositoryResult<Vec<Tour>> {
        let rows: Vec<TourRow> = sqlx::query_as(&format!(
            "SELECT {} FROM tours WHERE is_active ORDER BY position, title",
            TOUR_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Tour::from).collect())
    }

    async fn get_tour(&self, slug: &str) -> RepositoryResult<Option<Tour>> {
        let row: Option<TourRow> = sqlx::query_as(&format!(
            "SELECT {} FROM tours WHERE slug = $1 AND is_active",
            TOUR_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Tour::from))
    }
}
