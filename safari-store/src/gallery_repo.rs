use async_trait::async_trait;
use chrono::{DateTime, Utc};
use safari_core::admin::{GalleryImage, NewGalleryImage};
use safari_core::repository::GalleryRepository;
use safari_core::{ListQuery, Page, RepositoryError, RepositoryResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::db_error;
use crate::listing::ListSpec;

pub struct PgGalleryRepository {
    pool: PgPool,
}

impl PgGalleryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct GalleryRow {
    id: Uuid,
    title: String,
    content_type: String,
    data: Vec<u8>,
    created_at: DateTime<Utc>,
}

impl From<GalleryRow> for GalleryImage {
    fn from(row: GalleryRow) -> Self {
        GalleryImage {
            id: row.id,
            title: row.title,
            content_type: row.content_type,
            data: row.data,
            created_at: row.created_at,
        }
    }
}

const GALLERY_COLUMNS: &str = "id, title, content_type, data, created_at";

const GALLERY_LIST: ListSpec = ListSpec {
    table: "gallery_images",
    columns: GALLERY_COLUMNS,
    search_columns: &["title"],
    status_column: None,
    role_column: None,
    sortable: &["created_at", "title"],
    default_sort: "created_at",
};

#[async_trait]
impl GalleryRepository for PgGalleryRepository {
    async fn list_images(&self, query: &ListQuery) -> RepositoryResult<Page<GalleryImage>> {
        let (rows, total) = GALLERY_LIST.fetch_page::<GalleryRow>(&self.pool, query).await?;
        Ok(Page::new(rows.into_iter().map(GalleryImage::from).collect(), query, total))
    }

    async fn save_image(&self, image: NewGalleryImage) -> RepositoryResult<GalleryImage> {
        let row: GalleryRow = sqlx::query_as(&format!(
            "INSERT INTO gallery_images (id, title, content_type, data) VALUES ($1, $2, $3, $4) RETURNING {}",
            GALLERY_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&image.title)
        .bind(&image.content_type)
        .bind(&image.data)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.into())
    }

    async fn delete_image(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM gallery_images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Gallery image", id));
        }
        Ok(())
    }
}
