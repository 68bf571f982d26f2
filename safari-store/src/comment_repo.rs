use async_trait::async_trait;
use chrono::{DateTime, Utc};
use safari_core::admin::{Comment, CommentStatus};
use safari_core::repository::CommentRepository;
use safari_core::{ListQuery, Page, RepositoryError, RepositoryResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::db_error;
use crate::listing::ListSpec;

pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    tour_id: Option<String>,
    author_name: String,
    author_email: String,
    body: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CommentRow> for Comment {
    type Error = RepositoryError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Ok(Comment {
            id: row.id,
            tour_id: row.tour_id,
            author_name: row.author_name,
            author_email: row.author_email,
            body: row.body,
            status: row
                .status
                .parse()
                .map_err(|e: safari_core::ValidationError| RepositoryError::Backend(e.to_string()))?,
            created_at: row.created_at,
        })
    }
}

const COMMENT_COLUMNS: &str = "id, tour_id, author_name, author_email, body, status, created_at";

const COMMENT_LIST: ListSpec = ListSpec {
    table: "comments",
    columns: COMMENT_COLUMNS,
    search_columns: &["author_name", "author_email", "body"],
    status_column: Some("status"),
    role_column: None,
    sortable: &["created_at", "author_name", "status"],
    default_sort: "created_at",
};

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn list_comments(&self, query: &ListQuery) -> RepositoryResult<Page<Comment>> {
        let (rows, total) = COMMENT_LIST.fetch_page::<CommentRow>(&self.pool, query).await?;
        let items = rows
            .into_iter()
            .map(Comment::try_from)
            .collect::<RepositoryResult<Vec<_>>>()?;
        Ok(Page::new(items, query, total))
    }

    async fn set_comment_status(&self, id: Uuid, status: CommentStatus) -> RepositoryResult<Comment> {
        let row: Option<CommentRow> = sqlx::query_as(&format!(
            "UPDATE comments SET status = $1 WHERE id = $2 RETURNING {}",
            COMMENT_COLUMNS
        ))
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.ok_or_else(|| RepositoryError::not_found("Comment", id))?
            .try_into()
    }

    async fn delete_comment(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Comment", id));
        }
        Ok(())
    }
}
