use async_trait::async_trait;
use chrono::{DateTime, Utc};
use safari_core::admin::User;
use safari_core::repository::UserRepository;
use safari_core::{ListQuery, Page, RepositoryError, RepositoryResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::db_error;
use crate::listing::ListSpec;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    role: String,
    is_locked: bool,
    password_reset_required: bool,
    created_at: DateTime<Utc>,
    last_login_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row
                .role
                .parse()
                .map_err(|e: safari_core::ValidationError| RepositoryError::Backend(e.to_string()))?,
            is_locked: row.is_locked,
            password_reset_required: row.password_reset_required,
            created_at: row.created_at,
            last_login_at: row.last_login_at,
        })
    }
}

// password_hash is never selected
const USER_COLUMNS: &str =
    "id, name, email, role, is_locked, password_reset_required, created_at, last_login_at";

const USER_LIST: ListSpec = ListSpec {
    table: "users",
    columns: USER_COLUMNS,
    search_columns: &["name", "email"],
    status_column: None,
    role_column: Some("role"),
    sortable: &["created_at", "name", "email", "role", "last_login_at"],
    default_sort: "created_at",
};

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list_users(&self, query: &ListQuery) -> RepositoryResult<Page<User>> {
        let (rows, total) = USER_LIST.fetch_page::<UserRow>(&self.pool, query).await?;
        let items = rows
            .into_iter()
            .map(User::try_from)
            .collect::<RepositoryResult<Vec<_>>>()?;
        Ok(Page::new(items, query, total))
    }

    async fn set_user_locked(&self, id: Uuid, locked: bool) -> RepositoryResult<User> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "UPDATE users SET is_locked = $1 WHERE id = $2 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(locked)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.ok_or_else(|| RepositoryError::not_found("User", id))?
            .try_into()
    }

    async fn reset_password(&self, id: Uuid, temporary_password: &str) -> RepositoryResult<User> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "UPDATE users SET password_hash = crypt($1, gen_salt('bf')), password_reset_required = TRUE WHERE id = $2 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(temporary_password)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.ok_or_else(|| RepositoryError::not_found("User", id))?
            .try_into()
    }

    async fn delete_user(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("User", id));
        }
        Ok(())
    }
}
