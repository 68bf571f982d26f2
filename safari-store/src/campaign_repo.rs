use async_trait::async_trait;
use chrono::{DateTime, Utc};
use safari_core::admin::{CampaignDraft, EmailCampaign};
use safari_core::repository::CampaignRepository;
use safari_core::{ListQuery, Page, RepositoryError, RepositoryResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::db_error;
use crate::listing::ListSpec;

pub struct PgCampaignRepository {
    pool: PgPool,
}

impl PgCampaignRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CampaignRow {
    id: Uuid,
    name: String,
    subject: String,
    body: String,
    status: String,
    scheduled_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CampaignRow> for EmailCampaign {
    type Error = RepositoryError;

    fn try_from(row: CampaignRow) -> Result<Self, Self::Error> {
        Ok(EmailCampaign {
            id: row.id,
            name: row.name,
            subject: row.subject,
            body: row.body,
            status: row
                .status
                .parse()
                .map_err(|e: safari_core::ValidationError| RepositoryError::Backend(e.to_string()))?,
            scheduled_at: row.scheduled_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const CAMPAIGN_COLUMNS: &str = "id, name, subject, body, status, scheduled_at, created_at, updated_at";

const CAMPAIGN_LIST: ListSpec = ListSpec {
    table: "email_campaigns",
    columns: CAMPAIGN_COLUMNS,
    search_columns: &["name", "subject"],
    status_column: Some("status"),
    role_column: None,
    sortable: &["created_at", "updated_at", "name", "scheduled_at", "status"],
    default_sort: "created_at",
};

#[async_trait]
impl CampaignRepository for PgCampaignRepository {
    async fn list_campaigns(&self, query: &ListQuery) -> RepositoryResult<Page<EmailCampaign>> {
        let (rows, total) = CAMPAIGN_LIST.fetch_page::<CampaignRow>(&self.pool, query).await?;
        let items = rows
            .into_iter()
            .map(EmailCampaign::try_from)
            .collect::<RepositoryResult<Vec<_>>>()?;
        Ok(Page::new(items, query, total))
    }

    async fn create_campaign(&self, draft: &CampaignDraft) -> RepositoryResult<EmailCampaign> {
        let row: CampaignRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO email_campaigns (id, name, subject, body, status, scheduled_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            CAMPAIGN_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&draft.name)
        .bind(&draft.subject)
        .bind(&draft.body)
        .bind(draft.status().as_str())
        .bind(draft.scheduled_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        row.try_into()
    }

    async fn update_campaign(&self, id: Uuid, draft: &CampaignDraft) -> RepositoryResult<EmailCampaign> {
        let row: Option<CampaignRow> = sqlx::query_as(&format!(
            r#"
            UPDATE email_campaigns
            SET name = $1, subject = $2, body = $3, status = $4, scheduled_at = $5, updated_at = NOW()
            WHERE id = $6 AND status <> 'sent'
            RETURNING {}
            "#,
            CAMPAIGN_COLUMNS
        ))
        .bind(&draft.name)
        .bind(&draft.subject)
        .bind(&draft.body)
        .bind(draft.status().as_str())
        .bind(draft.scheduled_at)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        if let Some(row) = row {
            return row.try_into();
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM email_campaigns WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;
        if exists {
            Err(RepositoryError::Conflict("Sent campaigns cannot be edited".to_string()))
        } else {
            Err(RepositoryError::not_found("Campaign", id))
        }
    }

    async fn delete_campaign(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM email_campaigns WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Campaign", id));
        }
        Ok(())
    }
}
