use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use safari_core::admin::{CampaignDraft, EmailCampaign};
use safari_core::{ListQuery, Page};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::extract::{AppJson, AppQuery};
use crate::state::AppState;

/// GET /api/admin/campaigns
pub async fn list_campaigns(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Result<Json<Page<EmailCampaign>>, AppError> {
    Ok(Json(state.campaigns.list_campaigns(&query).await?))
}

/// POST /api/admin/campaigns
pub async fn create_campaign(
    State(state): State<AppState>,
    AppJson(draft): AppJson<CampaignDraft>,
) -> Result<(StatusCode, Json<EmailCampaign>), AppError> {
    draft.validate()?;
    let campaign = state.campaigns.create_campaign(&draft).await?;
    info!("Campaign {} created ({})", campaign.id, campaign.status);
    Ok((StatusCode::CREATED, Json(campaign)))
}

/// PUT /api/admin/campaigns/{id}
pub async fn update_campaign(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(draft): AppJson<CampaignDraft>,
) -> Result<Json<EmailCampaign>, AppError> {
    draft.validate()?;
    let campaign = state.campaigns.update_campaign(id, &draft).await?;
    info!("Campaign {} updated ({})", id, campaign.status);
    Ok(Json(campaign))
}

/// DELETE /api/admin/campaigns/{id}
pub async fn delete_campaign(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    state.campaigns.delete_campaign(id).await?;
    info!("Campaign {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}
