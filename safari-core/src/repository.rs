use async_trait::async_trait;
use uuid::Uuid;

use crate::admin::{
    CampaignDraft, Comment, CommentStatus, EmailCampaign, GalleryImage, NewGalleryImage, User,
};
use crate::booking::{Booking, BookingStatus};
use crate::pagination::{ListQuery, Page};
use crate::tour::Tour;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Storage backend failure: {0}")]
    Backend(String),
}

impl RepositoryError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Tour catalogue access
#[async_trait]
pub trait TourRepository: Send + Sync {
    /// Active tours in catalogue order.
    async fn list_tours(&self) -> RepositoryResult<Vec<Tour>>;

    async fn get_tour(&self, slug: &str) -> RepositoryResult<Option<Tour>>;
}

/// Booking persistence
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Fails with `Conflict` when the booking reference is already taken.
    async fn create_booking(&self, booking: &Booking) -> RepositoryResult<Booking>;

    async fn get_booking(&self, id: Uuid) -> RepositoryResult<Option<Booking>>;

    async fn list_bookings(&self, query: &ListQuery) -> RepositoryResult<Page<Booking>>;

    /// Moves the booking from `expected` to `next`. Fails with `Conflict`
    /// when the stored status is no longer `expected`.
    async fn update_status(&self, id: Uuid, expected: BookingStatus, next: BookingStatus) -> RepositoryResult<Booking>;

    /// `update_status` for every `(id, expected)` pair as one unit: a single
    /// mismatch and nothing is written.
    async fn update_statuses(
        &self,
        changes: &[(Uuid, BookingStatus)],
        next: BookingStatus,
    ) -> RepositoryResult<Vec<Booking>>;

    async fn delete_booking(&self, id: Uuid) -> RepositoryResult<()>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn list_comments(&self, query: &ListQuery) -> RepositoryResult<Page<Comment>>;

    async fn set_comment_status(&self, id: Uuid, status: CommentStatus) -> RepositoryResult<Comment>;

    async fn delete_comment(&self, id: Uuid) -> RepositoryResult<()>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list_users(&self, query: &ListQuery) -> RepositoryResult<Page<User>>;

    async fn set_user_locked(&self, id: Uuid, locked: bool) -> RepositoryResult<User>;

    /// Replaces the credential with `temporary_password` and flags the account
    /// for a forced change on next sign-in.
    async fn reset_password(&self, id: Uuid, temporary_password: &str) -> RepositoryResult<User>;

    async fn delete_user(&self, id: Uuid) -> RepositoryResult<()>;
}

#[async_trait]
pub trait GalleryRepository: Send + Sync {
    async fn list_images(&self, query: &ListQuery) -> RepositoryResult<Page<GalleryImage>>;

    async fn save_image(&self, image: NewGalleryImage) -> RepositoryResult<GalleryImage>;

    async fn delete_image(&self, id: Uuid) -> RepositoryResult<()>;
}

#[async_trait]
pub trait CampaignRepository: Send + Sync {
    async fn list_campaigns(&self, query: &ListQuery) -> RepositoryResult<Page<EmailCampaign>>;

    async fn create_campaign(&self, draft: &CampaignDraft) -> RepositoryResult<EmailCampaign>;

    async fn update_campaign(&self, id: Uuid, draft: &CampaignDraft) -> RepositoryResult<EmailCampaign>;

    async fn delete_campaign(&self, id: Uuid) -> RepositoryResult<()>;
}
