pub mod admin;
pub mod booking;
pub mod confirmation;
pub mod pagination;
pub mod repository;
pub mod tour;

pub use booking::{
    Booking, BookingReference, BookingRequest, BookingStatus, CartItem, CustomerInfo, GuestInfo,
    ValidationError,
};
pub use confirmation::ConfirmationPayload;
pub use pagination::{ListQuery, Page, Pagination, SortOrder};
pub use repository::{RepositoryError, RepositoryResult};
pub use tour::Tour;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(#[from] ValidationError),
    #[error("Storage error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

pub type CoreResult<T> = Result<T, CoreError>;
