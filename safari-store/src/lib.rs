pub mod app_config;
pub mod booking_repo;
pub mod campaign_repo;
pub mod comment_repo;
pub mod database;
pub mod gallery_repo;
mod listing;
pub mod memory;
pub mod seed;
pub mod tour_repo;
pub mod user_repo;

pub use app_config::{BusinessRules, Config, StorageBackend};
pub use booking_repo::PgBookingRepository;
pub use campaign_repo::PgCampaignRepository;
pub use comment_repo::PgCommentRepository;
pub use database::DbClient;
pub use gallery_repo::PgGalleryRepository;
pub use memory::MemoryStore;
pub use tour_repo::PgTourRepository;
pub use user_repo::PgUserRepository;
