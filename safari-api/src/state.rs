use safari_catalog::{PricingConfig, PricingEngine};
use safari_core::repository::{
    BookingRepository, CampaignRepository, CommentRepository, GalleryRepository, TourRepository,
    UserRepository,
};
use safari_shared::models::BookingEvent;
use safari_store::{
    BusinessRules, DbClient, MemoryStore, PgBookingRepository, PgCampaignRepository,
    PgCommentRepository, PgGalleryRepository, PgTourRepository, PgUserRepository,
};
use std::sync::Arc;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct AppState {
    pub tours: Arc<dyn TourRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub users: Arc<dyn UserRepository>,
    pub gallery: Arc<dyn GalleryRepository>,
    pub campaigns: Arc<dyn CampaignRepository>,
    pub pricing: PricingEngine,
    pub business_rules: BusinessRules,
    pub events: broadcast::Sender<BookingEvent>,
}

impl AppState {
    pub fn postgres(db: &DbClient, business_rules: BusinessRules, events: broadcast::Sender<BookingEvent>) -> Self {
        let pool = db.pool.clone();
        Self {
            tours: Arc::new(PgTourRepository::new(pool.clone())),
            bookings: Arc::new(PgBookingRepository::new(pool.clone())),
            comments: Arc::new(PgCommentRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
            gallery: Arc::new(PgGalleryRepository::new(pool.clone())),
            campaigns: Arc::new(PgCampaignRepository::new(pool)),
            pricing: pricing_engine(&business_rules),
            business_rules,
            events,
        }
    }

    pub fn in_memory(store: Arc<MemoryStore>, business_rules: BusinessRules, events: broadcast::Sender<BookingEvent>) -> Self {
        Self {
            tours: store.clone(),
            bookings: store.clone(),
            comments: store.clone(),
            users: store.clone(),
            gallery: store.clone(),
            campaigns: store,
            pricing: pricing_engine(&business_rules),
            business_rules,
            events,
        }
    }

    /// Fire-and-forget; having no subscriber is not an error.
    pub fn publish(&self, event: BookingEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("No event subscribers");
        }
    }
}

fn pricing_engine(rules: &BusinessRules) -> PricingEngine {
    PricingEngine::new(PricingConfig {
        tax_rate: rules.tax_rate,
        currency: rules.currency.clone(),
    })
}
