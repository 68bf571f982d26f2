pub mod pricing;
pub mod search;
pub mod tuition;

pub use pricing::{PriceBreakdown, PricingConfig, PricingEngine};
pub use search::{TourSearch, DEFAULT_RESULT_LIMIT};
pub use tuition::{FeeLine, ProgrammeLevel, TuitionCalculator, TuitionEstimate, TuitionError};
