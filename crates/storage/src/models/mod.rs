pub mod participant;
pub mod payment_status;
pub mod pricing;

pub use participant::{Participant, Payment};
pub use payment_status::{PaymentState, PaymentStatus};
pub use pricing::{AdjustmentOption, PricingConfig, OTHER_ADJUSTMENT_KEY};
