use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    /// The participant must pay `amount` at the desk.
    Due,
    /// The operator must refund `amount`.
    Refund,
    /// Nothing changes hands.
    Prepaid,
}

/// Result of the fee calculation for one participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaymentStatus {
    pub status: PaymentState,
    /// Always non-negative; the direction is carried by `status`.
    pub amount: i64,
    pub label: String,
}
