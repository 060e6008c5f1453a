use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{
    AdjustmentOption, Participant, Payment, PaymentStatus, PricingConfig,
};
use crate::services::pricing::compute_payment_status;

/// A participant as served to the kiosk and dashboard, with the payment
/// status precomputed against the tournament's pricing configuration
/// (no student discount, "no change" adjustment).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResponse {
    pub participant_id: String,
    pub player_name: String,
    pub admin_notes: Option<String>,
    pub payment: Payment,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub checked_in_by: Option<String>,
    pub edit_notes: String,
    pub payment_status: PaymentStatus,
}

impl ParticipantResponse {
    pub fn from_model(participant: Participant, pricing: &PricingConfig) -> Self {
        let payment_status = compute_payment_status(
            &participant,
            false,
            &AdjustmentOption::no_change(),
            0,
            pricing,
        );

        Self {
            participant_id: participant.participant_id,
            player_name: participant.player_name,
            admin_notes: participant.admin_notes,
            payment: participant.payment,
            checked_in: participant.checked_in,
            checked_in_at: participant.checked_in_at,
            checked_in_by: participant.checked_in_by,
            edit_notes: participant.edit_notes,
            payment_status,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ImportRosterRequest {
    /// Raw spreadsheet rows as string cells, header row included.
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportRosterResponse {
    pub ok: bool,
    /// Number of candidate rows processed, not the number of net-new records.
    pub count: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScanRequest {
    /// Decoded QR text or a manually typed identifier.
    pub raw: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScanResponse {
    pub participant: ParticipantResponse,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    #[serde(default = "default_adjustment_key")]
    pub adjustment_key: String,
    #[serde(default)]
    pub custom_delta: i64,
    #[serde(default)]
    pub custom_reason: String,
    /// Falls back to the session's gamer tag, then to "operator".
    #[serde(default)]
    pub operator_user_id: Option<String>,
}

fn default_adjustment_key() -> String {
    "none".to_string()
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInResponse {
    pub ok: bool,
    pub note_entry: String,
    pub participant: ParticipantResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentState;

    #[test]
    fn response_precomputes_the_dashboard_status() {
        let mut participant = Participant::new("102");
        participant.payment.total_owed = 4000;

        let response =
            ParticipantResponse::from_model(participant, &PricingConfig::default());

        assert_eq!(response.payment_status.status, PaymentState::Due);
        assert_eq!(response.payment_status.amount, 4000);
    }

    #[test]
    fn check_in_request_defaults() {
        let req: CheckInRequest = serde_json::from_str("{}").unwrap();

        assert_eq!(req.adjustment_key, "none");
        assert_eq!(req.custom_delta, 0);
        assert!(req.custom_reason.is_empty());
        assert!(req.operator_user_id.is_none());
    }
}
