use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::PricingConfig;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PricingResponse {
    pub pricing_config: PricingConfig,
    /// "stored" when the tournament row exists, "default" otherwise.
    pub source: &'static str,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePricingRequest {
    #[validate(nested)]
    pub pricing_config: PricingConfig,
    pub name: Option<String>,
}
