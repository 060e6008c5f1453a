use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Sentinel key for the free-form adjustment: the operator must supply a
/// custom reason and a custom signed amount instead of `delta_amount`.
pub const OTHER_ADJUSTMENT_KEY: &str = "other";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentOption {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub delta_amount: i64,
    #[serde(default)]
    pub requires_reason: bool,
}

impl AdjustmentOption {
    pub fn new(key: &str, label: &str, delta_amount: i64, requires_reason: bool) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            delta_amount,
            requires_reason,
        }
    }

    /// The default "no change" option used for dashboard recomputation.
    pub fn no_change() -> Self {
        Self::new("none", "変更なし", 0, false)
    }

    pub fn is_other(&self) -> bool {
        self.key == OTHER_ADJUSTMENT_KEY
    }
}

/// Per-tournament fee configuration. Created with defaults on first access,
/// mutated only by explicit organizer edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfig {
    #[validate(range(min = 0))]
    pub general_fee: i64,
    #[validate(range(min = 0))]
    pub bring_console_fee: i64,
    #[validate(range(min = 0))]
    pub student_fixed_fee: i64,
    pub adjustment_options: Vec<AdjustmentOption>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            general_fee: 4000,
            bring_console_fee: 3000,
            student_fixed_fee: 1000,
            adjustment_options: Self::default_adjustment_options(),
        }
    }
}

impl PricingConfig {
    pub fn default_adjustment_options() -> Vec<AdjustmentOption> {
        vec![
            AdjustmentOption::no_change(),
            AdjustmentOption::new("general_to_bring", "一般→持参 (-1000円)", -1000, false),
            AdjustmentOption::new("bring_to_general", "持参→一般 (+1000円)", 1000, false),
            AdjustmentOption::new("student_general", "学割（一般）(-3000円)", -3000, false),
            AdjustmentOption::new("student_bring", "学割（持参）(-2000円)", -2000, false),
            AdjustmentOption::new(
                OTHER_ADJUSTMENT_KEY,
                "その他（理由と金額を入力）",
                0,
                true,
            ),
        ]
    }

    /// Drops options with an empty key or label; an empty option list falls
    /// back to the defaults so a kiosk never ends up without choices.
    pub fn normalized(mut self) -> Self {
        self.adjustment_options
            .retain(|opt| !opt.key.is_empty() && !opt.label.is_empty());

        if self.adjustment_options.is_empty() {
            self.adjustment_options = Self::default_adjustment_options();
        }

        self
    }

    pub fn find_adjustment(&self, key: &str) -> Option<&AdjustmentOption> {
        self.adjustment_options.iter().find(|opt| opt.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_other_sentinel() {
        let config = PricingConfig::default();
        let other = config.find_adjustment(OTHER_ADJUSTMENT_KEY).unwrap();

        assert!(other.requires_reason);
        assert_eq!(other.delta_amount, 0);
        assert_eq!(config.student_fixed_fee, 1000);
        assert_eq!(config.adjustment_options.len(), 6);
    }

    #[test]
    fn normalized_drops_unnamed_options() {
        let mut config = PricingConfig::default();
        config
            .adjustment_options
            .push(AdjustmentOption::new("", "nameless", -500, false));
        config
            .adjustment_options
            .push(AdjustmentOption::new("unlabeled", "", -500, false));

        let normalized = config.normalized();
        assert_eq!(normalized.adjustment_options.len(), 6);
    }

    #[test]
    fn normalized_restores_defaults_when_emptied() {
        let config = PricingConfig {
            adjustment_options: vec![AdjustmentOption::new("", "", 0, false)],
            ..PricingConfig::default()
        };

        let normalized = config.normalized();
        assert_eq!(
            normalized.adjustment_options,
            PricingConfig::default_adjustment_options()
        );
    }

    #[test]
    fn camel_case_round_trip() {
        let config = PricingConfig::default();
        let json = serde_json::to_value(&config).unwrap();

        assert!(json.get("studentFixedFee").is_some());
        assert!(json["adjustmentOptions"][1].get("deltaAmount").is_some());

        let back: PricingConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }
}
