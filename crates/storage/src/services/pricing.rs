use crate::models::{AdjustmentOption, Participant, PaymentState, PaymentStatus, PricingConfig};

/// Computes what a participant owes (or is owed) at the desk.
///
/// A non-zero recorded transaction means the roster already reflects a
/// settled payment path, so no base amount is due; otherwise the recorded
/// owed figure is due. The student discount substitutes the fixed student
/// fee for the base amount, it is not subtracted from it. The chosen
/// adjustment then shifts the result by a fixed or custom delta.
///
/// Pure: the dashboard recomputes this for every row on every snapshot.
pub fn compute_payment_status(
    participant: &Participant,
    student_discount: bool,
    adjustment: &AdjustmentOption,
    custom_delta: i64,
    pricing: &PricingConfig,
) -> PaymentStatus {
    let base_due = if participant.payment.total_transaction != 0 {
        0
    } else {
        participant.payment.total_owed
    };

    let student_due = if student_discount {
        pricing.student_fixed_fee
    } else {
        base_due
    };

    let delta = if adjustment.is_other() {
        custom_delta
    } else {
        adjustment.delta_amount
    };

    let amount = student_due + delta;

    if amount > 0 {
        PaymentStatus {
            status: PaymentState::Due,
            amount,
            label: format!("{}円 支払", format_yen(amount)),
        }
    } else if amount < 0 {
        PaymentStatus {
            status: PaymentState::Refund,
            amount: amount.abs(),
            label: format!("{}円 返金", format_yen(amount.abs())),
        }
    } else {
        PaymentStatus {
            status: PaymentState::Prepaid,
            amount: 0,
            label: "支払い不要".to_string(),
        }
    }
}

/// Renders a non-negative amount with thousands separators, e.g. `4,000`.
fn format_yen(amount: i64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}
