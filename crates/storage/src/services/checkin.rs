use chrono::{DateTime, Duration, Utc};

use crate::error::{Result, StorageError};
use crate::models::{AdjustmentOption, Participant};

/// Renders an instant as `YYYY-MM-DD HH:MM JST`. JST is a fixed +9h offset
/// with no DST, so a plain shift is enough.
pub fn format_timestamp_jst(instant: DateTime<Utc>) -> String {
    let local = instant.naive_utc() + Duration::hours(9);
    local.format("%Y-%m-%d %H:%M JST").to_string()
}

/// Transitions a participant to checked-in and produces the single audit
/// line for the event.
///
/// Rejects with `AlreadyCheckedIn` when the latch is already set; a repeat
/// check-in must never touch the timestamp or append a second note. For an
/// adjustment that requires a reason, the reason text and a non-zero custom
/// amount are both required, and the operation is rejected before any state
/// changes.
pub fn check_in(
    participant: &Participant,
    adjustment: &AdjustmentOption,
    custom_delta: i64,
    custom_reason: &str,
    operator_id: &str,
    now: DateTime<Utc>,
) -> Result<(Participant, String)> {
    if participant.checked_in {
        return Err(StorageError::AlreadyCheckedIn);
    }

    let custom_reason = custom_reason.trim();
    if adjustment.requires_reason && (custom_reason.is_empty() || custom_delta == 0) {
        return Err(StorageError::MissingReason);
    }

    let delta = if adjustment.is_other() {
        custom_delta
    } else {
        adjustment.delta_amount
    };

    let reason_label = if adjustment.is_other() {
        format!("その他: {}", custom_reason)
    } else if adjustment.label.is_empty() {
        "チェックイン".to_string()
    } else {
        adjustment.label.clone()
    };

    let note_entry = format!(
        "{} | {} | {:+}円",
        format_timestamp_jst(now),
        reason_label,
        delta
    );

    let mut updated = participant.clone();
    updated.checked_in = true;
    updated.checked_in_at = Some(now);
    updated.checked_in_by = Some(operator_id.to_string());
    updated.append_edit_note(&note_entry);

    Ok((updated, note_entry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant() -> DateTime<Utc> {
        // 2024-06-01 01:15 UTC is 10:15 in JST.
        Utc.with_ymd_and_hms(2024, 6, 1, 1, 15, 0).unwrap()
    }

    #[test]
    fn jst_formatting_shifts_nine_hours() {
        assert_eq!(format_timestamp_jst(instant()), "2024-06-01 10:15 JST");

        // Crossing midnight rolls the date forward.
        let late = Utc.with_ymd_and_hms(2024, 12, 31, 23, 30, 0).unwrap();
        assert_eq!(format_timestamp_jst(late), "2025-01-01 08:30 JST");
    }

    #[test]
    fn check_in_sets_latch_and_appends_one_note() {
        let participant = Participant::new("102");
        let adjustment = AdjustmentOption::new("general_to_bring", "一般→持参 (-1000円)", -1000, false);

        let (updated, note) =
            check_in(&participant, &adjustment, 0, "", "operator-1", instant()).unwrap();

        assert!(updated.checked_in);
        assert_eq!(updated.checked_in_at, Some(instant()));
        assert_eq!(updated.checked_in_by.as_deref(), Some("operator-1"));
        assert_eq!(note, "2024-06-01 10:15 JST | 一般→持参 (-1000円) | -1000円");
        assert_eq!(updated.edit_notes, note);
        assert_eq!(updated.edit_notes.lines().count(), 1);
    }

    #[test]
    fn zero_delta_check_in_still_records_a_line() {
        let participant = Participant::new("101");

        let (updated, note) = check_in(
            &participant,
            &AdjustmentOption::no_change(),
            0,
            "",
            "operator-1",
            instant(),
        )
        .unwrap();

        assert_eq!(note, "2024-06-01 10:15 JST | 変更なし | +0円");
        assert_eq!(updated.edit_notes.lines().count(), 1);
    }

    #[test]
    fn positive_delta_carries_an_explicit_sign() {
        let participant = Participant::new("103");
        let adjustment = AdjustmentOption::new("bring_to_general", "持参→一般 (+1000円)", 1000, false);

        let (_, note) =
            check_in(&participant, &adjustment, 0, "", "operator-1", instant()).unwrap();

        assert!(note.ends_with("| +1000円"));
    }

    #[test]
    fn other_adjustment_uses_reason_and_custom_amount() {
        let participant = Participant::new("104");
        let adjustment = AdjustmentOption::new("other", "その他（理由と金額を入力）", 0, true);

        let (_, note) = check_in(
            &participant,
            &adjustment,
            -500,
            "  遅刻割引  ",
            "operator-1",
            instant(),
        )
        .unwrap();

        assert_eq!(note, "2024-06-01 10:15 JST | その他: 遅刻割引 | -500円");
    }

    #[test]
    fn other_adjustment_requires_both_reason_and_amount() {
        let participant = Participant::new("104");
        let adjustment = AdjustmentOption::new("other", "その他（理由と金額を入力）", 0, true);

        let no_reason = check_in(&participant, &adjustment, -500, "   ", "op", instant());
        assert!(matches!(no_reason, Err(StorageError::MissingReason)));

        let no_amount = check_in(&participant, &adjustment, 0, "割引", "op", instant());
        assert!(matches!(no_amount, Err(StorageError::MissingReason)));
    }

    #[test]
    fn rejected_check_in_leaves_the_participant_untouched() {
        let participant = Participant::new("104");
        let adjustment = AdjustmentOption::new("other", "その他", 0, true);

        let _ = check_in(&participant, &adjustment, 0, "", "op", instant());

        assert!(!participant.checked_in);
        assert!(participant.edit_notes.is_empty());
    }

    #[test]
    fn second_check_in_is_rejected_without_a_new_note() {
        let participant = Participant::new("102");
        let adjustment = AdjustmentOption::no_change();

        let (checked_in, _) =
            check_in(&participant, &adjustment, 0, "", "operator-1", instant()).unwrap();

        let again = check_in(&checked_in, &adjustment, 0, "", "operator-2", instant());
        assert!(matches!(again, Err(StorageError::AlreadyCheckedIn)));
        assert_eq!(checked_in.edit_notes.lines().count(), 1);
        assert_eq!(checked_in.checked_in_by.as_deref(), Some("operator-1"));
    }
}
