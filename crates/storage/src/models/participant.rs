use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use utoipa::ToSchema;

/// Roster payment figures, in whole yen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default)]
    pub total_transaction: i64,
    #[serde(default)]
    pub total_owed: i64,
    #[serde(default)]
    pub total_paid: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub participant_id: String,
    pub player_name: String,
    pub admin_notes: Option<String>,
    pub payment: Payment,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub checked_in_by: Option<String>,
    #[serde(default)]
    pub edit_notes: String,
}

impl Participant {
    pub fn new(participant_id: impl Into<String>) -> Self {
        let participant_id = participant_id.into();
        Self {
            player_name: participant_id.clone(),
            participant_id,
            admin_notes: None,
            payment: Payment::default(),
            checked_in: false,
            checked_in_at: None,
            checked_in_by: None,
            edit_notes: String::new(),
        }
    }

    /// Display name shown at the desk; falls back to the identifier.
    pub fn display_name(&self) -> &str {
        if self.player_name.is_empty() {
            &self.participant_id
        } else {
            &self.player_name
        }
    }

    /// Appends one line to the audit log, newline-delimited.
    pub fn append_edit_note(&mut self, entry: &str) {
        if self.edit_notes.is_empty() {
            self.edit_notes = entry.to_string();
        } else {
            self.edit_notes.push('\n');
            self.edit_notes.push_str(entry);
        }
    }
}

impl FromRow<'_, PgRow> for Participant {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            participant_id: row.try_get("participant_id")?,
            player_name: row.try_get("player_name")?,
            admin_notes: row.try_get("admin_notes")?,
            payment: Payment {
                total_transaction: row.try_get("total_transaction")?,
                total_owed: row.try_get("total_owed")?,
                total_paid: row.try_get("total_paid")?,
            },
            checked_in: row.try_get("checked_in")?,
            checked_in_at: row.try_get("checked_in_at")?,
            checked_in_by: row.try_get("checked_in_by")?,
            edit_notes: row.try_get("edit_notes")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_id() {
        let mut p = Participant::new("00102");
        assert_eq!(p.display_name(), "00102");

        p.player_name = "Luna".to_string();
        assert_eq!(p.display_name(), "Luna");

        p.player_name = String::new();
        assert_eq!(p.display_name(), "00102");
    }

    #[test]
    fn append_edit_note_is_newline_delimited() {
        let mut p = Participant::new("101");
        p.append_edit_note("first");
        assert_eq!(p.edit_notes, "first");

        p.append_edit_note("second");
        assert_eq!(p.edit_notes, "first\nsecond");
    }
}
