use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::{Result, StorageError};
use crate::models::{AdjustmentOption, Participant};
use crate::services::checkin;

const PARTICIPANT_COLUMNS: &str = "participant_id, player_name, admin_notes, \
     total_transaction, total_owed, total_paid, \
     checked_in, checked_in_at, checked_in_by, edit_notes";

pub struct ParticipantRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ParticipantRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Lists a tournament's participants ordered by identifier.
    pub async fn list(&self, tournament_id: &str) -> Result<Vec<Participant>> {
        let participants = sqlx::query_as::<_, Participant>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants \
             WHERE tournament_id = $1 ORDER BY participant_id"
        ))
        .bind(tournament_id)
        .fetch_all(self.pool)
        .await?;

        Ok(participants)
    }

    pub async fn find(&self, tournament_id: &str, participant_id: &str) -> Result<Participant> {
        let participant = sqlx::query_as::<_, Participant>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants \
             WHERE tournament_id = $1 AND participant_id = $2"
        ))
        .bind(tournament_id)
        .bind(participant_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(participant)
    }

    /// Merges roster candidates into the stored set in one transaction.
    ///
    /// Candidate fields overwrite stored ones, except that `checked_in` is a
    /// one-way latch: once a stored row is checked in, no import may reset
    /// it, and its check-in timestamp and operator are preserved. A stored
    /// audit log is kept when the candidate carries none.
    pub async fn merge_candidates(
        &self,
        tournament_id: &str,
        candidates: &[Participant],
    ) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        for candidate in candidates {
            sqlx::query(
                r#"
                INSERT INTO participants
                    (tournament_id, participant_id, player_name, admin_notes,
                     total_transaction, total_owed, total_paid,
                     checked_in, checked_in_at, checked_in_by, edit_notes, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8,
                        COALESCE($9, CASE WHEN $8 THEN CURRENT_TIMESTAMP END),
                        $10, $11, CURRENT_TIMESTAMP)
                ON CONFLICT (tournament_id, participant_id) DO UPDATE SET
                    player_name = EXCLUDED.player_name,
                    admin_notes = EXCLUDED.admin_notes,
                    total_transaction = EXCLUDED.total_transaction,
                    total_owed = EXCLUDED.total_owed,
                    total_paid = EXCLUDED.total_paid,
                    checked_in = participants.checked_in OR EXCLUDED.checked_in,
                    checked_in_at = CASE
                        WHEN participants.checked_in THEN participants.checked_in_at
                        ELSE EXCLUDED.checked_in_at
                    END,
                    checked_in_by = CASE
                        WHEN participants.checked_in THEN participants.checked_in_by
                        ELSE EXCLUDED.checked_in_by
                    END,
                    edit_notes = CASE
                        WHEN EXCLUDED.edit_notes <> '' THEN EXCLUDED.edit_notes
                        ELSE participants.edit_notes
                    END,
                    updated_at = CURRENT_TIMESTAMP
                "#,
            )
            .bind(tournament_id)
            .bind(&candidate.participant_id)
            .bind(&candidate.player_name)
            .bind(&candidate.admin_notes)
            .bind(candidate.payment.total_transaction)
            .bind(candidate.payment.total_owed)
            .bind(candidate.payment.total_paid)
            .bind(candidate.checked_in)
            .bind(candidate.checked_in_at)
            .bind(&candidate.checked_in_by)
            .bind(&candidate.edit_notes)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(candidates.len())
    }

    /// Runs the check-in transition inside a row-locked transaction so two
    /// concurrent attempts serialize: one succeeds, the other sees the latch
    /// and gets `AlreadyCheckedIn`.
    #[allow(clippy::too_many_arguments)]
    pub async fn check_in(
        &self,
        tournament_id: &str,
        participant_id: &str,
        adjustment: &AdjustmentOption,
        custom_delta: i64,
        custom_reason: &str,
        operator_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(Participant, String)> {
        let mut tx = self.pool.begin().await?;

        let participant = sqlx::query_as::<_, Participant>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants \
             WHERE tournament_id = $1 AND participant_id = $2 FOR UPDATE"
        ))
        .bind(tournament_id)
        .bind(participant_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound)?;

        let (updated, note_entry) = checkin::check_in(
            &participant,
            adjustment,
            custom_delta,
            custom_reason,
            operator_id,
            now,
        )?;

        sqlx::query(
            "UPDATE participants \
             SET checked_in = TRUE, checked_in_at = $3, checked_in_by = $4, \
                 edit_notes = $5, updated_at = CURRENT_TIMESTAMP \
             WHERE tournament_id = $1 AND participant_id = $2",
        )
        .bind(tournament_id)
        .bind(participant_id)
        .bind(updated.checked_in_at)
        .bind(&updated.checked_in_by)
        .bind(&updated.edit_notes)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((updated, note_entry))
    }
}
