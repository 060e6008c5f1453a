use chrono::{DateTime, Utc};
use sqlx::PgPool;
use storage::{
    dto::participant::ParticipantResponse,
    error::Result,
    models::{AdjustmentOption, Participant, PricingConfig},
    repository::{participant::ParticipantRepository, tournament::TournamentRepository},
};

/// Full roster with payment statuses computed against the tournament's
/// pricing configuration.
pub async fn snapshot(pool: &PgPool, tournament_id: &str) -> Result<Vec<ParticipantResponse>> {
    let pricing = TournamentRepository::new(pool)
        .get_pricing(tournament_id)
        .await?
        .config;
    let participants = ParticipantRepository::new(pool).list(tournament_id).await?;

    Ok(participants
        .into_iter()
        .map(|participant| ParticipantResponse::from_model(participant, &pricing))
        .collect())
}

/// One participant, for the kiosk scan screen.
pub async fn find_participant(
    pool: &PgPool,
    tournament_id: &str,
    participant_id: &str,
) -> Result<ParticipantResponse> {
    let pricing = TournamentRepository::new(pool)
        .get_pricing(tournament_id)
        .await?
        .config;
    let participant = ParticipantRepository::new(pool)
        .find(tournament_id, participant_id)
        .await?;

    Ok(ParticipantResponse::from_model(participant, &pricing))
}

/// Merge parsed roster candidates into the stored set.
pub async fn merge_candidates(
    pool: &PgPool,
    tournament_id: &str,
    candidates: &[Participant],
) -> Result<usize> {
    ParticipantRepository::new(pool)
        .merge_candidates(tournament_id, candidates)
        .await
}

/// Check a participant in, resolving the adjustment against the stored
/// pricing configuration. Unknown adjustment keys fall back to "no change".
#[allow(clippy::too_many_arguments)]
pub async fn check_in(
    pool: &PgPool,
    tournament_id: &str,
    participant_id: &str,
    adjustment_key: &str,
    custom_delta: i64,
    custom_reason: &str,
    operator_id: &str,
    now: DateTime<Utc>,
) -> Result<(Participant, String, PricingConfig)> {
    let pricing = TournamentRepository::new(pool)
        .get_pricing(tournament_id)
        .await?
        .config;
    let adjustment = pricing
        .find_adjustment(adjustment_key)
        .cloned()
        .unwrap_or_else(AdjustmentOption::no_change);

    let (updated, note_entry) = ParticipantRepository::new(pool)
        .check_in(
            tournament_id,
            participant_id,
            &adjustment,
            custom_delta,
            custom_reason,
            operator_id,
            now,
        )
        .await?;

    Ok((updated, note_entry, pricing))
}
