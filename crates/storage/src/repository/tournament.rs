use sqlx::PgPool;
use sqlx::types::Json;

use crate::error::Result;
use crate::models::PricingConfig;

/// Pricing configuration as read back for a tournament, with provenance.
#[derive(Debug, Clone)]
pub struct PricingSnapshot {
    pub config: PricingConfig,
    pub name: Option<String>,
    /// False when the tournament row does not exist yet and the defaults
    /// were served instead.
    pub stored: bool,
}

pub struct TournamentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TournamentRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Reads the stored pricing configuration, falling back to the defaults
    /// when the tournament has never been configured. The fallback is not
    /// written back; only explicit organizer edits persist anything.
    pub async fn get_pricing(&self, tournament_id: &str) -> Result<PricingSnapshot> {
        let row = sqlx::query_as::<_, (Option<String>, Option<Json<PricingConfig>>)>(
            "SELECT name, pricing_config FROM tournaments WHERE tournament_id = $1",
        )
        .bind(tournament_id)
        .fetch_optional(self.pool)
        .await?;

        let snapshot = match row {
            Some((name, Some(Json(config)))) => PricingSnapshot {
                config: config.normalized(),
                name,
                stored: true,
            },
            Some((name, None)) => PricingSnapshot {
                config: PricingConfig::default(),
                name,
                stored: true,
            },
            None => PricingSnapshot {
                config: PricingConfig::default(),
                name: None,
                stored: false,
            },
        };

        Ok(snapshot)
    }

    /// Persists an organizer edit, normalized first.
    pub async fn upsert_pricing(
        &self,
        tournament_id: &str,
        config: PricingConfig,
        name: Option<&str>,
    ) -> Result<PricingConfig> {
        let config = config.normalized();

        sqlx::query(
            r#"
            INSERT INTO tournaments (tournament_id, name, pricing_config, updated_at)
            VALUES ($1, $2, $3, CURRENT_TIMESTAMP)
            ON CONFLICT (tournament_id) DO UPDATE SET
                name = COALESCE($2, tournaments.name),
                pricing_config = EXCLUDED.pricing_config,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(tournament_id)
        .bind(name)
        .bind(Json(&config))
        .execute(self.pool)
        .await?;

        Ok(config)
    }
}
