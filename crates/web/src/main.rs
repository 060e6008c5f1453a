use anyhow::Context;
use axum::Router;
use storage::Database;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;
mod startgg;
mod state;

use config::Config;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::auth::handlers::login,
        features::auth::handlers::callback,
        features::auth::handlers::session,
        features::auth::handlers::logout,
        features::tournaments::handlers::list_tournaments,
        features::participants::handlers::list_participants,
        features::participants::handlers::import_roster,
        features::participants::handlers::stream_participants,
        features::participants::handlers::check_in,
        features::kiosk::handlers::scan,
        features::pricing::handlers::get_pricing,
        features::pricing::handlers::update_pricing,
    ),
    components(
        schemas(
            storage::dto::participant::ParticipantResponse,
            storage::dto::participant::ImportRosterRequest,
            storage::dto::participant::ImportRosterResponse,
            storage::dto::participant::ScanRequest,
            storage::dto::participant::ScanResponse,
            storage::dto::participant::CheckInRequest,
            storage::dto::participant::CheckInResponse,
            storage::dto::pricing::PricingResponse,
            storage::dto::pricing::UpdatePricingRequest,
            storage::models::Participant,
            storage::models::Payment,
            storage::models::PaymentStatus,
            storage::models::PaymentState,
            storage::models::PricingConfig,
            storage::models::AdjustmentOption,
            startgg::models::Viewer,
            startgg::models::TournamentSummary,
            features::auth::handlers::SessionResponse,
        )
    ),
    tags(
        (name = "auth", description = "start.gg OAuth session endpoints"),
        (name = "startgg", description = "Proxied start.gg queries"),
        (name = "participants", description = "Roster, import and check-in endpoints"),
        (name = "kiosk", description = "Self-service kiosk endpoints"),
        (name = "pricing", description = "Pricing configuration endpoints"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting event check-in API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let bind_address = format!("{}:{}", config.host, config.port);
    let state = AppState::new(db, config);

    // Cookies cross origins here, so CORS echoes the caller instead of
    // using wildcards.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    let tournament_routes = Router::new()
        .nest("/participants", features::participants::routes::routes())
        .nest("/pricing", features::pricing::routes::routes())
        .merge(features::kiosk::routes::routes());

    let app = Router::new()
        .nest("/api/auth", features::auth::routes::routes())
        .nest("/api/startgg", features::tournaments::routes::routes())
        .nest("/api/tournaments/:tournament_id", tournament_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .with_state(state);

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_address);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    axum::serve(listener, app).await?;

    Ok(())
}
