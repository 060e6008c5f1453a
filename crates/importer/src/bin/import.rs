use std::path::PathBuf;

use clap::Parser;
use importer::{merge_into, parse_rows, read_csv_rows};
use sqlx::postgres::PgPoolOptions;
use storage::repository::ParticipantRepository;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "roster-import")]
#[command(about = "Tournament roster CSV importer", long_about = None)]
#[command(version)]
struct Cli {
    /// Tournament identifier the roster belongs to
    #[arg(short, long)]
    tournament: String,

    /// Path to the roster CSV export
    #[arg(short, long)]
    file: PathBuf,

    /// Merge against the stored roster and report without writing
    #[arg(long)]
    dry_run: bool,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> importer::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("import={},importer={}", log_level, log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rows = read_csv_rows(&cli.file)?;
    info!("Read {} rows from {}", rows.len(), cli.file.display());

    let candidates = parse_rows(&rows)?;
    info!("Parsed {} participant candidates", candidates.len());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&cli.database_url)
        .await?;

    let repo = ParticipantRepository::new(&pool);
    let existing = repo.list(&cli.tournament).await?;
    let already_checked_in = existing.iter().filter(|p| p.checked_in).count();

    if cli.dry_run {
        // Preview against the stored roster so latch effects are visible.
        let preview = merge_into(existing, candidates);
        for participant in &preview.participants {
            info!(
                "{} {} (checked_in={})",
                participant.participant_id,
                participant.display_name(),
                participant.checked_in
            );
        }
        info!(
            "Dry run: {} rows would be imported into tournament {} ({} already checked in)",
            preview.imported, cli.tournament, already_checked_in
        );
        return Ok(());
    }

    let imported = repo.merge_candidates(&cli.tournament, &candidates).await?;
    let merged = repo.list(&cli.tournament).await?;

    info!(
        "Imported {} rows into tournament {} ({} participants total, {} already checked in)",
        imported,
        cli.tournament,
        merged.len(),
        already_checked_in
    );

    Ok(())
}
