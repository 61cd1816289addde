use axe_stats::{build_career, run_scrape, Config, ScorerClient, SqliteScoreStore};

#[tokio::main]
async fn main() -> axe_stats::Result<()> {
    tracing_subscriber::fmt::init();

    let profile_id = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(Config::default().profile_id);
    let config = Config {
        profile_id,
        database_path: "demo.db".into(),
        ..Config::default()
    };

    let client = ScorerClient::from_config(&config)?;
    let store = SqliteScoreStore::open(&config.database_path)?;

    let report = run_scrape(&client, &store, &config).await?;
    println!(
        "Processed {} matches, {} failed",
        report.batch.processed, report.batch.failed
    );

    let career = build_career(&store, profile_id)?;
    println!(
        "{} threw {} axes at {:.3} per axe over {} seasons",
        career.profile.name,
        career.stats.overall.attempts,
        career.stats.overall.score_per_axe,
        career.seasons.len()
    );
    Ok(())
}
