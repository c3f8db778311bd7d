use school_admin_api::app::{router, AppState};
use school_admin_api::config::config;
use school_admin_api::is_development;
use school_admin_api::services::{seed_super_admin, SeedOutcome};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let default_level = if is_development!() { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = config();
    tracing::info!("Starting school admin API in {:?} mode", config.environment);

    let state = AppState::from_config()?;

    // Seeding must not hold up the listener; a missing database only logs.
    let seed_state = state.clone();
    tokio::spawn(async move {
        match seed_super_admin(&seed_state.pool, seed_state.hasher, &config.security.superadmin).await {
            Ok(SeedOutcome::Created(user_name)) => tracing::info!(%user_name, "Super admin seeded"),
            Ok(SeedOutcome::AlreadyPresent) => tracing::debug!("Admin account present, seeding skipped"),
            Ok(SeedOutcome::NotConfigured) => tracing::debug!("SUPERADMIN_* not set, seeding skipped"),
            Err(e) => tracing::warn!("Super admin seeding failed: {}", e),
        }
    });

    let app = router(state);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
