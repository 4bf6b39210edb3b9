use anyhow::{Context, Result};
use body_health::api::routes::create_routes;
use body_health::config::{run_migrations, AppConfig, DatabaseConfig, DatabaseSeeder};
use body_health::services::EmailService;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let database = DatabaseConfig::from_env()?;
    let pool = database
        .create_pool()
        .await
        .context("Failed to connect to the database")?;
    run_migrations(&pool).await.context("Failed to run migrations")?;
    DatabaseSeeder::new(pool.clone()).seed_all(&config.admin).await?;

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.upload_dir.display()))?;

    let email_service = match EmailService::new(config.smtp.as_ref(), &config.support_email) {
        Ok(service) => service,
        Err(err) => {
            warn!(error = %err, "Invalid SMTP settings, emails will only be logged");
            EmailService::log_only(&config.support_email)
        }
    };
    if config.smtp.is_none() {
        warn!("SMTP_HOST not set, emails will only be logged");
    }

    let app = create_routes(pool, &config, email_service);

    let address = config.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!(environment = %config.environment, "Body Health server starting on http://{}", address);
    info!("Health check available at http://{}/health", address);

    axum::serve(listener, app).await?;

    Ok(())
}
