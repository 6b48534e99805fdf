use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use common::database::{DatabaseConfig, health_check, init_pool};
use common::error::DatabaseError;

use api::config::ServerConfig;
use api::jwt::{JwtConfig, JwtService};
use api::rate_limiter::{RateLimiter, RateLimiterConfig};
use api::routes;
use api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting API service");

    let server_config = ServerConfig::from_env();

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Apply embedded migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;
    info!("Database migrations applied");

    // Media directory must exist before the first upload and for static serving
    tokio::fs::create_dir_all(&server_config.upload_dir).await?;

    // Initialize JWT service
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config);

    let rate_limiter = RateLimiter::new(RateLimiterConfig::default());

    let app_state = AppState::new(
        pool,
        jwt_service,
        rate_limiter,
        server_config.upload_dir.clone(),
    );

    info!("API service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state, &server_config);

    let addr = format!("0.0.0.0:{}", server_config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
