use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;

use wildtrails_api::api::routes;
use wildtrails_api::api::state::AppState;
use wildtrails_api::config::Config;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = Config::from_env();
    if let Err(e) = config.validate() {
        tracing::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Environment: {:?}", config.environment);

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Database connected successfully");

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(pool, config);
    let app = routes::app(state);

    // Start server; per-connection addresses feed the rate limiter
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server failed");
}
