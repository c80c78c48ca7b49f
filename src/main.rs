use coffeeshop_api::{app, config, database::DatabaseManager};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Coffeeshop API in {:?} mode", config.environment);

    if let Err(e) = DatabaseManager::migrate().await {
        tracing::error!("Failed to apply database migrations: {}", e);
        std::process::exit(1);
    }

    // Allow tests or deployments to override port via env
    let port = std::env::var("DRINKS_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8080);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Coffeeshop API listening on http://{}", bind_addr);

    axum::serve(listener, app()).await.expect("server");
}
