use dotenv::dotenv;
use quizgen_platform::{
    config::config::CONFIG,
    server::{app_state::AppState, router::app_router},
};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    // Initialize .env
    dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(CONFIG.log_level())
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set global tracing");

    // Initialize state
    let state = AppState::from_config(&CONFIG).unwrap_or_else(|e| panic!("{}", e));

    // Initialize routes
    let app = app_router(state, &CONFIG.cors);

    // Initialize webserver
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", CONFIG.server.address, CONFIG.server.port))
            .await
            .unwrap();

    info!(
        "Server listening on address: {}, provider: groq ({})",
        listener.local_addr().unwrap(),
        CONFIG.groq.model
    );
    axum::serve(listener, app).await.unwrap();
}
