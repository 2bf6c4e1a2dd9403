use assistant_relay::llm::PredictionApi;
use assistant_relay::llm::config::{self, PollPolicy, env_parse};
use assistant_relay::state::{AppState, DEFAULT_DEMO_DELAY_MS};
use assistant_relay::{llm, routes};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let dotenv_error = config::load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    if let Some(e) = dotenv_error {
        tracing::warn!(error = %e, "ignoring unreadable .env file");
    }

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    // Missing token is non-fatal at startup: inference routes answer 500 instead.
    let provider = match llm::client_from_env() {
        Ok(client) => {
            tracing::info!(model = client.model_label(), "prediction client initialized");
            Some(client)
        }
        Err(e) => {
            tracing::error!(error = %e, "prediction client not configured, inference routes will fail");
            None
        }
    };

    let poll = PollPolicy::from_env();
    tracing::info!(interval = ?poll.interval, max_attempts = poll.max_attempts, "poll policy");

    let demo_delay = std::time::Duration::from_millis(env_parse("DEMO_DELAY_MS", DEFAULT_DEMO_DELAY_MS));
    let state = AppState::new(provider, poll).with_demo_delay(demo_delay);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "assistant-relay listening");
    axum::serve(listener, app).await.expect("server failed");
}
