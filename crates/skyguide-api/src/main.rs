use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use skyguide_api::{build_router, config::Config, state::AppState};
use skyguide_assistant::{AssistantApi, AssistantClient};
use skyguide_relay::ChatRelay;
use skyguide_store::{ConversationStore, MongoStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config =
        Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting SkyGuide API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    // Initialize the assistant client
    tracing::info!("Initializing assistant client");
    let mut client = AssistantClient::new(config.openai_api_key.clone())?;
    if let Some(base_url) = &config.assistant.base_url {
        client = client.with_base_url(base_url.clone());
    }
    let assistant: Arc<dyn AssistantApi> = Arc::new(client);

    // Initialize persistence (MongoDB)
    tracing::info!("Connecting to MongoDB");
    let mongo_store = MongoStore::connect(&config.mongodb_uri, &config.mongodb.database).await?;
    let store: Arc<dyn ConversationStore> = Arc::new(mongo_store);
    tracing::info!("MongoDB connected");

    // Create the chat relay
    tracing::info!("Initializing chat relay");
    let relay = ChatRelay::new(
        Arc::clone(&assistant),
        Arc::clone(&store),
        config.relay_config(),
    );

    // Create application state and router
    let state = Arc::new(AppState::new(config.clone(), store, relay));
    let app = build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API docs: http://{}/api/docs", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
