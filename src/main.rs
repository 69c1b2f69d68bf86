use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use job_portal_backend::{
    api_router,
    config::{get_config, init_config},
    database::pool::create_pool,
    services::notification_service::WebhookSink,
    store::PgStore,
    AppState,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let store = Arc::new(PgStore::new(pool));
    let sink = Arc::new(WebhookSink::new(
        config.notification_webhook_url.clone(),
        Duration::from_secs(config.notification_timeout_secs),
    ));
    let app_state = AppState::new(store, sink);

    let app = api_router(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
