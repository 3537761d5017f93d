//! Reference todo collection: serves `/api/todo/` backed by SQLite.

use anyhow::Context;
use todo_sync::{
    config::Config,
    domain::repository::TodoStore,
    http::routing::{self, todos},
    infrastructure::sqlite_repo::SqliteTodoStore,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    let store = SqliteTodoStore::connect(&config.database_url)
        .await
        .with_context(|| format!("opening {}", config.database_url))?;
    store.init().await?;
    let router = routing::app(todos::router(todos::AppState { store }));

    let addr = config.bind_addr;
    tracing::info!(%addr, "listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("ctrl-c, shutting down");
        })
        .await?;
    Ok(())
}
