use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use todo_server::{logging, store, ServerConfig, SqliteTodoStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let config = ServerConfig::from_env().context("invalid server configuration")?;
    let pool = store::connect(&config)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    todo_server::run(listener, Arc::new(SqliteTodoStore::new(pool))).await?;
    Ok(())
}
