use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod services;
mod views;

#[cfg(test)]
mod test;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inventory_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env()?;
    let pool = db::init_db_pool(&config.database_url).await?;
    std::fs::create_dir_all(&config.charts_dir)?;

    let addr = format!("0.0.0.0:{}", config.port);
    let state = handlers::AppState::new(config, pool);
    let app = handlers::router(state);

    tracing::info!(%addr, "starting inventory server");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
