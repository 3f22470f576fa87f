//! Thinktrek Publishing Backend
//! Mission: Author identity, email verification, and session management

use anyhow::{Context, Result};
use dotenv::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use thinktrek_backend::{
    api::{create_router, AppState},
    auth::JwtHandler,
    config::Config,
    email::Mailer,
    store::AuthorStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;

    let store = Arc::new(
        AuthorStore::new(&config.database_path)
            .with_context(|| format!("Failed to open database at {}", config.database_path))?,
    );
    info!("📚 Author store initialized at: {}", config.database_path);

    let jwt = Arc::new(JwtHandler::new(config.jwt_secret.clone()));
    let mailer = Mailer::new(config.smtp.clone());

    let state = AppState {
        store,
        jwt,
        mailer,
        bcrypt_cost: config.bcrypt_cost,
    };
    let app = create_router(state, config.rate_limit.clone());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("🚀 Server running on port {}", config.port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "thinktrek_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
