mod config;
mod routes;

#[derive(Debug, thiserror::Error)]
enum ServerError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Routes(#[from] routes::RouteError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // A missing .env file is normal in deployed environments.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env()?;
    tracing::info!(
        bot_id = config.widget.bot_id,
        bot_name = %config.widget.bot_name,
        "telegram widget configured"
    );

    let app = routes::app(&config)?;
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;

    tracing::info!(port = config.port, "tglogin listening");
    axum::serve(listener, app).await?;
    Ok(())
}
