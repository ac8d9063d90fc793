use std::sync::Arc;

use account_service::account::ports::AccountServicePort;
use account_service::account::service::AccountService;
use account_service::config::Config;
use account_service::inbound::http::router::create_router;
use account_service::repositories::InMemoryAccountRepository;
use account_service::repositories::PostgresAccountRepository;
use auth::TokenCodec;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "account_service=debug,auth=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        persistence = if config.database.url.is_some() { "postgresql" } else { "memory" },
        token_expiration_hours = ?config.token.expiration_hours,
        password_memory_kib = config.password.memory_kib,
        password_iterations = config.password.iterations,
        lookup_timeout_ms = config.lookup.timeout_ms,
        "Configuration loaded"
    );

    let password_hasher = config.password.hasher()?;
    let token_codec = Arc::new(TokenCodec::new(
        config.token.secret.expose_secret().as_bytes(),
    ));
    let lookup_timeout = config.lookup.timeout();
    let token_ttl = config.token.ttl();

    let account_service: Arc<dyn AccountServicePort> = match &config.database.url {
        Some(url) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            Arc::new(AccountService::new(
                Arc::new(PostgresAccountRepository::new(pg_pool)),
                password_hasher,
                token_codec,
                lookup_timeout,
                token_ttl,
            ))
        }
        None => {
            tracing::warn!("No database.url configured, accounts are kept in memory");
            Arc::new(AccountService::new(
                Arc::new(InMemoryAccountRepository::new()),
                password_hasher,
                token_codec,
                lookup_timeout,
                token_ttl,
            ))
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(account_service)).await?;

    tracing::info!("Server exited");
    Ok(())
}
