use acct_server::error::ServerError;
use acct_server::{AppState, build_router, logger};

use acct_auth::TokenManager;
use acct_cache::RedisUserCache;
use acct_config::Config;
use acct_db::{PgAuditLog, PgTxManager, PgUserStore};
use acct_events::{EventConsumer, KafkaConnector, UserSaveHandler};
use acct_service::{
    AccessService, AuthService, BreakerSettings, CircuitBreaker, LiveBackend, Paging,
    RetryPolicy, ShutdownCoordinator, TokenBucketLimiter, UserService, with_retry,
};

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    // Load and validate configuration
    let config = Config::load()?;
    config.validate()?;

    // Construct log file path if configured
    let log_file_path = match config.logging.file {
        Some(ref filename) => {
            let log_dir = Config::config_dir()?.join(&config.logging.dir);
            std::fs::create_dir_all(&log_dir)?;
            Some(log_dir.join(filename))
        }
        None => None,
    };

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting acct-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let prometheus = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::Metrics {
            message: e.to_string(),
        })?;

    let shutdown = ShutdownCoordinator::new();
    let retry = RetryPolicy::default();

    // Store of record
    info!("Connecting to database: {}", config.database.redacted_url());
    let pool = with_retry(&retry, "Database connect", || {
        acct_db::connect(
            &config.database.url,
            config.database.max_connections,
            Duration::from_secs(config.database.acquire_timeout_secs),
        )
    })
    .await
    .map_err(ServerError::from)?;
    acct_db::run_migrations(&pool)
        .await
        .map_err(ServerError::from)?;

    // Cache
    let cache = with_retry(&retry, "Redis connect", || {
        RedisUserCache::connect(
            &config.cache.url,
            Duration::from_secs(config.cache.connection_timeout_secs),
            Duration::from_secs(config.cache.response_timeout_secs),
        )
    })
    .await
    .map_err(ServerError::from)?;

    let store = Arc::new(PgUserStore::new(pool.clone()));
    let users = UserService::<LiveBackend>::new(
        Arc::clone(&store),
        Arc::new(PgAuditLog),
        Arc::new(PgTxManager::new(pool)),
        Arc::new(cache),
    )
    .with_paging(Paging::from(&config.pagination));

    // Token signing
    let secret = match config.auth.jwt_secret {
        Some(ref secret) => secret.as_bytes().to_vec(),
        None => {
            warn!("No JWT secret configured, issued tokens will not survive a restart");
            rand::random::<[u8; 32]>().to_vec()
        }
    };
    let tokens = Arc::new(TokenManager::with_hs256(
        &secret,
        chrono::Duration::minutes(config.auth.access_token_minutes),
        chrono::Duration::minutes(config.auth.refresh_token_minutes),
    ));
    if !config.auth.enabled {
        warn!("Authorization DISABLED - protected routes are open");
    }

    // Interceptors
    let limiter = TokenBucketLimiter::from_config(&config.rate_limit, shutdown.subscribe_guard());
    let breaker = CircuitBreaker::new(BreakerSettings::from(&config.circuit_breaker));
    info!(
        "Admission control: {} requests per {:?}",
        limiter.limit(),
        config.rate_limit.period()
    );

    // Event consumer
    if config.kafka.enabled {
        let consumer = EventConsumer::from_config(
            KafkaConnector::new(&config.kafka),
            UserSaveHandler::new(users.clone()),
            &config.kafka,
        );
        let guard = shutdown.subscribe_guard();
        tokio::spawn(async move {
            match consumer.run(guard).await {
                Err(e) if e.is_cancelled() => {}
                Err(e) => error!("Event consumer stopped: {e}"),
                Ok(()) => {}
            }
        });
        info!("Event consumer started for topic '{}'", config.kafka.topic);
    }

    let app_state = AppState::new(
        users,
        AuthService::new(Arc::clone(&store), Arc::clone(&tokens)),
        AccessService::new(store, tokens),
        limiter,
        breaker,
    )
    .with_auth_enabled(config.auth.enabled)
    .with_prometheus(prometheus);

    let app = build_router(app_state);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!("Server listening on {}", listener.local_addr()?);

    // Spawn signal handler for graceful shutdown
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                shutdown_for_signal.shutdown();
            }
            Err(e) => {
                error!("Failed to listen for SIGINT: {}", e);
            }
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.subscribe_guard().wait().await;
            info!("Graceful shutdown complete");
        })
        .await?;

    Ok(())
}
