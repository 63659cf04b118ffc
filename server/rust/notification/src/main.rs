use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use loyalty_notification_server::adapter::handler::{self, AppState};
use loyalty_notification_server::adapter::middleware::auth::SessionAuthState;
use loyalty_notification_server::adapter::repository::{
    DeliveryEndpointPostgresRepository, InMemoryDeliveryEndpointRepository,
    InMemoryNotificationLogRepository, InMemoryUserDirectoryRepository,
    NotificationLogPostgresRepository, UserDirectoryPostgresRepository,
};
use loyalty_notification_server::domain::repository::{
    DeliveryEndpointRepository, NotificationLogRepository, UserDirectoryRepository,
};
use loyalty_notification_server::domain::service::PushGateway;
use loyalty_notification_server::infrastructure::config::Config;
use loyalty_notification_server::infrastructure::push::{FcmPushGateway, ServiceAccountKey};
use loyalty_notification_server::infrastructure::{
    database, telemetry, HostedAuthSessionVerifier, SessionVerifier,
};
use loyalty_notification_server::usecase::{DispatchNotificationUseCase, DispatchSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config
    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/config.yaml".to_string());
    let cfg = Config::load(&config_path)?;

    // Logging
    telemetry::init_logging(&cfg.log)?;

    info!(
        app_name = %cfg.app.name,
        version = %cfg.app.version,
        environment = %cfg.app.environment,
        "starting notification dispatch server"
    );

    // Repositories
    let user_repo: Arc<dyn UserDirectoryRepository>;
    let endpoint_repo: Arc<dyn DeliveryEndpointRepository>;
    let log_repo: Arc<dyn NotificationLogRepository>;
    if let Some(ref db_config) = cfg.database {
        info!("connecting to database");
        let pool = database::connect(db_config).await?;
        info!("database connection pool established");
        user_repo = Arc::new(UserDirectoryPostgresRepository::new(pool.clone()));
        endpoint_repo = Arc::new(DeliveryEndpointPostgresRepository::new(pool.clone()));
        log_repo = Arc::new(NotificationLogPostgresRepository::new(pool));
    } else {
        info!("no database configured, using in-memory repositories");
        user_repo = Arc::new(InMemoryUserDirectoryRepository::new());
        endpoint_repo = Arc::new(InMemoryDeliveryEndpointRepository::new());
        log_repo = Arc::new(InMemoryNotificationLogRepository::new());
    }

    // Push gateway: サービスアカウント鍵を渡してプロセス起動時に一度だけ構築する。
    // アクセストークンはゲートウェイが発行し、期限前に更新する。
    let push_gateway: Arc<dyn PushGateway> = Arc::new(FcmPushGateway::new(
        &cfg.push.endpoint,
        &cfg.push.project_id,
        &ServiceAccountKey::from(&cfg.push.service_account),
        Duration::from_secs(cfg.push.timeout_secs),
        cfg.push.max_concurrency,
    )?);
    info!(
        project_id = %cfg.push.project_id,
        client_email = %cfg.push.service_account.client_email,
        max_concurrency = cfg.push.max_concurrency,
        "push gateway initialized"
    );

    // Session verifier
    let verifier: Arc<dyn SessionVerifier> = Arc::new(HostedAuthSessionVerifier::new(
        &cfg.auth.base_url,
        cfg.auth.api_key.clone(),
        Duration::from_secs(cfg.auth.timeout_secs),
    )?);
    info!(auth_url = %cfg.auth.base_url, "session verifier initialized");

    // Use cases
    let dispatch_notification_uc = Arc::new(DispatchNotificationUseCase::new(
        user_repo,
        endpoint_repo,
        log_repo,
        push_gateway,
        DispatchSettings::from(&cfg.dispatch),
    ));

    let state = AppState {
        dispatch_notification_uc,
        auth_state: SessionAuthState {
            verifier,
            session_cookie: cfg.auth.session_cookie.clone(),
        },
    };
    let app = handler::router(state);

    // REST server
    let rest_addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!("REST server starting on {}", rest_addr);

    let listener = tokio::net::TcpListener::bind(rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("notification dispatch server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
