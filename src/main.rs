use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use valecashback::config::Config;
use valecashback::middleware::RequestId;
use valecashback::modules::audit::controllers::audit_controller;
use valecashback::modules::audit::repositories::AuditRepository;
use valecashback::modules::balances::controllers::balance_controller;
use valecashback::modules::balances::repositories::BalanceRepository;
use valecashback::modules::rates::controllers::rate_controller;
use valecashback::modules::rates::repositories::RateRepository;
use valecashback::modules::rates::services::RateResolver;
use valecashback::modules::settlement::controllers::settlement_controller;
use valecashback::modules::settlement::repositories::TransactionRepository;
use valecashback::modules::settlement::services::LedgerWriter;
use valecashback::modules::withdrawals::controllers::withdrawal_controller;
use valecashback::modules::withdrawals::repositories::WithdrawalRepository;
use valecashback::modules::withdrawals::services::WithdrawalProcessor;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "valecashback=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    config.validate().expect("Configuration validation failed");

    tracing::info!("Starting Vale Cashback settlement core");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool
    let db_pool = config
        .database
        .create_pool()
        .await
        .expect("Failed to create database pool");

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");

    // Wire repositories and services
    let rate_resolver = Arc::new(RateResolver::new(
        RateRepository::new(db_pool.clone()),
        AuditRepository::new(db_pool.clone()),
    ));
    let balance_repo = Arc::new(BalanceRepository::new(db_pool.clone()));
    let audit_repo = Arc::new(AuditRepository::new(db_pool.clone()));

    let ledger_writer = Arc::new(LedgerWriter::new(
        TransactionRepository::new(db_pool.clone()),
        BalanceRepository::new(db_pool.clone()),
        AuditRepository::new(db_pool.clone()),
        rate_resolver.clone(),
    ));

    let withdrawal_processor = Arc::new(WithdrawalProcessor::new(
        WithdrawalRepository::new(db_pool.clone()),
        BalanceRepository::new(db_pool.clone()),
        AuditRepository::new(db_pool.clone()),
        rate_resolver.clone(),
    ));

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let workers = config.server.workers;
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestId)
            .wrap(Cors::permissive())
            .app_data(web::Data::new(rate_resolver.clone()))
            .app_data(web::Data::new(balance_repo.clone()))
            .app_data(web::Data::new(audit_repo.clone()))
            .app_data(web::Data::new(ledger_writer.clone()))
            .app_data(web::Data::new(withdrawal_processor.clone()))
            .configure(rate_controller::configure)
            .configure(settlement_controller::configure)
            .configure(balance_controller::configure)
            .configure(withdrawal_controller::configure)
            .configure(audit_controller::configure)
            .route("/health", web::get().to(health_check))
    })
    .workers(workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "valecashback"
    }))
}
