use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use renthub_backend::{
    config::{Config, StorageBackend},
    database::{create_pool, run_migrations},
    handlers,
    middlewares::create_cors,
    services::*,
    store::{DatabaseStore, MemoryStore, SharedStore},
    swagger::swagger_config,
    tasks,
    utils::{SharedClock, SystemClock},
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().context("failed to load configuration")?;

    let catalog = match config.plans.clone() {
        Some(plans) => PlanCatalog::from_plans(plans).context("invalid plan catalog")?,
        None => PlanCatalog::builtin(),
    };

    let store: SharedStore = match config.storage.backend {
        StorageBackend::Postgres => {
            let pool = create_pool(&config.database)
                .await
                .context("failed to create database connection pool")?;
            run_migrations(&pool)
                .await
                .context("failed to run database migrations")?;
            Arc::new(DatabaseStore::new(pool))
        }
        StorageBackend::Memory => {
            log::warn!("Using in-memory storage; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };
    let clock: SharedClock = Arc::new(SystemClock);

    let user_service = UserService::new(store.clone(), catalog.clone(), clock.clone());
    let subscription_service =
        SubscriptionService::new(store.clone(), catalog.clone(), clock.clone());
    let quota_gate = QuotaGate::new(
        store.clone(),
        catalog.clone(),
        clock.clone(),
        config.scheduler.trial_hours,
    );
    let search_ranker = SearchRanker::new(store.clone());
    let bump_scheduler = BumpScheduler::new(store.clone(), catalog.clone(), clock.clone());

    // 后台定时 bump 任务
    tasks::spawn_all(
        bump_scheduler.clone(),
        std::time::Duration::from_secs(config.scheduler.bump_interval_secs),
    );

    log::info!(
        "Starting HTTP server at {}:{} with {} plans",
        config.server.host,
        config.server.port,
        catalog.all().len()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(subscription_service.clone()))
            .app_data(web::Data::new(quota_gate.clone()))
            .app_data(web::Data::new(search_ranker.clone()))
            .app_data(web::Data::new(bump_scheduler.clone()))
            .configure(swagger_config)
            .service(web::scope("/api/v1").configure(handlers::api_config))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
