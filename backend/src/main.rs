mod compiler;
mod config;
mod dispatch;
mod error;
mod job_controller;
mod render;
mod services;
mod storage;

use crate::config::AppConfig;
use crate::dispatch::smtp::SmtpMailer;
use crate::dispatch::Dispatcher;
use crate::job_controller::state::JobsState;
use crate::render::images::{ImageResolver, UploadStore};
use crate::render::RenderPipeline;
use crate::services::AppState;
use crate::storage::users::SqliteUserDirectory;
use crate::storage::Database;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;
use std::io;
use std::sync::Arc;

fn startup_error(context: &str, error: impl std::fmt::Display) -> io::Error {
    io::Error::other(format!("{}: {}", context, error))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| startup_error("Invalid configuration", e))?;

    let database = Database::new(&config.database_path);
    database
        .initialize()
        .map_err(|e| startup_error("Failed to initialize database", e))?;
    std::fs::create_dir_all(&config.uploads_dir)?;

    let pipeline = RenderPipeline::new(ImageResolver::new(
        config.image_strategy,
        UploadStore::new(&config.uploads_dir),
        config.public_base_url.clone(),
    ));
    let transport = SmtpMailer::from_config(&config.smtp)
        .map_err(|e| startup_error("Failed to configure SMTP", e))?;
    let dispatcher = Dispatcher::new(
        Arc::new(SqliteUserDirectory::new(database.clone())),
        Arc::new(transport),
        Arc::new(pipeline),
        config.smtp.from_address.clone(),
        config.send_concurrency,
    );
    let app_state = AppState {
        database,
        dispatcher: Arc::new(dispatcher),
        uploads: UploadStore::new(&config.uploads_dir),
    };

    // Initialize job controller state
    let (jobs_state, rx) = JobsState::new();
    let updater_state = jobs_state.clone();
    tokio::spawn(async move {
        job_controller::state::start_job_updater(updater_state, rx).await;
    });

    info!(
        "Server running at {} (images: {}, database: {})",
        config.bind_url(),
        config.image_strategy,
        config.database_path.display()
    );

    let uploads_dir = config.uploads_dir.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(10 * 1024 * 1024)) // 10 MB
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::Data::new(jobs_state.clone()))
            .service(services::templates::configure_routes())
            .service(services::dispatch::configure_routes())
            .service(services::images::configure_routes())
            .service(services::dashboard::configure_routes())
            .service(actix_files::Files::new("/uploads", uploads_dir.clone()))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
