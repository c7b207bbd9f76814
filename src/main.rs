//! Labelsite - content store and API for an AI-generated music label's fan site
//!
//! Serves the catalog, playlists, the fan studio and site copy from
//! explicitly constructed stores backed by a key-value storage directory.

#![allow(dead_code)]

mod api;
mod config;
mod error;
mod models;
mod seed;
mod storage;
mod stores;
mod studio;
mod utils;

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use crate::config::{AppConfig, Paths};
use crate::storage::{FileStorage, MemoryStorage};
use crate::stores::{ContentStore, StoreNotice, UserStore};

/// Labelsite - fan site backend for a music label
#[derive(Parser, Debug)]
#[command(name = "labelsite")]
#[command(version)]
#[command(about = "Content store and API for an AI-generated music label's fan site")]
struct Args {
    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 3030)]
    port: u16,

    /// Enable debug mode
    #[arg(long)]
    debug: bool,

    /// Path to config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replace stored content with the built-in defaults, then exit
    #[arg(long)]
    reset_content: bool,

    /// Write the persisted content as JSON, then exit
    #[arg(long, value_name = "FILE")]
    export: Option<Option<PathBuf>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    info!("Labelsite v{} starting...", env!("CARGO_PKG_VERSION"));

    let paths = Paths::init(args.config)?;
    info!("Config directory: {:?}", paths.config_dir());

    let mut config = AppConfig::load(&paths)?;
    config.apply_env();

    let storage = FileStorage::open(paths.storage_dir(), config.storage_quota_bytes)
        .context("Failed to open storage directory")?;
    let storage = Arc::new(storage);
    let content = ContentStore::open(storage.clone());
    report_notices(content.take_notices());

    if args.reset_content {
        content.reset_to_seed();
        report_notices(content.take_notices());
        return Ok(());
    }

    if let Some(target) = args.export {
        let target = target.unwrap_or_else(|| paths.export_path());
        let json = content.export_json()?;
        std::fs::write(&target, json)
            .with_context(|| format!("Failed to write export to {:?}", target))?;
        info!("Exported content to {:?}", target);
        return Ok(());
    }

    // sessions last as long as the process
    let users = UserStore::open(
        storage,
        Arc::new(MemoryStorage::new()),
        config.admin_passcode.clone(),
    );

    let gen_ai = studio::GenAiClient::new(config.gen_ai.clone())?;
    if gen_ai.is_enabled() {
        info!("Studio enabled with {}", config.gen_ai.text_model);
    } else {
        warn!("No generative AI key configured. Studio is disabled.");
    }

    let state = web::Data::new(api::AppState::new(content, users, Arc::new(gen_ai)));
    serve(args.host, args.port, config, state).await
}

async fn serve(
    host: String,
    port: u16,
    config: AppConfig,
    state: web::Data<api::AppState>,
) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    info!("Server listening on http://{}", addr);

    let origins = config.allowed_origins;
    HttpServer::new(move || {
        let cors = if origins.is_empty() {
            Cors::default().allow_any_origin()
        } else {
            origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        };
        let cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(api::configure)
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}

fn report_notices(notices: Vec<StoreNotice>) {
    for notice in notices {
        warn!("{}", notice);
    }
}
