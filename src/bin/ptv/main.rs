use actix_web::middleware::Logger;
use actix_web::web::{Data, JsonConfig};
use actix_web::{App, HttpServer};
use anyhow::Context;
use clap::{Parser, Subcommand};
use env_logger::Env;
use ptv::db::{get_db_pool, init_db};
use ptv::jobs::{HttpCoordinateProvider, ImportOptions};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "ptv", about = "Service directory versioning and publishing")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API and the publishing scheduler (default)
    Serve,
    /// Create missing tables
    CreateSchema,
    /// Download postal code center coordinates
    ImportCoordinates {
        /// Request one postal code at a time
        #[arg(long)]
        one_by_one: bool,
        #[arg(long)]
        batch_size: Option<u64>,
    },
    /// Fill the per-service and per-channel connection orders
    SplitConnectionOrder {
        #[arg(long, default_value_t = 500)]
        batch_size: u64,
    },
    /// Report version data that breaks the versioning rules
    Check,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_lib_mods();
    init_our_mods();
    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set.")?;
    init_db(database_url).await;
    let db = get_db_pool();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await?,
        Command::CreateSchema => {
            ptv::schema::create_tables(db).await?;
            log::info!("Schema created");
        }
        Command::ImportCoordinates {
            one_by_one,
            batch_size,
        } => {
            let config = ptv::app_config::coordinates();
            let mut options = ImportOptions::from(&config);
            options.one_by_one |= one_by_one;
            if let Some(size) = batch_size {
                options.batch_size = size.max(1);
            }
            let provider = HttpCoordinateProvider::new(&config)?;
            let now = chrono::Utc::now().naive_utc();
            let report = ptv::jobs::import_coordinates(db, &provider, &options, now).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::SplitConnectionOrder { batch_size } => {
            let report = ptv::jobs::split_connection_order(db, batch_size).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Check => {
            let report = ptv::integrity::check_all(db).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.is_empty() {
                anyhow::bail!("{} root(s) with violations", report.len());
            }
        }
    }
    Ok(())
}

async fn serve() -> anyhow::Result<()> {
    let server = ptv::app_config::server();
    let publishing = ptv::app_config::publishing();
    let json_limit = server.json_limit_kb * 1024;

    // Scheduled publish and archive sweep
    ptv::lifecycle::scheduler::spawn(
        get_db_pool().to_owned(),
        Duration::from_secs(publishing.scheduler_interval_seconds.max(1)),
    );

    log::info!("Listening on {}:{}", server.host, server.port);
    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(get_db_pool().to_owned()))
            .app_data(JsonConfig::default().limit(json_limit))
            .wrap(Logger::new("%a %r %s %Dms"))
            .configure(ptv::web::configure)
    })
    .bind((server.host.as_str(), server.port))?
    .run()
    .await?;
    Ok(())
}

/// Initialize third party crates we rely on but don't have control over.
pub fn init_lib_mods() {
    // A missing .env is fine, the environment may be set some other way
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}

/// Initialize all local mods.
pub fn init_our_mods() {
    ptv::app_config::init();
}
