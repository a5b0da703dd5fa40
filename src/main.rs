use std::path::PathBuf;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use bible_api::config::{self, Config, Overrides};
use bible_api::database::Database;
use bible_api::{logger, server};
use clap::Parser;
use tokio::sync::Notify;

#[derive(Debug, Parser)]
#[command(name = "bible-api", version, about = "Serve Bible chapter JSON files over HTTP")]
struct Cli {
    /// Configuration file path (without extension)
    #[arg(short, long, default_value = "config")]
    config: String,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory laid out as {book}/{chapter}/{language}.json
    #[arg(long)]
    content_root: Option<PathBuf>,

    /// SQLite database file
    #[arg(long)]
    database: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let overrides = Overrides {
        host: cli.host,
        port: cli.port,
        content_root: cli.content_root,
        database: cli.database,
    };
    let cfg = Config::load_from(&cli.config, &overrides)?;
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    let database = Arc::new(Database::new(&cfg.database.path));
    if let Err(e) = database.connection() {
        logger::log_error(&e.to_string());
        return Err(e.into());
    }
    logger::log_info("Database singleton initialized");

    let listener = match server::create_reusable_listener(addr) {
        Ok(l) => l,
        Err(e) => {
            logger::log_error(&format!("Failed to bind {addr}: {e}"));
            close_database(&database);
            return Err(e.into());
        }
    };

    let state = Arc::new(config::AppState::new(&cfg, Arc::clone(&database)));
    logger::log_server_start(&addr, &cfg);

    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown))?;

    server::start_server_loop(listener, state, Arc::new(AtomicUsize::new(0)), shutdown).await;

    close_database(&database);
    logger::log_info("Server stopped");
    Ok(())
}

fn close_database(database: &Database) {
    match database.close() {
        Ok(()) => logger::log_info("Database connection closed"),
        Err(e) => logger::log_error(&e.to_string()),
    }
}
