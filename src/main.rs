use std::sync::Arc;

use tracing::{error, info};

use hdfs_board::web::handlers::AppState;
use hdfs_board::{Config, Database, FileStore, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let mut config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    if let Err(e) = config.apply_env_overrides() {
        eprintln!("Invalid environment override: {e}");
        std::process::exit(1);
    }

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    // Initialize logging
    if let Err(e) = hdfs_board::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        hdfs_board::logging::init_console_only(&config.logging.level);
    }

    info!("hdfs-board starting");

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database {}: {}", config.database.path, e);
            std::process::exit(1);
        }
    };

    let store = match FileStore::connect(&config.hdfs).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to connect to HDFS: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = AppState::new(Arc::new(db), store, &config.files);
    let server = match WebServer::new(&config.web, app_state) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Server configured on {}:{}",
        config.web.host, config.web.port
    );

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        std::process::exit(1);
    }
}
