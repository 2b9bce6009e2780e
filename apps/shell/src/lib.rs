//! # Otorite Shell
//!
//! Headless host for the client stores: what a browser page does on load,
//! without the page.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration (defaults, `otorite.toml`, environment)
//! 3. Open durable storage (SQLite file, or memory when ephemeral)
//! 4. Build the backend client
//! 5. Mount `AppState` and wait for startup synchronization
//! 6. Report the state every store settled on

pub mod config;
pub mod error;

use std::path::PathBuf;
use std::sync::Arc;

use otorite_client::HttpApi;
use otorite_state::{AppSnapshot, AppState, DocumentSnapshot, HeadlessDocument};
use otorite_storage::{Database, DurableStore, MemoryStore, StorageConfig};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use config::ShellConfig;
pub use error::{ShellError, ShellResult};

/// Everything the shell reports after startup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartupReport {
    pub state: AppSnapshot,
    pub document: DocumentSnapshot,
}

/// Installs the global tracing subscriber. `RUST_LOG` overrides the default
/// filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,otorite=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads configuration and runs startup.
pub async fn run(config_path: Option<PathBuf>) -> ShellResult<StartupReport> {
    let config = ShellConfig::load(config_path)?;
    start(&config).await
}

/// Runs startup with an already loaded configuration.
pub async fn start(config: &ShellConfig) -> ShellResult<StartupReport> {
    let (storage, database) = open_storage(config).await?;
    let api = Arc::new(HttpApi::new(&config.backend)?);
    let document = Arc::new(HeadlessDocument::new());

    info!(backend = %api.base_url(), "Mounting application state");

    let app = AppState::mount(storage, document.clone(), api).await;
    app.ready().await;

    let report = StartupReport {
        state: app.snapshot(),
        document: document.snapshot(),
    };

    if let Some(database) = database {
        database.close().await;
    }

    Ok(report)
}

async fn open_storage(
    config: &ShellConfig,
) -> ShellResult<(Arc<dyn DurableStore>, Option<Database>)> {
    let Some(path) = config.database_path()? else {
        info!("Ephemeral mode: nothing will be persisted");
        return Ok((Arc::new(MemoryStore::new()), None));
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    info!(?path, "Opening local storage");
    let database = Database::open(StorageConfig::new(path)).await?;
    Ok((Arc::new(database.local_storage()), Some(database)))
}
