//! blogmeta - post and tag metadata store for a personal blog
//!
//! Posts and tags live in SQLite; posts are imported by scanning a directory
//! holding one sub-directory per post, each with a `meta.yml` file.
//!
//! # Architecture
//!
//! - `models`: Post, Tag, Image and the store settings
//! - `db`: SQLite connection, schema and the post/tag data access layer
//! - `services`: metadata scanner and settings manager
//! - `utils`: error handling
//!
//! # Example
//!
//! ```no_run
//! use blogmeta::{BlogStore, StoreSettings, Tag};
//!
//! let store = BlogStore::open(StoreSettings::default()).unwrap();
//! store.database().add_tag(&Tag::new("photos", "Photo posts")).unwrap();
//! store.scan_posts().unwrap();
//!
//! let latest = store.database().aggregate_posts(5, "").unwrap();
//! ```

pub mod db;
pub mod models;
pub mod services;
pub mod utils;

pub use db::{Database, DatabaseStats};
pub use models::{Image, Post, ScanSettings, StoreSettings, Tag};
pub use services::{PostScanner, ScanResult, SettingsManager};
pub use utils::{AppError, AppResult, CommandError};

use std::path::PathBuf;
use std::sync::Arc;

/// Environment variable naming the settings file used by [`run`]
pub const SETTINGS_ENV: &str = "BLOGMETA_SETTINGS";

/// Store context: an opened database plus the settings it was opened with
pub struct BlogStore {
    db: Arc<Database>,
    settings: StoreSettings,
}

impl BlogStore {
    /// Open the configured database and make sure the schema exists
    pub fn open(settings: StoreSettings) -> AppResult<Self> {
        let db = Database::open(settings.database_path.clone())?;
        Self::with_database(db, settings)
    }

    /// Wrap an already opened database
    pub fn with_database(db: Database, settings: StoreSettings) -> AppResult<Self> {
        db.ensure_schema()?;
        Ok(Self {
            db: Arc::new(db),
            settings,
        })
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// Scan the configured posts directory
    pub fn scan_posts(&self) -> AppResult<ScanResult> {
        PostScanner::new(self.settings.posts_dir.clone(), self.settings.scan.clone())
            .scan_posts(&self.db)
    }
}

/// Open the store from its settings file, import new posts and log totals
pub fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let manager = match std::env::var_os(SETTINGS_ENV) {
        Some(path) => SettingsManager::new(PathBuf::from(path)),
        None => SettingsManager::with_default_path(),
    };
    let settings = manager.load()?;
    tracing::info!("database path: {:?}", settings.database_path);

    let store = BlogStore::open(settings)?;
    let scan = store.scan_posts()?;
    let stats = store.database().stats()?;

    tracing::info!(
        "{} new post(s); {} posts, {} tags, {} links stored",
        scan.added.len(),
        stats.post_count,
        stats.tag_count,
        stats.link_count
    );

    Ok(())
}
