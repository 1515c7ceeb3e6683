//! Store settings data model

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::db::default_db_path;

/// Default metadata file name inside each post directory
pub const DEFAULT_META_FILE: &str = "meta.yml";

/// Scan settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanSettings {
    /// Metadata file expected in every post directory
    pub meta_file_name: String,
    /// Skip directories whose name starts with a dot
    pub skip_hidden: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            meta_file_name: String::from(DEFAULT_META_FILE),
            skip_hidden: true,
        }
    }
}

/// Store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreSettings {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Root directory holding one directory per post
    pub posts_dir: PathBuf,
    /// Scan settings
    pub scan: ScanSettings,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_path: default_db_path(),
            posts_dir: PathBuf::from("./posts"),
            scan: ScanSettings::default(),
        }
    }
}
