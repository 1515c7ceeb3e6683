//! blogmeta services

pub mod scanner;
pub mod settings;

pub use scanner::{PostScanner, ScanResult, read_meta};
pub use settings::{SettingsManager, default_settings_path};
