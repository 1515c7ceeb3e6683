//! blogmeta data models

pub mod post;
pub mod tag;
pub mod settings;

pub use post::{Post, Image};
pub use tag::{Tag, DEFAULT_CATEGORY};
pub use settings::{StoreSettings, ScanSettings, DEFAULT_META_FILE};
