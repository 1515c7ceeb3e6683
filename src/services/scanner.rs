//! Post directory scanner
//!
//! Walks the posts root, reads each post directory's metadata file and
//! imports posts that are not in the database yet

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::db::Database;
use crate::models::{Post, ScanSettings};
use crate::utils::error::{AppError, AppResult};

/// Scan result
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// File names of the posts added by this scan
    pub added: Vec<String>,
    /// Post directories already present in the database
    pub skipped: usize,
    /// Post directories visited
    pub dirs_scanned: usize,
}

/// Post directory scanner
pub struct PostScanner {
    root: PathBuf,
    options: ScanSettings,
}

impl PostScanner {
    pub fn new(root: impl Into<PathBuf>, options: ScanSettings) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    /// Scanner reading `meta.yml` and skipping hidden directories
    pub fn with_defaults(root: impl Into<PathBuf>) -> Self {
        Self::new(root, ScanSettings::default())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Import every post directory under the root that is not stored yet.
    ///
    /// Stops at the first error; posts added before it stay committed and a
    /// later scan picks up where this one stopped.
    pub fn scan_posts(&self, db: &Database) -> AppResult<ScanResult> {
        if !self.root.is_dir() {
            return Err(AppError::InvalidPath(format!(
                "posts directory does not exist or is not a directory: {}",
                self.root.display()
            )));
        }

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        let mut result = ScanResult::default();

        for entry in walker.into_iter().filter_entry(|e| self.should_include_entry(e)) {
            let entry = entry?;
            if !entry.file_type().is_dir() {
                continue;
            }
            result.dirs_scanned += 1;

            let dir_name = entry.file_name().to_string_lossy().into_owned();
            if db.post_exists(&dir_name) {
                tracing::debug!("post {} already stored, skipping", dir_name);
                result.skipped += 1;
                continue;
            }

            let mut post = read_meta(&entry.path().join(&self.options.meta_file_name))?;
            if post.file_name.is_empty() {
                post.file_name = dir_name.clone();
            } else if post.file_name != dir_name {
                tracing::warn!(
                    "metadata in {} names file {:?}, using the directory name instead",
                    entry.path().display(),
                    post.file_name
                );
                post.file_name = dir_name.clone();
            }

            db.add_post(&post)?;
            result.added.push(dir_name);
        }

        tracing::info!(
            "scan of {} complete: {} added, {} already stored",
            self.root.display(),
            result.added.len(),
            result.skipped
        );

        Ok(result)
    }

    fn should_include_entry(&self, entry: &walkdir::DirEntry) -> bool {
        // the root itself is always walked, even when its own name is hidden
        if entry.depth() == 0 || !self.options.skip_hidden {
            return true;
        }
        !entry.file_name().to_string_lossy().starts_with('.')
    }
}

/// Parse one post metadata file
pub fn read_meta(path: &Path) -> AppResult<Post> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::Metadata(format!("cannot read {}: {}", path.display(), e)))?;

    serde_yaml::from_str(&content)
        .map_err(|e| AppError::Metadata(format!("cannot parse {}: {}", path.display(), e)))
}
