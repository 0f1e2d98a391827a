use std::fs;
use std::path::{Path, PathBuf};

use super::settings::Settings;

const VECTOR_DB_FILE: &str = "vectors.db";

/// On-disk locations used by the process.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub vector_db_path: PathBuf,
    pub log_dir: Option<PathBuf>,
}

impl AppPaths {
    pub fn new(settings: &Settings) -> Self {
        Self::from_parts(&settings.pdf.store_path, settings.server.log_dir.as_deref())
    }

    pub fn from_parts(vector_store_dir: &Path, log_dir: Option<&Path>) -> Self {
        let vector_store_dir = vector_store_dir.to_path_buf();
        let vector_db_path = vector_store_dir.join(VECTOR_DB_FILE);
        let log_dir = log_dir.map(Path::to_path_buf);

        for dir in std::iter::once(&vector_store_dir).chain(log_dir.iter()) {
            if let Err(err) = fs::create_dir_all(dir) {
                tracing::warn!("Failed to create directory {}: {}", dir.display(), err);
            }
        }

        AppPaths {
            vector_db_path,
            log_dir,
        }
    }
}
