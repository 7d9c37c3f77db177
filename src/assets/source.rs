use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::is_single_component;
use crate::error::AssetError;

/// Read-only store of image folders
///
/// The browser only needs two things from it: the entry names of a folder
/// and the bytes of one entry.
pub trait AssetSource: Send + Sync {
    /// Entry names inside `folder`
    fn list(&self, folder: &str) -> Result<Vec<String>, AssetError>;

    /// Raw bytes of `folder/name`
    fn read(&self, folder: &str, name: &str) -> Result<Vec<u8>, AssetError>;
}

/// Assets laid out on disk as `<root>/<folder>/<image>`
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn folder_path(&self, folder: &str) -> Result<PathBuf, AssetError> {
        if !is_single_component(folder) {
            return Err(AssetError::InvalidName(folder.to_string()));
        }
        Ok(self.root.join(folder))
    }
}

impl AssetSource for DirectoryAssets {
    /// Files directly inside the folder, sorted by name. Hidden files and
    /// sub-directories are skipped.
    fn list(&self, folder: &str) -> Result<Vec<String>, AssetError> {
        let path = self.folder_path(folder)?;
        if !path.is_dir() {
            return Err(AssetError::FolderNotFound(path));
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| AssetError::Io {
                path: path.clone(),
                source: e.into(),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            names.push(name);
        }

        debug!("Listed {} entries in {}", names.len(), path.display());
        Ok(names)
    }

    fn read(&self, folder: &str, name: &str) -> Result<Vec<u8>, AssetError> {
        if !is_single_component(name) {
            return Err(AssetError::InvalidName(name.to_string()));
        }
        let path = self.folder_path(folder)?.join(name);
        std::fs::read(&path).map_err(|source| AssetError::Io { path, source })
    }
}

/// In-memory asset store for tests
#[cfg(test)]
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    pub struct MemoryAssets {
        folders: HashMap<String, Vec<(String, Vec<u8>)>>,
        /// Number of `read` calls, to prove nothing is cached
        pub reads: AtomicUsize,
    }

    impl MemoryAssets {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_file(mut self, folder: &str, name: &str, bytes: Vec<u8>) -> Self {
            self.folders
                .entry(folder.to_string())
                .or_default()
                .push((name.to_string(), bytes));
            self
        }

        pub fn with_empty_folder(mut self, folder: &str) -> Self {
            self.folders.entry(folder.to_string()).or_default();
            self
        }

        pub fn read_count(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl AssetSource for MemoryAssets {
        fn list(&self, folder: &str) -> Result<Vec<String>, AssetError> {
            self.folders
                .get(folder)
                .map(|files| files.iter().map(|(name, _)| name.clone()).collect())
                .ok_or_else(|| AssetError::FolderNotFound(PathBuf::from(folder)))
        }

        fn read(&self, folder: &str, name: &str) -> Result<Vec<u8>, AssetError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.folders
                .get(folder)
                .and_then(|files| files.iter().find(|(n, _)| n == name))
                .map(|(_, bytes)| bytes.clone())
                .ok_or_else(|| AssetError::Io {
                    path: Path::new(folder).join(name),
                    source: std::io::ErrorKind::NotFound.into(),
                })
        }
    }
}
