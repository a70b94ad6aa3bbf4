//! Resolution of the resource file backing a translation.

use log::{debug, info};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use super::errors::FileError;
use super::models::{File, FileId, FileNaming};
use crate::storage::traits::FileStorage;

/// Lookup interface for resource files
pub trait FileLocator: Send + Sync {
    /// Find the file named `file_name` in `base_dir`, registering it if unknown
    fn locate(&self, file_name: &str, base_dir: &Path) -> Result<File, FileError>;

    fn find(&self, id: FileId) -> Result<Option<File>, FileError>;
}

/// Maps `{domain}.{locale}.{extension}` naming onto file identities
#[derive(Debug, Clone)]
pub struct FileResolver<L: FileLocator> {
    locator: L,
}

impl<L: FileLocator> FileResolver<L> {
    pub fn new(locator: L) -> Self {
        Self { locator }
    }

    /// Same naming and directory always give the same file
    pub fn resolve(&self, naming: &FileNaming, base_dir: &Path) -> Result<File, FileError> {
        let file_name = naming.file_name();
        debug!("Resolving {} in {}", file_name, base_dir.display());
        self.locator.locate(&file_name, base_dir)
    }

    pub fn find(&self, id: FileId) -> Result<Option<File>, FileError> {
        self.locator.find(id)
    }
}

/// Default locator over the file table. Paths are stored relative to the
/// resources root.
#[derive(Debug)]
pub struct FileManager<S: FileStorage> {
    storage: Arc<S>,
    resources_dir: PathBuf,
}

impl<S: FileStorage> FileManager<S> {
    pub fn new(storage: Arc<S>, resources_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage,
            resources_dir: resources_dir.into(),
        }
    }

    /// `/`-separated path of `dir` under the resources root. Directories outside
    /// the root are kept as given.
    fn relative_path(&self, dir: &Path) -> String {
        match dir.strip_prefix(&self.resources_dir) {
            Ok(relative) => relative
                .components()
                .filter_map(|component| match component {
                    Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => dir.to_string_lossy().into_owned(),
        }
    }
}

impl<S: FileStorage> FileLocator for FileManager<S> {
    fn locate(&self, file_name: &str, base_dir: &Path) -> Result<File, FileError> {
        let naming = FileNaming::parse(file_name)
            .ok_or_else(|| FileError::InvalidFileName(file_name.to_string()))?;
        let path = self.relative_path(base_dir);

        if let Some(file) = self.storage.find_file_by_location(&path, file_name)? {
            return Ok(file);
        }

        let file = self.storage.insert_file(&naming, &path)?;
        info!("Registered new resource file {} under '{}'", file_name, path);
        Ok(file)
    }

    fn find(&self, id: FileId) -> Result<Option<File>, FileError> {
        Ok(self.storage.find_file(id)?)
    }
}
