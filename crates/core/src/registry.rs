//! Reconciles on-disk tile archives with stored coordinates.
//!
//! The registry keeps no cached view: every operation re-reads the designated
//! directory and the location store, which stay the two sources of truth.

use crate::models::{FileEntry, StoredLocation, ARCHIVE_EXT};
use crate::store::{LocationStore, StoreError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("filesystem: {0}")]
    Filesystem(#[from] io::Error),
    #[error("store: {0}")]
    Store(#[from] StoreError),
    #[error("no archive named {0}")]
    NotFound(String),
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ImportFailure {
    pub source: PathBuf,
    pub reason: String,
}

/// Per-source outcome of an import run. A bad entry never aborts the rest.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ImportReport {
    pub imported: Vec<String>,
    pub discarded: Vec<PathBuf>,
    pub failed: Vec<ImportFailure>,
}

pub struct Registry {
    dir: PathBuf,
    extension: String,
    store: Arc<dyn LocationStore>,
}

impl Registry {
    pub fn new(dir: impl Into<PathBuf>, store: Arc<dyn LocationStore>) -> Self {
        Self {
            dir: dir.into(),
            extension: ARCHIVE_EXT.to_string(),
            store,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Scans the designated directory and joins each archive with its stored
    /// location. Hidden entries and foreign extensions are skipped; ordering
    /// follows filesystem enumeration and is not guaranteed stable.
    pub async fn list(&self) -> Result<Vec<FileEntry>, RegistryError> {
        if !self.dir.is_dir() {
            return Err(RegistryError::Filesystem(io::Error::new(
                io::ErrorKind::NotFound,
                format!("archive directory {} missing", self.dir.display()),
            )));
        }
        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    tracing::warn!(%err, "skipping unreadable entry");
                    continue;
                }
            };
            let path = entry.path();
            if entry.file_type().is_dir() || is_hidden(path) || !self.matches_extension(path) {
                continue;
            }
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(n) => n.to_string(),
                None => continue,
            };
            // A failed lookup degrades to "no stored value"; it never fails
            // the listing.
            let location = match self.store.get(&name).await {
                Ok(location) => location,
                Err(err) => {
                    tracing::warn!(%name, %err, "location lookup failed");
                    None
                }
            };
            entries.push(FileEntry {
                name,
                path: path.to_path_buf(),
                location,
            });
        }
        Ok(entries)
    }

    /// Moves picked files into the designated directory. Sources with a
    /// foreign extension are deleted and reported as discarded; a same-named
    /// archive already present is silently replaced.
    pub async fn import(&self, sources: &[PathBuf]) -> Result<ImportReport, RegistryError> {
        fs::create_dir_all(&self.dir)?;
        let mut report = ImportReport::default();
        for source in sources {
            if !source.is_file() {
                report.failed.push(ImportFailure {
                    source: source.clone(),
                    reason: "source file missing".to_string(),
                });
                continue;
            }
            if !self.matches_extension(source) {
                if let Err(err) = fs::remove_file(source) {
                    tracing::warn!(source = %source.display(), %err, "could not remove non-archive source");
                }
                report.discarded.push(source.clone());
                continue;
            }
            let name = match source.file_name().and_then(|n| n.to_str()) {
                Some(n) => n.to_string(),
                None => {
                    report.failed.push(ImportFailure {
                        source: source.clone(),
                        reason: "file name is not valid UTF-8".to_string(),
                    });
                    continue;
                }
            };
            let dest = self.dir.join(&name);
            if dest.exists() {
                if let Err(err) = fs::remove_file(&dest) {
                    report.failed.push(ImportFailure {
                        source: source.clone(),
                        reason: format!("could not replace existing archive: {err}"),
                    });
                    continue;
                }
                tracing::debug!(%name, "replacing existing archive");
            }
            match move_file(source, &dest) {
                Ok(()) => report.imported.push(name),
                Err(err) => report.failed.push(ImportFailure {
                    source: source.clone(),
                    reason: err.to_string(),
                }),
            }
        }
        Ok(report)
    }

    /// Removes the archive and its stored location. Filesystem removal comes
    /// first; on failure the store is left untouched so both sides keep
    /// matching what is actually on disk.
    pub async fn delete(&self, name: &str) -> Result<(), RegistryError> {
        let path = self.dir.join(name);
        if !path.is_file() {
            return Err(RegistryError::NotFound(name.to_string()));
        }
        fs::remove_file(&path)?;
        self.store.remove(name).await?;
        Ok(())
    }

    /// Upserts the stored location for an archive that exists on disk.
    pub async fn set_location(
        &self,
        name: &str,
        location: StoredLocation,
    ) -> Result<(), RegistryError> {
        if !self.dir.join(name).is_file() {
            return Err(RegistryError::NotFound(name.to_string()));
        }
        self.store.set(name, location).await?;
        Ok(())
    }

    /// Drops stored locations whose archive no longer exists on disk and
    /// returns the pruned names.
    pub async fn prune(&self) -> Result<Vec<String>, RegistryError> {
        let mut pruned = Vec::new();
        for name in self.store.names().await? {
            if !self.dir.join(&name).is_file() {
                self.store.remove(&name).await?;
                pruned.push(name);
            }
        }
        Ok(pruned)
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(&self.extension))
            .unwrap_or(false)
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) => {
            // Cross-device moves need copy then delete.
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}
