//! Command implementations shared by the binary and the integration tests.

use anyhow::{anyhow, Result};
use render::{LoadedScene, MarkerDescriptor, SceneSpec, SourceRef};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tilevault_core::config::AppConfig;
use tilevault_core::models::{parse_location, StoredLocation};
use tilevault_core::registry::{ImportReport, Registry};

/// Builds the registry over the configured archive directory and SQLite
/// location store.
pub async fn open_registry(cfg: &AppConfig) -> Result<Registry> {
    let store = storage::SqliteStore::open(&cfg.store.path).await?;
    Ok(Registry::new(&cfg.library.dir, Arc::new(store)))
}

/// One row of `list` output.
#[derive(Debug, Serialize)]
pub struct ListRow {
    pub name: String,
    pub path: PathBuf,
    pub modified: Option<String>,
    pub location: Option<StoredLocation>,
}

pub async fn run_list(cfg: &AppConfig) -> Result<Vec<ListRow>> {
    let registry = open_registry(cfg).await?;
    let entries = registry.list().await?;
    Ok(entries
        .into_iter()
        .map(|entry| {
            let modified = entry.modified_at().map(|t| t.to_rfc3339());
            ListRow {
                name: entry.name,
                path: entry.path,
                modified,
                location: entry.location,
            }
        })
        .collect())
}

pub async fn run_import(cfg: &AppConfig, sources: &[PathBuf]) -> Result<ImportReport> {
    let registry = open_registry(cfg).await?;
    let report = registry.import(sources).await?;
    for failure in &report.failed {
        tracing::warn!(source = %failure.source.display(), reason = %failure.reason, "import skipped");
    }
    Ok(report)
}

pub async fn run_delete(cfg: &AppConfig, name: &str) -> Result<()> {
    let registry = open_registry(cfg).await?;
    registry.delete(name).await?;
    Ok(())
}

pub async fn run_set_location(cfg: &AppConfig, name: &str, lat: &str, lon: &str) -> Result<StoredLocation> {
    let registry = open_registry(cfg).await?;
    let location = parse_location(lat, lon);
    registry.set_location(name, location).await?;
    Ok(location)
}

pub async fn run_prune(cfg: &AppConfig) -> Result<Vec<String>> {
    let registry = open_registry(cfg).await?;
    Ok(registry.prune().await?)
}

#[derive(Debug, Serialize)]
pub struct OpenOutcome {
    pub scene: LoadedScene,
    pub center: StoredLocation,
    pub marker_shown: bool,
}

/// Brings up the configured renderer on an archive (or the built-in default
/// map) and shuts it down again. Typed-in coordinates are persisted for the
/// archive before opening; empty or non-numeric input falls back to (0, 0).
pub async fn run_open(
    cfg: &AppConfig,
    name: Option<&str>,
    lat: Option<&str>,
    lon: Option<&str>,
) -> Result<OpenOutcome> {
    let renderer = render::build(&cfg.map.renderer)?;
    let (source, center, marker) = match name {
        Some(name) => {
            let registry = open_registry(cfg).await?;
            let entries = registry.list().await?;
            let entry = entries
                .into_iter()
                .find(|e| e.name == name)
                .ok_or_else(|| anyhow!("no archive named {name}"))?;
            let center = match (lat, lon) {
                (Some(lat), Some(lon)) => {
                    let entered = parse_location(lat, lon);
                    registry.set_location(name, entered).await?;
                    entered
                }
                (None, None) => entry.location.unwrap_or_default(),
                // A lone coordinate is invalid input; nothing is saved.
                _ => {
                    tracing::warn!("latitude and longitude must be given together; centering on (0, 0)");
                    StoredLocation::default()
                }
            };
            // The marker only appears for user archives, not the default map.
            (
                SourceRef::Archive(entry.path),
                center,
                Some(MarkerDescriptor::default()),
            )
        }
        None => (
            SourceRef::Builtin(cfg.map.default_source.clone()),
            StoredLocation::default(),
            None,
        ),
    };

    let spec = SceneSpec {
        source,
        center,
        marker,
    };
    let marker_shown = spec.marker.is_some();
    let scene = renderer.load(&spec).await?;
    renderer.shutdown().await?;
    Ok(OpenOutcome {
        scene,
        center,
        marker_shown,
    })
}
