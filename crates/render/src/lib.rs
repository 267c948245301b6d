//! Renderer abstractions for the map view.
//!
//! The actual globe/map toolkit lives outside this workspace; this crate is
//! the seam the rest of the code talks to, plus the mbtiles metadata reader
//! a renderer needs to configure itself.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tilevault_core::models::StoredLocation;

pub mod log;
pub mod noop;
pub mod tilesource;

pub use tilesource::{TileSource, TileSourceInfo, COORD_SYSTEM};

/// Draw priority of the base tile layer.
pub const DRAW_PRIORITY_BASE: i32 = 100;
/// Screen markers draw well above the base layer.
pub const DRAW_PRIORITY_MARKER: i32 = DRAW_PRIORITY_BASE + 3000;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("tile format {0} is not renderable")]
    UnsupportedFormat(String),
    #[error("tile source failed: {0}")]
    Source(String),
    #[error("unknown renderer: {0}")]
    UnknownRenderer(String),
}

/// Screen marker placed at the stored location of a user archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerDescriptor {
    pub icon: String,
    pub size: (f32, f32),
    pub offset: (f32, f32),
    pub layout_importance: f32,
}

impl Default for MarkerDescriptor {
    fn default() -> Self {
        Self {
            icon: "blue_marker".to_string(),
            size: (27.0, 34.0),
            offset: (0.0, 17.0),
            layout_importance: f32::INFINITY,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SourceRef {
    /// Bundled fallback map shown when no archive is selected.
    Builtin(String),
    Archive(PathBuf),
}

/// Everything a renderer needs to bring up the map view.
#[derive(Debug, Clone)]
pub struct SceneSpec {
    pub source: SourceRef,
    pub center: StoredLocation,
    pub marker: Option<MarkerDescriptor>,
}

/// Read-only properties of the tile source a renderer loaded.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedScene {
    pub source_name: String,
    pub min_zoom: i64,
    pub max_zoom: i64,
    pub coord_system: String,
}

#[async_trait::async_trait]
pub trait MapRenderer: Send + Sync {
    async fn load(&self, spec: &SceneSpec) -> Result<LoadedScene, RenderError>;
    /// Must be called when the view goes away; releases fetcher and loader
    /// resources held by the toolkit.
    async fn shutdown(&self) -> Result<(), RenderError>;
}

/// Selects a renderer by its configured name.
pub fn build(name: &str) -> Result<Box<dyn MapRenderer>, RenderError> {
    match name {
        "log" => Ok(Box::new(log::LogRenderer::default())),
        "noop" => Ok(Box::new(noop::NoopRenderer)),
        other => Err(RenderError::UnknownRenderer(other.to_string())),
    }
}
