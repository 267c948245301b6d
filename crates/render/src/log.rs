//! Stand-in renderer that reports what the real map toolkit would do.
//!
//! Reads archive metadata through [`TileSource`] and traces the configuration
//! calls a toolkit-backed renderer would make.

use crate::{
    LoadedScene, MapRenderer, RenderError, SceneSpec, SourceRef, TileSource, DRAW_PRIORITY_BASE,
    DRAW_PRIORITY_MARKER, COORD_SYSTEM,
};

/// Zoom ceiling of the bundled fallback map.
const BUILTIN_MAX_ZOOM: i64 = 6;

#[derive(Debug, Default)]
pub struct LogRenderer;

#[async_trait::async_trait]
impl MapRenderer for LogRenderer {
    async fn load(&self, spec: &SceneSpec) -> Result<LoadedScene, RenderError> {
        let scene = match &spec.source {
            SourceRef::Builtin(name) => LoadedScene {
                source_name: name.clone(),
                min_zoom: 0,
                max_zoom: BUILTIN_MAX_ZOOM,
                coord_system: COORD_SYSTEM.to_string(),
            },
            SourceRef::Archive(path) => {
                let source = TileSource::open(path).await?;
                let info = source.info().clone();
                source.shutdown().await;
                LoadedScene {
                    source_name: info.name,
                    min_zoom: info.min_zoom,
                    max_zoom: info.max_zoom,
                    coord_system: info.coord_system,
                }
            }
        };
        tracing::info!(
            source = %scene.source_name,
            min_zoom = scene.min_zoom,
            max_zoom = scene.max_zoom,
            priority = DRAW_PRIORITY_BASE,
            lat = spec.center.latitude,
            lon = spec.center.longitude,
            "centering map"
        );
        if let Some(marker) = &spec.marker {
            tracing::info!(
                icon = %marker.icon,
                priority = DRAW_PRIORITY_MARKER,
                "placing screen marker"
            );
        }
        Ok(scene)
    }

    async fn shutdown(&self) -> Result<(), RenderError> {
        tracing::debug!("renderer shut down");
        Ok(())
    }
}
