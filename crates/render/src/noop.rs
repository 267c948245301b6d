use crate::{LoadedScene, MapRenderer, RenderError, SceneSpec, SourceRef, COORD_SYSTEM};

/// Renderer that draws nothing; used in tests and headless runs.
#[derive(Debug, Default)]
pub struct NoopRenderer;

#[async_trait::async_trait]
impl MapRenderer for NoopRenderer {
    async fn load(&self, spec: &SceneSpec) -> Result<LoadedScene, RenderError> {
        let source_name = match &spec.source {
            SourceRef::Builtin(name) => name.clone(),
            SourceRef::Archive(path) => path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("untitled")
                .to_string(),
        };
        Ok(LoadedScene {
            source_name,
            min_zoom: 0,
            max_zoom: 0,
            coord_system: COORD_SYSTEM.to_string(),
        })
    }

    async fn shutdown(&self) -> Result<(), RenderError> {
        Ok(())
    }
}
