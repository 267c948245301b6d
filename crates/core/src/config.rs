use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub library: LibraryConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub map: MapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Designated directory holding imported archives.
    pub dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_renderer")]
    pub renderer: String,
    /// Tile source shown when no archive is selected.
    #[serde(default = "default_source")]
    pub default_source: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            renderer: default_renderer(),
            default_source: default_source(),
        }
    }
}

fn default_renderer() -> String {
    "log".to_string()
}

fn default_source() -> String {
    "countries".to_string()
}

pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}
