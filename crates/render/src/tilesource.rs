//! Reads mbtiles archive metadata: zoom range, tile format, coordinate system.
//!
//! An mbtiles archive is an SQLite database with a `metadata` key/value table
//! and a `tiles` table. Only the metadata is touched here; tile payloads stay
//! opaque.

use crate::RenderError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::path::Path;

/// mbtiles archives are always spherical mercator.
pub const COORD_SYSTEM: &str = "EPSG:3857";

/// Vector tile formats the image loader cannot draw.
const VECTOR_FORMATS: &[&str] = &["pbf", "mvt"];

#[derive(Debug, Clone, serde::Serialize)]
pub struct TileSourceInfo {
    pub name: String,
    pub format: String,
    pub min_zoom: i64,
    pub max_zoom: i64,
    pub bounds: Option<String>,
    pub center: Option<String>,
    pub coord_system: String,
}

#[derive(Debug)]
pub struct TileSource {
    pool: SqlitePool,
    info: TileSourceInfo,
}

impl TileSource {
    /// Opens an archive read-only and validates that its format is renderable.
    pub async fn open(path: &Path) -> Result<Self, RenderError> {
        let opts = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .map_err(source_err)?;
        let info = read_info(&pool, path).await?;
        if VECTOR_FORMATS.contains(&info.format.as_str()) {
            pool.close().await;
            return Err(RenderError::UnsupportedFormat(info.format));
        }
        Ok(Self { pool, info })
    }

    pub fn info(&self) -> &TileSourceInfo {
        &self.info
    }

    /// Releases the underlying connection. Required before the source goes
    /// away.
    pub async fn shutdown(self) {
        self.pool.close().await;
    }
}

async fn read_info(pool: &SqlitePool, path: &Path) -> Result<TileSourceInfo, RenderError> {
    let rows = sqlx::query("SELECT name, value FROM metadata")
        .fetch_all(pool)
        .await
        .map_err(source_err)?;

    let mut name = None;
    let mut format = None;
    let mut min_zoom = None;
    let mut max_zoom = None;
    let mut bounds = None;
    let mut center = None;
    for row in rows {
        let key: String = row.get(0);
        let value: String = row.get(1);
        match key.as_str() {
            "name" => name = Some(value),
            "format" => format = Some(value),
            "minzoom" => min_zoom = value.parse::<i64>().ok(),
            "maxzoom" => max_zoom = value.parse::<i64>().ok(),
            "bounds" => bounds = Some(value),
            "center" => center = Some(value),
            _ => {}
        }
    }

    let (min_zoom, max_zoom) = match (min_zoom, max_zoom) {
        (Some(lo), Some(hi)) => (lo, hi),
        // Older archives omit the zoom keys; fall back to the tiles table.
        _ => zoom_range_from_tiles(pool).await?,
    };

    let name = name.unwrap_or_else(|| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string()
    });

    Ok(TileSourceInfo {
        name,
        format: format.unwrap_or_else(|| "png".to_string()),
        min_zoom,
        max_zoom,
        bounds,
        center,
        coord_system: COORD_SYSTEM.to_string(),
    })
}

async fn zoom_range_from_tiles(pool: &SqlitePool) -> Result<(i64, i64), RenderError> {
    let row = sqlx::query("SELECT MIN(zoom_level), MAX(zoom_level) FROM tiles")
        .fetch_one(pool)
        .await
        .map_err(source_err)?;
    let lo = row.try_get::<i64, _>(0).unwrap_or(0);
    let hi = row.try_get::<i64, _>(1).unwrap_or(0);
    Ok((lo, hi))
}

fn source_err(err: sqlx::Error) -> RenderError {
    RenderError::Source(err.to_string())
}
