use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Recognized archive extension, matched case-insensitively.
pub const ARCHIVE_EXT: &str = "mbtiles";

/// A latitude/longitude pair persisted per archive name.
/// Written as a whole or not at all; partial pairs are never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl StoredLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Parses user-entered coordinate text. Empty or non-numeric input falls
/// back to (0, 0) instead of being rejected.
pub fn parse_location(lat: &str, lon: &str) -> StoredLocation {
    match (lat.trim().parse::<f64>(), lon.trim().parse::<f64>()) {
        (Ok(latitude), Ok(longitude)) => StoredLocation {
            latitude,
            longitude,
        },
        _ => StoredLocation::default(),
    }
}

/// One archive in the designated directory, joined with its stored location.
/// Rebuilt on every scan; identity across scans is `name` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub location: Option<StoredLocation>,
}

impl FileEntry {
    /// Modification time, read lazily from filesystem metadata.
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        fs::metadata(&self.path)
            .ok()?
            .modified()
            .ok()
            .map(DateTime::<Utc>::from)
    }
}
