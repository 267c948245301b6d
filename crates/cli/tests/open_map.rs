use cli::commands;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use tilevault_core::config::{AppConfig, LibraryConfig, MapConfig, StoreConfig};

async fn write_archive(dir: &Path, name: &str, format: &str) -> PathBuf {
    let path = dir.join(name);
    let opts = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .unwrap();
    sqlx::query("CREATE TABLE metadata (name TEXT, value TEXT)")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("CREATE TABLE tiles (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, tile_data BLOB)")
        .execute(&pool)
        .await
        .unwrap();
    for (key, value) in [("format", format), ("minzoom", "1"), ("maxzoom", "5")] {
        sqlx::query("INSERT INTO metadata (name, value) VALUES (?1, ?2)")
            .bind(key)
            .bind(value)
            .execute(&pool)
            .await
            .unwrap();
    }
    pool.close().await;
    path
}

fn config_at(root: &Path) -> AppConfig {
    AppConfig {
        library: LibraryConfig {
            dir: root.join("archives").to_string_lossy().into_owned(),
        },
        store: StoreConfig {
            path: root.join("vault.db").to_string_lossy().into_owned(),
        },
        map: MapConfig {
            renderer: "log".to_string(),
            default_source: "countries".to_string(),
        },
    }
}

#[tokio::test]
async fn open_archive_reads_zoom_range_and_saves_entered_location() {
    let temp = tempdir().unwrap();
    let cfg = config_at(temp.path());
    let inbox = temp.path().join("inbox");
    fs::create_dir_all(&inbox).unwrap();
    write_archive(&inbox, "springdale.mbtiles", "png").await;

    let report = commands::run_import(&cfg, &[inbox.join("springdale.mbtiles")])
        .await
        .unwrap();
    assert_eq!(report.imported, vec!["springdale.mbtiles"]);

    let outcome = commands::run_open(
        &cfg,
        Some("springdale.mbtiles"),
        Some("34.31"),
        Some("-83.91"),
    )
    .await
    .unwrap();
    assert_eq!((outcome.scene.min_zoom, outcome.scene.max_zoom), (1, 5));
    assert!(outcome.marker_shown);
    assert_eq!(
        (outcome.center.latitude, outcome.center.longitude),
        (34.31, -83.91)
    );

    // The entered pair was persisted and comes back on the next list.
    let rows = commands::run_list(&cfg).await.unwrap();
    let loc = rows[0].location.unwrap();
    assert_eq!((loc.latitude, loc.longitude), (34.31, -83.91));
}

#[tokio::test]
async fn open_falls_back_to_origin_on_bad_coordinates() {
    let temp = tempdir().unwrap();
    let cfg = config_at(temp.path());
    let inbox = temp.path().join("inbox");
    fs::create_dir_all(&inbox).unwrap();
    write_archive(&inbox, "map.mbtiles", "png").await;
    commands::run_import(&cfg, &[inbox.join("map.mbtiles")])
        .await
        .unwrap();

    let outcome = commands::run_open(&cfg, Some("map.mbtiles"), Some("north"), Some(""))
        .await
        .unwrap();
    assert_eq!(
        (outcome.center.latitude, outcome.center.longitude),
        (0.0, 0.0)
    );
}

#[tokio::test]
async fn open_with_half_a_coordinate_pair_saves_nothing() {
    let temp = tempdir().unwrap();
    let cfg = config_at(temp.path());
    let inbox = temp.path().join("inbox");
    fs::create_dir_all(&inbox).unwrap();
    write_archive(&inbox, "map.mbtiles", "png").await;
    commands::run_import(&cfg, &[inbox.join("map.mbtiles")])
        .await
        .unwrap();

    let outcome = commands::run_open(&cfg, Some("map.mbtiles"), Some("34.31"), None)
        .await
        .unwrap();
    assert_eq!(
        (outcome.center.latitude, outcome.center.longitude),
        (0.0, 0.0)
    );

    // The lone coordinate was not persisted.
    let rows = commands::run_list(&cfg).await.unwrap();
    assert!(rows[0].location.is_none());
}

#[tokio::test]
async fn open_default_map_shows_no_marker() {
    let temp = tempdir().unwrap();
    let cfg = config_at(temp.path());
    fs::create_dir_all(temp.path().join("archives")).unwrap();

    let outcome = commands::run_open(&cfg, None, None, None).await.unwrap();
    assert_eq!(outcome.scene.source_name, "countries");
    assert!(!outcome.marker_shown);
}

#[tokio::test]
async fn vector_archives_are_refused() {
    let temp = tempdir().unwrap();
    let cfg = config_at(temp.path());
    let inbox = temp.path().join("inbox");
    fs::create_dir_all(&inbox).unwrap();
    write_archive(&inbox, "vectors.mbtiles", "pbf").await;
    commands::run_import(&cfg, &[inbox.join("vectors.mbtiles")])
        .await
        .unwrap();

    let err = commands::run_open(&cfg, Some("vectors.mbtiles"), None, None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not renderable"));
}
