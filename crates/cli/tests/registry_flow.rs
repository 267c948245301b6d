use std::fs;
use std::sync::Arc;
use tempfile::tempdir;
use tilevault_core::models::StoredLocation;
use tilevault_core::registry::Registry;

#[tokio::test]
async fn import_list_locate_delete_flow() {
    let temp = tempdir().unwrap();
    let archive_dir = temp.path().join("archives");
    let inbox = temp.path().join("inbox");
    fs::create_dir_all(&inbox).unwrap();

    fs::write(inbox.join("springdale.mbtiles"), b"tiles").unwrap();
    fs::write(inbox.join("notes.txt"), b"text").unwrap();

    let store = storage::SqliteStore::open("sqlite::memory:").await.unwrap();
    let registry = Registry::new(&archive_dir, Arc::new(store.clone()));

    // Import keeps the archive, discards the stray text file.
    let report = registry
        .import(&[inbox.join("springdale.mbtiles"), inbox.join("notes.txt")])
        .await
        .unwrap();
    assert_eq!(report.imported, vec!["springdale.mbtiles"]);
    assert_eq!(report.discarded.len(), 1);
    assert!(report.failed.is_empty());
    assert!(!inbox.join("notes.txt").exists());

    let entries = registry.list().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "springdale.mbtiles");
    assert!(entries[0].location.is_none());
    assert!(entries[0].modified_at().is_some());

    // Stored coordinates show up on the next scan.
    let loc = StoredLocation::new(34.319422, -83.910534);
    registry.set_location("springdale.mbtiles", loc).await.unwrap();
    let entries = registry.list().await.unwrap();
    assert_eq!(entries[0].location, Some(loc));

    // Delete removes both the file and the stored pair.
    registry.delete("springdale.mbtiles").await.unwrap();
    assert!(registry.list().await.unwrap().is_empty());
    assert!(tilevault_core::store::LocationStore::get(&store, "springdale.mbtiles")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn prune_reconciles_store_with_disk() {
    let temp = tempdir().unwrap();
    let archive_dir = temp.path().join("archives");
    fs::create_dir_all(&archive_dir).unwrap();
    fs::write(archive_dir.join("kept.mbtiles"), b"tiles").unwrap();

    let store = storage::SqliteStore::open("sqlite::memory:").await.unwrap();
    let registry = Registry::new(&archive_dir, Arc::new(store.clone()));

    registry
        .set_location("kept.mbtiles", StoredLocation::new(10.5, 77.25))
        .await
        .unwrap();
    // Simulate a file deleted behind the registry's back.
    use tilevault_core::store::LocationStore;
    store
        .set("gone.mbtiles", StoredLocation::new(1.0, 1.0))
        .await
        .unwrap();

    let pruned = registry.prune().await.unwrap();
    assert_eq!(pruned, vec!["gone.mbtiles"]);
    assert_eq!(store.names().await.unwrap(), vec!["kept.mbtiles"]);
}
