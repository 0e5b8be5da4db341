use storage::repository::{KeyValueStore, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_kv_round_trips_and_overwrites() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get("tarotProgress").await.unwrap(), None);

    repo.set("tarotProgress", r#"["El Mago"]"#).await.unwrap();
    repo.set("tarotProgress", r#"["El Mago","La Luna"]"#)
        .await
        .unwrap();

    let stored = repo.get("tarotProgress").await.unwrap();
    assert_eq!(stored.as_deref(), Some(r#"["El Mago","La Luna"]"#));
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.set("k", "v").await.unwrap();
    repo.migrate().await.expect("second migrate");
    assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn storage_sqlite_exposes_kv() {
    let storage = Storage::sqlite("sqlite:file:memdb_kv_storage?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage.kv.set("a", "1").await.unwrap();
    assert_eq!(storage.kv.get("a").await.unwrap().as_deref(), Some("1"));
}
