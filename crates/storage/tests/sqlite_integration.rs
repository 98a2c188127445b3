use sqlx::SqlitePool;
use storage::repository::{KeyValueStore, Storage};
use storage::sqlite::SqliteStore;

/// Second pool on the same shared-cache database, for inspecting tables.
async fn inspect(url: &str) -> SqlitePool {
    SqlitePool::connect(url).await.expect("inspect pool")
}

#[tokio::test]
async fn sqlite_round_trips_values() {
    let url = "sqlite:file:memdb_kv_roundtrip?mode=memory&cache=shared";
    let repo = SqliteStore::connect(url)
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert!(repo.get("progressStore").await.unwrap().is_none());

    repo.set("progressStore", r#"{"numberBond":{"correctCount":1}}"#)
        .await
        .unwrap();
    repo.set("progressStore", r#"{"numberBond":{"correctCount":2}}"#)
        .await
        .unwrap();

    let value = repo.get("progressStore").await.unwrap();
    assert_eq!(value.as_deref(), Some(r#"{"numberBond":{"correctCount":2}}"#));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv_entries")
        .fetch_one(&inspect(url).await)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn sqlite_remove_deletes_key() {
    let repo = SqliteStore::connect("sqlite:file:memdb_kv_remove?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.set("answerStats", "{}").await.unwrap();
    repo.remove("answerStats").await.unwrap();
    repo.remove("answerStats").await.unwrap();
    assert!(repo.get("answerStats").await.unwrap().is_none());
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let url = "sqlite:file:memdb_kv_migrate?mode=memory&cache=shared";
    let repo = SqliteStore::connect(url)
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    let versions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
        .fetch_one(&inspect(url).await)
        .await
        .unwrap();
    assert_eq!(versions, 1);
}

#[tokio::test]
async fn storage_sqlite_memory_keeps_data_across_calls() {
    let storage = Storage::sqlite("sqlite::memory:").await.expect("storage");
    storage.kv.set("stars", "3").await.unwrap();
    assert_eq!(storage.kv.get("stars").await.unwrap().as_deref(), Some("3"));
}

#[tokio::test]
async fn connect_creates_missing_database_file() {
    let dir = std::env::temp_dir().join(format!("bonds-sqlite-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("progress.sqlite3");
    let _ = std::fs::remove_file(&path);

    let storage = Storage::sqlite(&format!("sqlite://{}", path.display()))
        .await
        .expect("storage");
    storage.kv.set("progressStore", "{}").await.unwrap();
    assert!(path.exists());

    drop(storage);
    let _ = std::fs::remove_dir_all(&dir);
}
