use super::*;

#[tokio::test]
async fn missing_key_reads_as_none() {
    let store = SqliteKeyValueStore::in_memory().await.expect("db");
    assert_eq!(store.get("songFormData").await.expect("get"), None);
}

#[tokio::test]
async fn put_overwrites_previous_value() {
    let store = SqliteKeyValueStore::in_memory().await.expect("db");
    store.put("songFormData", r#"{"artist":"Drake"}"#).await.expect("first put");
    store.put("songFormData", r#"{"artist":"SZA"}"#).await.expect("second put");

    assert_eq!(
        store.get("songFormData").await.expect("get").as_deref(),
        Some(r#"{"artist":"SZA"}"#)
    );
    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv_records")
        .fetch_one(store.pool())
        .await
        .expect("count");
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn remove_erases_only_the_named_key() {
    let store = SqliteKeyValueStore::in_memory().await.expect("db");
    store.put("a", "1").await.expect("put a");
    store.put("b", "2").await.expect("put b");

    store.remove("a").await.expect("remove a");
    store.remove("never-written").await.expect("remove missing");

    assert_eq!(store.get("a").await.expect("get a"), None);
    assert_eq!(store.get("b").await.expect("get b").as_deref(), Some("2"));
}

#[tokio::test]
async fn creates_database_file_and_survives_reopen() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("preferences.sqlite3");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let store = SqliteKeyValueStore::open(&database_url).await.expect("db");
    store.put("songFormData", "{}").await.expect("put");
    store.pool().close().await;
    drop(store);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    let reopened = SqliteKeyValueStore::open(&database_url).await.expect("reopen");
    assert_eq!(
        reopened.get("songFormData").await.expect("get").as_deref(),
        Some("{}")
    );
}

#[tokio::test]
async fn memory_store_round_trips() {
    let store = MemoryKeyValueStore::new();
    store.put("k", "v").await.expect("put");
    assert_eq!(store.get("k").await.expect("get").as_deref(), Some("v"));
    store.remove("k").await.expect("remove");
    assert_eq!(store.get("k").await.expect("get"), None);
}

#[test]
fn memory_url_has_no_file_path() {
    assert_eq!(sqlite_path(MEMORY_DATABASE_URL), None);
    assert_eq!(sqlite_path("postgres://localhost/db"), None);
    assert_eq!(
        sqlite_path("sqlite://./data/prefs.db?mode=rwc"),
        Some(PathBuf::from("./data/prefs.db"))
    );
}
