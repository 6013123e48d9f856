use urlstore_core::db::migrations::latest_version;
use urlstore_core::db::{open_db, open_db_in_memory, DbError, OpenStage};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_url_table_and_alias_index() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_schema_object_exists(&conn, "table", "url");
    assert_schema_object_exists(&conn, "index", "idx_alias");
}

#[test]
fn url_table_has_expected_columns() {
    let conn = open_db_in_memory().unwrap();

    let mut stmt = conn.prepare("PRAGMA table_info(url);").unwrap();
    let columns: Vec<(String, String, bool, bool)> = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>("name")?,
                row.get::<_, String>("type")?,
                row.get::<_, i64>("notnull")? == 1,
                row.get::<_, i64>("pk")? == 1,
            ))
        })
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(
        columns,
        vec![
            ("id".to_string(), "INTEGER".to_string(), false, true),
            ("alias".to_string(), "TEXT".to_string(), true, false),
            ("url".to_string(), "TEXT".to_string(), true, false),
        ]
    );
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("urls.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO url (url, alias) VALUES ('https://example.com', 'ex1');",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let rows: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM url;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert_eq!(err.stage(), Some(OpenStage::SchemaInit));
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn opening_under_missing_directory_fails_at_open_stage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("urls.db");

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::OpenFailed(_)), "unexpected error: {err}");
    assert_eq!(err.stage(), Some(OpenStage::Open));
}

#[test]
fn opening_non_database_file_fails_at_connectivity_stage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.db");
    std::fs::write(&path, vec![b'x'; 4096]).unwrap();

    let err = open_db(&path).unwrap_err();
    assert!(
        matches!(err, DbError::ConnectivityFailed(_)),
        "unexpected error: {err}"
    );
    assert_eq!(err.stage(), Some(OpenStage::Connectivity));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_schema_object_exists(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
