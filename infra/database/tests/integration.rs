use shub_database::*;

#[tokio::test]
async fn connect_in_memory_and_health_check() {
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "test_db")
        .init()
        .await
        .expect("connect to mem://");

    // Health should be OK for mem://
    db.health().await.expect("health check");
    db.use_ns("test_ns").use_db("test_db").await.expect("session switch");
}

#[tokio::test]
async fn missing_parameters_fail_validation() {
    let err = Database::builder().init().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));
}

const NOTE_SCHEMA: Migration = Migration::new(
    "note",
    "0001",
    "DEFINE TABLE note SCHEMAFULL;
     DEFINE FIELD title ON note TYPE string;",
);

#[tokio::test]
async fn migrations_apply_once_and_then_skip() {
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "migrations")
        .migrations([NOTE_SCHEMA])
        .init()
        .await
        .expect("connect with migrations");

    // Re-running the same migration set must be a no-op.
    let report = db.apply_migrations(&[NOTE_SCHEMA]).await.expect("second run");
    assert!(report.applied.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].slice, "note");
}

#[tokio::test]
async fn changed_script_is_detected_as_checksum_mismatch() {
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "checksums")
        .migrations([NOTE_SCHEMA])
        .init()
        .await
        .expect("connect with migrations");

    let tampered = Migration::new("note", "0001", "DEFINE TABLE note SCHEMALESS;");
    let err = db.apply_migrations(&[tampered]).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Migration { .. }));
}
