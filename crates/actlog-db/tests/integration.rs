use actlog_db::{create_pool, run_migrations, DbRuntimeSettings};

#[test]
fn db_initialization_works() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("actlog.db");
    let path = path.to_str().expect("temp path should be utf-8");

    let pool = create_pool(path, DbRuntimeSettings::default()).expect("failed to create pool");
    let conn = pool.get().expect("failed to get connection");
    let applied = run_migrations(&conn).expect("failed to run migrations");
    assert_eq!(applied, 2);

    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master
             WHERE type='table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )
        .expect("failed to prepare table query");
    let tables: Vec<String> = stmt
        .query_map([], |row| row.get(0))
        .expect("failed to execute table query")
        .map(|r| r.expect("failed to read table name"))
        .collect();

    assert_eq!(tables, vec!["_actlog_migrations", "activity_logs"]);
}

#[test]
fn schema_is_visible_to_every_pooled_connection() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("shared.db");
    let path = path.to_str().expect("temp path should be utf-8");

    let pool = create_pool(path, DbRuntimeSettings::default()).expect("failed to create pool");
    {
        let conn = pool.get().expect("failed to get connection");
        run_migrations(&conn).expect("failed to run migrations");
    }

    let first = pool.get().expect("first connection");
    let second = pool.get().expect("second connection");
    for conn in [&first, &second] {
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM activity_logs", [], |row| row.get(0))
            .expect("activity_logs should exist");
        assert_eq!(count, 0);
    }

    let reapplied = run_migrations(&second).expect("rerun should succeed");
    assert_eq!(reapplied, 0);
}
