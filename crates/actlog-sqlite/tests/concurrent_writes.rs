//! Concurrent writers sharing one pooled store.

use std::collections::HashSet;

use actlog_core::{ActivityLogger, StoredRecord};
use actlog_db::{create_pool, run_migrations, DbRuntimeSettings};
use actlog_morph::MorphMap;
use actlog_sqlite::{ActivityFilter, SqliteActivityStore};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writes_get_distinct_ids() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("concurrent.db");
    let pool = create_pool(
        path.to_str().expect("temp path should be utf-8"),
        DbRuntimeSettings::default(),
    )
    .expect("failed to create pool");
    run_migrations(&pool.get().expect("failed to get connection"))
        .expect("failed to run migrations");

    let logger = ActivityLogger::new(MorphMap::new(), SqliteActivityStore::new(pool));
    let batch = actlog_core::new_batch_id();

    let mut handles = Vec::new();
    for n in 0..16 {
        let logger = logger.clone();
        let batch = batch.clone();
        handles.push(tokio::spawn(async move {
            logger
                .activity()
                .grouped_by(batch)
                .by(("workers", n))
                .expect("raw actor should be accepted")
                .log(format!("worker {n}"))
                .await
                .expect("write should succeed")
                .id
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await.expect("task should not panic"));
    }
    assert_eq!(ids.len(), 16);

    let stored = logger
        .store()
        .query_activities(&ActivityFilter::batch(batch))
        .await
        .expect("query should succeed");
    assert_eq!(stored.len(), 16);
    assert!(stored.iter().all(|r| r.changes().is_empty()));
}
