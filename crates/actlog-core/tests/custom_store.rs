//! A third-party store plugged in through the persistence port.

use std::sync::Mutex;

use actlog_core::{ActivityLogger, ActivityStore, StoredRecord};
use actlog_morph::MorphMap;
use actlog_types::ActivityState;
use async_trait::async_trait;
use serde_json::json;

#[derive(Debug, Default, Clone, PartialEq)]
struct Tagged {
    tag: Option<&'static str>,
}

struct Written {
    state: ActivityState,
    options: Tagged,
}

impl StoredRecord for Written {
    fn state(&self) -> &ActivityState {
        &self.state
    }
}

#[derive(Debug, thiserror::Error)]
#[error("closed")]
struct Closed;

#[derive(Default)]
struct RecordingStore {
    seen: Mutex<Vec<Tagged>>,
}

#[async_trait]
impl ActivityStore for RecordingStore {
    type Options = Tagged;
    type Record = Written;
    type Error = Closed;

    async fn create(&self, state: ActivityState, options: Tagged) -> Result<Written, Closed> {
        self.seen.lock().map_err(|_| Closed)?.push(options.clone());
        Ok(Written { state, options })
    }
}

#[tokio::test]
async fn query_options_reach_the_store() {
    let logger = ActivityLogger::new(MorphMap::new(), RecordingStore::default());

    let written = logger
        .activity()
        .query_options(Tagged { tag: Some("tx-1") })
        .log("with options")
        .await
        .expect("write should succeed");
    assert_eq!(written.options.tag, Some("tx-1"));

    let written = logger
        .activity()
        .log("default options")
        .await
        .expect("write should succeed");
    assert_eq!(written.options, Tagged::default());

    let seen = logger.store().seen.lock().expect("lock").clone();
    assert_eq!(seen.len(), 2);
}

#[tokio::test]
async fn custom_records_get_changes_and_diff() {
    let logger = ActivityLogger::new(MorphMap::new(), RecordingStore::default());
    let previous = json!({ "meta": { "views": 1, "tags": ["a"] } });
    let current = json!({ "meta": { "views": 2, "tags": ["a"] } });

    let written = logger
        .activity()
        .previous_state(previous.as_object().cloned().expect("object"))
        .having_current(current.as_object().cloned().expect("object"))
        .log("counted a view")
        .await
        .expect("write should succeed");

    assert_eq!(written.diff().to_json(), json!({ "meta": { "views": 2 } }));
    assert_eq!(
        written.changes().to_json(),
        json!({ "meta": { "views": { "oldValue": 1, "newValue": 2 } } })
    );
}

#[tokio::test]
async fn cloned_loggers_share_the_store() {
    let logger = ActivityLogger::new(MorphMap::new(), RecordingStore::default());
    let other = logger.clone();

    other.activity().log("from clone").await.expect("write");
    assert_eq!(logger.store().seen.lock().expect("lock").len(), 1);
}
