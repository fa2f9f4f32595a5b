//! The fluent activity record builder.

use std::sync::Arc;

use actlog_morph::MorphMap;
use actlog_types::{ActivityState, EntityId, JsonObject};
use serde::Serialize;

use crate::error::ActivityError;
use crate::store::ActivityStore;
use crate::subject::SubjectRef;

/// Accumulates the fields of one activity record.
///
/// Every setter takes the builder by value and returns it, so calls chain;
/// a later call overwrites an earlier one. `by` and `on` validate their
/// input immediately and return a `Result`. [`log`](Self::log) consumes the
/// builder, so nothing can be changed after the record is submitted.
///
/// ```rust,ignore
/// let record = logger
///     .activity()
///     .named("info")
///     .by(&user)?
///     .making("update")
///     .on(&post)?
///     .previous_state(before)
///     .log("Edited post")
///     .await?;
/// ```
pub struct ActivityBuilder<S: ActivityStore> {
    registry: Arc<MorphMap>,
    store: Arc<S>,
    options: S::Options,
    state: ActivityState,
    /// Snapshot taken from the entity passed to `on`; an explicit
    /// `having_current` always takes precedence.
    auto_current: Option<JsonObject>,
}

impl<S: ActivityStore> ActivityBuilder<S> {
    pub(crate) fn new(registry: Arc<MorphMap>, store: Arc<S>) -> Self {
        Self {
            registry,
            store,
            options: S::Options::default(),
            state: ActivityState::default(),
            auto_current: None,
        }
    }

    /// Sets the log name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.state.name = Some(name.into());
        self
    }

    /// Sets the description. The text passed to [`log`](Self::log)
    /// replaces it.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.state.description = Some(description.into());
        self
    }

    /// Sets the event name.
    pub fn making(mut self, event: impl Into<String>) -> Self {
        self.state.event = Some(event.into());
        self
    }

    /// Sets the batch id shared by related records.
    pub fn grouped_by(mut self, batch_id: impl Into<String>) -> Self {
        self.state.batch_id = Some(batch_id.into());
        self
    }

    /// Shallow-merges `values` into the record's extra values.
    pub fn with_extra(mut self, values: JsonObject) -> Self {
        self.state.extra.extend(values);
        self
    }

    /// Sets the options forwarded to the store when the record is written.
    pub fn query_options(mut self, options: S::Options) -> Self {
        self.options = options;
        self
    }

    /// Sets the actor.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::InvalidArgument`] for an empty alias and
    /// [`ActivityError::NotFound`] if a typed entity's type is not
    /// registered.
    pub fn by<'e>(mut self, actor: impl Into<SubjectRef<'e>>) -> Result<Self, ActivityError> {
        let (alias, id, _) = self.resolve(actor.into())?;
        self.state.actor_type = Some(alias);
        self.state.actor_id = Some(id);
        Ok(self)
    }

    /// Sets the entity the activity was performed on.
    ///
    /// A typed entity that provides a loggable snapshot supplies the
    /// record's `current` state unless one is set explicitly.
    ///
    /// # Errors
    ///
    /// Same as [`by`](Self::by).
    pub fn on<'e>(mut self, entity: impl Into<SubjectRef<'e>>) -> Result<Self, ActivityError> {
        let (alias, id, snapshot) = self.resolve(entity.into())?;
        self.state.entity_type = Some(alias);
        self.state.entity_id = Some(id);
        self.auto_current = snapshot;
        Ok(self)
    }

    /// Sets the state after the activity.
    pub fn having_current(mut self, state: JsonObject) -> Self {
        self.state.current = Some(state);
        self
    }

    /// Sets the state before the activity.
    pub fn previous_state(mut self, state: JsonObject) -> Self {
        self.state.previous = Some(state);
        self
    }

    /// Returns the record as it would be written, without writing it.
    pub fn state(&self) -> ActivityState {
        let mut state = self.state.clone();
        if state.current.is_none() {
            state.current = self.auto_current.clone();
        }
        state
    }

    /// Writes the record with `description` and returns the store's
    /// record.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::Store`] wrapping whatever the store
    /// returned. Failed writes are not retried.
    pub async fn log(self, description: impl Into<String>) -> Result<S::Record, ActivityError> {
        let mut state = self.state();
        state.description = Some(description.into());

        tracing::debug!(
            name = state.name.as_deref(),
            event = state.event.as_deref(),
            entity_type = state.entity_type.as_deref(),
            batch_id = state.batch_id.as_deref(),
            "writing activity record"
        );

        self.store
            .create(state, self.options)
            .await
            .map_err(|e| ActivityError::Store(Box::new(e)))
    }

    fn resolve(
        &self,
        subject: SubjectRef<'_>,
    ) -> Result<(String, EntityId, Option<JsonObject>), ActivityError> {
        match subject {
            SubjectRef::ById { alias, id } => {
                if alias.trim().is_empty() {
                    return Err(ActivityError::InvalidArgument(
                        "subject alias must not be empty".to_string(),
                    ));
                }
                Ok((alias, id, None))
            }
            SubjectRef::ByEntity(entity) => {
                let alias = self.registry.alias_of(entity)?.to_string();
                Ok((alias, entity.log_id(), entity.loggable_state()))
            }
        }
    }
}

/// Serialises a value into a JSON object snapshot for
/// `having_current` / `previous_state`.
///
/// # Errors
///
/// Returns [`ActivityError::Serialization`] if serialisation fails and
/// [`ActivityError::InvalidArgument`] if the value is not an object.
pub fn snapshot<T: Serialize + ?Sized>(value: &T) -> Result<JsonObject, ActivityError> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(ActivityError::InvalidArgument(format!(
            "snapshot must serialise to a JSON object, got {other}"
        ))),
    }
}
