// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use dynfeed_core::{DataSourceInfo, FeedError, FeedEvent, Observation};
use dynfeed_error::Result;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Observations kept per entity unless configured otherwise.
pub const DEFAULT_MAXIMUM_OBSERVATIONS: usize = 20;

/// One entity and its most recent observations, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedEntity {
    id: String,
    observations: VecDeque<Observation>,
}

impl TrackedEntity {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The newest observation.
    pub fn latest(&self) -> Option<&Observation> {
        self.observations.back()
    }

    pub fn observations(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter()
    }

    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }
}

/// The last `ConnectionFailure` the tracker saw.
#[derive(Debug, Clone)]
pub struct LastFailure {
    pub cause: Arc<FeedError>,
    pub recoverable: bool,
}

#[derive(Debug, Default)]
struct TrackerState {
    entities: HashMap<String, TrackedEntity>,
    last_failure: Option<LastFailure>,
    unidentified: u64,
}

/// Groups observations by the value of the schema's entity-id field.
///
/// Safe to share: the tracking task applies events while callers read.
#[derive(Debug)]
pub struct EntityTracker {
    entity_id_field: String,
    maximum_observations: usize,
    state: Mutex<TrackerState>,
}

impl EntityTracker {
    #[must_use]
    pub fn new(schema: &DataSourceInfo) -> Self {
        Self {
            entity_id_field: schema.entity_id_field().to_string(),
            maximum_observations: DEFAULT_MAXIMUM_OBSERVATIONS,
            state: Mutex::new(TrackerState::default()),
        }
    }

    /// # Errors
    ///
    /// Returns `InvalidConfig` for zero.
    pub fn with_maximum_observations(mut self, maximum_observations: usize) -> Result<Self> {
        if maximum_observations == 0 {
            return Err(FeedError::invalid_config(
                "maximum_observations must be greater than zero",
            ));
        }
        self.maximum_observations = maximum_observations;
        Ok(self)
    }

    pub fn entity_id_field(&self) -> &str {
        &self.entity_id_field
    }

    pub const fn maximum_observations(&self) -> usize {
        self.maximum_observations
    }

    /// Applies one feed event. Returns the id of the entity that changed, if any.
    ///
    /// Observations without an entity id are counted and dropped.
    pub fn apply(&self, event: FeedEvent) -> Option<String> {
        match event {
            FeedEvent::NewObservation(observation) => self.track(observation),
            FeedEvent::ConnectionFailure { cause, recoverable } => {
                self.state.lock().last_failure = Some(LastFailure { cause, recoverable });
                None
            }
        }
    }

    fn track(&self, observation: Observation) -> Option<String> {
        let mut state = self.state.lock();

        let Some(id) = observation.entity_id(&self.entity_id_field) else {
            state.unidentified += 1;
            return None;
        };

        let entity = state
            .entities
            .entry(id.clone())
            .or_insert_with(|| TrackedEntity {
                id: id.clone(),
                observations: VecDeque::with_capacity(self.maximum_observations),
            });
        entity.observations.push_back(observation);
        while entity.observations.len() > self.maximum_observations {
            entity.observations.pop_front();
        }
        Some(id)
    }

    /// Snapshot of one entity.
    pub fn entity(&self, id: &str) -> Option<TrackedEntity> {
        self.state.lock().entities.get(id).cloned()
    }

    /// Ids of all tracked entities, sorted.
    pub fn entities(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.state.lock().entities.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.state.lock().entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entities.is_empty()
    }

    /// Observations dropped because they carried no entity id.
    pub fn unidentified(&self) -> u64 {
        self.state.lock().unidentified
    }

    pub fn last_failure(&self) -> Option<LastFailure> {
        self.state.lock().last_failure.clone()
    }

    /// Forgets every entity and the last failure.
    pub fn purge_all(&self) {
        let mut state = self.state.lock();
        state.entities.clear();
        state.last_failure = None;
        state.unidentified = 0;
    }
}
