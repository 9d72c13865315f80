//! Polling change detection against a record store

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use serde::Serialize;

use super::{ChangeEvent, ChangeKind};
use crate::error::Result;
use crate::store::{RecordStore, Resource};

/// Wait before the first probe so it does not race the initial fetch
pub const SUBSCRIBE_DELAY: Duration = Duration::from_millis(500);

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Stable-within-process hash of a fetched collection
pub fn collection_fingerprint<T: Serialize>(items: &[T]) -> u64 {
    let mut hasher = DefaultHasher::new();
    serde_json::to_vec(items)
        .unwrap_or_default()
        .hash(&mut hasher);
    hasher.finish()
}

/// Detects changes made by other devices by comparing collection fingerprints
#[derive(Debug)]
pub struct ChangeWatcher {
    sync_code: String,
    resources: Vec<Resource>,
    interval: Duration,
    fingerprints: HashMap<Resource, u64>,
    started: bool,
}

impl ChangeWatcher {
    pub fn new(sync_code: impl Into<String>, resources: &[Resource]) -> Self {
        Self {
            sync_code: sync_code.into(),
            resources: resources.to_vec(),
            interval: DEFAULT_POLL_INTERVAL,
            fingerprints: HashMap::new(),
            started: false,
        }
    }

    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Wait for the next batch of changes.
    ///
    /// The first call sleeps [`SUBSCRIBE_DELAY`] and records a baseline; later
    /// calls poll every interval until something differs from it.
    pub async fn next<S: RecordStore>(&mut self, store: &S) -> Result<Vec<ChangeEvent>> {
        if !self.started {
            tokio::time::sleep(SUBSCRIBE_DELAY).await;
            self.poll(store).await?;
            self.started = true;
            tracing::info!(
                "Watching {:?} for {} every {:?}",
                self.resources,
                self.sync_code,
                self.interval
            );
        }
        loop {
            tokio::time::sleep(self.interval).await;
            let events = self.poll(store).await?;
            if !events.is_empty() {
                return Ok(events);
            }
        }
    }

    /// Probe every watched collection once.
    ///
    /// Collections seen for the first time only record a baseline.
    pub async fn poll<S: RecordStore>(&mut self, store: &S) -> Result<Vec<ChangeEvent>> {
        let mut events = Vec::new();
        for resource in self.resources.clone() {
            let fingerprint = probe(store, &self.sync_code, resource).await?;
            match self.fingerprints.insert(resource, fingerprint) {
                Some(previous) if previous != fingerprint => {
                    tracing::debug!("Detected change in {resource} for {}", self.sync_code);
                    events.push(ChangeEvent::new(
                        resource,
                        self.sync_code.clone(),
                        ChangeKind::Changed,
                    ));
                }
                _ => {}
            }
        }
        Ok(events)
    }
}

async fn probe<S: RecordStore>(store: &S, sync_code: &str, resource: Resource) -> Result<u64> {
    Ok(match resource {
        Resource::Users => collection_fingerprint(&store.list_users(sync_code).await?),
        Resource::Sessions => collection_fingerprint(&store.list_sessions(sync_code).await?),
        Resource::CustomExercises => {
            collection_fingerprint(&store.list_custom_exercises(sync_code).await?)
        }
        Resource::Reactions => collection_fingerprint(&store.list_reactions(sync_code, None).await?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{CustomExerciseRow, User};

    #[test]
    fn fingerprint_changes_with_content() {
        let a = collection_fingerprint(&["Squat"]);
        assert_eq!(a, collection_fingerprint(&["Squat"]));
        assert_ne!(a, collection_fingerprint(&["Squat", "Lunges"]));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn poll_reports_only_changed_collections() {
        let db = Database::open_in_memory().await.unwrap();
        let store = db.record_store();
        let mut watcher = ChangeWatcher::new("SHARED", &[Resource::Users, Resource::CustomExercises]);

        assert!(watcher.poll(&store).await.unwrap().is_empty());

        store
            .insert_user("SHARED", &User::new("Sam", "/avatars/a.jpg"))
            .await
            .unwrap();
        store
            .insert_user("OTHER", &User::new("Alex", "/avatars/b.jpg"))
            .await
            .unwrap();

        let events = watcher.poll(&store).await.unwrap();
        assert_eq!(
            events,
            vec![ChangeEvent::new(Resource::Users, "SHARED", ChangeKind::Changed)]
        );
        assert!(watcher.poll(&store).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn next_waits_for_a_change() {
        let db = Database::open_in_memory().await.unwrap();
        let store = db.record_store();
        let mut watcher = ChangeWatcher::new("SHARED", &[Resource::CustomExercises])
            .with_interval(Duration::from_millis(20));

        let writer = store.clone();
        let (events, ()) = tokio::join!(watcher.next(&store), async move {
            tokio::time::sleep(SUBSCRIBE_DELAY + Duration::from_millis(300)).await;
            writer
                .insert_custom_exercise(
                    "SHARED",
                    &CustomExerciseRow {
                        body_part: "Legs".to_string(),
                        exercise_name: "Hack Squat".to_string(),
                    },
                )
                .await
                .unwrap();
        });

        let events = events.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].channel.name(), "custom_exercises_SHARED");
    }
}
