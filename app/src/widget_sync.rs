// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, Utc};
use common::shared::{REFRESH_MARKER, SharedBlobStore};
use common::{SNAPSHOT_KEY, Task, WidgetTaskSnapshot};
use tracing::{debug, warn};

/// Best-effort channel for nudging the widget process after a publish.
/// A failed nudge is fine; the widget re-reads on its own schedule anyway.
pub trait RefreshNotifier: Send + Sync {
    fn notify(&self);
}

/// Touches the refresh marker in the shared directory; the widget watches
/// the marker's mtime.
pub struct MarkerFileNotifier {
    path: PathBuf,
}

impl MarkerFileNotifier {
    pub fn new(shared_dir: impl Into<PathBuf>) -> Self {
        MarkerFileNotifier {
            path: shared_dir.into().join(REFRESH_MARKER),
        }
    }
}

impl RefreshNotifier for MarkerFileNotifier {
    fn notify(&self) {
        // Only the mtime matters; the content is incidental.
        if let Err(e) = std::fs::write(&self.path, Utc::now().to_rfc3339()) {
            debug!("Widget refresh nudge skipped: {}", e);
        }
    }
}

/// Publishes the bounded pending-task snapshot to the shared blob store
/// after every repository mutation.
pub struct SnapshotPublisher {
    blob_store: Arc<dyn SharedBlobStore>,
    notifier: Option<Box<dyn RefreshNotifier>>,
}

impl SnapshotPublisher {
    pub fn new(blob_store: Arc<dyn SharedBlobStore>) -> Self {
        SnapshotPublisher {
            blob_store,
            notifier: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Box<dyn RefreshNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Computes and writes the snapshot wholesale. Every failure here is
    /// logged and swallowed: the repository mutation that triggered the
    /// publish has already committed and must not be rolled back, and the
    /// widget keeps showing the previous blob until the next publish lands.
    pub fn publish(&self, tasks: &[Task]) {
        let snapshot = WidgetTaskSnapshot::capture(tasks, Local::now().date_naive(), Utc::now());

        let bytes = match snapshot.encode() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to encode widget snapshot: {}", e);
                return;
            }
        };

        if let Err(e) = self.blob_store.set(SNAPSHOT_KEY, &bytes) {
            warn!("Failed to write widget snapshot: {:?}", e);
            return;
        }

        debug!("Published widget snapshot with {} task(s).", snapshot.tasks.len());

        if let Some(notifier) = &self.notifier {
            notifier.notify();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use chrono::TimeZone;
    use common::{NewTask, TaskPriority};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn task_from(new_task: NewTask, id: i64) -> Task {
        Task {
            id,
            name: new_task.name,
            date: new_task.date,
            priority_raw: new_task.priority.raw_value().to_string(),
            is_completed: false,
            created_at: new_task.created_at,
            completed_at: None,
        }
    }

    fn pending_today(id: i64, name: &str, priority: TaskPriority) -> Task {
        task_from(
            NewTask {
                name: name.to_string(),
                priority,
                date: Local::now().date_naive(),
                created_at: Utc.with_ymd_and_hms(2026, 3, 2, 9, id as u32, 0).unwrap(),
            },
            id,
        )
    }

    struct FailingBlobStore;

    impl SharedBlobStore for FailingBlobStore {
        fn get(&self, _key: &str) -> anyhow::Result<Option<Vec<u8>>> {
            Err(anyhow!("disk on fire"))
        }
        fn set(&self, _key: &str, _bytes: &[u8]) -> anyhow::Result<()> {
            Err(anyhow!("disk on fire"))
        }
    }

    struct CountingNotifier(Arc<AtomicUsize>);

    impl RefreshNotifier for CountingNotifier {
        fn notify(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_publish_writes_decodable_snapshot() {
        let store = Arc::new(common::shared::MemoryBlobStore::new());
        let publisher = SnapshotPublisher::new(store.clone());

        publisher.publish(&[pending_today(1, "Write report", TaskPriority::Red)]);

        let bytes = store.get(SNAPSHOT_KEY).unwrap().expect("snapshot published");
        let snapshot = WidgetTaskSnapshot::decode(&bytes).expect("snapshot decodable");
        assert_eq!(snapshot.tasks.len(), 1);
        assert_eq!(snapshot.tasks[0].title, "Write report");
    }

    #[test]
    fn test_publish_empty_set_still_publishes() {
        let store = Arc::new(common::shared::MemoryBlobStore::new());
        let publisher = SnapshotPublisher::new(store.clone());

        publisher.publish(&[]);

        let bytes = store.get(SNAPSHOT_KEY).unwrap().expect("snapshot published");
        let snapshot = WidgetTaskSnapshot::decode(&bytes).unwrap();
        assert!(snapshot.tasks.is_empty());
    }

    #[test]
    fn test_publish_write_failure_is_swallowed() {
        let publisher = SnapshotPublisher::new(Arc::new(FailingBlobStore));

        // Must not panic or propagate.
        publisher.publish(&[pending_today(1, "Write report", TaskPriority::Red)]);
    }

    #[test]
    fn test_notifier_fires_only_after_successful_write() {
        let count = Arc::new(AtomicUsize::new(0));
        let publisher = SnapshotPublisher::new(Arc::new(common::shared::MemoryBlobStore::new()))
            .with_notifier(Box::new(CountingNotifier(count.clone())));

        publisher.publish(&[]);
        publisher.publish(&[]);
        assert_eq!(count.load(Ordering::SeqCst), 2);

        let failed_count = Arc::new(AtomicUsize::new(0));
        let failing = SnapshotPublisher::new(Arc::new(FailingBlobStore))
            .with_notifier(Box::new(CountingNotifier(failed_count.clone())));

        failing.publish(&[]);
        assert_eq!(failed_count.load(Ordering::SeqCst), 0);
    }
}
