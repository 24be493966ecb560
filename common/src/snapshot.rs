// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{Task, pending_order};

/// Key under which the snapshot blob lives in the shared store. Both
/// processes address the blob by this exact string.
pub const SNAPSHOT_KEY: &str = "widget.task.snapshot";

/// Upper bound on how many tasks a snapshot carries. Overflow is truncated
/// silently; the widget never needs more rows than this.
pub const SNAPSHOT_TASK_LIMIT: usize = 8;

/// A single task as the widget sees it. Field names are part of the wire
/// format and must not change.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WidgetTaskItem {
    pub id: i64,
    pub title: String,
    pub priority_raw_value: String,
}

/// The full blob the app publishes and the widget decodes. Replaced
/// wholesale on every publish, never patched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WidgetTaskSnapshot {
    pub updated_at: DateTime<Utc>,
    pub tasks: Vec<WidgetTaskItem>,
}

impl WidgetTaskSnapshot {
    /// Computes the snapshot for a task set: pending tasks scheduled for
    /// `today`, in pending order, capped at `SNAPSHOT_TASK_LIMIT` entries.
    pub fn capture(tasks: &[Task], today: NaiveDate, now: DateTime<Utc>) -> Self {
        let mut pending: Vec<&Task> = tasks
            .iter()
            .filter(|t| !t.is_completed && t.is_scheduled_on(today))
            .collect();
        pending.sort_by(|a, b| pending_order(a, b));

        let tasks = pending
            .into_iter()
            .take(SNAPSHOT_TASK_LIMIT)
            .map(|t| WidgetTaskItem {
                id: t.id,
                title: t.name.clone(),
                priority_raw_value: t.priority().raw_value().to_string(),
            })
            .collect();

        WidgetTaskSnapshot {
            updated_at: now,
            tasks,
        }
    }

    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Decoding failure means "show empty" on the reader side, so this
    /// deliberately collapses every failure into `None`.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        serde_json::from_slice(bytes).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::priority::TaskPriority;
    use chrono::TimeZone;

    fn task(id: i64, name: &str, priority: TaskPriority, created_minute: u32) -> Task {
        let created_at = Utc.with_ymd_and_hms(2026, 3, 2, 9, created_minute, 0).unwrap();
        Task {
            id,
            name: name.to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            priority_raw: priority.raw_value().to_string(),
            is_completed: false,
            created_at,
            completed_at: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn test_capture_excludes_completed_and_other_days() {
        let mut done = task(1, "done", TaskPriority::Red, 0);
        done.is_completed = true;
        done.completed_at = Some(done.created_at);
        let mut tomorrow = task(2, "tomorrow", TaskPriority::Red, 1);
        tomorrow.date = today().succ_opt().unwrap();
        let pending = task(3, "pending", TaskPriority::Blue, 2);

        let snapshot =
            WidgetTaskSnapshot::capture(&[done, tomorrow, pending], today(), Utc::now());

        assert_eq!(snapshot.tasks.len(), 1);
        assert_eq!(snapshot.tasks[0].id, 3);
    }

    #[test]
    fn test_capture_orders_by_tier_then_recency() {
        let tasks = vec![
            task(1, "blue", TaskPriority::Blue, 0),
            task(2, "red old", TaskPriority::Red, 1),
            task(3, "yellow", TaskPriority::Yellow, 2),
            task(4, "red new", TaskPriority::Red, 3),
        ];

        let snapshot = WidgetTaskSnapshot::capture(&tasks, today(), Utc::now());

        let ids: Vec<i64> = snapshot.tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_capture_truncates_to_limit() {
        let tasks: Vec<Task> = (0..12)
            .map(|i| task(i, &format!("task {i}"), TaskPriority::Blue, i as u32))
            .collect();

        let snapshot = WidgetTaskSnapshot::capture(&tasks, today(), Utc::now());

        assert_eq!(snapshot.tasks.len(), SNAPSHOT_TASK_LIMIT);
        // All blue, so recency decides; the oldest entries fall off the end.
        assert_eq!(snapshot.tasks.first().unwrap().id, 11);
        assert_eq!(snapshot.tasks.last().unwrap().id, 4);
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let snapshot = WidgetTaskSnapshot::capture(
            &[task(1, "Write report", TaskPriority::Red, 0)],
            today(),
            Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap(),
        );

        let bytes = snapshot.encode().unwrap();
        let decoded = WidgetTaskSnapshot::decode(&bytes).unwrap();

        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let snapshot = WidgetTaskSnapshot::capture(
            &[task(7, "Write report", TaskPriority::Red, 0)],
            today(),
            Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap(),
        );

        let value: serde_json::Value =
            serde_json::from_slice(&snapshot.encode().unwrap()).unwrap();
        assert!(value.get("updatedAt").is_some());
        let item = &value["tasks"][0];
        assert_eq!(item["id"], 7);
        assert_eq!(item["title"], "Write report");
        assert_eq!(item["priorityRawValue"], "red");
    }

    #[test]
    fn test_decode_garbage_is_none() {
        assert!(WidgetTaskSnapshot::decode(b"not json").is_none());
        assert!(WidgetTaskSnapshot::decode(b"{\"tasks\": 3}").is_none());
        assert!(WidgetTaskSnapshot::decode(b"").is_none());
    }
}
