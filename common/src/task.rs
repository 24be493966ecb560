// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::priority::TaskPriority;

/// Represents a task within the system.
///
/// Derivation attributes (derive):
/// - `Serialize`, `Deserialize`: Allows conversion to/from JSON.
/// - `Debug`: Enables displaying the structure for debugging (e.g., `println!("{:?}", task)`).
/// - `Clone`: Allows creating copies of the object.
/// - `sqlx::FromRow`: Allows `sqlx` to create a `Task` instance directly
///    from a database result row.
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Task {
    #[sqlx(rename = "id")]
    pub id: i64,

    #[sqlx(rename = "name")]
    pub name: String,

    // We use NaiveDate because we are only interested in the day,
    // without a timezone.
    #[sqlx(rename = "task_date")]
    pub date: NaiveDate,

    // The priority is stored as its raw string value; use `priority()` for
    // the typed view. Unknown raw values decode as the default tier.
    #[sqlx(rename = "priority")]
    pub priority_raw: String,

    #[sqlx(rename = "is_completed")]
    pub is_completed: bool,

    #[sqlx(rename = "created_at")]
    pub created_at: DateTime<Utc>,

    #[sqlx(rename = "completed_at")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn priority(&self) -> TaskPriority {
        TaskPriority::from_raw(&self.priority_raw)
    }

    pub fn is_scheduled_on(&self, day: NaiveDate) -> bool {
        self.date == day
    }

    /// Case-insensitive substring match against the task name. An empty
    /// query matches everything.
    pub fn matches_search(&self, query: &str) -> bool {
        query.is_empty() || self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Creation payload handed to the store, which assigns the id.
///
/// Separating this from `Task` keeps the entity free of half-initialized
/// states: a `Task` always has the id the database gave it.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub name: String,
    pub priority: TaskPriority,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Ordering for pending tasks: higher-priority tiers first, and within a
/// tier the most recently created first. The live list and the widget
/// snapshot must agree on this, so both call here.
pub fn pending_order(a: &Task, b: &Task) -> Ordering {
    a.priority()
        .sort_order()
        .cmp(&b.priority().sort_order())
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Ordering for completed tasks: most recently completed first. Rows missing
/// a completion timestamp fall back to creation time.
pub fn completed_order(a: &Task, b: &Task) -> Ordering {
    match (a.completed_at, b.completed_at) {
        (Some(a_done), Some(b_done)) => b_done.cmp(&a_done),
        _ => b.created_at.cmp(&a.created_at),
    }
}
