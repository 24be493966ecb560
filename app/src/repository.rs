// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::collections::BTreeSet;

use chrono::{Local, NaiveDate, Utc};
use common::{NewTask, Task, TaskPriority, completed_order, pending_order};
use sqlx::SqlitePool;
use tracing::{error, info};

use crate::database;
use crate::error::AppError;
use crate::widget_sync::SnapshotPublisher;

/// Owns the in-memory reflection of the persisted task set and the command
/// surface the presentation layer drives.
///
/// Every mutation goes through the store first, then replaces the in-memory
/// set with a fresh fetch and republishes the widget snapshot. The in-memory
/// set is never touched before the store write succeeds, so a failed write
/// leaves memory consistent with the store. Callers sharing a repository
/// across tasks wrap it in a `tokio::sync::Mutex`; the methods themselves
/// assume exclusive access through `&mut self`.
pub struct TaskRepository {
    pool: SqlitePool,
    publisher: SnapshotPublisher,
    tasks: Vec<Task>,
}

impl TaskRepository {
    /// Creates an empty repository; call `load_all` to populate it.
    pub fn new(pool: SqlitePool, publisher: SnapshotPublisher) -> Self {
        TaskRepository {
            pool,
            publisher,
            tasks: Vec::new(),
        }
    }

    /// Replaces the in-memory set wholesale from the store and republishes
    /// the widget snapshot.
    ///
    /// A fetch failure degrades to an empty set rather than keeping the
    /// previous one next to a silent error, and the snapshot is republished
    /// either way so the widget always matches what the list would show.
    pub async fn load_all(&mut self) {
        match database::fetch_all_tasks(&self.pool).await {
            Ok(tasks) => {
                self.tasks = tasks;
            }
            Err(e) => {
                error!("Failed to fetch tasks: {:?}", e);
                self.tasks.clear();
            }
        }
        self.publisher.publish(&self.tasks);
    }

    /// Creates a task scheduled for the local "today". The name is validated
    /// here as well as at the shell, since an empty name renders as a blank
    /// row everywhere downstream.
    pub async fn add(&mut self, name: &str, priority: TaskPriority) -> Result<Task, AppError> {
        if name.trim().is_empty() {
            return Err(AppError::EmptyTaskName);
        }

        let new_task = NewTask {
            name: name.to_string(),
            priority,
            date: Local::now().date_naive(),
            created_at: Utc::now(),
        };
        let task = database::insert_task(&self.pool, new_task).await?;
        info!("Task created successfully with ID: {}", task.id);

        self.load_all().await;
        Ok(task)
    }

    /// Flips a task's completion state, stamping `completed_at` on the way
    /// to completed and clearing it on the way back. Two toggles return the
    /// task to its original state.
    pub async fn toggle_complete(&mut self, task_id: i64) -> Result<(), AppError> {
        let task = self
            .tasks
            .iter()
            .find(|t| t.id == task_id)
            .ok_or(AppError::TaskNotFound(task_id))?;

        let now_completed = !task.is_completed;
        let completed_at = now_completed.then(Utc::now);

        // The store's row count is authoritative; a task deleted through
        // another handle since our last load also maps to not-found.
        let updated =
            database::set_task_completion(&self.pool, task_id, now_completed, completed_at)
                .await?;
        if !updated {
            return Err(AppError::TaskNotFound(task_id));
        }

        self.load_all().await;
        Ok(())
    }

    /// Unconditionally removes a task. There is no undo.
    pub async fn delete(&mut self, task_id: i64) -> Result<(), AppError> {
        let deleted = database::delete_task(&self.pool, task_id).await?;
        if !deleted {
            return Err(AppError::TaskNotFound(task_id));
        }
        info!("Task with ID {} deleted successfully.", task_id);

        self.load_all().await;
        Ok(())
    }

    /// The list the main surface renders: today's tasks, optionally
    /// filtered by a case-insensitive name search, pending tasks first in
    /// pending order, completed tasks after in completion order.
    ///
    /// Recomputed on every call; nothing here is cached.
    pub fn filtered_view(&self, search_text: &str) -> Vec<&Task> {
        let today = Local::now().date_naive();
        let query = search_text.trim();

        let (mut pending, mut done): (Vec<&Task>, Vec<&Task>) = self
            .tasks
            .iter()
            .filter(|t| t.is_scheduled_on(today))
            .filter(|t| t.matches_search(query))
            .partition(|t| !t.is_completed);

        pending.sort_by(|a, b| pending_order(a, b));
        done.sort_by(|a, b| completed_order(a, b));

        pending.extend(done);
        pending
    }

    /// Every task regardless of day, most recently created first, for the
    /// history surface.
    pub fn historical_view(&self) -> Vec<&Task> {
        self.tasks.iter().collect()
    }

    /// Tasks scheduled on one calendar day, most recently created first.
    pub fn tasks_on(&self, day: NaiveDate) -> Vec<&Task> {
        // `tasks` is already in created_at descending order from the store.
        self.tasks
            .iter()
            .filter(|t| t.is_scheduled_on(day))
            .collect()
    }

    /// The set of days that have at least one task, for the calendar grid.
    pub fn days_with_tasks(&self) -> BTreeSet<NaiveDate> {
        self.tasks.iter().map(|t| t.date).collect()
    }

    /// The most recent day any task is scheduled on.
    pub fn latest_task_date(&self) -> Option<NaiveDate> {
        self.tasks.iter().map(|t| t.date).max()
    }
}
