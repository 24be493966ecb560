// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use common::{NewTask, Task};
use sqlx::{Sqlite, SqlitePool, migrate::MigrateDatabase};
use tracing::{debug, info};

/// Establishes the database connection pool.
/// If the database does not exist, it creates it.
/// It also ensures the `tasks` table has the correct schema.
pub async fn establish_connection_pool(database_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        info!("Creating database {}", database_url);
        Sqlite::create_database(database_url)
            .await
            .context("Failed to create database")?;
    } else {
        info!("Database already exists.");
    }

    let pool = SqlitePool::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    // AUTOINCREMENT keeps rowids monotonic, so a deleted task's id is never
    // handed out again.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            task_date DATE NOT NULL,
            priority TEXT NOT NULL,
            is_completed BOOLEAN NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL,
            completed_at TIMESTAMP NULL
        );
        "#,
    )
    .execute(&pool)
    .await
    .context("Failed to create 'tasks' table")?;

    info!("'tasks' table is ready.");

    Ok(pool)
}

/// Retrieves every task, most recently created first.
pub async fn fetch_all_tasks(pool: &SqlitePool) -> Result<Vec<Task>> {
    let tasks = sqlx::query_as::<_, Task>(
        "SELECT * FROM tasks ORDER BY created_at DESC, id DESC;",
    )
    .fetch_all(pool)
    .await
    .context("Failed to retrieve tasks from DB")?;

    Ok(tasks)
}

/// Inserts a new task and returns it with the id the database assigned.
pub async fn insert_task(pool: &SqlitePool, new_task: NewTask) -> Result<Task> {
    debug!(
        "Insert values: name={}, task_date={}, priority={}, created_at={}",
        new_task.name, new_task.date, new_task.priority, new_task.created_at
    );

    let id = sqlx::query(
        "INSERT INTO tasks (name, task_date, priority, is_completed, created_at, completed_at) VALUES (?, ?, ?, 0, ?, NULL)",
    )
    .bind(&new_task.name)
    .bind(new_task.date)
    .bind(new_task.priority.raw_value())
    .bind(new_task.created_at)
    .execute(pool)
    .await
    .context("Failed to insert task into DB")?
    .last_insert_rowid();

    Ok(Task {
        id,
        name: new_task.name,
        date: new_task.date,
        priority_raw: new_task.priority.raw_value().to_string(),
        is_completed: false,
        created_at: new_task.created_at,
        completed_at: None,
    })
}

/// Writes a task's completion state and timestamp.
/// Returns true if a row was updated, false if no task with the given ID was found.
pub async fn set_task_completion(
    pool: &SqlitePool,
    task_id: i64,
    is_completed: bool,
    completed_at: Option<DateTime<Utc>>,
) -> Result<bool> {
    let result = sqlx::query("UPDATE tasks SET is_completed = ?, completed_at = ? WHERE id = ?")
        .bind(is_completed)
        .bind(completed_at)
        .bind(task_id)
        .execute(pool)
        .await
        .context(format!(
            "Failed to update completion for task with ID: {task_id}"
        ))?;

    Ok(result.rows_affected() > 0)
}

/// Hard-deletes a task. There is no tombstone; the row is gone.
/// Returns true if a task was removed, false if no task with the given ID was found.
pub async fn delete_task(pool: &SqlitePool, task_id: i64) -> Result<bool> {
    debug!("Attempting to delete task with ID: {}", task_id);
    let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(task_id)
        .execute(pool)
        .await
        .context(format!("Failed to delete task with ID: {task_id}"))?;

    let rows_affected = result.rows_affected();
    info!("Deleted {} rows for task ID: {}", rows_affected, task_id);

    Ok(rows_affected > 0)
}
