// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use thiserror::Error;

/// Errors surfaced by the repository's command surface.
///
/// None of these are fatal: validation and not-found results are quiet
/// no-ops at the shell, and store failures degrade to a stale or empty view.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("task name cannot be empty")]
    EmptyTaskName,

    #[error("task with ID {0} not found")]
    TaskNotFound(i64),

    #[error("task store failure: {0}")]
    Store(#[from] anyhow::Error),
}

impl AppError {
    /// Not-found is expected under concurrent deletes and is handled as a
    /// no-op by callers; everything else deserves attention.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::TaskNotFound(_))
    }
}
