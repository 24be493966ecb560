// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Shared substrate linked by both the main application and the widget
//! process: the task entity, the priority tag, the snapshot wire format,
//! and the blob store the two processes exchange snapshots through.

pub mod priority;
pub mod shared;
pub mod snapshot;
pub mod task;

pub use priority::TaskPriority;
pub use snapshot::{SNAPSHOT_KEY, SNAPSHOT_TASK_LIMIT, WidgetTaskItem, WidgetTaskSnapshot};
pub use task::{NewTask, Task, completed_order, pending_order};
