// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three priority tiers a task can carry.
///
/// Each variant bundles its sort rank, display color and label as pure
/// lookups. The raw string form is what the database column and the widget
/// wire format carry.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Red,
    Yellow,
    Blue,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [
        TaskPriority::Red,
        TaskPriority::Yellow,
        TaskPriority::Blue,
    ];

    /// Parses a persisted raw value. Anything unrecognized decodes as the
    /// default tier, so old or hand-edited rows never fail to load.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "red" => TaskPriority::Red,
            "yellow" => TaskPriority::Yellow,
            _ => TaskPriority::Blue,
        }
    }

    pub fn raw_value(self) -> &'static str {
        match self {
            TaskPriority::Red => "red",
            TaskPriority::Yellow => "yellow",
            TaskPriority::Blue => "blue",
        }
    }

    /// Sort rank; red sorts ahead of yellow, yellow ahead of blue.
    pub fn sort_order(self) -> u8 {
        match self {
            TaskPriority::Red => 0,
            TaskPriority::Yellow => 1,
            TaskPriority::Blue => 2,
        }
    }

    pub fn color_hex(self) -> &'static str {
        match self {
            TaskPriority::Red => "#FF3B30",
            TaskPriority::Yellow => "#FFCC00",
            TaskPriority::Blue => "#007AFF",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TaskPriority::Red => "Red",
            TaskPriority::Yellow => "Yellow",
            TaskPriority::Blue => "Blue",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw_value())
    }
}
