// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! The widget process: a sandboxed, read-only consumer of the published
//! task snapshot. It polls the shared directory on its own schedule,
//! decodes the blob (decode failure renders as an empty list), and prints
//! a compact view. It never writes shared state.

use std::time::{Duration, SystemTime};

use chrono::Local;
use common::shared::{DirBlobStore, REFRESH_MARKER, SharedBlobStore, shared_dir_from_env};
use common::{SNAPSHOT_KEY, WidgetTaskItem, WidgetTaskSnapshot};
use tokio::time::{self, Instant};

/// How often the refresh marker is checked.
const POLL_INTERVAL_SECS: u64 = 2;
/// Re-render at least this often even without a marker change, so a missed
/// nudge only delays the widget, never strands it.
const FALLBACK_REFRESH_SECS: u64 = 30;
/// The widget surface shows at most this many rows; the snapshot may carry
/// more.
const DISPLAY_ROW_LIMIT: usize = 6;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let shared_dir = shared_dir_from_env();
    let store = match DirBlobStore::new(&shared_dir) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open the shared directory: {:?}", e);
            std::process::exit(1);
        }
    };
    let marker_path = shared_dir.join(REFRESH_MARKER);
    tracing::info!("Watching {} for task snapshots.", shared_dir.display());

    let mut interval = time::interval(Duration::from_secs(POLL_INTERVAL_SECS));
    let mut last_marker: Option<SystemTime> = None;
    let mut last_render: Option<Instant> = None;

    loop {
        interval.tick().await;

        let marker = std::fs::metadata(&marker_path)
            .and_then(|m| m.modified())
            .ok();
        let stale = last_render
            .map_or(true, |at| at.elapsed() >= Duration::from_secs(FALLBACK_REFRESH_SECS));

        if stale || marker != last_marker {
            last_marker = marker;
            last_render = Some(Instant::now());
            render(&store);
        }
    }
}

/// Reads and decodes the current snapshot. Any failure collapses to "no
/// snapshot" and renders the empty state; errors never reach the user.
fn load_snapshot(store: &DirBlobStore) -> Option<WidgetTaskSnapshot> {
    match store.get(SNAPSHOT_KEY) {
        Ok(Some(bytes)) => WidgetTaskSnapshot::decode(&bytes),
        Ok(None) => None,
        Err(e) => {
            tracing::debug!("Failed to read the snapshot blob: {:?}", e);
            None
        }
    }
}

fn render(store: &DirBlobStore) {
    match load_snapshot(store) {
        Some(snapshot) => {
            let updated = snapshot.updated_at.with_timezone(&Local).format("%H:%M");
            println!("To-Do ({} pending, updated {})", snapshot.tasks.len(), updated);
            for item in snapshot.tasks.iter().take(DISPLAY_ROW_LIMIT) {
                println!("  {} {}", priority_marker(item), item.title);
            }
            if snapshot.tasks.is_empty() {
                println!("  Nothing pending today.");
            }
        }
        None => {
            println!("To-Do");
            println!("  Nothing pending today.");
        }
    }
}

fn priority_marker(item: &WidgetTaskItem) -> &'static str {
    match item.priority_raw_value.as_str() {
        "red" => "[!]",
        "yellow" => "[~]",
        _ => "[-]",
    }
}
