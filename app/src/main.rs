// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Terminal shell over the task repository. This is the stand-in for the
//! windowed presentation layer: it only parses commands, calls the
//! repository, and prints what comes back.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use app::config::AppConfig;
use app::database;
use app::error::AppError;
use app::repository::TaskRepository;
use app::settings::SettingsStore;
use app::widget_sync::{MarkerFileNotifier, SnapshotPublisher};
use common::shared::DirBlobStore;
use common::{Task, TaskPriority};
use tokio::sync::Mutex;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting up daylist...");

    let config = AppConfig::from_env();
    if let Err(e) = std::fs::create_dir_all(&config.data_dir) {
        tracing::error!("Failed to create the data directory: {:?}", e);
        std::process::exit(1);
    }

    let db_pool = match database::establish_connection_pool(&config.database_url).await {
        Ok(pool) => {
            tracing::info!("Database connection was made successfully.");
            pool
        }
        Err(e) => {
            tracing::error!("Failed to connect with the database: {:?}", e);
            std::process::exit(1);
        }
    };

    let blob_store = match DirBlobStore::new(&config.shared_dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("Failed to open the shared directory: {:?}", e);
            std::process::exit(1);
        }
    };
    let publisher = SnapshotPublisher::new(blob_store)
        .with_notifier(Box::new(MarkerFileNotifier::new(&config.shared_dir)));

    let mut settings = SettingsStore::load(&config.settings_path);

    let repository = Arc::new(Mutex::new(TaskRepository::new(db_pool, publisher)));
    repository.lock().await.load_all().await;

    print_help();
    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                break;
            }
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "list" => {
                let repo = repository.lock().await;
                render_tasks(&repo.filtered_view(rest), settings.settings().minimal_mode);
            }
            "add" => {
                if rest.is_empty() {
                    println!("Task name cannot be empty.");
                    continue;
                }
                let (name, priority) = parse_add_args(rest);
                match repository.lock().await.add(&name, priority).await {
                    Ok(task) => println!("Added #{} ({}).", task.id, task.priority()),
                    Err(AppError::EmptyTaskName) => println!("Task name cannot be empty."),
                    Err(e) => tracing::error!("Failed to add task: {:?}", e),
                }
            }
            "done" => run_id_command(&repository, rest, IdCommand::Toggle).await,
            "rm" => run_id_command(&repository, rest, IdCommand::Delete).await,
            "history" => {
                let repo = repository.lock().await;
                render_history(&repo, settings.settings().minimal_mode);
            }
            "minimal" => {
                let on = settings.toggle_minimal_mode();
                println!("Minimal mode {}.", if on { "on" } else { "off" });
            }
            "help" => print_help(),
            "quit" | "exit" => break,
            _ => println!("Unknown command '{command}'; type 'help'."),
        }
    }

    tracing::info!("Shutting down daylist.");
}

enum IdCommand {
    Toggle,
    Delete,
}

async fn run_id_command(repository: &Arc<Mutex<TaskRepository>>, rest: &str, command: IdCommand) {
    let Ok(task_id) = rest.parse::<i64>() else {
        println!("Expected a task id.");
        return;
    };

    let result = {
        let mut repo = repository.lock().await;
        match command {
            IdCommand::Toggle => repo.toggle_complete(task_id).await,
            IdCommand::Delete => repo.delete(task_id).await,
        }
    };

    match result {
        Ok(()) => {}
        // The id came from a stale listing; nothing to do.
        Err(e) if e.is_not_found() => println!("No task #{task_id}."),
        Err(e) => tracing::error!("Command failed: {:?}", e),
    }
}

/// A trailing `red`/`yellow`/`blue` token selects the priority; everything
/// else is the task name. Without one, the default tier applies.
fn parse_add_args(rest: &str) -> (String, TaskPriority) {
    if let Some((name, last)) = rest.rsplit_once(char::is_whitespace) {
        if TaskPriority::ALL.iter().any(|p| p.raw_value() == last) {
            return (name.trim().to_string(), TaskPriority::from_raw(last));
        }
    }
    (rest.to_string(), TaskPriority::Blue)
}

fn render_tasks(tasks: &[&Task], minimal: bool) {
    if tasks.is_empty() {
        println!("No tasks for today.");
        return;
    }
    for task in tasks {
        println!("{}", format_task_row(task, minimal));
    }
}

fn render_history(repo: &TaskRepository, minimal: bool) {
    let days = repo.days_with_tasks();
    if days.is_empty() {
        println!("No tasks yet.");
        return;
    }
    for day in days.iter().rev() {
        println!("{day}:");
        for task in repo.tasks_on(*day) {
            println!("  {}", format_task_row(task, minimal));
        }
    }
}

fn format_task_row(task: &Task, minimal: bool) -> String {
    let check = if task.is_completed { "x" } else { " " };
    if minimal {
        format!("[{}] {}", check, task.name)
    } else {
        format!(
            "[{}] #{:<4} {:<7} {}",
            check,
            task.id,
            task.priority().display_name(),
            task.name
        )
    }
}

fn print_help() {
    println!("Commands:");
    println!("  list [query]                 today's tasks, optionally filtered");
    println!("  add <name> [red|yellow|blue] create a task for today");
    println!("  done <id>                    toggle completion");
    println!("  rm <id>                      delete a task");
    println!("  history                      all tasks grouped by day");
    println!("  minimal                      toggle minimal display mode");
    println!("  quit");
}
