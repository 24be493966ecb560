// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::env;
use std::path::PathBuf;

use common::shared::shared_dir_from_env;

/// Environment variable overriding the database location.
pub const DB_URL_ENV: &str = "DAYLIST_DB_URL";

const DEFAULT_DB_URL: &str = "sqlite://data/daylist.db";
const DATA_DIR: &str = "data";
const SETTINGS_FILE_NAME: &str = "settings.json";

/// Runtime configuration for the main application process. Everything has a
/// local default; the env vars exist so tests and the widget can agree on
/// shared locations.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub data_dir: PathBuf,
    pub shared_dir: PathBuf,
    pub settings_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let data_dir = PathBuf::from(DATA_DIR);
        AppConfig {
            database_url: env::var(DB_URL_ENV).unwrap_or_else(|_| DEFAULT_DB_URL.to_string()),
            settings_path: data_dir.join(SETTINGS_FILE_NAME),
            data_dir,
            shared_dir: shared_dir_from_env(),
        }
    }
}
