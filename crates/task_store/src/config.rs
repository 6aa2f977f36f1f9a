//! Store configuration

use std::{fmt, path::PathBuf, str::FromStr};

use serde::Deserialize;

/// Storage medium selected at process start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// JSON file on local disk.
    #[default]
    File,
    /// SQLite database on local disk.
    Sqlite,
    /// MongoDB collection.
    #[serde(alias = "mongo")]
    MongoDb,
}

impl BackendKind {
    /// Converts the kind to its configuration name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Sqlite => "sqlite",
            Self::MongoDb => "mongodb",
        }
    }

    /// Parses a configuration name, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Some(Self::File),
            "sqlite" => Some(Self::Sqlite),
            "mongodb" | "mongo" => Some(Self::MongoDb),
            _ => None,
        }
    }

    /// Parses a configuration name, falling back to the flat file for
    /// unknown values
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            tracing::warn!(value = s, "Unknown storage backend, using flat file");
            Self::File
        })
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown storage backend: {s}"))
    }
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Which backend to open
    #[serde(default)]
    pub backend: BackendKind,

    /// Directory holding the flat file and the SQLite database
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// MongoDB connection string
    #[serde(default = "default_mongo_url")]
    pub mongo_url: String,

    /// MongoDB database name
    #[serde(default = "default_mongo_db")]
    pub mongo_db: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_mongo_url() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_mongo_db() -> String {
    "learning_tracker".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            data_dir: default_data_dir(),
            mongo_url: default_mongo_url(),
            mongo_db: default_mongo_db(),
        }
    }
}

impl StoreConfig {
    /// Path of the flat-file backend's document
    pub fn file_path(&self) -> PathBuf {
        self.data_dir.join("tasks.json")
    }

    /// Path of the SQLite backend's database
    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join("tasks.sqlite3")
    }

    /// Overrides fields from environment variables
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    /// Overrides fields from a variable lookup. Keys mirror the environment
    /// variable names.
    pub fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(kind) = var("DB_TYPE") {
            self.backend = BackendKind::parse_or_default(&kind);
        }

        if let Some(dir) = var("TRACKER_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }

        if let Some(url) = var("MONGO_URL") {
            self.mongo_url = url;
        }

        if let Some(db) = var("MONGO_DB") {
            self.mongo_db = db;
        }
    }
}
