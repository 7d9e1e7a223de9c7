use crate::layout::{
    LayoutConfig, DEFAULT_CENTER_X, DEFAULT_CENTER_Y, DEFAULT_LEVEL_DISTANCE,
    DEFAULT_LEVEL_INCREMENT, DEFAULT_ROOT_ANGLE,
};
use crate::store::STORAGE_KEY;
use clap::Parser;
use config::{
    Config as ConfigCrate, // Need this for builder
    ConfigError as ConfigCrateError,
    Environment,
    File,
    Map,
    Source,
    Value,
};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

const APP_NAME: &str = "ai-mindmap";
const ENV_PREFIX: &str = "AIMINDMAP";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LOG_FILE_NAME: &str = "ai-mindmap.log";
const FALLBACK_DATA_DIR: &str = ".ai-mindmap";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] ConfigCrateError),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

// Optional fields allow for layered config (defaults -> file -> env -> args).
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
struct FileConfig {
    data_dir: Option<PathBuf>,
    storage_key: Option<String>,
    ephemeral: Option<bool>,
    center_x: Option<f64>,
    center_y: Option<f64>,
    level_distance: Option<f64>,
    level_increment: Option<f64>,
    root_angle: Option<f64>,
    strict_roots: Option<bool>,
    idea_command: Option<String>,
    log_file: Option<PathBuf>,
    log_level: Option<String>,
}

// Final config, every field resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub ephemeral: bool,
    pub center_x: f64,
    pub center_y: f64,
    pub level_distance: f64,
    pub level_increment: f64,
    pub root_angle: f64,
    pub strict_roots: bool,
    pub idea_command: Option<String>,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
    pub import: Option<PathBuf>, // From command line argument
    pub export: Option<PathBuf>, // From command line argument
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_dir: default_data_dir(),
            storage_key: STORAGE_KEY.to_string(),
            ephemeral: false,
            center_x: DEFAULT_CENTER_X,
            center_y: DEFAULT_CENTER_Y,
            level_distance: DEFAULT_LEVEL_DISTANCE,
            level_increment: DEFAULT_LEVEL_INCREMENT,
            root_angle: DEFAULT_ROOT_ANGLE,
            strict_roots: false,
            idea_command: None,
            log_file: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            import: None,
            export: None,
        }
    }
}

impl AppConfig {
    pub fn layout(&self) -> LayoutConfig {
        LayoutConfig {
            center_x: self.center_x,
            center_y: self.center_y,
            level_distance: self.level_distance,
            level_increment: self.level_increment,
            root_angle: self.root_angle,
        }
    }

    /// Log destination, defaulting to a file in the data directory.
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DEFAULT_LOG_FILE_NAME))
    }
}

// Command line arguments defined using clap.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Radial mind maps in the terminal", long_about = None)]
pub struct CliArgs {
    /// Path to a custom configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the resolved configuration and exit
    #[arg(long)]
    pub debug_config: bool,

    /// Import a mind map JSON file at start-up
    #[arg(long)]
    pub import: Option<PathBuf>,

    /// Write the current mind map as JSON to this file and exit
    #[arg(long)]
    pub export: Option<PathBuf>,

    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    #[arg(long)]
    pub storage_key: Option<String>,
    /// Keep everything in memory for this session
    #[arg(long)]
    pub ephemeral: Option<bool>,
    #[arg(long)]
    pub center_x: Option<f64>,
    #[arg(long)]
    pub center_y: Option<f64>,
    #[arg(long)]
    pub level_distance: Option<f64>,
    #[arg(long)]
    pub level_increment: Option<f64>,
    #[arg(long)]
    pub root_angle: Option<f64>,
    /// Reject imported maps that are not a single well-formed tree
    #[arg(long)]
    pub strict_roots: Option<bool>,
    /// Shell command answering idea requests (request JSON on stdin)
    #[arg(long)]
    pub idea_command: Option<String>,
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

pub fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}

// Function to load configuration from all sources.
pub fn load_config(args: &CliArgs) -> Result<AppConfig, ConfigError> {
    let env_source = Environment::with_prefix(ENV_PREFIX).separator("__");
    // Missing env vars are fine; a collect failure just means no overrides.
    let env_map: Map<String, Value> = env_source.collect().unwrap_or_else(|_| Map::new());

    build_config_from_args(args, Some(env_map))
}

// Separate function to allow testing with specific args and override sources
fn build_config_from_args(
    args: &CliArgs,
    override_source: Option<Map<String, Value>>,
) -> Result<AppConfig, ConfigError> {
    let config_file_path = args
        .config
        .clone()
        .or_else(|| project_dirs().map(|dirs| dirs.config_dir().join("config.toml")));

    let mut config_builder = ConfigCrate::builder();

    if let Some(ref path) = config_file_path {
        config_builder = config_builder.add_source(File::from(path.clone()).required(false));
    }

    // Overrides (environment or a test map) win over the file
    if let Some(overrides) = override_source {
        for (key, value) in overrides {
            config_builder = config_builder.set_override(&key, value)?;
        }
    }

    let loaded: FileConfig = config_builder.build()?.try_deserialize()?;

    // args > overrides > file > defaults
    let config = AppConfig {
        data_dir: args
            .data_dir
            .clone()
            .or(loaded.data_dir)
            .unwrap_or_else(default_data_dir),
        storage_key: args
            .storage_key
            .clone()
            .or(loaded.storage_key)
            .unwrap_or_else(|| STORAGE_KEY.to_string()),
        ephemeral: args.ephemeral.or(loaded.ephemeral).unwrap_or(false),
        center_x: args.center_x.or(loaded.center_x).unwrap_or(DEFAULT_CENTER_X),
        center_y: args.center_y.or(loaded.center_y).unwrap_or(DEFAULT_CENTER_Y),
        level_distance: args
            .level_distance
            .or(loaded.level_distance)
            .unwrap_or(DEFAULT_LEVEL_DISTANCE),
        level_increment: args
            .level_increment
            .or(loaded.level_increment)
            .unwrap_or(DEFAULT_LEVEL_INCREMENT),
        root_angle: args.root_angle.or(loaded.root_angle).unwrap_or(DEFAULT_ROOT_ANGLE),
        strict_roots: args.strict_roots.or(loaded.strict_roots).unwrap_or(false),
        idea_command: args
            .idea_command
            .clone()
            .or(loaded.idea_command)
            .filter(|cmd| !cmd.trim().is_empty()),
        log_file: args.log_file.clone().or(loaded.log_file),
        log_level: args
            .log_level
            .clone()
            .or(loaded.log_level)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        import: args.import.clone(),
        export: args.export.clone(),
    };

    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.storage_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "storage_key must not be empty".to_string(),
        ));
    }
    if !(config.level_distance.is_finite() && config.level_distance > 0.0) {
        return Err(ConfigError::ValidationError(
            "level_distance must be a positive number".to_string(),
        ));
    }
    if !(config.level_increment.is_finite() && config.level_increment >= 0.0) {
        return Err(ConfigError::ValidationError(
            "level_increment must not be negative".to_string(),
        ));
    }
    for (name, value) in [
        ("center_x", config.center_x),
        ("center_y", config.center_y),
        ("root_angle", config.root_angle),
    ] {
        if !value.is_finite() {
            return Err(ConfigError::ValidationError(format!("{} must be finite", name)));
        }
    }
    Ok(())
}
