use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use slidechat_genai::error::GenaiError;
use slidechat_genai::gemini::DEFAULT_MODELS;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

pub const API_KEY_VAR: &str = "SLIDECHAT_API_KEY";
pub const FALLBACK_API_KEY_VAR: &str = "GEMINI_API_KEY";

const BIND_VAR: &str = "SLIDECHAT_BIND";
const DATA_DIR_VAR: &str = "SLIDECHAT_DATA_DIR";
const DOWNLOAD_DIR_VAR: &str = "SLIDECHAT_DOWNLOAD_DIR";

const APP_DIR: &str = "slidechat";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlidechatConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Holds the persisted session collection.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Where downloads are written.
    #[serde(default = "default_downloads_dir")]
    pub downloads_dir: PathBuf,
    /// Model preference order; the first that initializes is used.
    #[serde(default = "default_models")]
    pub models: Vec<String>,
    #[serde(default = "default_generation_timeout_secs")]
    pub generation_timeout_secs: u64,
    #[serde(default = "default_render_timeout_secs")]
    pub render_timeout_secs: u64,
}

impl Default for SlidechatConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            bind: default_bind(),
            data_dir: default_data_dir(),
            downloads_dir: default_downloads_dir(),
            models: default_models(),
            generation_timeout_secs: default_generation_timeout_secs(),
            render_timeout_secs: default_render_timeout_secs(),
        }
    }
}

impl SlidechatConfig {
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs)
    }

    /// Apply `SLIDECHAT_BIND`, `SLIDECHAT_DATA_DIR` and
    /// `SLIDECHAT_DOWNLOAD_DIR` as read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = non_empty(lookup(BIND_VAR)) {
            self.bind = bind;
        }
        if let Some(dir) = non_empty(lookup(DATA_DIR_VAR)) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = non_empty(lookup(DOWNLOAD_DIR_VAR)) {
            self.downloads_dir = PathBuf::from(dir);
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn default_bind() -> String {
    "127.0.0.1:8787".to_string()
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".slidechat"))
}

fn default_downloads_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("downloads"))
}

fn default_models() -> Vec<String> {
    DEFAULT_MODELS.iter().map(|m| m.to_string()).collect()
}

fn default_generation_timeout_secs() -> u64 {
    90
}

fn default_render_timeout_secs() -> u64 {
    30
}

/// The API key from `SLIDECHAT_API_KEY`, else `GEMINI_API_KEY`.
///
/// The key is never written to the config file.
pub fn api_key(lookup: impl Fn(&str) -> Option<String>) -> Result<String, GenaiError> {
    non_empty(lookup(API_KEY_VAR))
        .or_else(|| non_empty(lookup(FALLBACK_API_KEY_VAR)))
        .ok_or_else(|| {
            GenaiError::Config(format!(
                "Slide generation is not set up: no API key was found. Set {API_KEY_VAR} \
                 and restart. Existing slides can still be edited and exported."
            ))
        })
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join(APP_DIR))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Load the config at `path`, or defaults if there is no file yet.
pub fn load_config(path: &Path) -> eyre::Result<SlidechatConfig> {
    Ok(read_config(path)?
        .map(|(config, _)| config)
        .unwrap_or_default())
}

/// Load the config at `path` and bring the file up to date: a missing file
/// is created with defaults and a migrated one is written back.
pub fn load_or_init_config(path: &Path) -> eyre::Result<SlidechatConfig> {
    match read_config(path)? {
        Some((config, version)) if version < CURRENT_VERSION => {
            save_config(path, &config)?;
            Ok(config)
        }
        Some((config, _)) => Ok(config),
        None => {
            let config = SlidechatConfig::default();
            save_config(path, &config)?;
            Ok(config)
        }
    }
}

/// The parsed, migrated config and the version it had on disk.
fn read_config(path: &Path) -> eyre::Result<Option<(SlidechatConfig, u32)>> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no config file, using defaults");
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: SlidechatConfig = serde_json::from_value(migrated)?;
    Ok(Some((config, on_disk_version)))
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update slidechat."
        ));
    }

    // v0 → v1: the single `model` field became the `models` preference list.
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        if let Some(model) = obj.remove("model") {
            let mut models: Vec<serde_json::Value> = default_models()
                .into_iter()
                .map(serde_json::Value::String)
                .filter(|m| *m != model)
                .collect();
            models.insert(0, model);
            obj.entry("models")
                .or_insert(serde_json::Value::Array(models));
        }
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (model → models)");
    }

    Ok(json)
}

pub fn save_config(path: &Path, config: &SlidechatConfig) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("config path {} has no parent", path.display()))?;
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
