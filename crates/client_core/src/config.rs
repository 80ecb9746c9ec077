use std::{collections::HashMap, fs, path::Path, str::FromStr, time::Duration};

use storage::MEMORY_DATABASE_URL;

pub const DEVELOPMENT_BASE_URL: &str = "http://localhost:5000";
pub const PRODUCTION_BASE_URL: &str = "https://song-reccomendation-system.onrender.com";
pub const DEFAULT_RESULT_COUNT: u32 = 20;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const SETTINGS_FILE: &str = "songfinder.toml";

const FALLBACK_DATABASE_URL: &str = "sqlite://./data/preferences.sqlite3";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn default_base_url(self) -> &'static str {
        match self {
            Environment::Development => DEVELOPMENT_BASE_URL,
            Environment::Production => PRODUCTION_BASE_URL,
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub environment: Environment,
    pub api_base_url: Option<String>,
    pub database_url: String,
    pub result_count: u32,
    pub request_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            api_base_url: None,
            database_url: default_database_url(),
            result_count: DEFAULT_RESULT_COUNT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl Settings {
    /// Explicit override if set, otherwise the address for the active environment.
    pub fn resolved_base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.default_base_url())
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        apply_file_overrides(&mut settings, &raw);
    }
    apply_env_overrides(&mut settings, env);

    settings
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<HashMap<String, String>>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(err) => {
            tracing::warn!("ignoring malformed {SETTINGS_FILE}: {err}");
            return;
        }
    };

    if let Some(v) = file_cfg.get("environment") {
        set_environment(settings, v);
    }
    if let Some(v) = file_cfg.get("api_base_url") {
        settings.api_base_url = Some(v.clone());
    }
    if let Some(v) = file_cfg.get("database_url") {
        settings.database_url = v.clone();
    }
    if let Some(v) = file_cfg.get("result_count") {
        set_result_count(settings, v);
    }
    if let Some(v) = file_cfg.get("request_timeout_secs") {
        set_request_timeout(settings, v);
    }
}

fn apply_env_overrides(settings: &mut Settings, env: impl Fn(&str) -> Option<String>) {
    for name in ["SONGFINDER_ENV", "APP__ENVIRONMENT"] {
        if let Some(v) = env(name) {
            set_environment(settings, &v);
        }
    }

    for name in ["SONGFINDER_API_URL", "APP__API_BASE_URL"] {
        if let Some(v) = env(name) {
            settings.api_base_url = Some(v);
        }
    }

    for name in ["SONGFINDER_DATABASE_URL", "APP__DATABASE_URL"] {
        if let Some(v) = env(name) {
            settings.database_url = v;
        }
    }

    if let Some(v) = env("APP__RESULT_COUNT") {
        set_result_count(settings, &v);
    }
    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        set_request_timeout(settings, &v);
    }
}

fn set_environment(settings: &mut Settings, raw: &str) {
    match raw.parse::<Environment>() {
        Ok(environment) => settings.environment = environment,
        Err(err) => tracing::warn!("keeping {:?}: {err}", settings.environment),
    }
}

fn set_result_count(settings: &mut Settings, raw: &str) {
    if let Ok(parsed) = raw.trim().parse::<u32>() {
        settings.result_count = parsed;
    }
}

fn set_request_timeout(settings: &mut Settings, raw: &str) {
    if let Ok(parsed) = raw.trim().parse::<u64>() {
        settings.request_timeout = Duration::from_secs(parsed);
    }
}

fn default_database_url() -> String {
    match dirs::data_local_dir() {
        Some(base) => {
            let path = base.join("songfinder").join("preferences.sqlite3");
            format!("sqlite://{}", path.to_string_lossy().replace('\\', "/"))
        }
        None => FALLBACK_DATABASE_URL.to_string(),
    }
}

/// Accepts either a sqlite URL or a plain file path.
pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return default_database_url();
    }

    if raw_database_url.starts_with(MEMORY_DATABASE_URL)
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}
