// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use heatcheck_app::Route;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_VERSION: i64 = 1;
pub const DEFAULT_AUTH_BASE_URL: &str = "https://heatcheck-backend.onrender.com";
pub const DEFAULT_STATS_BASE_URL: &str = "https://propnerd-backend.onrender.com";
const DEFAULT_TIMEOUT: &str = "10s";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub ui: Ui,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            api: Api::default(),
            session: SessionConfig::default(),
            ui: Ui::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    pub auth_base_url: Option<String>,
    pub stats_base_url: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            auth_base_url: Some(DEFAULT_AUTH_BASE_URL.to_owned()),
            stats_base_url: Some(DEFAULT_STATS_BASE_URL.to_owned()),
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub db_path: Option<String>,
    pub persist: Option<bool>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            persist: Some(true),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ui {
    pub start_route: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("HEATCHECK_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!(
                "cannot resolve config directory; set HEATCHECK_CONFIG_PATH to the config file"
            )
        })?;

        let app_dir = config_root.join(heatcheck_db::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version; add `version = 1` at the top",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1 (see `heatcheck --print-example-config`)",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        for (key, value) in [
            ("api.auth_base_url", &self.api.auth_base_url),
            ("api.stats_base_url", &self.api.stats_base_url),
        ] {
            if let Some(url) = value {
                validate_base_url(key, url)
                    .with_context(|| format!("invalid [api] config in {}", path.display()))?;
            }
        }

        if let Some(timeout) = &self.api.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "api.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(db_path) = &self.session.db_path {
            heatcheck_db::validate_db_path(db_path)?;
        }

        if let Some(route) = &self.ui.start_route
            && Route::parse(route).is_not_found()
        {
            bail!(
                "ui.start_route {route:?} in {} is not a screen; use one of: {}",
                path.display(),
                known_paths()
            );
        }

        Ok(())
    }

    pub fn auth_base_url(&self) -> &str {
        self.api
            .auth_base_url
            .as_deref()
            .unwrap_or(DEFAULT_AUTH_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn stats_base_url(&self) -> &str {
        self.api
            .stats_base_url
            .as_deref()
            .unwrap_or(DEFAULT_STATS_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(self.api.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn persist_session(&self) -> bool {
        self.session.persist.unwrap_or(true)
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        if !self.persist_session() {
            return Ok(PathBuf::from(":memory:"));
        }
        match &self.session.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => heatcheck_db::default_db_path(),
        }
    }

    pub fn start_route(&self) -> Route {
        self.ui
            .start_route
            .as_deref()
            .map_or(Route::Landing, Route::parse)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# heatcheck config\n# Place this file at: {}\n\nversion = 1\n\n[api]\nauth_base_url = \"{}\"\nstats_base_url = \"{}\"\ntimeout = \"{}\"\n\n[session]\n# Optional. Default is platform data dir (for example ~/.local/share/heatcheck/heatcheck.db)\n# db_path = \"/absolute/path/to/heatcheck.db\"\n# Set to false to forget the login when the app exits.\npersist = true\n\n[ui]\n# One of: {}\nstart_route = \"/\"\n",
            path.display(),
            DEFAULT_AUTH_BASE_URL,
            DEFAULT_STATS_BASE_URL,
            DEFAULT_TIMEOUT,
            known_paths(),
        )
    }
}

fn known_paths() -> String {
    Route::KNOWN
        .iter()
        .map(Route::path)
        .collect::<Vec<_>>()
        .join(", ")
}

fn validate_base_url(key: &str, raw: &str) -> Result<()> {
    let trimmed = raw.trim();
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(|| anyhow!("{key} must start with http:// or https://, got {raw:?}"))?;
    if rest.trim_matches('/').is_empty() {
        bail!("{key} is missing a host, got {raw:?}");
    }
    Ok(())
}

pub fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 5s)")
}
