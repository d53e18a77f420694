// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use selah_api::{DEFAULT_BASE_URL, DEFAULT_MAX_ATTEMPTS, RetryPolicy};
use selah_app::{DisplaySettings, DisplayToggle};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_TIMEOUT: &str = "10s";
const DEFAULT_RETRY_DELAY: &str = "1s";

pub const CONFIG_PATH_ENV: &str = "SELAH_CONFIG_PATH";
pub const DATA_DIR_ENV: &str = "SELAH_DATA_DIR";
pub const API_KEY_ENV: &str = "BIBLE_API_KEY";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub display: Display,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            api: Api::default(),
            data: Data::default(),
            display: Display::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    pub base_url: Option<String>,
    pub timeout: Option<String>,
    pub max_attempts: Option<i64>,
    pub retry_delay: Option<String>,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_owned()),
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
            max_attempts: Some(i64::from(DEFAULT_MAX_ATTEMPTS)),
            retry_delay: Some(DEFAULT_RETRY_DELAY.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Data {
    pub dir: Option<String>,
}

/// Startup values for the reader toggles. Flags on the command line turn
/// individual toggles on for one run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Display {
    pub color_jesus_words: Option<bool>,
    pub bold_verse_numbers: Option<bool>,
    pub show_clarifications: Option<bool>,
    pub capitalize_divine_names: Option<bool>,
    pub show_original_divine_names: Option<bool>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;

        let app_dir = config_root.join(selah_data::APP_NAME);
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
                    "config file {} has no version. Add `version = 1` and put values under [api], [data], and [display]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
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
        if let Some(base_url) = &self.api.base_url
            && base_url.trim().is_empty()
        {
            bail!("api.base_url in {} must not be empty", path.display());
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

        if let Some(attempts) = self.api.max_attempts
            && !(1..=i64::from(u32::MAX)).contains(&attempts)
        {
            bail!(
                "api.max_attempts in {} must be at least 1, got {}",
                path.display(),
                attempts
            );
        }

        if let Some(delay) = &self.api.retry_delay {
            parse_duration(delay)
                .with_context(|| format!("api.retry_delay in {}", path.display()))?;
        }

        if let Some(dir) = &self.data.dir
            && dir.trim().is_empty()
        {
            bail!(
                "data.dir in {} must not be empty; remove it to use the default",
                path.display()
            );
        }

        Ok(())
    }

    pub fn api_base_url(&self) -> &str {
        self.api
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn api_timeout(&self) -> Result<Duration> {
        parse_duration(self.api.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        let attempts = self
            .api
            .max_attempts
            .unwrap_or(i64::from(DEFAULT_MAX_ATTEMPTS));
        let attempts = u32::try_from(attempts)
            .with_context(|| format!("api.max_attempts {attempts} is out of range"))?;
        let delay = parse_duration(
            self.api
                .retry_delay
                .as_deref()
                .unwrap_or(DEFAULT_RETRY_DELAY),
        )?;
        Ok(RetryPolicy::new(attempts, delay))
    }

    /// `SELAH_DATA_DIR` wins over `[data].dir`, which wins over the platform
    /// default.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if env::var_os(DATA_DIR_ENV).is_none()
            && let Some(dir) = &self.data.dir
        {
            return Ok(PathBuf::from(dir));
        }
        selah_data::default_data_dir()
    }

    pub fn display_settings(&self) -> DisplaySettings {
        let display = &self.display;
        [
            (DisplayToggle::ColorJesusWords, display.color_jesus_words),
            (DisplayToggle::BoldVerseNumbers, display.bold_verse_numbers),
            (DisplayToggle::ShowClarifications, display.show_clarifications),
            (
                DisplayToggle::CapitalizeDivineNames,
                display.capitalize_divine_names,
            ),
            (
                DisplayToggle::ShowOriginalDivineNames,
                display.show_original_divine_names,
            ),
        ]
        .into_iter()
        .fold(DisplaySettings::default(), |settings, (toggle, value)| {
            settings.with(toggle, value.unwrap_or(false))
        })
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# selah config\n# Place this file at: {}\n# The API key is read from {} and never stored here.\n\nversion = 1\n\n[api]\nbase_url = \"{}\"\ntimeout = \"{}\"\nmax_attempts = {}\nretry_delay = \"{}\"\n\n[data]\n# Optional. Default is the platform data dir (for example ~/.local/share/selah/reference)\n# dir = \"/absolute/path/to/reference\"\n\n[display]\ncolor_jesus_words = false\nbold_verse_numbers = false\nshow_clarifications = false\ncapitalize_divine_names = false\nshow_original_divine_names = false\n",
            path.display(),
            API_KEY_ENV,
            DEFAULT_BASE_URL,
            DEFAULT_TIMEOUT,
            DEFAULT_MAX_ATTEMPTS,
            DEFAULT_RETRY_DELAY,
        )
    }
}

/// The scripture service key. Startup fails here, before any request, when
/// it is missing or blank.
pub fn api_key_from_env() -> Result<String> {
    let key = env::var(API_KEY_ENV).unwrap_or_default();
    let key = key.trim();
    if key.is_empty() {
        bail!("{API_KEY_ENV} is not set; export your scripture API key before starting selah");
    }
    Ok(key.to_owned())
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 5s)")
}

#[cfg(test)]
mod tests {
    use super::{
        API_KEY_ENV, CONFIG_PATH_ENV, Config, DATA_DIR_ENV, api_key_from_env, parse_duration,
    };
    use anyhow::Result;
    use selah_app::DisplaySettings;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.api_base_url(), "https://api.scripture.api.bible/v1");
        assert_eq!(config.api_timeout()?, Duration::from_secs(10));
        let retry = config.retry_policy()?;
        assert_eq!(retry.max_attempts, 3);
        assert_eq!(retry.delay, Duration::from_secs(1));
        assert_eq!(config.display_settings(), DisplaySettings::default());
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[api]\ntimeout = \"5s\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[api], [data], and [display]"));
        Ok(())
    }

    #[test]
    fn v1_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[api]\nbase_url = \"http://localhost:8080/v1\"\ntimeout = \"2s\"\nmax_attempts = 5\nretry_delay = \"250ms\"\n[display]\nbold_verse_numbers = true\ncolor_jesus_words = true\n",
        )?;

        let config = Config::load(&path)?;
        assert_eq!(config.api_base_url(), "http://localhost:8080/v1");
        assert_eq!(config.api_timeout()?, Duration::from_secs(2));
        let retry = config.retry_policy()?;
        assert_eq!(retry.max_attempts, 5);
        assert_eq!(retry.delay, Duration::from_millis(250));
        let settings = config.display_settings();
        assert!(settings.bold_verse_numbers);
        assert!(settings.color_jesus_words);
        assert!(!settings.show_clarifications);
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(CONFIG_PATH_ENV, &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn default_path_uses_config_toml_suffix_when_no_env_override() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }
        let path = Config::default_path()?;
        assert!(path.ends_with("selah/config.toml"));
        Ok(())
    }

    #[test]
    fn data_dir_env_override_beats_config() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) = write_config("version = 1\n[data]\ndir = \"/from/config\"\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(DATA_DIR_ENV, "/from/env");
        }
        let config = Config::load(&path)?;
        let resolved = config.data_dir()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(DATA_DIR_ENV);
        }
        assert_eq!(resolved, PathBuf::from("/from/env"));
        Ok(())
    }

    #[test]
    fn data_dir_uses_config_when_env_unset() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) = write_config("version = 1\n[data]\ndir = \"/from/config\"\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var(DATA_DIR_ENV);
        }
        let config = Config::load(&path)?;
        assert_eq!(config.data_dir()?, PathBuf::from("/from/config"));
        Ok(())
    }

    #[test]
    fn data_dir_defaults_to_platform_reference_dir() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var(DATA_DIR_ENV);
        }
        let resolved = Config::default().data_dir()?;
        assert!(
            resolved.ends_with("selah/reference"),
            "got {}",
            resolved.display()
        );
        Ok(())
    }

    #[test]
    fn base_url_trims_trailing_slashes() -> Result<()> {
        let (_temp, path) =
            write_config("version = 1\n[api]\nbase_url = \"http://localhost:8080/v1///\"\n")?;
        let config = Config::load(&path)?;
        assert_eq!(config.api_base_url(), "http://localhost:8080/v1");
        Ok(())
    }

    #[test]
    fn durations_parse_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("5s")?, Duration::from_secs(5));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));
        Ok(())
    }

    #[test]
    fn invalid_duration_is_rejected() {
        let error = parse_duration("soon").expect_err("invalid duration should fail");
        assert!(error.to_string().contains("invalid duration"));
    }

    #[test]
    fn zero_timeout_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[api]\ntimeout = \"0s\"\n")?;
        let error = Config::load(&path).expect_err("zero timeout should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn retry_budget_must_allow_one_attempt() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[api]\nmax_attempts = 0\n")?;
        let error = Config::load(&path).expect_err("zero attempts should fail");
        assert!(error.to_string().contains("at least 1"));
        Ok(())
    }

    #[test]
    fn blank_data_dir_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[data]\ndir = \"  \"\n")?;
        let error = Config::load(&path).expect_err("blank dir should fail");
        assert!(error.to_string().contains("data.dir"));
        Ok(())
    }

    #[test]
    fn api_key_is_required_and_trimmed() {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var(API_KEY_ENV);
        }
        let missing = api_key_from_env().expect_err("missing key should fail");
        assert!(missing.to_string().contains(API_KEY_ENV));

        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(API_KEY_ENV, "   ");
        }
        assert!(api_key_from_env().is_err());

        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(API_KEY_ENV, " secret-key \n");
        }
        let key = api_key_from_env();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(API_KEY_ENV);
        }
        assert_eq!(key.ok().as_deref(), Some("secret-key"));
    }

    #[test]
    fn example_config_loads_as_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        assert!(example.contains("[api]"));
        assert!(example.contains("[data]"));
        assert!(example.contains("[display]"));

        std::fs::write(&path, &example)?;
        let config = Config::load(&path)?;
        assert_eq!(config.api_timeout()?, Duration::from_secs(10));
        assert_eq!(config.retry_policy()?.max_attempts, 3);
        assert!(config.data.dir.is_none());
        Ok(())
    }
}
