use anyhow::{Context, anyhow};
use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Project defaults, compiled in so a release binary needs no files next to it.
pub const DEFAULT_CONFIG: &str = include_str!("../hashtagger.toml");

/// Environment variables checked for the credential, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub gemini_model: String,
    pub gemini_api_key: Option<String>,
    pub prompt_for_api_key: bool,
    pub api_base_url: String,
    pub temperature: f32,
    pub request_timeout_secs: u64,
    pub custom_prompt_path: Option<String>,
}

impl Settings {
    /// Loads defaults, then the user config (created from the defaults if
    /// missing), then `hashtagger.toml` in the working directory, then `extra`.
    pub fn new(extra: Option<&Path>) -> anyhow::Result<Self> {
        let user_config_path = get_user_config_path()?;
        if let Err(e) = ensure_user_config(&user_config_path) {
            tracing::warn!(path = %user_config_path.display(), error = %e, "could not create user config");
        }
        Ok(Self::load(Some(&user_config_path), Some(Path::new("hashtagger.toml")), extra)?)
    }

    pub fn load(
        user_config: Option<&Path>,
        local_config: Option<&Path>,
        extra: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        for path in [user_config, local_config].into_iter().flatten() {
            builder = builder.add_source(File::from(path.to_path_buf()).required(false));
        }
        // An explicitly requested file must exist.
        if let Some(path) = extra {
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }

        builder.build()?.try_deserialize()
    }

    /// The configured key, falling back to the environment.
    pub fn api_key(&self) -> Option<String> {
        resolve_api_key(self.gemini_api_key.as_deref(), |name| std::env::var(name).ok())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Contents of `custom_prompt_path`, if set and readable.
    pub fn prompt_template(&self) -> Option<String> {
        let raw = self.custom_prompt_path.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        let path = shellexpand::tilde(raw).into_owned();
        match fs::read_to_string(&path) {
            Ok(template) if !template.trim().is_empty() => Some(template),
            Ok(_) => {
                tracing::warn!(path = %path, "custom prompt is empty, using built-in prompt");
                None
            }
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "could not read custom prompt, using built-in prompt");
                None
            }
        }
    }
}

pub fn resolve_api_key<F>(configured: Option<&str>, env: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    configured
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .or_else(|| {
            API_KEY_ENV_VARS
                .iter()
                .filter_map(|name| env(name))
                .map(|k| k.trim().to_string())
                .find(|k| !k.is_empty())
        })
}

pub fn get_user_config_path() -> anyhow::Result<PathBuf> {
    let mut path = dirs::home_dir().ok_or_else(|| anyhow!("Failed to get home directory"))?;
    path.push(".config");
    path.push("hashtagger");
    path.push("hashtagger.toml");
    Ok(path)
}

/// Writes the defaults to `path` unless a file is already there.
pub fn ensure_user_config(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Could not create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Could not write user config {}", path.display()))?;
    Ok(())
}

fn set_config_value(path: &Path, key: &str, value: toml::Value) -> anyhow::Result<()> {
    let config_str = fs::read_to_string(path).unwrap_or_default();
    let mut doc = config_str.parse::<toml::Table>()?;

    doc.insert(key.to_string(), value);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, doc.to_string())?;

    Ok(())
}

pub fn save_api_key(api_key: &str) -> anyhow::Result<()> {
    save_api_key_to(&get_user_config_path()?, api_key)
}

pub fn save_api_key_to(path: &Path, api_key: &str) -> anyhow::Result<()> {
    set_config_value(path, "gemini_api_key", toml::Value::String(api_key.to_string()))
}

pub fn disable_api_key_prompt() -> anyhow::Result<()> {
    disable_api_key_prompt_in(&get_user_config_path()?)
}

pub fn disable_api_key_prompt_in(path: &Path) -> anyhow::Result<()> {
    set_config_value(path, "prompt_for_api_key", toml::Value::Boolean(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_load_without_files() {
        let settings = Settings::load(None, None, None).unwrap();
        assert_eq!(settings.gemini_model, "gemini-2.5-flash");
        assert!((settings.temperature - 0.7).abs() < f32::EPSILON);
        assert!(settings.prompt_for_api_key);
        assert!(settings.gemini_api_key.is_none());
        assert_eq!(settings.request_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn user_config_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("hashtagger.toml");
        fs::write(&user, "gemini_model = \"gemini-2.0-flash\"\nprompt_for_api_key = false\n").unwrap();

        let settings = Settings::load(Some(&user), None, None).unwrap();
        assert_eq!(settings.gemini_model, "gemini-2.0-flash");
        assert!(!settings.prompt_for_api_key);
        assert_eq!(settings.api_base_url, "https://generativelanguage.googleapis.com");
    }

    #[test]
    fn local_and_extra_config_apply_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("local.toml");
        let extra = dir.path().join("extra.toml");
        fs::write(&local, "gemini_model = \"local\"\ntemperature = 0.2\n").unwrap();
        fs::write(&extra, "gemini_model = \"extra\"\n").unwrap();

        let settings = Settings::load(None, Some(&local), Some(&extra)).unwrap();
        assert_eq!(settings.gemini_model, "extra");
        assert!((settings.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn missing_extra_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Settings::load(None, None, Some(&missing)).is_err());
    }

    #[test]
    fn ensure_user_config_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("hashtagger.toml");
        ensure_user_config(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);

        fs::write(&path, "gemini_model = \"mine\"\n").unwrap();
        ensure_user_config(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "gemini_model = \"mine\"\n");
    }

    #[test]
    fn save_api_key_keeps_other_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hashtagger.toml");
        fs::write(&path, "gemini_model = \"mine\"\n").unwrap();

        save_api_key_to(&path, "secret").unwrap();
        disable_api_key_prompt_in(&path).unwrap();

        let settings = Settings::load(Some(&path), None, None).unwrap();
        assert_eq!(settings.gemini_model, "mine");
        assert_eq!(settings.gemini_api_key.as_deref(), Some("secret"));
        assert!(!settings.prompt_for_api_key);
    }

    #[test]
    fn api_key_prefers_config_then_env() {
        let env: HashMap<&str, &str> = [("API_KEY", "from-api-key"), ("GEMINI_API_KEY", " ")]
            .into_iter()
            .collect();
        let lookup = |name: &str| env.get(name).map(|v| v.to_string());

        assert_eq!(resolve_api_key(Some("cfg"), lookup).as_deref(), Some("cfg"));
        assert_eq!(resolve_api_key(Some("  "), lookup).as_deref(), Some("from-api-key"));
        assert_eq!(resolve_api_key(None, |_| None), None);
    }

    #[test]
    fn prompt_template_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt.txt");
        fs::write(&path, "Hashtags for {topic}").unwrap();

        let mut settings = Settings::load(None, None, None).unwrap();
        assert!(settings.prompt_template().is_none());

        settings.custom_prompt_path = Some(path.display().to_string());
        assert_eq!(settings.prompt_template().as_deref(), Some("Hashtags for {topic}"));

        settings.custom_prompt_path = Some(dir.path().join("missing.txt").display().to_string());
        assert!(settings.prompt_template().is_none());
    }
}
