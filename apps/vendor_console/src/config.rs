use std::{fs, io, path::Path, time::Duration};

use anyhow::Context;
use client_core::{config::DEFAULT_API_BASE, ClientConfig, ControllerSettings};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "vendor_console.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base: String,
    pub poll_interval_secs: u64,
    /// 0 disables the request timeout.
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            poll_interval_secs: 15,
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    pub fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let request_timeout =
            (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs));
        let config = ClientConfig::new(&self.api_base)
            .with_context(|| format!("invalid api base '{}'", self.api_base))?;
        Ok(config.with_request_timeout(request_timeout))
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            poll_interval: Duration::from_secs(self.poll_interval_secs.max(1)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base: Option<String>,
    poll_interval_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then the config file (if present), then the process environment.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();
    apply_file(&mut settings, path)?;
    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, path: &Path) -> anyhow::Result<()> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    };

    let file_cfg: FileSettings = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
    if let Some(v) = file_cfg.api_base {
        settings.api_base = v;
    }
    if let Some(v) = file_cfg.poll_interval_secs {
        settings.poll_interval_secs = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    Ok(())
}

pub fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("VENDOR_API_BASE") {
        settings.api_base = v;
    }
    if let Some(v) = lookup("APP__API_BASE") {
        settings.api_base = v;
    }

    if let Some(v) = lookup("APP__POLL_INTERVAL_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.poll_interval_secs = parsed;
        }
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn temp_config(contents: &str) -> std::path::PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let dir = env::temp_dir().join(format!("vendor_console_config_test_{suffix}"));
        fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join(DEFAULT_CONFIG_PATH);
        fs::write(&path, contents).expect("write config");
        path
    }

    #[test]
    fn missing_file_keeps_defaults() {
        let mut settings = Settings::default();
        apply_file(&mut settings, Path::new("/nonexistent/vendor_console.toml")).expect("apply");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let path = temp_config(
            "api_base = \"http://127.0.0.1:9000/api\"\npoll_interval_secs = 5\n",
        );
        let mut settings = Settings::default();
        apply_file(&mut settings, &path).expect("apply");

        assert_eq!(settings.api_base, "http://127.0.0.1:9000/api");
        assert_eq!(settings.poll_interval_secs, 5);
        assert_eq!(settings.request_timeout_secs, 30);

        fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
    }

    #[test]
    fn broken_file_is_an_error() {
        let path = temp_config("poll_interval_secs = \"soon\"");
        let mut settings = Settings::default();
        let err = apply_file(&mut settings, &path).expect_err("must fail");
        assert!(err.to_string().contains("failed to parse config file"));

        fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
    }

    #[test]
    fn env_overrides_with_app_prefix_winning() {
        let vars = HashMap::from([
            ("VENDOR_API_BASE", "http://legacy.test"),
            ("APP__API_BASE", "http://preferred.test"),
            ("APP__POLL_INTERVAL_SECS", "60"),
            ("APP__REQUEST_TIMEOUT_SECS", "not-a-number"),
        ]);
        let mut settings = Settings::default();
        apply_env(&mut settings, |key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(settings.api_base, "http://preferred.test");
        assert_eq!(settings.poll_interval_secs, 60);
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn zero_timeout_disables_it_and_zero_interval_is_clamped() {
        let settings = Settings {
            api_base: "http://127.0.0.1:9000".into(),
            poll_interval_secs: 0,
            request_timeout_secs: 0,
        };
        assert_eq!(settings.client_config().expect("config").request_timeout, None);
        assert_eq!(
            settings.controller_settings().poll_interval,
            Duration::from_secs(1)
        );
    }

    #[test]
    fn invalid_api_base_is_reported() {
        let settings = Settings {
            api_base: "groviq.shop".into(),
            ..Settings::default()
        };
        let err = settings.client_config().expect_err("must fail");
        assert!(err.to_string().contains("invalid api base"));
    }
}
