use std::time::Duration;

use serde::Deserialize;

use crate::context::Context;

pub const DEFAULT_PATH: &str = "/etc/mailpace/mailpace.toml";
const ENV_PREFIX: &str = "MAILPACE";

/// Client settings, read from a TOML file and `MAILPACE_*` variables.
#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub token: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Settings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// A fresh context for one send, bounded by the configured timeout
    pub fn context(&self) -> Context {
        match self.timeout() {
            Some(timeout) => Context::with_timeout(timeout),
            None => Context::background(),
        }
    }
}

/// Loads settings from `path` (or `DEFAULT_PATH`) and merges any environment
/// variables prefixed with `MAILPACE_` on top.
///
/// The default file may be missing; an explicitly given one may not.
pub fn load_settings(path: Option<&str>) -> Result<Settings, config::ConfigError> {
    build_settings(path, None)
}

// `env` replaces the process environment when given
fn build_settings(
    path: Option<&str>,
    env: Option<config::Map<String, String>>,
) -> Result<Settings, config::ConfigError> {
    let file = config::File::with_name(path.unwrap_or(DEFAULT_PATH))
        .format(config::FileFormat::Toml)
        .required(path.is_some());

    // Values stay strings so the token is passed on verbatim
    config::Config::builder()
        .add_source(file)
        .add_source(config::Environment::with_prefix(ENV_PREFIX).source(env))
        .build()?
        .try_deserialize::<Settings>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_config(contents: &str) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mailpace.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    fn env(vars: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_load_from_file() {
        let (_dir, path) = write_config(
            "token = \"file_token\"\nendpoint = \"http://localhost:8025/send\"\ntimeout_secs = 5\n",
        );

        let settings = build_settings(path.to_str(), env(&[])).unwrap();
        assert_eq!(settings.token, "file_token");
        assert_eq!(settings.endpoint.as_deref(), Some("http://localhost:8025/send"));
        assert_eq!(settings.timeout(), Some(Duration::from_secs(5)));
        assert!(settings.context().get_deadline().is_some());
    }

    #[test]
    fn test_optional_keys() {
        let (_dir, path) = write_config("token = \"file_token\"\n");

        let settings = build_settings(path.to_str(), env(&[])).unwrap();
        assert_eq!(settings.endpoint, None);
        assert_eq!(settings.timeout(), None);
        assert!(settings.context().get_deadline().is_none());
    }

    #[test]
    fn test_env_overrides_file() {
        let (_dir, path) = write_config("token = \"file_token\"\ntimeout_secs = 5\n");

        let settings = build_settings(
            path.to_str(),
            env(&[
                ("MAILPACE_TOKEN", "env_token"),
                ("MAILPACE_TIMEOUT_SECS", "30"),
                ("MAILPACE_ENDPOINT", "http://localhost:9000/send"),
                ("OTHER_TOKEN", "ignored"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.token, "env_token");
        assert_eq!(settings.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(settings.endpoint.as_deref(), Some("http://localhost:9000/send"));
    }

    #[test]
    fn test_numeric_env_token_kept_verbatim() {
        let settings = build_settings(None, env(&[("MAILPACE_TOKEN", "00123")])).unwrap();
        assert_eq!(settings.token, "00123");

        let settings = build_settings(None, env(&[("MAILPACE_TOKEN", "true")])).unwrap();
        assert_eq!(settings.token, "true");
    }

    #[test]
    fn test_missing_token_is_an_error() {
        assert!(build_settings(None, env(&[])).is_err());
    }

    #[test]
    fn test_explicit_path_must_exist() {
        assert!(build_settings(Some("/nonexistent/mailpace.toml"), env(&[])).is_err());
    }
}
