use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;
pub const DEFAULT_MAX_TWEETS: u64 = 50;

/// Dashboard configuration, loaded from `<config_dir>/scrapetui/config.toml`
/// when present. Every field has a default so an empty or missing file works.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL.
    pub base_url: String,
    /// Data poll cadence in seconds.
    pub poll_interval_secs: u64,
    /// Max tweet count sent when the start form field is left blank.
    pub default_max_tweets: u64,
    /// Where HTML reports are written; defaults to the current directory.
    pub report_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            default_max_tweets: DEFAULT_MAX_TWEETS,
            report_dir: None,
        }
    }
}

impl Config {
    /// Load from an explicit path (must exist), or from the default config
    /// location, falling back to defaults when no file is found.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("scrapetui").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.poll_interval_secs, 2);
        assert_eq!(config.default_max_tweets, 50);
        assert!(config.report_dir.is_none());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"http://10.0.0.5:9000\"").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.poll_interval_secs, 2);
        assert_eq!(config.default_max_tweets, 50);
    }

    #[test]
    fn test_load_full_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "base_url = \"http://example:1\"\npoll_interval_secs = 5\ndefault_max_tweets = 10\nreport_dir = \"/tmp/reports\""
        )
        .unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.poll_interval_secs, 5);
        assert_eq!(config.default_max_tweets, 10);
        assert_eq!(config.report_dir, Some(PathBuf::from("/tmp/reports")));
    }

    #[test]
    fn test_load_missing_explicit_path_errors() {
        assert!(Config::load(Some(Path::new("/definitely/not/here.toml"))).is_err());
    }

    #[test]
    fn test_load_invalid_toml_errors() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "base_url = [not toml").unwrap();
        assert!(Config::load(Some(file.path())).is_err());
    }
}
