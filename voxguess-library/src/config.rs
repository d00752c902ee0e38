//! Simple configuration for voxguess
//!
//! Key=value file under the user config dir, with environment
//! overrides for the two service locations. Read once at startup.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Question endpoint base URL. When unset the local generator is
    /// used instead of the remote source.
    pub api_url: Option<String>,
    /// Base location for clip assets (URL or directory).
    pub asset_url: String,
    /// Default round count shown on the intro screen.
    pub default_rounds: usize,
    cue_correct: Option<String>,
    cue_wrong: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            asset_url: "assets".to_string(),
            default_rounds: 5,
            cue_correct: None,
            cue_wrong: None,
        }
    }
}

impl Config {
    /// Load config from the default location with env overrides.
    ///
    /// Returns defaults if the file doesn't exist or can't be parsed.
    pub fn load() -> Self {
        let path = Self::config_path();
        let mut config = Self::load_from(&path).unwrap_or_default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.serialize())
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("voxguess")
            .join("config.txt")
    }

    /// Cue clip for a correct guess.
    pub fn cue_correct_url(&self) -> String {
        self.cue_correct
            .clone()
            .unwrap_or_else(|| self.asset_join("sound/correct.mp3"))
    }

    /// Cue clip for a wrong guess.
    pub fn cue_wrong_url(&self) -> String {
        self.cue_wrong
            .clone()
            .unwrap_or_else(|| self.asset_join("sound/wrong.mp3"))
    }

    fn asset_join(&self, rel: &str) -> String {
        format!("{}/{}", self.asset_url.trim_end_matches('/'), rel)
    }

    /// Apply environment-style overrides via a lookup function.
    pub fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(url) = get("VOXGUESS_API_URL") {
            if !url.is_empty() {
                self.api_url = Some(url);
            }
        }
        if let Some(url) = get("VOXGUESS_ASSET_URL") {
            if !url.is_empty() {
                self.asset_url = url;
            }
        }
    }

    /// Parse config from simple key=value format
    fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();
                if value.is_empty() {
                    continue;
                }

                match key {
                    "api_url" => config.api_url = Some(value.to_string()),
                    "asset_url" => config.asset_url = value.to_string(),
                    "cue_correct_url" => config.cue_correct = Some(value.to_string()),
                    "cue_wrong_url" => config.cue_wrong = Some(value.to_string()),
                    "default_rounds" => {
                        if let Ok(n) = value.parse::<usize>() {
                            if n > 0 {
                                config.default_rounds = n;
                            }
                        }
                    }
                    _ => {} // Ignore unknown keys
                }
            }
        }

        config
    }

    /// Serialize config to simple key=value format
    fn serialize(&self) -> String {
        let mut lines = vec!["# voxguess configuration".to_string()];

        if let Some(ref url) = self.api_url {
            lines.push(format!("api_url={url}"));
        }
        lines.push(format!("asset_url={}", self.asset_url));
        if let Some(ref url) = self.cue_correct {
            lines.push(format!("cue_correct_url={url}"));
        }
        if let Some(ref url) = self.cue_wrong {
            lines.push(format!("cue_wrong_url={url}"));
        }
        lines.push(format!("default_rounds={}", self.default_rounds));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_gives_defaults() {
        let config = Config::parse("");
        assert_eq!(config, Config::default());
        assert!(config.api_url.is_none());
        assert_eq!(config.default_rounds, 5);
    }

    #[test]
    fn test_parse_with_values() {
        let content = "# comment\napi_url=http://localhost:8000\nasset_url=https://cdn.example.com\ndefault_rounds=10";
        let config = Config::parse(content);
        assert_eq!(config.api_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.asset_url, "https://cdn.example.com");
        assert_eq!(config.default_rounds, 10);
    }

    #[test]
    fn test_cue_urls_follow_asset_base() {
        let config = Config::parse("asset_url=https://cdn.example.com/clips/");
        assert_eq!(
            config.cue_correct_url(),
            "https://cdn.example.com/clips/sound/correct.mp3"
        );
        assert_eq!(
            config.cue_wrong_url(),
            "https://cdn.example.com/clips/sound/wrong.mp3"
        );
    }

    #[test]
    fn test_explicit_cue_url_wins() {
        let config = Config::parse("cue_wrong_url=/tmp/buzz.wav");
        assert_eq!(config.cue_wrong_url(), "/tmp/buzz.wav");
        assert_eq!(config.cue_correct_url(), "assets/sound/correct.mp3");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::parse("api_url=http://file-value");
        config.apply_overrides(|key| match key {
            "VOXGUESS_API_URL" => Some("http://env-value".to_string()),
            _ => None,
        });
        assert_eq!(config.api_url.as_deref(), Some("http://env-value"));
        assert_eq!(config.asset_url, "assets");
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config {
            api_url: Some("http://localhost:8000".into()),
            asset_url: "https://cdn.example.com".into(),
            default_rounds: 8,
            cue_correct: Some("x/ding.mp3".into()),
            cue_wrong: None,
        };
        assert_eq!(Config::parse(&config.serialize()), config);
    }

    #[test]
    fn test_invalid_rounds_ignored() {
        let config = Config::parse("default_rounds=0\n");
        assert_eq!(config.default_rounds, 5);
        let config = Config::parse("default_rounds=banana\n");
        assert_eq!(config.default_rounds, 5);
    }
}
