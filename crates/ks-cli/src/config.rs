//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use ks_kimai::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Deserializer, Serialize};

use crate::Cli;

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Kimai API URL, including the `/api` suffix.
    pub url: Option<String>,
    /// Kimai API token.
    #[serde(default, deserialize_with = "text_or_number")]
    pub api_token: Option<String>,
    /// Kimai user id; the token owner when unset.
    #[serde(default, deserialize_with = "text_or_number")]
    pub user: Option<String>,
    /// Project ids to restrict the report to.
    #[serde(default, deserialize_with = "project_ids")]
    pub projects: Vec<u64>,
    /// Maximum number of timesheet records fetched.
    pub page_size: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("url", &self.url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .field("projects", &self.projects)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: None,
            api_token: None,
            user: None,
            projects: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (KIMAI_*)
        figment = figment.merge(Env::prefixed("KIMAI_"));

        figment.extract()
    }

    /// Applies command-line flags, which take precedence over every other
    /// source.
    #[must_use]
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(url) = &cli.url {
            self.url = Some(url.clone());
        }
        if let Some(token) = &cli.api_token {
            self.api_token = Some(token.clone());
        }
        if let Some(user) = &cli.user {
            self.user = Some(user.clone());
        }
        if !cli.projects.is_empty() {
            self.projects.clone_from(&cli.projects);
        }
        self
    }

    /// Returns the Kimai URL and API token, failing if either is missing.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let url = non_empty(self.url.as_deref())
            .ok_or_else(|| anyhow!("Kimai URL required (set --url, KIMAI_URL or config.toml)"))?;
        let token = non_empty(self.api_token.as_deref()).ok_or_else(|| {
            anyhow!("Kimai API token required (set --api-token, KIMAI_API_TOKEN or config.toml)")
        })?;
        Ok((url, token))
    }
}

/// Environment values that look numeric arrive as numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(i64),
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<TextOrNumber>::deserialize(deserializer)?;
    Ok(value.map(|value| match value {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Number(number) => number.to_string(),
    }))
}

/// A list, a single id, or a comma-separated string such as `3,7`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProjectIds {
    List(Vec<u64>),
    One(u64),
    Joined(String),
}

fn project_ids<'de, D>(deserializer: D) -> Result<Vec<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match ProjectIds::deserialize(deserializer)? {
        ProjectIds::List(ids) => Ok(ids),
        ProjectIds::One(id) => Ok(vec![id]),
        ProjectIds::Joined(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<u64>().map_err(|_| {
                    <D::Error as serde::de::Error>::custom(format!("invalid project id {part:?}"))
                })
            })
            .collect(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Returns the platform-specific config directory.
///
/// On Linux: `~/.config/kimai-sheet`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("kimai-sheet"))
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use figment::Jail;

    use super::*;

    #[test]
    fn test_dirs_config_path_ends_with_app_name() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "kimai-sheet");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.url.is_none());
        assert!(config.projects.is_empty());
        assert_eq!(config.page_size, 500);
    }

    #[test]
    fn test_file_then_env_precedence() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "timesheet.toml",
                r#"
                url = "https://file.test/api"
                api_token = "from-file"
                projects = [1, 2]
                page_size = 100
                "#,
            )?;
            jail.set_env("KIMAI_API_TOKEN", "from-env");

            let config = Config::load_from(Some(Path::new("timesheet.toml")))?;

            assert_eq!(config.url.as_deref(), Some("https://file.test/api"));
            assert_eq!(config.api_token.as_deref(), Some("from-env"));
            assert_eq!(config.projects, vec![1, 2]);
            assert_eq!(config.page_size, 100);
            Ok(())
        });
    }

    #[test]
    fn test_numeric_env_values_are_accepted() {
        Jail::expect_with(|jail| {
            jail.set_env("KIMAI_USER", "5");
            jail.set_env("KIMAI_API_TOKEN", "123456");
            jail.set_env("KIMAI_PROJECTS", "3,7");

            let config = Config::load_from(None)?;

            assert_eq!(config.user.as_deref(), Some("5"));
            assert_eq!(config.api_token.as_deref(), Some("123456"));
            assert_eq!(config.projects, vec![3, 7]);
            Ok(())
        });
    }

    #[test]
    fn test_single_project_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env("KIMAI_PROJECTS", "3");

            let config = Config::load_from(None)?;

            assert_eq!(config.projects, vec![3]);
            Ok(())
        });
    }

    #[test]
    fn test_numeric_user_in_config_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "timesheet.toml",
                r#"
                user = 5
                projects = "4, 9"
                "#,
            )?;

            let config = Config::load_from(Some(Path::new("timesheet.toml")))?;

            assert_eq!(config.user.as_deref(), Some("5"));
            assert_eq!(config.projects, vec![4, 9]);
            Ok(())
        });
    }

    #[test]
    fn test_malformed_project_list_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("KIMAI_PROJECTS", "3,web");

            assert!(Config::load_from(None).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_cli_overrides_config() {
        let config = Config {
            url: Some("https://file.test/api".to_string()),
            api_token: Some("from-file".to_string()),
            user: Some("1".to_string()),
            projects: vec![1],
            page_size: 500,
        };
        let cli = Cli::parse_from([
            "timesheet",
            "--api-token",
            "from-cli",
            "--projects",
            "4,5",
        ]);

        let config = config.with_cli(&cli);

        assert_eq!(config.url.as_deref(), Some("https://file.test/api"));
        assert_eq!(config.api_token.as_deref(), Some("from-cli"));
        assert_eq!(config.user.as_deref(), Some("1"));
        assert_eq!(config.projects, vec![4, 5]);
    }

    #[test]
    fn test_credentials_require_url_and_token() {
        let mut config = Config::default();
        let err = config.credentials().unwrap_err();
        assert!(err.to_string().contains("Kimai URL required"));

        config.url = Some("https://kimai.test/api".to_string());
        config.api_token = Some("   ".to_string());
        let err = config.credentials().unwrap_err();
        assert!(err.to_string().contains("API token required"));

        config.api_token = Some("t0k3n".to_string());
        assert_eq!(
            config.credentials().unwrap(),
            ("https://kimai.test/api", "t0k3n")
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config {
            api_token: Some("super-secret".to_string()),
            ..Config::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
