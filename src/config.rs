//! Configuration file handling for the household book.
//!
//! The configuration file is stored at `$HBOOK_HOME/config.json` and holds the backend location
//! and credentials along with a few settings that change how receipts are entered and shown.

use crate::model::Locale;
use crate::validate::UnfilledPolicy;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const APP_NAME: &str = "household-book";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$HBOOK_HOME` and from there it loads `$HBOOK_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    backend_url: Url,
}

impl Config {
    /// Creates the data directory and an initial `config.json` in it.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g. `$HOME/household-book`
    /// - `backend_url` - Where the receipt backend lives, e.g. `https://example.com/rest/v1`
    /// - `api_key` - Sent to the backend in the `apikey` header when present.
    ///
    /// # Errors
    /// - Returns an error if `backend_url` is not a URL or if any file operations fail.
    pub async fn create(
        dir: impl Into<PathBuf>,
        backend_url: &str,
        api_key: Option<String>,
        locale: Locale,
        unfilled_policy: UnfilledPolicy,
    ) -> Result<Self> {
        let backend_url = parse_backend_url(backend_url)?;

        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the household book home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile {
            backend_url: backend_url.to_string(),
            api_key,
            locale,
            unfilled_policy,
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
            backend_url,
        })
    }

    /// Validates that `hbook_home` and its config file exist, then loads the config file.
    pub async fn load(hbook_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = hbook_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The household book home is missing, run 'hbook init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;
        let backend_url = parse_backend_url(&config_file.backend_url)
            .with_context(|| format!("Bad backend_url in '{}'", config_path.display()))?;

        Ok(Self {
            root,
            config_path,
            config_file,
            backend_url,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backend_url(&self) -> &Url {
        &self.backend_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.config_file.api_key.as_deref()
    }

    pub fn locale(&self) -> Locale {
        self.config_file.locale
    }

    /// What happens to lines whose cost was never entered.
    pub fn unfilled_policy(&self) -> UnfilledPolicy {
        self.config_file.unfilled_policy
    }
}

fn parse_backend_url(s: &str) -> Result<Url> {
    let url = Url::parse(s).with_context(|| format!("Invalid backend URL '{s}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("The backend URL must use http or https, got '{s}'");
    }
    Ok(url)
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "household-book",
///   "config_version": 1,
///   "backend_url": "https://example.com/rest/v1",
///   "api_key": "k3y",
///   "unfilled_policy": "reject",
///   "locale": "ja"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "household-book"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Base URL of the receipt backend
    backend_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,

    #[serde(default)]
    unfilled_policy: UnfilledPolicy,

    #[serde(default)]
    locale: Locale,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            backend_url: String::new(),
            api_key: None,
            unfilled_policy: UnfilledPolicy::default(),
            locale: Locale::default(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create_and_load() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("household-book");

        let created = Config::create(
            &home_dir,
            "https://example.com/rest/v1",
            Some("k3y".to_string()),
            Locale::En,
            UnfilledPolicy::SubmitAsZero,
        )
        .await
        .unwrap();
        assert!(created.config_path().is_file());

        let loaded = Config::load(&home_dir).await.unwrap();
        assert_eq!(loaded.root(), created.root());
        assert_eq!(loaded.backend_url().as_str(), "https://example.com/rest/v1");
        assert_eq!(loaded.api_key(), Some("k3y"));
        assert_eq!(loaded.locale(), Locale::En);
        assert_eq!(loaded.unfilled_policy(), UnfilledPolicy::SubmitAsZero);
    }

    #[tokio::test]
    async fn test_config_create_rejects_bad_url() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("household-book");
        for url in ["not a url", "ftp://example.com"] {
            let result = Config::create(
                &home_dir,
                url,
                None,
                Locale::default(),
                UnfilledPolicy::default(),
            )
            .await;
            assert!(result.is_err(), "{url} should be rejected");
        }
        assert!(!home_dir.exists());
    }

    #[tokio::test]
    async fn test_config_load_missing_home() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path().join("nope")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_config_file_load_with_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_JSON);
        let json = r#"{
            "app_name": "household-book",
            "config_version": 1,
            "backend_url": "http://localhost:8080"
        }"#;
        utils::write(&config_path, json).await.unwrap();

        let config = ConfigFile::load(&config_path).await.unwrap();

        assert_eq!(config.api_key, None);
        assert_eq!(config.unfilled_policy, UnfilledPolicy::Reject);
        assert_eq!(config.locale, Locale::Ja);
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_JSON);
        let json = r#"{
            "app_name": "wrong_app",
            "config_version": 1,
            "backend_url": "http://localhost:8080"
        }"#;
        utils::write(&config_path, json).await.unwrap();

        let result = ConfigFile::load(&config_path).await;
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[test]
    fn test_config_file_serialization_omits_api_key() {
        let config = ConfigFile {
            backend_url: "http://localhost:8080/".to_string(),
            ..ConfigFile::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("api_key"));
        assert!(json.contains("\"unfilled_policy\":\"reject\""));
        assert!(json.contains("\"locale\":\"ja\""));
    }
}
