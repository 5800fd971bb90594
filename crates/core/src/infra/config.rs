//! Loads the TOML client configuration and
//! checks it before anything connects.

use std::path::{
  Path,
  PathBuf
};

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;
use tokio::fs;

use crate::domain::model::SortType;
use crate::infra::logging::default_directive;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("config IO error: {0}")]
  Io(#[from] std::io::Error),
  #[error("config parse error: {0}")]
  Parse(#[from] toml::de::Error),
  #[error("config invalid: {0}")]
  Invalid(String)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
  pub server:  ServerConfig,
  #[serde(default)]
  pub auth:    Option<AuthConfig>,
  #[serde(default)]
  pub feed:    FeedConfig,
  #[serde(default)]
  pub logging: LoggingConfig
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub instance_url: String,
  #[serde(default = "default_timeout_ms")]
  pub timeout_ms:   u64,
  #[serde(default = "default_user_agent")]
  pub user_agent:   String
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
  pub username: Option<String>,
  pub password: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
  #[serde(default = "default_page_size")]
  pub page_size:     u32,
  #[serde(default = "default_profile_limit")]
  pub profile_limit: u32,
  #[serde(default = "default_sort")]
  pub sort:          SortType
}

impl Default for FeedConfig {
  fn default() -> Self {
    Self {
      page_size:     default_page_size(),
      profile_limit: default_profile_limit(),
      sort:          default_sort()
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
  #[serde(default = "default_log_level")]
  pub level: String
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: default_log_level()
    }
  }
}

fn default_timeout_ms() -> u64 {
  10_000
}

fn default_user_agent() -> String {
  format!(
    "lemfeed/{}",
    env!("CARGO_PKG_VERSION")
  )
}

fn default_page_size() -> u32 {
  50
}

fn default_profile_limit() -> u32 {
  20
}

fn default_sort() -> SortType {
  SortType::New
}

fn default_log_level() -> String {
  "info".to_string()
}

pub struct ConfigLoader;

impl ConfigLoader {
  pub async fn load(
    path: &Path
  ) -> Result<ClientConfig, ConfigError> {
    let text =
      fs::read_to_string(path).await?;
    let config = Self::parse(&text)?;
    Ok(config)
  }

  /// Parses and validates TOML text.
  pub fn parse(
    text: &str
  ) -> Result<ClientConfig, ConfigError> {
    let config: ClientConfig =
      toml::from_str(text)?;
    validate(&config)?;
    Ok(config)
  }
}

pub fn validate(
  config: &ClientConfig
) -> Result<(), ConfigError> {
  let url =
    Url::parse(&config.server.instance_url)
      .map_err(|e| {
        ConfigError::Invalid(format!(
          "server.instance_url: {e}"
        ))
      })?;
  if !matches!(url.scheme(), "http" | "https")
  {
    return Err(ConfigError::Invalid(
      format!(
        "server.instance_url must be \
         http(s), got {}",
        url.scheme()
      )
    ));
  }

  if config.server.timeout_ms == 0 {
    return Err(ConfigError::Invalid(
      "server.timeout_ms must be > 0"
        .into()
    ));
  }

  if config.feed.page_size == 0 {
    return Err(ConfigError::Invalid(
      "feed.page_size must be > 0".into()
    ));
  }

  if config.feed.profile_limit == 0 {
    return Err(ConfigError::Invalid(
      "feed.profile_limit must be > 0"
        .into()
    ));
  }

  default_directive(&config.logging.level)
    .map_err(|e| {
      ConfigError::Invalid(e.to_string())
    })?;

  if let Some(auth) = &config.auth {
    let has_user = auth
      .username
      .as_deref()
      .is_some_and(|u| !u.trim().is_empty());
    let has_pass = auth
      .password
      .as_deref()
      .is_some_and(|p| !p.is_empty());
    if has_user != has_pass {
      return Err(ConfigError::Invalid(
        "auth.username and auth.password \
         must be set together"
          .into()
      ));
    }
  }

  Ok(())
}

/// CLI argument wins, then
/// `LEMFEED_CONFIG`, then `lemfeed.toml`
/// in the working directory.
pub fn resolve_config_path(
  arg: Option<PathBuf>
) -> PathBuf {
  if let Some(p) = arg {
    return p;
  }

  if let Ok(p) =
    std::env::var("LEMFEED_CONFIG")
  {
    if !p.trim().is_empty() {
      return PathBuf::from(p);
    }
  }

  PathBuf::from("lemfeed.toml")
}

impl ClientConfig {
  /// Username/password pair, when both
  /// are configured.
  pub fn credentials(
    &self
  ) -> Option<(&str, &str)> {
    let auth = self.auth.as_ref()?;
    let username =
      auth.username.as_deref()?.trim();
    let password = auth.password.as_deref()?;
    if username.is_empty()
      || password.is_empty()
    {
      return None;
    }
    Some((username, password))
  }
}
