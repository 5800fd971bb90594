use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggingError {
  #[error("invalid logging.level: {0}")]
  Level(String),
  #[error("logging already installed: {0}")]
  Install(String)
}

/// Base directive for the configured
/// level. Dependencies stay at warn.
pub fn default_directive(
  level: &str
) -> Result<String, LoggingError> {
  let level = level.trim();
  level.parse::<LevelFilter>().map_err(
    |e| {
      LoggingError::Level(format!(
        "{level:?}: {e}"
      ))
    }
  )?;
  Ok(format!(
    "{level},lemfeed_core={level},\
     lemfeed_client={level},\
     reqwest=warn,hyper=warn"
  ))
}

/// Installs the global fmt subscriber.
/// `RUST_LOG` overrides the configured
/// level. Call once, from the binary.
pub fn init_logging(
  level: &str
) -> Result<(), LoggingError> {
  let default = default_directive(level)?;
  let filter =
    EnvFilter::try_from_default_env()
      .unwrap_or_else(|_| {
        EnvFilter::new(default)
      });

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(true)
    .with_level(true)
    .try_init()
    .map_err(|e| {
      LoggingError::Install(e.to_string())
    })
}
