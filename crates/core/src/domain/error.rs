//! Error taxonomy surfaced to the
//! presentation layer.

use thiserror::Error;

/// Failure reported by a remote
/// collaborator (page fetch, vote, save).
#[derive(
  Debug, Clone, PartialEq, Eq, Error,
)]
pub enum FetchError {
  #[error("network error: {0}")]
  Network(String),
  #[error("unauthorized")]
  Unauthorized,
  #[error("server error: {0}")]
  Server(String),
  #[error("decode error: {0}")]
  Decode(String)
}

#[derive(
  Debug, Clone, PartialEq, Eq, Error,
)]
pub enum TrackerError {
  /// A fetch is already outstanding on
  /// this tracker. Callers should keep
  /// the triggering action disabled
  /// instead of reporting this.
  #[error("tracker busy: a fetch is already in flight")]
  Busy,
  #[error(transparent)]
  Fetch(#[from] FetchError)
}

impl TrackerError {
  pub fn is_busy(&self) -> bool {
    matches!(self, TrackerError::Busy)
  }
}
