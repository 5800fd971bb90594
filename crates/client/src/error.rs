//! Maps transport and API failures into
//! the core's `FetchError`.

use lemfeed_core::FetchError;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("http client build failed: {0}")]
  Build(#[from] reqwest::Error),
  #[error("invalid instance url: {0}")]
  Url(String),
  #[error("login did not return a token")]
  NoToken,
  #[error(transparent)]
  Fetch(#[from] FetchError)
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
  error: String
}

/// API error codes that mean the session
/// is missing or not allowed.
const AUTH_ERRORS: &[&str] = &[
  "not_logged_in",
  "incorrect_login",
  "not_an_admin",
  "not_a_moderator",
  "site_ban",
  "deleted",
  "email_not_verified",
  "registration_application_pending"
];

/// Classifies a non-success response. The
/// API reports most failures as 400 with
/// `{"error": "<code>"}`.
pub fn classify_status(
  status: StatusCode,
  body: &str
) -> FetchError {
  let code =
    serde_json::from_str::<ApiErrorBody>(
      body
    )
    .map(|b| b.error)
    .ok();

  if status == StatusCode::UNAUTHORIZED
    || status == StatusCode::FORBIDDEN
  {
    return FetchError::Unauthorized;
  }

  match code {
    | Some(code)
      if AUTH_ERRORS
        .contains(&code.as_str()) =>
    {
      FetchError::Unauthorized
    }
    | Some(code) => FetchError::Server(code),
    | None => {
      let body = body.trim();
      if body.is_empty() {
        FetchError::Server(status.to_string())
      } else {
        FetchError::Server(format!(
          "{status}: {body}"
        ))
      }
    }
  }
}

pub(crate) fn classify_transport(
  err: &reqwest::Error
) -> FetchError {
  if err.is_decode() {
    FetchError::Decode(err.to_string())
  } else {
    FetchError::Network(err.to_string())
  }
}
