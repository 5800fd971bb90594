//! Lemmy v3 HTTP adapter: implements the
//! core's page and mutation ports on top
//! of reqwest.

pub mod client;
pub mod error;
pub mod models;
mod time;

pub use client::LemmyClient;
pub use error::ClientError;
