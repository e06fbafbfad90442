//! Error types for `tindev-core`.

use thiserror::Error;

/// Every failure a screen can surface to the user.
///
/// None of these are fatal: each is recovered by retrying or by falling back
/// to the login screen.
#[derive(Debug, Error)]
pub enum Error {
  /// The request failed, timed out, or came back with an unexpected status.
  #[error("network error: {0}")]
  Network(String),

  /// The remote service no longer knows the referenced resource.
  #[error("not found: {0}")]
  NotFound(String),

  /// The local session store could not be read or written.
  #[error("session store error: {0}")]
  Persistence(String),

  /// The response body did not have the expected shape.
  #[error("unexpected response: {0}")]
  Protocol(String),

  #[error("no candidate left to react to")]
  EmptyQueue,

  #[error("still waiting for the previous request")]
  Busy,
}

impl Error {
  /// Wrap any store backend error as [`Error::Persistence`].
  pub fn persistence(e: impl std::error::Error) -> Self {
    Self::Persistence(e.to_string())
  }
}

impl From<serde_json::Error> for Error {
  fn from(e: serde_json::Error) -> Self { Self::Protocol(e.to_string()) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
