//! Wire types for developers: identifiers, candidate profiles, reactions.
//!
//! The remote service stores developers as documents keyed by `_id`. Only the
//! fields the client renders are modelled; anything else in the response is
//! ignored.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier assigned by the remote service to a developer.
///
/// Used both for the logged-in actor and for candidates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DevId(String);

impl DevId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for DevId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for DevId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

/// A profile eligible for a like or dislike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
  #[serde(rename = "_id")]
  pub id:     DevId,
  /// Display name. GitHub users without a public name come back as `null`.
  #[serde(default)]
  pub name:   Option<String>,
  #[serde(default)]
  pub bio:    Option<String>,
  /// Avatar image URL.
  #[serde(default)]
  pub avatar: Option<String>,
}

impl Candidate {
  pub fn display_name(&self) -> &str {
    self
      .name
      .as_deref()
      .filter(|n| !n.trim().is_empty())
      .unwrap_or("(no name)")
  }

  pub fn display_bio(&self) -> &str {
    self
      .bio
      .as_deref()
      .filter(|b| !b.trim().is_empty())
      .unwrap_or("No bio.")
  }

  pub fn display_avatar(&self) -> &str {
    self
      .avatar
      .as_deref()
      .filter(|a| !a.trim().is_empty())
      .unwrap_or("(no avatar)")
  }
}

/// Body of `POST /devs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
  pub username: String,
}

/// The part of the `POST /devs` response the client keeps.
#[derive(Debug, Clone, Deserialize)]
pub struct Registered {
  #[serde(rename = "_id")]
  pub id: DevId,
}

/// What the user did with the front candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
  Like,
  Dislike,
}

impl fmt::Display for Reaction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Like => f.write_str("like"),
      Self::Dislike => f.write_str("dislike"),
    }
  }
}
