//! The `DevApi` trait: everything the screens need from the remote service.
//!
//! | Operation | HTTP |
//! |-----------|------|
//! | [`DevApi::register`] | `POST /devs` with `{"username": …}` |
//! | [`DevApi::list_candidates`] | `GET /devs` with header `user: <id>` |
//! | [`DevApi::react`] | `POST /devs/:id/likes` with header `user: <id>` |

use std::future::Future;

use crate::{
  Result,
  dev::{Candidate, DevId, Reaction},
};

/// Abstraction over the remote developer service.
///
/// Implementations map their transport failures onto [`crate::Error`]:
/// `Network` for failed or rejected requests, `NotFound` for 404s and
/// `Protocol` for bodies that do not decode.
pub trait DevApi: Send + Sync {
  /// Register `username`, or look it up if it already exists, and return the
  /// identifier the service assigned to it.
  fn register<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<DevId>> + Send + 'a;

  /// Fetch the candidates the service has queued for `user`.
  fn list_candidates<'a>(
    &'a self,
    user: &'a DevId,
  ) -> impl Future<Output = Result<Vec<Candidate>>> + Send + 'a;

  /// Tell the service that `user` reacted to `target`.
  fn react<'a>(
    &'a self,
    user: &'a DevId,
    target: &'a DevId,
    reaction: Reaction,
  ) -> impl Future<Output = Result<()>> + Send + 'a;
}
