//! Login screen state machine.
//!
//! The screen owns the username being typed. Mounting it checks the store for
//! a persisted session (auto-login); submitting exchanges the username for an
//! identifier, persists it and yields the [`Session`] for the main screen.

use tracing::{info, warn};

use crate::{
  Result,
  api::DevApi,
  session::{self, Session},
  store::SessionStore,
};

/// State owned by the login screen.
#[derive(Debug, Clone, Default)]
pub struct LoginScreen {
  /// Current contents of the username input. Not validated.
  pub username: String,
  /// Message from the last failed submission, cleared on the next attempt.
  pub error:    Option<String>,
}

impl LoginScreen {
  pub fn new() -> Self { Self::default() }

  /// Check for a persisted session. `Some` means skip straight to the main
  /// screen without registering again.
  pub async fn mount<S: SessionStore>(&self, store: &S) -> Option<Session> {
    let session = session::load_session(store).await;
    if let Some(s) = &session {
      info!(user = %s.user, "resuming persisted session");
    }
    session
  }

  // ── Input ─────────────────────────────────────────────────────────────────

  pub fn push_char(&mut self, c: char) { self.username.push(c); }

  pub fn pop_char(&mut self) { self.username.pop(); }

  pub fn clear_input(&mut self) { self.username.clear(); }

  // ── Submit ────────────────────────────────────────────────────────────────

  /// Register the typed username and persist the returned identifier.
  ///
  /// On any failure the screen stays put with [`LoginScreen::error`] set and
  /// nothing is persisted.
  pub async fn submit<A, S>(&mut self, api: &A, store: &S) -> Result<Session>
  where
    A: DevApi,
    S: SessionStore,
  {
    self.error = None;
    let result = Self::register(&self.username, api, store).await;

    if let Err(e) = &result {
      warn!(username = %self.username, error = %e, "login failed");
      self.error = Some(e.to_string());
    }
    result
  }

  async fn register<A, S>(username: &str, api: &A, store: &S) -> Result<Session>
  where
    A: DevApi,
    S: SessionStore,
  {
    let id = api.register(username).await?;
    let session = Session::new(id);
    session::save_session(store, &session).await?;
    info!(user = %session.user, "logged in");
    Ok(session)
  }
}
