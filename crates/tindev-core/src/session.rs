//! The logged-in session and its persistence under the `user` key.

use tracing::warn;

use crate::{Error, Result, dev::DevId, store::SessionStore};

/// Key under which the logged-in identifier is persisted.
pub const USER_KEY: &str = "user";

/// Typed navigation context handed from the login screen to the main screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  pub user: DevId,
}

impl Session {
  pub fn new(user: DevId) -> Self { Self { user } }
}

/// Read the persisted session, if any.
///
/// A store that cannot be read is logged and treated as holding no session,
/// which sends the user back through manual login.
pub async fn load_session<S: SessionStore>(store: &S) -> Option<Session> {
  match store.get(USER_KEY).await {
    Ok(Some(id)) if !id.is_empty() => Some(Session::new(DevId::new(id))),
    Ok(_) => None,
    Err(e) => {
      warn!(error = %e, "could not read persisted session");
      None
    }
  }
}

/// Persist `session` so the next start logs in automatically.
pub async fn save_session<S: SessionStore>(store: &S, session: &Session) -> Result<()> {
  store
    .set(USER_KEY, session.user.as_str())
    .await
    .map_err(Error::persistence)
}

/// Forget the persisted session. Clears the whole store.
pub async fn end_session<S: SessionStore>(store: &S) -> Result<()> {
  store.clear().await.map_err(Error::persistence)
}
