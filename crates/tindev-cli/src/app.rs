//! Application state machine and event dispatcher.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tindev_core::{
  Error,
  api::DevApi,
  deck::{MainScreen, PendingReaction},
  dev::Reaction,
  login::LoginScreen,
  session::Session,
  store::SessionStore,
};
use tokio::sync::mpsc;
use tracing::debug;

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum Screen {
  /// Username entry.
  Login(LoginScreen),
  /// The candidate stack for a logged-in developer.
  Main(MainScreen),
}

/// Slow work queued by a key press. The event loop runs it after drawing the
/// next frame, so the status bar already says what is going on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
  SubmitLogin,
  LoadCandidates,
}

/// Result of a reaction call that ran on a spawned task.
#[derive(Debug)]
pub struct ReactionDone {
  pending: PendingReaction,
  outcome: tindev_core::Result<()>,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<A, S> {
  /// Current screen and the state it owns.
  pub screen:     Screen,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  api:       A,
  store:     S,
  next_step: Option<Step>,
  done_tx:   mpsc::UnboundedSender<ReactionDone>,
  done_rx:   mpsc::UnboundedReceiver<ReactionDone>,
}

impl<A, S> App<A, S>
where
  A: DevApi + Clone + 'static,
  S: SessionStore,
{
  /// Create an [`App`] sitting on an empty login screen. Call
  /// [`App::start`] to mount it.
  pub fn new(api: A, store: S) -> Self {
    let (done_tx, done_rx) = mpsc::unbounded_channel();
    Self {
      screen: Screen::Login(LoginScreen::new()),
      status_msg: String::new(),
      api,
      store,
      next_step: None,
      done_tx,
      done_rx,
    }
  }

  // ── Navigation ────────────────────────────────────────────────────────────

  /// Mount the login screen, skipping to the main screen if a session was
  /// persisted by a previous run. Only the local store is read here; the
  /// candidate load is queued as the first [`Step`].
  pub async fn start(&mut self) {
    let login = LoginScreen::new();
    match login.mount(&self.store).await {
      Some(session) => self.enter_main(session),
      None => self.screen = Screen::Login(login),
    }
  }

  fn enter_main(&mut self, session: Session) {
    self.screen = Screen::Main(MainScreen::new(session));
    self.schedule(Step::LoadCandidates, "Loading candidates…");
  }

  // ── Steps ─────────────────────────────────────────────────────────────────

  fn schedule(&mut self, step: Step, status: &str) {
    self.next_step = Some(step);
    self.status_msg = status.into();
  }

  /// The step waiting for [`App::run_pending_step`], if any.
  pub fn pending_step(&self) -> Option<Step> { self.next_step }

  /// Run the queued step to completion. It may queue a follow-up step.
  pub async fn run_pending_step(&mut self) {
    match self.next_step.take() {
      Some(Step::SubmitLogin) => self.submit_login().await,
      Some(Step::LoadCandidates) => self.load_candidates().await,
      None => {}
    }
  }

  async fn load_candidates(&mut self) {
    let Screen::Main(main) = &mut self.screen else {
      return;
    };
    self.status_msg = match main.load(&self.api).await {
      Ok(_) => String::new(),
      Err(e) => format!("Error: {e}  (r to retry)"),
    };
  }

  async fn logout(&mut self) {
    let previous = std::mem::replace(&mut self.screen, Screen::Login(LoginScreen::new()));
    if let Screen::Main(main) = previous {
      self.status_msg = match main.logout(&self.store).await {
        Ok(()) => "Logged out.".into(),
        Err(e) => format!("Error: {e}"),
      };
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    match self.screen {
      Screen::Login(_) => self.handle_login_key(key),
      Screen::Main(_) => self.handle_main_key(key).await,
    }
  }

  fn handle_login_key(&mut self, key: KeyEvent) -> bool {
    let Screen::Login(login) = &mut self.screen else {
      return true;
    };
    match key.code {
      KeyCode::Esc => return false,
      KeyCode::Enter => self.schedule(Step::SubmitLogin, "Signing in…"),
      KeyCode::Backspace => login.pop_char(),
      KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
        login.push_char(c);
      }
      _ => {}
    }
    true
  }

  async fn submit_login(&mut self) {
    let Screen::Login(login) = &mut self.screen else {
      return;
    };
    match login.submit(&self.api, &self.store).await {
      Ok(session) => self.enter_main(session),
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  async fn handle_main_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,
      KeyCode::Left | KeyCode::Char('h') => self.react(Reaction::Dislike),
      KeyCode::Right | KeyCode::Char('l') => self.react(Reaction::Like),
      KeyCode::Char('o') => self.logout().await,
      KeyCode::Char('r') => {
        if matches!(&self.screen, Screen::Main(main) if !main.is_loaded()) {
          self.schedule(Step::LoadCandidates, "Loading candidates…");
        }
      }
      _ => {}
    }
    true
  }

  // ── Reactions ─────────────────────────────────────────────────────────────

  /// Start a reaction to the front candidate and run its network call on a
  /// spawned task. The result arrives through [`App::process_completions`].
  fn react(&mut self, reaction: Reaction) {
    let Screen::Main(main) = &mut self.screen else {
      return;
    };
    // The controls are hidden when there is nobody left.
    if !main.actions_available() {
      return;
    }
    let pending = match main.begin(reaction) {
      Ok(p) => p,
      Err(Error::Busy) => {
        self.status_msg = "Still waiting for the previous request…".into();
        return;
      }
      Err(e) => {
        self.status_msg = format!("Error: {e}");
        return;
      }
    };

    self.status_msg = format!("Sending {reaction}…");
    let api = self.api.clone();
    let tx = self.done_tx.clone();
    tokio::spawn(async move {
      let outcome = api
        .react(&pending.user, &pending.target, pending.reaction)
        .await;
      // The receiver lives as long as the app; a send error means we are
      // shutting down.
      let _ = tx.send(ReactionDone { pending, outcome });
    });
  }

  /// Apply every reaction result that has arrived since the last call.
  pub fn process_completions(&mut self) {
    while let Ok(done) = self.done_rx.try_recv() {
      self.apply_completion(done);
    }
  }

  /// Wait for the next reaction result and apply it.
  #[cfg(test)]
  pub async fn next_completion(&mut self) {
    if let Some(done) = self.done_rx.recv().await {
      self.apply_completion(done);
    }
  }

  fn apply_completion(&mut self, done: ReactionDone) {
    let Screen::Main(main) = &mut self.screen else {
      debug!(target_id = %done.pending.target, "discarding reaction result after logout");
      return;
    };
    let reaction = done.pending.reaction;
    let gone = matches!(done.outcome, Err(Error::NotFound(_)));
    self.status_msg = match main.complete(done.pending, done.outcome) {
      Ok(Some(c)) if gone => format!("{} is no longer available.", c.display_name()),
      Ok(Some(c)) => match reaction {
        Reaction::Like => format!("Liked {}.", c.display_name()),
        Reaction::Dislike => format!("Disliked {}.", c.display_name()),
      },
      Ok(None) => return,
      Err(e) => format!("Error: {e}"),
    };
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use tindev_core::{
    session::USER_KEY,
    store::{MemoryStore, SessionStore},
  };
  use tindev_store_sqlite::SqliteStore;

  use super::*;
  use crate::{
    client::{ApiClient, ApiConfig},
    testing::{FakeService, candidate_json},
    ui::{self, tests::render},
  };

  fn client(fake: &FakeService) -> ApiClient {
    ApiClient::new(ApiConfig {
      base_url: fake.base_url.clone(),
      timeout: Duration::from_secs(5),
      distinct_dislikes: false,
    })
    .unwrap()
  }

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  async fn type_text<A, S>(app: &mut App<A, S>, text: &str)
  where
    A: DevApi + Clone + 'static,
    S: SessionStore,
  {
    for c in text.chars() {
      assert!(app.handle_key(key(KeyCode::Char(c))).await);
    }
  }

  /// Run queued steps until the app is idle, as the event loop would.
  async fn settle<A, S>(app: &mut App<A, S>)
  where
    A: DevApi + Clone + 'static,
    S: SessionStore,
  {
    while app.pending_step().is_some() {
      app.run_pending_step().await;
    }
  }

  fn main_screen<A, S>(app: &App<A, S>) -> &MainScreen {
    match &app.screen {
      Screen::Main(main) => main,
      Screen::Login(_) => panic!("expected the main screen"),
    }
  }

  fn queue_ids<A, S>(app: &App<A, S>) -> Vec<String> {
    main_screen(app)
      .queue()
      .iter()
      .map(|c| c.id.to_string())
      .collect()
  }

  #[tokio::test]
  async fn login_load_and_like_end_to_end() {
    let fake = FakeService::spawn("u1", vec![
      candidate_json("c1", "Ana"),
      candidate_json("c2", "Bruno"),
    ])
    .await;
    let store = SqliteStore::open_in_memory().await.unwrap();
    let mut app = App::new(client(&fake), store.clone());

    app.start().await;
    assert!(matches!(app.screen, Screen::Login(_)));

    type_text(&mut app, "ana").await;
    app.handle_key(key(KeyCode::Enter)).await;
    settle(&mut app).await;

    assert_eq!(store.get(USER_KEY).await.unwrap().as_deref(), Some("u1"));
    assert_eq!(main_screen(&app).session().user.as_str(), "u1");
    assert_eq!(fake.recorded().list_users, vec![Some("u1".to_string())]);
    assert_eq!(queue_ids(&app), ["c1", "c2"]);

    app.handle_key(key(KeyCode::Char('l'))).await;
    app.next_completion().await;

    assert_eq!(queue_ids(&app), ["c2"]);
    assert_eq!(app.status_msg, "Liked Ana.");
    assert_eq!(fake.recorded().reactions, vec![(
      "/devs/c1/likes".to_string(),
      Some("u1".to_string())
    )]);
  }

  #[tokio::test]
  async fn slow_steps_are_announced_before_they_run() {
    let fake = FakeService::spawn("u1", vec![candidate_json("c1", "Ana")]).await;
    let mut app = App::new(client(&fake), MemoryStore::new());
    app.start().await;
    type_text(&mut app, "ana").await;

    app.handle_key(key(KeyCode::Enter)).await;
    assert_eq!(app.pending_step(), Some(Step::SubmitLogin));
    assert!(fake.recorded().registrations.is_empty());
    assert!(render(|f, _| ui::draw(f, &app)).contains("Signing in…"));

    app.run_pending_step().await;
    assert_eq!(app.pending_step(), Some(Step::LoadCandidates));
    assert!(fake.recorded().list_users.is_empty());
    assert!(render(|f, _| ui::draw(f, &app)).contains("Loading candidates…"));

    app.run_pending_step().await;
    assert_eq!(app.pending_step(), None);
    assert_eq!(queue_ids(&app), ["c1"]);
    assert!(app.status_msg.is_empty());
  }

  #[tokio::test]
  async fn candidate_gone_server_side_is_reported_and_skipped() {
    let fake = FakeService::spawn("u1", vec![
      candidate_json("c1", "Ana"),
      candidate_json("c2", "Bruno"),
    ])
    .await;
    fake.set_react_status(axum::http::StatusCode::NOT_FOUND);
    let store = MemoryStore::new();
    store.set(USER_KEY, "u1").await.unwrap();
    let mut app = App::new(client(&fake), store);
    app.start().await;
    settle(&mut app).await;

    app.handle_key(key(KeyCode::Char('l'))).await;
    app.next_completion().await;

    assert_eq!(queue_ids(&app), ["c2"]);
    assert_eq!(app.status_msg, "Ana is no longer available.");
  }

  #[tokio::test]
  async fn persisted_session_skips_login() {
    let fake = FakeService::spawn("unused", vec![candidate_json("c1", "Ana")]).await;
    let store = MemoryStore::new();
    store.set(USER_KEY, "abc123").await.unwrap();
    let mut app = App::new(client(&fake), store);

    app.start().await;
    assert_eq!(app.pending_step(), Some(Step::LoadCandidates));
    settle(&mut app).await;

    assert_eq!(main_screen(&app).session().user.as_str(), "abc123");
    assert!(fake.recorded().registrations.is_empty());
    assert_eq!(fake.recorded().list_users, vec![Some("abc123".to_string())]);
  }

  #[tokio::test]
  async fn logout_returns_to_login_and_forgets_session() {
    let fake = FakeService::spawn("u1", vec![candidate_json("c1", "Ana")]).await;
    let store = MemoryStore::new();
    store.set(USER_KEY, "u1").await.unwrap();
    let mut app = App::new(client(&fake), store.clone());
    app.start().await;
    settle(&mut app).await;

    app.handle_key(key(KeyCode::Char('o'))).await;

    assert!(matches!(app.screen, Screen::Login(_)));
    assert_eq!(store.get(USER_KEY).await.unwrap(), None);

    // A fresh start stays on the login screen.
    let mut restarted = App::new(client(&fake), store);
    restarted.start().await;
    assert!(matches!(restarted.screen, Screen::Login(_)));
  }

  #[tokio::test]
  async fn double_tap_sends_one_reaction() {
    let fake = FakeService::spawn("u1", vec![
      candidate_json("c1", "Ana"),
      candidate_json("c2", "Bruno"),
    ])
    .await;
    let store = MemoryStore::new();
    store.set(USER_KEY, "u1").await.unwrap();
    let mut app = App::new(client(&fake), store);
    app.start().await;
    settle(&mut app).await;

    app.handle_key(key(KeyCode::Right)).await;
    app.handle_key(key(KeyCode::Right)).await;
    assert!(main_screen(&app).is_busy());
    assert!(app.status_msg.starts_with("Still waiting"));

    app.next_completion().await;
    assert_eq!(queue_ids(&app), ["c2"]);
    assert_eq!(fake.recorded().reactions.len(), 1);
  }

  #[tokio::test]
  async fn failed_reaction_keeps_candidate() {
    let fake = FakeService::spawn("u1", vec![candidate_json("c1", "Ana")]).await;
    fake.set_react_status(axum::http::StatusCode::BAD_GATEWAY);
    let store = MemoryStore::new();
    store.set(USER_KEY, "u1").await.unwrap();
    let mut app = App::new(client(&fake), store);
    app.start().await;
    settle(&mut app).await;

    app.handle_key(key(KeyCode::Char('h'))).await;
    app.next_completion().await;

    assert_eq!(queue_ids(&app), ["c1"]);
    assert!(app.status_msg.starts_with("Error:"), "{}", app.status_msg);
  }

  #[tokio::test]
  async fn reaction_keys_are_inert_on_an_empty_queue() {
    let fake = FakeService::spawn("u1", vec![]).await;
    let store = MemoryStore::new();
    store.set(USER_KEY, "u1").await.unwrap();
    let mut app = App::new(client(&fake), store);
    app.start().await;
    settle(&mut app).await;

    app.handle_key(key(KeyCode::Char('l'))).await;
    app.handle_key(key(KeyCode::Char('h'))).await;

    assert!(!main_screen(&app).is_busy());
    assert!(fake.recorded().reactions.is_empty());
  }

  #[tokio::test]
  async fn quit_keys() {
    let fake = FakeService::spawn("u1", vec![]).await;
    let mut app = App::new(client(&fake), MemoryStore::new());
    app.start().await;
    settle(&mut app).await;

    // On the login screen `q` is just a letter.
    assert!(app.handle_key(key(KeyCode::Char('q'))).await);
    assert!(!app.handle_key(key(KeyCode::Esc)).await);
    assert!(
      !app
        .handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
        .await
    );
  }
}
