//! Main screen state machine: the candidate queue and reactions to it.
//!
//! The queue is loaded once per mount and afterwards only shrinks from the
//! front, one candidate per completed like or dislike. A reaction is split in
//! two halves, [`MainScreen::begin`] and [`MainScreen::complete`], so a caller
//! can run the network call elsewhere (e.g. on a spawned task) while the UI
//! keeps drawing. Only one reaction may be in flight at a time.

use std::{
  collections::VecDeque,
  sync::atomic::{AtomicU64, Ordering},
};

use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  api::DevApi,
  dev::{Candidate, DevId, Reaction},
  session::{self, Session},
  store::SessionStore,
};

// ─── Queue ───────────────────────────────────────────────────────────────────

/// Candidates left to review, front first.
#[derive(Debug, Clone, Default)]
pub struct CandidateQueue {
  items: VecDeque<Candidate>,
}

impl CandidateQueue {
  pub fn new(items: Vec<Candidate>) -> Self { Self { items: items.into() } }

  pub fn len(&self) -> usize { self.items.len() }

  pub fn is_empty(&self) -> bool { self.items.is_empty() }

  /// The candidate currently on top of the stack.
  pub fn front(&self) -> Option<&Candidate> { self.items.front() }

  pub fn iter(&self) -> impl ExactSizeIterator<Item = &Candidate> { self.items.iter() }

  fn pop_front(&mut self) -> Option<Candidate> { self.items.pop_front() }
}

// ─── Pending reaction ────────────────────────────────────────────────────────

/// Source of [`PendingReaction`] tickets. Shared by every mount, so a ticket
/// is never reused within a process.
static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// A reaction that has been started but whose network call has not finished.
///
/// Only the [`MainScreen`] that issued it will accept it back: two pending
/// reactions with the same user, target and kind still carry different
/// tickets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReaction {
  pub user:     DevId,
  pub target:   DevId,
  pub reaction: Reaction,
  ticket:       u64,
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// State owned by the main screen.
#[derive(Debug, Clone)]
pub struct MainScreen {
  session:   Session,
  queue:     CandidateQueue,
  loaded:    bool,
  in_flight: Option<PendingReaction>,
  /// Message from the last failed operation, cleared on the next success.
  pub error: Option<String>,
}

impl MainScreen {
  /// Mount the screen for `session` with an empty queue.
  pub fn new(session: Session) -> Self {
    Self {
      session,
      queue: CandidateQueue::default(),
      loaded: false,
      in_flight: None,
      error: None,
    }
  }

  pub fn session(&self) -> &Session { &self.session }

  pub fn queue(&self) -> &CandidateQueue { &self.queue }

  /// Whether the mount-time load has succeeded.
  pub fn is_loaded(&self) -> bool { self.loaded }

  pub fn is_busy(&self) -> bool { self.in_flight.is_some() }

  /// Like and dislike are only offered while there is someone to react to.
  pub fn actions_available(&self) -> bool { !self.queue.is_empty() }

  // ── Loading ───────────────────────────────────────────────────────────────

  /// Fetch the candidate queue for the session's user.
  ///
  /// Runs at most once successfully per mount; later calls return the current
  /// length without touching the network. A failed load leaves the queue
  /// untouched and may be retried.
  pub async fn load<A: DevApi>(&mut self, api: &A) -> Result<usize> {
    if self.loaded {
      return Ok(self.queue.len());
    }
    match api.list_candidates(&self.session.user).await {
      Ok(candidates) => {
        debug!(user = %self.session.user, count = candidates.len(), "candidates loaded");
        self.queue = CandidateQueue::new(candidates);
        self.loaded = true;
        self.error = None;
        Ok(self.queue.len())
      }
      Err(e) => {
        warn!(user = %self.session.user, error = %e, "loading candidates failed");
        self.error = Some(e.to_string());
        Err(e)
      }
    }
  }

  // ── Reactions ─────────────────────────────────────────────────────────────

  /// Start reacting to the front candidate.
  ///
  /// Fails with [`Error::EmptyQueue`] if there is no candidate and with
  /// [`Error::Busy`] if another reaction is still in flight.
  pub fn begin(&mut self, reaction: Reaction) -> Result<PendingReaction> {
    if self.in_flight.is_some() {
      return Err(Error::Busy);
    }
    let front = self.queue.front().ok_or(Error::EmptyQueue)?;
    let pending = PendingReaction {
      user: self.session.user.clone(),
      target: front.id.clone(),
      reaction,
      ticket: NEXT_TICKET.fetch_add(1, Ordering::Relaxed),
    };
    self.in_flight = Some(pending.clone());
    Ok(pending)
  }

  /// Apply the outcome of the network call started by [`MainScreen::begin`].
  ///
  /// - success: the front candidate is removed and returned;
  /// - [`Error::NotFound`]: the candidate is gone server-side, so it is
  ///   removed anyway;
  /// - any other error: the queue is left as it was and the error returned.
  ///
  /// Returns `Ok(None)` if `pending` is not the reaction currently in flight
  /// (e.g. it was issued by a previous mount, even for the same user and
  /// candidate); nothing changes in that case.
  pub fn complete(
    &mut self,
    pending: PendingReaction,
    outcome: Result<()>,
  ) -> Result<Option<Candidate>> {
    if self.in_flight.as_ref() != Some(&pending) {
      debug!(target_id = %pending.target, "ignoring stale reaction");
      return Ok(None);
    }
    self.in_flight = None;

    match outcome {
      Ok(()) => {}
      Err(Error::NotFound(msg)) => {
        warn!(target_id = %pending.target, %msg, "candidate already gone, advancing");
      }
      Err(e) => {
        self.error = Some(e.to_string());
        return Err(e);
      }
    }

    self.error = None;
    let removed = self.queue.pop_front();
    debug_assert_eq!(removed.as_ref().map(|c| &c.id), Some(&pending.target));
    if let Some(c) = &removed {
      info!(target_id = %c.id, reaction = %pending.reaction, remaining = self.queue.len(), "reacted");
    }
    Ok(removed)
  }

  /// Run a whole reaction inline: begin, call the service, complete.
  pub async fn react<A: DevApi>(&mut self, api: &A, reaction: Reaction) -> Result<Candidate> {
    let pending = self.begin(reaction)?;
    let outcome = api
      .react(&pending.user, &pending.target, pending.reaction)
      .await;
    self.complete(pending, outcome)?.ok_or(Error::EmptyQueue)
  }

  pub async fn like<A: DevApi>(&mut self, api: &A) -> Result<Candidate> {
    self.react(api, Reaction::Like).await
  }

  pub async fn dislike<A: DevApi>(&mut self, api: &A) -> Result<Candidate> {
    self.react(api, Reaction::Dislike).await
  }

  // ── Logout ────────────────────────────────────────────────────────────────

  /// Clear the persisted session. The screen is consumed: the caller goes
  /// back to the login screen whatever the result.
  pub async fn logout<S: SessionStore>(self, store: &S) -> Result<()> {
    info!(user = %self.session.user, "logging out");
    session::end_session(store).await
  }
}
