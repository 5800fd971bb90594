//! Optimistic overlay for vote and save
//! actions.
//!
//! A user action writes its predicted
//! result into an overlay before the
//! request goes out; the overlay is
//! dropped when the last outstanding
//! request for that item completes,
//! whether it succeeded or not. While an
//! overlay exists the displayed values
//! come from it.

use std::collections::HashMap;

use tracing::{
  debug,
  warn
};

use crate::domain::error::FetchError;
use crate::domain::model::{
  ItemKey,
  SaveConfirmation,
  Vote,
  VoteConfirmation
};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
)]
pub struct OptimisticOverlay {
  pub pending_vote:    Option<Vote>,
  pub pending_score:   Option<i64>,
  pub pending_saved:   Option<bool>,
  /// Vote requests begun but not yet
  /// completed.
  pub votes_in_flight: u32,
  pub saves_in_flight: u32
}

impl OptimisticOverlay {
  pub fn is_dirty(&self) -> bool {
    self.pending_vote.is_some()
      || self.pending_score.is_some()
      || self.pending_saved.is_some()
  }
}

/// Vote/score shown right after the user
/// asks for `requested`. Asking for the
/// active vote again clears it.
pub fn vote_transition(
  current_vote: Vote,
  current_score: i64,
  requested: Vote
) -> (Vote, i64) {
  let next = if requested == current_vote {
    Vote::None
  } else {
    requested
  };
  let score = current_score
    - current_vote.as_score()
    + next.as_score();
  (next, score)
}

#[derive(Debug, Default)]
pub struct OptimisticMutationState {
  overlays:
    HashMap<ItemKey, OptimisticOverlay>
}

impl OptimisticMutationState {
  pub fn new() -> Self {
    Self::default()
  }

  /// Records the predicted vote and
  /// returns it for display. Chained
  /// actions build on a pending overlay
  /// rather than on the given values.
  pub fn begin_vote(
    &mut self,
    key: ItemKey,
    current_vote: Vote,
    current_score: i64,
    requested: Vote
  ) -> (Vote, i64) {
    let overlay =
      self.overlays.entry(key).or_default();
    let base_vote = overlay
      .pending_vote
      .unwrap_or(current_vote);
    let base_score = overlay
      .pending_score
      .unwrap_or(current_score);

    let (vote, score) = vote_transition(
      base_vote, base_score, requested
    );
    overlay.pending_vote = Some(vote);
    overlay.pending_score = Some(score);
    overlay.votes_in_flight += 1;

    debug!(
      %key,
      ?vote,
      score,
      "optimistic vote"
    );

    (vote, score)
  }

  /// Drops the vote overlay once no other
  /// vote on `key` is in flight; until
  /// then the latest prediction stays
  /// displayed. The result is handed back
  /// unchanged so callers can propagate
  /// it.
  pub fn complete_vote(
    &mut self,
    key: ItemKey,
    result: Result<
      VoteConfirmation,
      FetchError
    >
  ) -> Result<VoteConfirmation, FetchError>
  {
    if let Some(overlay) =
      self.overlays.get_mut(&key)
    {
      overlay.votes_in_flight = overlay
        .votes_in_flight
        .saturating_sub(1);
      if overlay.votes_in_flight == 0 {
        overlay.pending_vote = None;
        overlay.pending_score = None;
      }
    }
    self.prune(key);

    if let Err(err) = &result {
      warn!(
        %key,
        error = %err,
        still_pending = self
          .overlays
          .get(&key)
          .is_some_and(|o| {
            o.votes_in_flight > 0
          }),
        "vote failed"
      );
    }
    result
  }

  pub fn displayed_vote(
    &self,
    key: ItemKey,
    server_vote: Vote,
    server_score: i64
  ) -> (Vote, i64) {
    let overlay = self.overlays.get(&key);
    (
      overlay
        .and_then(|o| o.pending_vote)
        .unwrap_or(server_vote),
      overlay
        .and_then(|o| o.pending_score)
        .unwrap_or(server_score)
    )
  }

  pub fn begin_save(
    &mut self,
    key: ItemKey,
    requested: bool
  ) -> bool {
    let overlay =
      self.overlays.entry(key).or_default();
    overlay.pending_saved = Some(requested);
    overlay.saves_in_flight += 1;

    debug!(
      %key,
      saved = requested,
      "optimistic save"
    );

    requested
  }

  pub fn complete_save(
    &mut self,
    key: ItemKey,
    result: Result<
      SaveConfirmation,
      FetchError
    >
  ) -> Result<SaveConfirmation, FetchError>
  {
    if let Some(overlay) =
      self.overlays.get_mut(&key)
    {
      overlay.saves_in_flight = overlay
        .saves_in_flight
        .saturating_sub(1);
      if overlay.saves_in_flight == 0 {
        overlay.pending_saved = None;
      }
    }
    self.prune(key);

    if let Err(err) = &result {
      warn!(
        %key,
        error = %err,
        still_pending = self
          .overlays
          .get(&key)
          .is_some_and(|o| {
            o.saves_in_flight > 0
          }),
        "save failed"
      );
    }
    result
  }

  pub fn displayed_saved(
    &self,
    key: ItemKey,
    server_saved: bool
  ) -> bool {
    self
      .overlays
      .get(&key)
      .and_then(|o| o.pending_saved)
      .unwrap_or(server_saved)
  }

  pub fn is_dirty(
    &self,
    key: ItemKey
  ) -> bool {
    self
      .overlays
      .get(&key)
      .is_some_and(
        OptimisticOverlay::is_dirty
      )
  }

  pub fn overlay(
    &self,
    key: ItemKey
  ) -> Option<OptimisticOverlay> {
    self.overlays.get(&key).copied()
  }

  pub fn len(&self) -> usize {
    self.overlays.len()
  }

  pub fn is_empty(&self) -> bool {
    self.overlays.is_empty()
  }

  /// Drops every overlay, e.g. when the
  /// owning feed is torn down.
  pub fn clear(&mut self) {
    self.overlays.clear();
  }

  fn prune(&mut self, key: ItemKey) {
    if !self.is_dirty(key) {
      self.overlays.remove(&key);
    }
  }
}
