//! Drives vote/save actions through the
//! optimistic overlay and the mutation
//! collaborator.

use std::sync::{
  Mutex,
  MutexGuard,
  PoisonError
};

use super::optimistic::OptimisticMutationState;
use crate::domain::error::FetchError;
use crate::domain::model::{
  FeedEntry,
  SaveConfirmation,
  Vote,
  VoteConfirmation
};
use crate::ports::mutations::MutationSink;

pub struct Interactions<M> {
  sink:  M,
  state: Mutex<OptimisticMutationState>
}

impl<M: MutationSink> Interactions<M> {
  pub fn new(sink: M) -> Self {
    Self {
      sink,
      state: Mutex::new(
        OptimisticMutationState::new()
      )
    }
  }

  pub fn sink(&self) -> &M {
    &self.sink
  }

  fn state(
    &self
  ) -> MutexGuard<'_, OptimisticMutationState>
  {
    self
      .state
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
  }

  /// Shows the predicted vote at once,
  /// submits it, then drops the overlay.
  /// On success the caller should write
  /// the confirmation into its tracker.
  pub async fn vote<E>(
    &self,
    item: &E,
    requested: Vote
  ) -> Result<VoteConfirmation, FetchError>
  where
    E: FeedEntry + Sync
  {
    let key = item.key();
    let (vote, _) = self.state().begin_vote(
      key,
      item.vote(),
      item.score(),
      requested
    );

    let result =
      self.sink.submit_vote(key, vote).await;

    self.state().complete_vote(key, result)
  }

  pub async fn set_saved<E>(
    &self,
    item: &E,
    saved: bool
  ) -> Result<SaveConfirmation, FetchError>
  where
    E: FeedEntry + Sync
  {
    let key = item.key();
    let saved =
      self.state().begin_save(key, saved);

    let result =
      self.sink.submit_save(key, saved).await;

    self.state().complete_save(key, result)
  }

  /// Flips the currently displayed saved
  /// flag.
  pub async fn toggle_save<E>(
    &self,
    item: &E
  ) -> Result<SaveConfirmation, FetchError>
  where
    E: FeedEntry + Sync
  {
    let saved = !self.displayed_saved(item);
    self.set_saved(item, saved).await
  }

  pub fn displayed_vote<E: FeedEntry>(
    &self,
    item: &E
  ) -> (Vote, i64) {
    self.state().displayed_vote(
      item.key(),
      item.vote(),
      item.score()
    )
  }

  pub fn displayed_saved<E: FeedEntry>(
    &self,
    item: &E
  ) -> bool {
    self
      .state()
      .displayed_saved(
        item.key(),
        item.saved()
      )
  }

  pub fn is_dirty<E: FeedEntry>(
    &self,
    item: &E
  ) -> bool {
    self.state().is_dirty(item.key())
  }
}
