//! Vote/save submission abstraction.

use crate::domain::error::FetchError;
use crate::domain::model::{
  ItemKey,
  SaveConfirmation,
  Vote,
  VoteConfirmation
};

#[async_trait::async_trait]
pub trait MutationSink: Send + Sync {
  /// Sets the viewer's vote on `key` to
  /// `vote` (absolute, not a toggle).
  async fn submit_vote(
    &self,
    key: ItemKey,
    vote: Vote
  ) -> Result<VoteConfirmation, FetchError>;

  async fn submit_save(
    &self,
    key: ItemKey,
    saved: bool
  ) -> Result<SaveConfirmation, FetchError>;
}
