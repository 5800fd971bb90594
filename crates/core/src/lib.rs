//! Feed aggregation core for a federated
//! link-aggregator client: paginated,
//! de-duplicating item trackers, a merged
//! newest-first feed projection, and an
//! optimistic overlay for vote/save
//! actions.

pub mod domain;
pub mod feed;
pub mod infra;
pub mod ports;
pub mod sidebar;

pub use domain::error::{
  FetchError,
  TrackerError
};
pub use domain::model::{
  FeedEntry,
  FeedFilter,
  FeedItem,
  ItemId,
  ItemKey,
  ItemKind,
  OwnerContext,
  PersonId,
  ProfileTab,
  SaveConfirmation,
  SortType,
  Vote,
  VoteConfirmation
};
pub use feed::cursor::PaginationCursor;
pub use feed::interactions::Interactions;
pub use feed::merger::{
  FeedMerger,
  MergeSource
};
pub use feed::optimistic::{
  OptimisticMutationState,
  OptimisticOverlay
};
pub use feed::profile::ProfileFeed;
pub use feed::tracker::ItemTracker;
pub use ports::mutations::MutationSink;
pub use ports::source::{
  Page,
  PageSource
};
