//! Combines trackers of both item kinds
//! into one newest-first feed.

use std::collections::HashSet;

use tracing::debug;

use super::tracker::ItemTracker;
use crate::domain::model::{
  FeedEntry,
  FeedItem,
  ItemKey
};

/// A tracker handed to the merger, tagged
/// with the union variant its items wrap
/// into.
pub enum MergeSource<'a, P, C> {
  Posts(&'a ItemTracker<P>),
  Comments(&'a ItemTracker<C>)
}

impl<P, C> Clone for MergeSource<'_, P, C> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<P, C> Copy for MergeSource<'_, P, C> {}

impl<P, C> MergeSource<'_, P, C>
where
  P: FeedEntry + Clone,
  C: FeedEntry + Clone
{
  pub fn is_exhausted(&self) -> bool {
    match self {
      | MergeSource::Posts(tracker) => {
        tracker.is_exhausted()
      }
      | MergeSource::Comments(tracker) => {
        tracker.is_exhausted()
      }
    }
  }
}

pub struct FeedMerger;

impl FeedMerger {
  /// Builds a fresh feed from the current
  /// tracker contents: concatenated in
  /// input order, de-duplicated by
  /// `(kind, id)` keeping the first
  /// occurrence, then stably sorted
  /// newest first.
  pub fn merge<P, C>(
    sources: &[MergeSource<'_, P, C>]
  ) -> Vec<FeedItem<P, C>>
  where
    P: FeedEntry + Clone,
    C: FeedEntry + Clone
  {
    Self::merge_filtered(sources, |_| true)
  }

  /// True when every given tracker has
  /// reached its last page.
  pub fn is_exhausted<P, C>(
    sources: &[MergeSource<'_, P, C>]
  ) -> bool
  where
    P: FeedEntry + Clone,
    C: FeedEntry + Clone
  {
    sources
      .iter()
      .all(MergeSource::is_exhausted)
  }

  /// Same as `merge`, keeping only items
  /// accepted by `keep`. Filtering runs
  /// before de-duplication.
  pub fn merge_filtered<P, C, F>(
    sources: &[MergeSource<'_, P, C>],
    keep: F
  ) -> Vec<FeedItem<P, C>>
  where
    P: FeedEntry + Clone,
    C: FeedEntry + Clone,
    F: Fn(&FeedItem<P, C>) -> bool
  {
    let mut seen: HashSet<ItemKey> =
      HashSet::new();
    let mut feed = Vec::new();

    for source in sources {
      let wrapped: Vec<FeedItem<P, C>> =
        match source {
          | MergeSource::Posts(tracker) => {
            tracker
              .items()
              .into_iter()
              .map(FeedItem::Post)
              .collect()
          }
          | MergeSource::Comments(
            tracker
          ) => {
            tracker
              .items()
              .into_iter()
              .map(FeedItem::Comment)
              .collect()
          }
        };

      for item in wrapped {
        if keep(&item)
          && seen.insert(item.key())
        {
          feed.push(item);
        }
      }
    }

    sort_newest_first(&mut feed);

    debug!(
      sources = sources.len(),
      items = feed.len(),
      "feed merged"
    );

    feed
  }
}

/// Stable: equal timestamps keep their
/// relative order.
pub fn sort_newest_first<P, C>(
  items: &mut [FeedItem<P, C>]
) where
  P: FeedEntry,
  C: FeedEntry
{
  items.sort_by(|a, b| {
    b.published_at().cmp(&a.published_at())
  });
}

pub fn sort_oldest_first<P, C>(
  items: &mut [FeedItem<P, C>]
) where
  P: FeedEntry,
  C: FeedEntry
{
  items.sort_by_key(|item| {
    item.published_at()
  });
}
