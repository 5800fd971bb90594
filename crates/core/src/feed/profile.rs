//! A person's profile: authored and (on
//! the viewer's own profile) saved posts
//! and comments, projected per tab.

use tracing::{
  debug,
  info
};

use super::merger::{
  FeedMerger,
  MergeSource
};
use super::tracker::ItemTracker;
use crate::domain::error::FetchError;
use crate::domain::model::{
  FeedEntry,
  FeedFilter,
  FeedItem,
  OwnerContext,
  PersonId,
  ProfileTab,
  SortType
};
use crate::ports::source::PageSource;

pub struct ProfileFeed<P, C> {
  person_id: PersonId,
  viewer_id: PersonId,
  sort:      SortType,
  posts:     ItemTracker<P>,
  comments:  ItemTracker<C>
}

impl<P, C> ProfileFeed<P, C>
where
  P: FeedEntry + Clone,
  C: FeedEntry + Clone
{
  pub fn new(
    person_id: PersonId,
    viewer_id: PersonId,
    sort: SortType,
    page_size: u32
  ) -> Self {
    let owner = OwnerContext {
      person_id
    };
    let filter = FeedFilter {
      saved_only: false,
      sort
    };
    Self {
      person_id,
      viewer_id,
      sort,
      posts: ItemTracker::new(
        owner, filter, page_size
      ),
      comments: ItemTracker::new(
        owner, filter, page_size
      )
    }
  }

  pub fn person_id(&self) -> PersonId {
    self.person_id
  }

  pub fn is_own_profile(&self) -> bool {
    self.person_id == self.viewer_id
  }

  pub fn posts(&self) -> &ItemTracker<P> {
    &self.posts
  }

  pub fn comments(
    &self
  ) -> &ItemTracker<C> {
    &self.comments
  }

  /// Fetches the first `limit` authored
  /// items, plus saved items when viewing
  /// one's own profile, and merges them
  /// into the trackers. Nothing is merged
  /// if any fetch fails.
  ///
  /// This does not page: only page 1 is
  /// fetched and the tracker cursors are
  /// left untouched, so a later
  /// `load_next_page` on either tracker
  /// starts again from page 1.
  pub async fn load<SP, SC>(
    &self,
    post_source: &SP,
    comment_source: &SC,
    limit: u32
  ) -> Result<(), FetchError>
  where
    SP: PageSource<P> + ?Sized,
    SC: PageSource<C> + ?Sized
  {
    let limit = limit.max(1);
    let owner = OwnerContext {
      person_id: self.person_id
    };
    let authored = FeedFilter {
      saved_only: false,
      sort:       self.sort
    };
    let saved = FeedFilter {
      saved_only: true,
      sort:       self.sort
    };

    let mut posts = post_source
      .fetch_page(&owner, 1, limit, &authored)
      .await?
      .items;
    let mut comments = comment_source
      .fetch_page(&owner, 1, limit, &authored)
      .await?
      .items;

    if self.is_own_profile() {
      debug!(
        person_id = self.person_id,
        "loading saved content"
      );
      posts.extend(
        post_source
          .fetch_page(&owner, 1, limit, &saved)
          .await?
          .items
      );
      comments.extend(
        comment_source
          .fetch_page(&owner, 1, limit, &saved)
          .await?
          .items
      );
    }

    comments.sort_by(|a, b| {
      b.published_at().cmp(&a.published_at())
    });

    info!(
      person_id = self.person_id,
      posts = posts.len(),
      comments = comments.len(),
      "profile loaded"
    );

    self.comments.add(comments);
    self.posts.add(posts);

    Ok(())
  }

  /// Newest-first projection for `tab`.
  /// Saved is empty on someone else's
  /// profile.
  pub fn feed(
    &self,
    tab: ProfileTab
  ) -> Vec<FeedItem<P, C>> {
    let person_id = self.person_id;
    let authored =
      |item: &FeedItem<P, C>| {
        item.author_id() == person_id
      };

    match tab {
      | ProfileTab::Overview => {
        FeedMerger::merge_filtered(
          &self.both(),
          authored
        )
      }
      | ProfileTab::Posts => {
        FeedMerger::merge_filtered(
          &[MergeSource::Posts(&self.posts)],
          authored
        )
      }
      | ProfileTab::Comments => {
        FeedMerger::merge_filtered(
          &[MergeSource::Comments(
            &self.comments
          )],
          authored
        )
      }
      | ProfileTab::Saved => {
        if !self.is_own_profile() {
          return Vec::new();
        }
        FeedMerger::merge_filtered(
          &self.both(),
          FeedItem::saved
        )
      }
    }
  }

  fn both(
    &self
  ) -> [MergeSource<'_, P, C>; 2] {
    [
      MergeSource::Posts(&self.posts),
      MergeSource::Comments(&self.comments)
    ]
  }
}
