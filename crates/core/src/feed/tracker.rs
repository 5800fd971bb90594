//! Paginated, de-duplicating store for
//! one item kind.
//!
//! State sits behind a short-lived mutex
//! that is never held across the fetch,
//! so readers see a consistent snapshot
//! while a page is in flight. At most one
//! fetch runs per tracker; a second one is
//! rejected with `TrackerError::Busy`.

use std::collections::HashMap;
use std::sync::atomic::{
  AtomicBool,
  Ordering
};
use std::sync::{
  Mutex,
  MutexGuard,
  PoisonError
};

use tracing::{
  debug,
  info,
  warn
};

use super::cursor::PaginationCursor;
use crate::domain::error::TrackerError;
use crate::domain::model::{
  FeedEntry,
  FeedFilter,
  ItemId,
  OwnerContext,
  SaveConfirmation,
  VoteConfirmation
};
use crate::ports::source::PageSource;

struct TrackerState<T> {
  items:  Vec<T>,
  index:  HashMap<ItemId, usize>,
  cursor: PaginationCursor
}

impl<T: FeedEntry> TrackerState<T> {
  /// Inserts or replaces in place.
  /// Returns the number of new ids.
  fn upsert_all<I>(
    &mut self,
    items: I
  ) -> usize
  where
    I: IntoIterator<Item = T>
  {
    let mut added = 0;
    for item in items {
      let id = item.id();
      match self.index.get(&id).copied() {
        | Some(pos) => self.items[pos] = item,
        | None => {
          self
            .index
            .insert(id, self.items.len());
          self.items.push(item);
          added += 1;
        }
      }
    }
    added
  }

  fn clear(&mut self) {
    self.items.clear();
    self.index.clear();
  }

  fn get_mut(
    &mut self,
    id: ItemId
  ) -> Option<&mut T> {
    let pos = *self.index.get(&id)?;
    self.items.get_mut(pos)
  }
}

/// Clears the in-flight flag when the
/// fetch completes or its future is
/// dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
  fn drop(&mut self) {
    self.0.store(false, Ordering::Release);
  }
}

pub struct ItemTracker<T> {
  owner:     OwnerContext,
  filter:    FeedFilter,
  state:     Mutex<TrackerState<T>>,
  in_flight: AtomicBool
}

impl<T> ItemTracker<T>
where
  T: FeedEntry + Clone
{
  pub fn new(
    owner: OwnerContext,
    filter: FeedFilter,
    page_size: u32
  ) -> Self {
    Self {
      owner,
      filter,
      state: Mutex::new(TrackerState {
        items:  Vec::new(),
        index:  HashMap::new(),
        cursor: PaginationCursor::new(
          page_size
        )
      }),
      in_flight: AtomicBool::new(false)
    }
  }

  pub fn owner(&self) -> OwnerContext {
    self.owner
  }

  pub fn filter(&self) -> FeedFilter {
    self.filter
  }

  fn lock(
    &self
  ) -> MutexGuard<'_, TrackerState<T>> {
    self
      .state
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
  }

  fn begin(
    &self
  ) -> Result<InFlight<'_>, TrackerError>
  {
    self
      .in_flight
      .compare_exchange(
        false,
        true,
        Ordering::AcqRel,
        Ordering::Acquire
      )
      .map(|_| InFlight(&self.in_flight))
      .map_err(|_| TrackerError::Busy)
  }

  /// Replaces the contents with page 1.
  /// On failure the previous contents and
  /// cursor are left untouched.
  pub async fn refresh<S>(
    &self,
    source: &S,
    page_size: u32
  ) -> Result<(), TrackerError>
  where
    S: PageSource<T> + ?Sized
  {
    let _guard = self.begin()?;
    let page_size = page_size.max(1);

    debug!(
      person_id = self.owner.person_id,
      kind = %T::KIND,
      page_size,
      "tracker refresh start"
    );

    let page = source
      .fetch_page(
        &self.owner,
        1,
        page_size,
        &self.filter
      )
      .await
      .inspect_err(|err| {
        warn!(
          person_id = self.owner.person_id,
          kind = %T::KIND,
          error = %err,
          "tracker refresh failed"
        )
      })?;

    let mut state = self.lock();
    state.clear();
    state.cursor.reset();
    state.cursor.set_page_size(page_size);
    state.upsert_all(page.items);
    state
      .cursor
      .record_returned(page.returned_count);
    state.cursor.advance();

    info!(
      person_id = self.owner.person_id,
      kind = %T::KIND,
      items = state.items.len(),
      exhausted = state.cursor.is_exhausted(),
      "tracker refreshed"
    );

    Ok(())
  }

  /// Appends the next page. Succeeds
  /// without fetching once exhausted.
  pub async fn load_next_page<S>(
    &self,
    source: &S,
    page_size: u32
  ) -> Result<(), TrackerError>
  where
    S: PageSource<T> + ?Sized
  {
    if self.is_exhausted() {
      return Ok(());
    }

    let _guard = self.begin()?;
    let page_size = page_size.max(1);

    let page_no = {
      let state = self.lock();
      if state.cursor.is_exhausted() {
        return Ok(());
      }
      state.cursor.page()
    };

    debug!(
      person_id = self.owner.person_id,
      kind = %T::KIND,
      page = page_no,
      page_size,
      "tracker load next page"
    );

    let page = source
      .fetch_page(
        &self.owner,
        page_no,
        page_size,
        &self.filter
      )
      .await
      .inspect_err(|err| {
        warn!(
          person_id = self.owner.person_id,
          kind = %T::KIND,
          page = page_no,
          error = %err,
          "tracker page load failed"
        )
      })?;

    let mut state = self.lock();
    state.cursor.set_page_size(page_size);
    let added = state.upsert_all(page.items);
    state
      .cursor
      .record_returned(page.returned_count);
    state.cursor.advance();

    debug!(
      person_id = self.owner.person_id,
      kind = %T::KIND,
      page = page_no,
      added,
      exhausted = state.cursor.is_exhausted(),
      "tracker page applied"
    );

    Ok(())
  }

  /// Merges items fetched out-of-band.
  /// Existing ids are replaced in place;
  /// nothing is re-sorted.
  pub fn add<I>(&self, items: I)
  where
    I: IntoIterator<Item = T>
  {
    let added = self.lock().upsert_all(items);
    debug!(
      kind = %T::KIND,
      added,
      "tracker add"
    );
  }

  /// Snapshot of the current items in
  /// insertion order.
  pub fn items(&self) -> Vec<T> {
    self.lock().items.clone()
  }

  pub fn get(
    &self,
    id: ItemId
  ) -> Option<T> {
    let state = self.lock();
    state
      .index
      .get(&id)
      .and_then(|pos| state.items.get(*pos))
      .cloned()
  }

  pub fn len(&self) -> usize {
    self.lock().items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.lock().items.is_empty()
  }

  pub fn cursor(&self) -> PaginationCursor {
    self.lock().cursor
  }

  pub fn is_exhausted(&self) -> bool {
    self.lock().cursor.is_exhausted()
  }

  pub fn is_loading(&self) -> bool {
    self.in_flight.load(Ordering::Acquire)
  }

  /// Writes a confirmed vote into the
  /// tracked item. Returns whether an item
  /// was updated.
  pub fn apply_vote(
    &self,
    confirmation: &VoteConfirmation
  ) -> bool {
    if confirmation.key.kind != T::KIND {
      return false;
    }
    match self
      .lock()
      .get_mut(confirmation.key.id)
    {
      | Some(item) => {
        item.apply_vote(
          confirmation.vote,
          confirmation.score
        );
        true
      }
      | None => false
    }
  }

  pub fn apply_saved(
    &self,
    confirmation: &SaveConfirmation
  ) -> bool {
    if confirmation.key.kind != T::KIND {
      return false;
    }
    match self
      .lock()
      .get_mut(confirmation.key.id)
    {
      | Some(item) => {
        item.apply_saved(confirmation.saved);
        true
      }
      | None => false
    }
  }
}
