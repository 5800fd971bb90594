//! Page fetch abstraction used by item
//! trackers.

use crate::domain::error::FetchError;
use crate::domain::model::{
  FeedFilter,
  OwnerContext
};

/// One page as returned by the remote
/// API. `returned_count` is the number of
/// rows the server produced for the page,
/// which drives exhaustion; it may exceed
/// `items.len()` when the adapter drops
/// rows it cannot use.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
  pub items:          Vec<T>,
  pub returned_count: usize
}

impl<T> Page<T> {
  pub fn new(items: Vec<T>) -> Self {
    let returned_count = items.len();
    Self {
      items,
      returned_count
    }
  }

  pub fn empty() -> Self {
    Self::new(Vec::new())
  }
}

#[async_trait::async_trait]
pub trait PageSource<T>: Send + Sync {
  /// Fetches page `page` (1-based) of at
  /// most `page_size` items.
  async fn fetch_page(
    &self,
    owner: &OwnerContext,
    page: u32,
    page_size: u32,
    filter: &FeedFilter
  ) -> Result<Page<T>, FetchError>;
}
