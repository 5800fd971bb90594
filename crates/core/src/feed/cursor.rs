//! Page cursor owned by a single tracker.

/// `page` is the next page to request
/// (1-based). The cursor only moves
/// forward; `exhausted` latches once a
/// short page is seen and is cleared only
/// by `reset`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct PaginationCursor {
  page:      u32,
  page_size: u32,
  exhausted: bool
}

impl PaginationCursor {
  pub fn new(page_size: u32) -> Self {
    Self {
      page:      1,
      page_size: page_size.max(1),
      exhausted: false
    }
  }

  pub fn page(&self) -> u32 {
    self.page
  }

  pub fn page_size(&self) -> u32 {
    self.page_size
  }

  pub fn is_exhausted(&self) -> bool {
    self.exhausted
  }

  /// Call only after a successful fetch.
  pub fn advance(&mut self) {
    self.page = self.page.saturating_add(1);
  }

  pub fn reset(&mut self) {
    self.page = 1;
    self.exhausted = false;
  }

  pub fn set_page_size(
    &mut self,
    page_size: u32
  ) {
    self.page_size = page_size.max(1);
  }

  /// Latches exhaustion when the server
  /// returned fewer rows than requested.
  pub fn record_returned(
    &mut self,
    returned_count: usize
  ) {
    if returned_count
      < self.page_size as usize
    {
      self.exhausted = true;
    }
  }
}

impl Default for PaginationCursor {
  fn default() -> Self {
    Self::new(50)
  }
}
