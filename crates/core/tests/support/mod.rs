#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{
  DateTime,
  TimeZone,
  Utc
};
use lemfeed_core::{
  FeedEntry,
  FeedFilter,
  FetchError,
  ItemId,
  ItemKey,
  ItemKind,
  MutationSink,
  OwnerContext,
  Page,
  PageSource,
  PersonId,
  SaveConfirmation,
  Vote,
  VoteConfirmation
};
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq)]
pub struct TestItem<const COMMENT: bool> {
  pub id:        ItemId,
  pub published: DateTime<Utc>,
  pub author:    PersonId,
  pub saved:     bool,
  pub vote:      Vote,
  pub score:     i64,
  pub label:     &'static str
}

pub type TestPost = TestItem<false>;
pub type TestComment = TestItem<true>;

pub fn at(secs: i64) -> DateTime<Utc> {
  Utc
    .timestamp_opt(1_700_000_000 + secs, 0)
    .single()
    .expect("valid timestamp")
}

impl<const COMMENT: bool> TestItem<COMMENT> {
  pub fn new(id: ItemId, secs: i64) -> Self {
    Self {
      id,
      published: at(secs),
      author: 1,
      saved: false,
      vote: Vote::None,
      score: 0,
      label: ""
    }
  }

  pub fn labeled(
    mut self,
    label: &'static str
  ) -> Self {
    self.label = label;
    self
  }

  pub fn by(mut self, author: PersonId) -> Self {
    self.author = author;
    self
  }

  pub fn saved(mut self) -> Self {
    self.saved = true;
    self
  }

  pub fn scored(
    mut self,
    vote: Vote,
    score: i64
  ) -> Self {
    self.vote = vote;
    self.score = score;
    self
  }
}

impl<const COMMENT: bool> FeedEntry
  for TestItem<COMMENT>
{
  const KIND: ItemKind = if COMMENT {
    ItemKind::Comment
  } else {
    ItemKind::Post
  };

  fn id(&self) -> ItemId {
    self.id
  }

  fn published_at(&self) -> DateTime<Utc> {
    self.published
  }

  fn author_id(&self) -> PersonId {
    self.author
  }

  fn saved(&self) -> bool {
    self.saved
  }

  fn vote(&self) -> Vote {
    self.vote
  }

  fn score(&self) -> i64 {
    self.score
  }

  fn apply_vote(
    &mut self,
    vote: Vote,
    score: i64
  ) {
    self.vote = vote;
    self.score = score;
  }

  fn apply_saved(&mut self, saved: bool) {
    self.saved = saved;
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchCall {
  pub person_id:  PersonId,
  pub page:       u32,
  pub page_size:  u32,
  pub saved_only: bool
}

/// Replays queued responses in order and
/// records every request. An empty queue
/// answers with an empty page.
type Scripted<T> = Result<Page<T>, FetchError>;

pub struct ScriptedSource<T> {
  responses: Mutex<VecDeque<Scripted<T>>>,
  calls:     Mutex<Vec<FetchCall>>
}

impl<T> ScriptedSource<T> {
  pub fn new() -> Self {
    Self {
      responses: Mutex::new(VecDeque::new()),
      calls:     Mutex::new(Vec::new())
    }
  }

  pub fn page(self, items: Vec<T>) -> Self {
    self
      .responses
      .lock()
      .unwrap()
      .push_back(Ok(Page::new(items)));
    self
  }

  pub fn fail(self, err: FetchError) -> Self {
    self
      .responses
      .lock()
      .unwrap()
      .push_back(Err(err));
    self
  }

  pub fn calls(&self) -> Vec<FetchCall> {
    self.calls.lock().unwrap().clone()
  }
}

#[async_trait::async_trait]
impl<T: Send> PageSource<T>
  for ScriptedSource<T>
{
  async fn fetch_page(
    &self,
    owner: &OwnerContext,
    page: u32,
    page_size: u32,
    filter: &FeedFilter
  ) -> Result<Page<T>, FetchError> {
    self.calls.lock().unwrap().push(FetchCall {
      person_id: owner.person_id,
      page,
      page_size,
      saved_only: filter.saved_only
    });
    self
      .responses
      .lock()
      .unwrap()
      .pop_front()
      .unwrap_or_else(|| Ok(Page::empty()))
  }
}

/// Blocks inside `fetch_page` until
/// released, so tests can act while a
/// fetch is in flight.
pub struct GatedSource<T> {
  pub entered: Notify,
  pub release: Notify,
  items:       Vec<T>
}

impl<T> GatedSource<T> {
  pub fn new(items: Vec<T>) -> Self {
    Self {
      entered: Notify::new(),
      release: Notify::new(),
      items
    }
  }
}

#[async_trait::async_trait]
impl<T: Clone + Send + Sync> PageSource<T>
  for GatedSource<T>
{
  async fn fetch_page(
    &self,
    _owner: &OwnerContext,
    _page: u32,
    _page_size: u32,
    _filter: &FeedFilter
  ) -> Result<Page<T>, FetchError> {
    self.entered.notify_one();
    self.release.notified().await;
    Ok(Page::new(self.items.clone()))
  }
}

/// Confirms mutations with a fixed server
/// score, or fails every call.
pub struct FakeSink {
  pub server_score: i64,
  pub failure:      Option<FetchError>,
  pub gate:         Option<(Notify, Notify)>,
  pub votes:        Mutex<Vec<(ItemKey, Vote)>>,
  pub saves:        Mutex<Vec<(ItemKey, bool)>>
}

impl FakeSink {
  pub fn ok(server_score: i64) -> Self {
    Self {
      server_score,
      failure: None,
      gate: None,
      votes: Mutex::new(Vec::new()),
      saves: Mutex::new(Vec::new())
    }
  }

  pub fn failing(err: FetchError) -> Self {
    Self {
      failure: Some(err),
      ..Self::ok(0)
    }
  }

  pub fn gated(server_score: i64) -> Self {
    Self {
      gate: Some((Notify::new(), Notify::new())),
      ..Self::ok(server_score)
    }
  }

  async fn wait_gate(&self) {
    if let Some((entered, release)) = &self.gate {
      entered.notify_one();
      release.notified().await;
    }
  }
}

#[async_trait::async_trait]
impl MutationSink for FakeSink {
  async fn submit_vote(
    &self,
    key: ItemKey,
    vote: Vote
  ) -> Result<VoteConfirmation, FetchError> {
    self.votes.lock().unwrap().push((key, vote));
    self.wait_gate().await;
    match &self.failure {
      | Some(err) => Err(err.clone()),
      | None => Ok(VoteConfirmation {
        key,
        vote,
        score: self.server_score
      })
    }
  }

  async fn submit_save(
    &self,
    key: ItemKey,
    saved: bool
  ) -> Result<SaveConfirmation, FetchError> {
    self.saves.lock().unwrap().push((key, saved));
    self.wait_gate().await;
    match &self.failure {
      | Some(err) => Err(err.clone()),
      | None => Ok(SaveConfirmation {
        key,
        saved
      })
    }
  }
}
