mod support;

use std::collections::HashSet;

use lemfeed_core::feed::merger::sort_oldest_first;
use lemfeed_core::{
  FeedFilter,
  FeedItem,
  FeedMerger,
  ItemKind,
  ItemTracker,
  MergeSource,
  OwnerContext
};
use support::{
  ScriptedSource,
  TestComment,
  TestPost
};

type Source<'a> =
  MergeSource<'a, TestPost, TestComment>;

fn new_tracker<T>() -> ItemTracker<T>
where
  T: lemfeed_core::FeedEntry + Clone
{
  ItemTracker::new(
    OwnerContext {
      person_id: 1
    },
    FeedFilter::default(),
    20
  )
}

fn keys(
  feed: &[FeedItem<TestPost, TestComment>]
) -> Vec<(ItemKind, i64)> {
  feed
    .iter()
    .map(|item| (item.kind(), item.id()))
    .collect()
}

#[test]
fn merges_newest_first_across_kinds() {
  let posts = new_tracker::<TestPost>();
  let comments = new_tracker::<TestComment>();
  posts.add(vec![
    TestPost::new(1, 10),
    TestPost::new(2, 30),
  ]);
  comments.add(vec![
    TestComment::new(1, 20),
    TestComment::new(2, 40),
  ]);

  let feed = FeedMerger::merge(&[
    MergeSource::Posts(&posts),
    MergeSource::Comments(&comments),
  ]);

  assert_eq!(
    keys(&feed),
    vec![
      (ItemKind::Comment, 2),
      (ItemKind::Post, 2),
      (ItemKind::Comment, 1),
      (ItemKind::Post, 1),
    ]
  );
}

#[test]
fn overlapping_trackers_yield_no_duplicate_keys(
) {
  let authored = new_tracker::<TestPost>();
  let saved = new_tracker::<TestPost>();
  let comments = new_tracker::<TestComment>();
  authored.add(vec![
    TestPost::new(1, 0),
    TestPost::new(2, 1),
  ]);
  saved.add(vec![
    TestPost::new(2, 1),
    TestPost::new(3, 2),
  ]);
  comments.add(vec![TestComment::new(2, 1)]);

  let feed = FeedMerger::merge(&[
    MergeSource::Posts(&authored),
    MergeSource::Posts(&saved),
    MergeSource::Comments(&comments),
  ]);

  let unique: HashSet<_> =
    feed.iter().map(|item| item.key()).collect();
  assert_eq!(unique.len(), feed.len());
  let total =
    authored.len() + saved.len() + comments.len();
  assert!(feed.len() <= total);
  assert_eq!(feed.len(), 4);
}

#[test]
fn duplicate_keeps_first_occurrence_in_input_order(
) {
  let first = new_tracker::<TestPost>();
  let second = new_tracker::<TestPost>();
  first.add(vec![
    TestPost::new(5, 0).labeled("first")
  ]);
  second.add(vec![
    TestPost::new(5, 0).labeled("second")
  ]);

  let feed = FeedMerger::merge(&[
    Source::Posts(&first),
    Source::Posts(&second),
  ]);

  assert_eq!(feed.len(), 1);
  assert_eq!(
    feed[0].as_post().unwrap().label,
    "first"
  );
}

#[test]
fn equal_timestamps_keep_input_order() {
  let left = new_tracker::<TestPost>();
  let right = new_tracker::<TestPost>();
  left.add(vec![
    TestPost::new(1, 100).labeled("P1")
  ]);
  right.add(vec![
    TestPost::new(2, 100).labeled("P2")
  ]);

  let feed = FeedMerger::merge(&[
    Source::Posts(&left),
    Source::Posts(&right),
  ]);

  let labels: Vec<&str> = feed
    .iter()
    .map(|item| item.as_post().unwrap().label)
    .collect();
  assert_eq!(labels, vec!["P1", "P2"]);
}

#[test]
fn empty_trackers_merge_to_empty_feed() {
  let posts = new_tracker::<TestPost>();
  let comments = new_tracker::<TestComment>();

  let feed = FeedMerger::merge(&[
    MergeSource::Posts(&posts),
    MergeSource::Comments(&comments),
  ]);
  assert!(feed.is_empty());

  let none = FeedMerger::merge::<
    TestPost,
    TestComment
  >(&[]);
  assert!(none.is_empty());
}

#[test]
fn merge_reflects_tracker_state_at_call_time(
) {
  let posts = new_tracker::<TestPost>();
  let sources = [Source::Posts(&posts)];

  assert!(FeedMerger::merge(&sources).is_empty());
  posts.add(vec![TestPost::new(1, 0)]);
  assert_eq!(FeedMerger::merge(&sources).len(), 1);
}

#[test]
fn filtered_merge_and_chronological_replay() {
  let posts = new_tracker::<TestPost>();
  let comments = new_tracker::<TestComment>();
  posts.add(vec![
    TestPost::new(1, 5).saved(),
    TestPost::new(2, 1),
  ]);
  comments.add(vec![
    TestComment::new(3, 3).saved()
  ]);

  let mut feed = FeedMerger::merge_filtered(
    &[
      MergeSource::Posts(&posts),
      MergeSource::Comments(&comments),
    ],
    FeedItem::saved
  );
  assert_eq!(
    keys(&feed),
    vec![
      (ItemKind::Post, 1),
      (ItemKind::Comment, 3),
    ]
  );

  sort_oldest_first(&mut feed);
  assert_eq!(
    keys(&feed),
    vec![
      (ItemKind::Comment, 3),
      (ItemKind::Post, 1),
    ]
  );
}

#[tokio::test]
async fn exhaustion_only_counts_the_given_sources(
) {
  let source = ScriptedSource::new()
    .page(vec![TestPost::new(1, 0)]);
  let posts = new_tracker::<TestPost>();
  let comments = new_tracker::<TestComment>();
  posts.refresh(&source, 20).await.unwrap();
  assert!(posts.is_exhausted());
  assert!(!comments.is_exhausted());

  assert!(FeedMerger::is_exhausted(&[
    Source::Posts(&posts)
  ]));
  assert!(!FeedMerger::is_exhausted(&[
    Source::Posts(&posts),
    Source::Comments(&comments),
  ]));
  assert!(FeedMerger::is_exhausted::<
    TestPost,
    TestComment
  >(&[]));
}
