mod support;

use std::sync::Arc;

use lemfeed_core::feed::optimistic::vote_transition;
use lemfeed_core::{
  FetchError,
  Interactions,
  ItemKey,
  OptimisticMutationState,
  SaveConfirmation,
  Vote,
  VoteConfirmation
};
use support::{
  FakeSink,
  TestComment,
  TestPost
};

fn confirmed(
  key: ItemKey,
  vote: Vote,
  score: i64
) -> Result<VoteConfirmation, FetchError> {
  Ok(VoteConfirmation {
    key,
    vote,
    score
  })
}

#[test]
fn vote_transition_table() {
  use Vote::{
    Downvote as D,
    None as N,
    Upvote as U
  };
  let cases = [
    ((N, 10), U, (U, 11)),
    ((U, 10), U, (N, 9)),
    ((D, 10), U, (U, 12)),
    ((N, 10), D, (D, 9)),
    ((D, 10), D, (N, 11)),
    ((U, 10), D, (D, 8)),
    ((U, 10), N, (N, 9)),
    ((N, 10), N, (N, 10)),
  ];
  for ((vote, score), requested, expected) in
    cases
  {
    assert_eq!(
      vote_transition(vote, score, requested),
      expected,
      "{vote:?}@{score} -> {requested:?}"
    );
  }
}

#[test]
fn chained_votes_build_on_the_overlay() {
  let key = ItemKey::post(1);
  let mut state = OptimisticMutationState::new();

  assert_eq!(
    state.begin_vote(
      key,
      Vote::None,
      10,
      Vote::Upvote
    ),
    (Vote::Upvote, 11)
  );
  assert_eq!(
    state.begin_vote(
      key,
      Vote::None,
      10,
      Vote::Downvote
    ),
    (Vote::Downvote, 9)
  );
  assert_eq!(
    state.begin_vote(
      key,
      Vote::None,
      10,
      Vote::Downvote
    ),
    (Vote::None, 10)
  );
  assert!(state.is_dirty(key));
}

#[test]
fn overlay_survives_until_the_last_vote_completes(
) {
  let key = ItemKey::post(1);
  let mut state = OptimisticMutationState::new();
  state.begin_vote(
    key,
    Vote::None,
    10,
    Vote::Upvote
  );
  state.begin_vote(
    key,
    Vote::None,
    10,
    Vote::Downvote
  );
  assert_eq!(
    state
      .overlay(key)
      .unwrap()
      .votes_in_flight,
    2
  );

  state
    .complete_vote(
      key,
      confirmed(key, Vote::Upvote, 11)
    )
    .unwrap();
  assert!(state.is_dirty(key));
  assert_eq!(
    state.displayed_vote(key, Vote::None, 10),
    (Vote::Downvote, 9)
  );

  state
    .complete_vote(
      key,
      confirmed(key, Vote::Downvote, 9)
    )
    .unwrap();
  assert!(!state.is_dirty(key));
  assert!(state.is_empty());
}

#[test]
fn failure_of_an_earlier_vote_keeps_the_later_prediction(
) {
  let key = ItemKey::comment(2);
  let mut state = OptimisticMutationState::new();
  state.begin_vote(
    key,
    Vote::None,
    0,
    Vote::Upvote
  );
  state.begin_vote(
    key,
    Vote::None,
    0,
    Vote::Upvote
  );

  let result = state.complete_vote(
    key,
    Err(FetchError::Network("reset".into()))
  );
  assert!(result.is_err());
  assert_eq!(
    state.displayed_vote(key, Vote::None, 0),
    (Vote::None, 0)
  );
  assert!(state.is_dirty(key));

  let result = state.complete_vote(
    key,
    Err(FetchError::Network("reset".into()))
  );
  assert!(result.is_err());
  assert!(state.overlay(key).is_none());
}

#[test]
fn overlapping_saves_settle_on_the_last_completion(
) {
  let key = ItemKey::post(4);
  let mut state = OptimisticMutationState::new();
  state.begin_save(key, true);
  state.begin_save(key, false);

  let saved = SaveConfirmation {
    key,
    saved: true
  };
  state
    .complete_save(key, Ok(saved))
    .unwrap();
  assert!(state.is_dirty(key));
  assert!(!state.displayed_saved(key, true));

  state
    .complete_save(
      key,
      Err(FetchError::Unauthorized)
    )
    .unwrap_err();
  assert!(!state.is_dirty(key));
  assert!(state.displayed_saved(key, true));
}

#[test]
fn displayed_values_follow_dirty_flag() {
  let key = ItemKey::comment(3);
  let mut state = OptimisticMutationState::new();

  assert_eq!(
    state.displayed_vote(key, Vote::None, 4),
    (Vote::None, 4)
  );
  assert!(!state.is_dirty(key));

  state.begin_vote(

    key,

    Vote::None,

    4,

    Vote::Upvote

  );
  assert_eq!(
    state.displayed_vote(key, Vote::None, 4),
    (Vote::Upvote, 5)
  );
  // Same id, other kind.
  assert_eq!(
    state.displayed_vote(
      ItemKey::post(3),
      Vote::None,
      4
    ),
    (Vote::None, 4)
  );
}

#[test]
fn failed_vote_reverts_to_server_values() {
  let key = ItemKey::post(8);
  let mut state = OptimisticMutationState::new();
  state.begin_vote(
    key,
    Vote::None,
    10,
    Vote::Upvote
  );

  let result = state.complete_vote(
    key,
    Err(FetchError::Network("timeout".into()))
  );

  assert!(result.is_err());
  assert!(!state.is_dirty(key));
  assert!(state.overlay(key).is_none());
  assert_eq!(
    state.displayed_vote(key, Vote::None, 10),
    (Vote::None, 10)
  );
}

#[test]
fn successful_vote_drops_overlay() {
  let key = ItemKey::post(8);
  let mut state = OptimisticMutationState::new();
  state.begin_vote(
    key,
    Vote::None,
    10,
    Vote::Upvote
  );

  let result = confirmed(key, Vote::Upvote, 12);
  assert_eq!(
    state.complete_vote(key, result.clone()),
    result
  );
  assert!(state.is_empty());
  assert_eq!(
    state.displayed_vote(key, Vote::Upvote, 12),
    (Vote::Upvote, 12)
  );
}

#[test]
fn save_overlay_is_independent_of_vote_overlay(
) {
  let key = ItemKey::post(2);
  let mut state = OptimisticMutationState::new();

  assert!(state.begin_save(key, true));
  state.begin_vote(
    key,
    Vote::None,
    0,
    Vote::Upvote
  );
  assert!(state.displayed_saved(key, false));

  state
    .complete_vote(
      key,
      confirmed(key, Vote::Upvote, 1)
    )
    .unwrap();
  assert!(state.is_dirty(key));
  assert!(state.displayed_saved(key, false));

  let result = state.complete_save(
    key,
    Err(FetchError::Unauthorized)
  );
  assert_eq!(
    result,
    Err(FetchError::Unauthorized)
  );
  assert!(!state.is_dirty(key));
  assert!(!state.displayed_saved(key, false));
}

#[test]
fn clear_drops_every_overlay() {
  let mut state = OptimisticMutationState::new();
  state.begin_save(ItemKey::post(1), true);
  state.begin_vote(
    ItemKey::comment(1),
    Vote::None,
    0,
    Vote::Downvote
  );
  assert_eq!(state.len(), 2);

  state.clear();
  assert!(state.is_empty());
}

#[tokio::test]
async fn interaction_vote_submits_the_predicted_vote(
) {
  let interactions =
    Interactions::new(FakeSink::ok(11));
  let post =
    TestPost::new(1, 0).scored(Vote::None, 10);

  let confirmation = interactions
    .vote(&post, Vote::Upvote)
    .await
    .unwrap();

  assert_eq!(confirmation.vote, Vote::Upvote);
  assert_eq!(confirmation.score, 11);
  assert_eq!(
    *interactions.sink().votes.lock().unwrap(),
    vec![(ItemKey::post(1), Vote::Upvote)]
  );
  assert!(!interactions.is_dirty(&post));
}

#[tokio::test]
async fn interaction_toggle_off_submits_none() {
  let interactions =
    Interactions::new(FakeSink::ok(10));
  let comment =
    TestComment::new(4, 0)
      .scored(Vote::Downvote, 9);

  interactions
    .vote(&comment, Vote::Downvote)
    .await
    .unwrap();

  assert_eq!(
    *interactions.sink().votes.lock().unwrap(),
    vec![(ItemKey::comment(4), Vote::None)]
  );
}

#[tokio::test]
async fn interaction_failure_shows_pre_vote_server_state(
) {
  let interactions = Interactions::new(
    FakeSink::failing(FetchError::Network(
      "offline".into()
    ))
  );
  let post =
    TestPost::new(1, 0).scored(Vote::None, 10);

  let err = interactions
    .vote(&post, Vote::Upvote)
    .await
    .unwrap_err();

  assert_eq!(
    err,
    FetchError::Network("offline".into())
  );
  assert_eq!(
    interactions.displayed_vote(&post),
    (Vote::None, 10)
  );
  assert!(!interactions.is_dirty(&post));
}

#[tokio::test]
async fn overlay_is_visible_while_vote_is_in_flight(
) {
  let interactions = Arc::new(
    Interactions::new(FakeSink::gated(11))
  );
  let post =
    TestPost::new(1, 0).scored(Vote::None, 10);

  let handle = {
    let interactions = Arc::clone(&interactions);
    let post = post.clone();
    tokio::spawn(async move {
      interactions
        .vote(&post, Vote::Upvote)
        .await
    })
  };

  let (entered, release) =
    interactions.sink().gate.as_ref().unwrap();
  entered.notified().await;
  assert!(interactions.is_dirty(&post));
  assert_eq!(
    interactions.displayed_vote(&post),
    (Vote::Upvote, 11)
  );

  release.notify_one();
  handle.await.unwrap().unwrap();
  assert!(!interactions.is_dirty(&post));
  assert_eq!(
    interactions.displayed_vote(&post),
    (Vote::None, 10)
  );
}

#[tokio::test]
async fn overlapping_votes_stay_dirty_until_both_complete(
) {
  let interactions = Arc::new(
    Interactions::new(FakeSink::gated(9))
  );
  let post =
    TestPost::new(1, 0).scored(Vote::None, 10);
  let (entered, release) =
    interactions.sink().gate.as_ref().unwrap();

  let spawn_vote = |requested: Vote| {
    let interactions = Arc::clone(&interactions);
    let post = post.clone();
    tokio::spawn(async move {
      interactions
        .vote(&post, requested)
        .await
    })
  };

  let first = spawn_vote(Vote::Upvote);
  entered.notified().await;
  let second = spawn_vote(Vote::Downvote);
  entered.notified().await;
  assert_eq!(
    interactions.displayed_vote(&post),
    (Vote::Downvote, 9)
  );

  release.notify_one();
  while !first.is_finished()
    && !second.is_finished()
  {
    tokio::task::yield_now().await;
  }
  assert!(interactions.is_dirty(&post));
  assert_eq!(
    interactions.displayed_vote(&post),
    (Vote::Downvote, 9)
  );

  release.notify_one();
  first.await.unwrap().unwrap();
  second.await.unwrap().unwrap();
  assert!(!interactions.is_dirty(&post));
  assert_eq!(
    *interactions.sink().votes.lock().unwrap(),
    vec![
      (ItemKey::post(1), Vote::Upvote),
      (ItemKey::post(1), Vote::Downvote),
    ]
  );
}

#[tokio::test]
async fn toggle_save_flips_displayed_flag() {
  let interactions =
    Interactions::new(FakeSink::ok(0));
  let post = TestPost::new(6, 0);

  let confirmation = interactions
    .toggle_save(&post)
    .await
    .unwrap();
  assert_eq!(
    confirmation,
    SaveConfirmation {
      key:   ItemKey::post(6),
      saved: true
    }
  );

  let saved_post = post.clone().saved();
  let confirmation = interactions
    .toggle_save(&saved_post)
    .await
    .unwrap();
  assert!(!confirmation.saved);
}
