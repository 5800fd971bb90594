//! Request/response shapes for the API
//! endpoints the adapter calls. Only the
//! fields the client reads are declared;
//! everything else is ignored on decode.

use chrono::{
  DateTime,
  Utc
};
use lemfeed_core::{
  FeedEntry,
  ItemId,
  ItemKind,
  PersonId,
  Vote
};
use serde::{
  Deserialize,
  Serialize
};

use crate::time::deserialize_timestamp;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPerson {
  pub id:           PersonId,
  pub name:         String,
  #[serde(default)]
  pub display_name: Option<String>,
  #[serde(deserialize_with = "deserialize_timestamp")]
  pub published:    DateTime<Utc>,
  #[serde(default)]
  pub actor_id:     Option<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPersonAggregates {
  pub post_count:    i64,
  pub comment_count: i64,
  #[serde(default)]
  pub post_score:    i64,
  #[serde(default)]
  pub comment_score: i64
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPersonView {
  pub person: ApiPerson,
  pub counts: ApiPersonAggregates
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCommunity {
  pub id:       i64,
  pub name:     String,
  #[serde(default)]
  pub title:    Option<String>,
  #[serde(default)]
  pub actor_id: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPost {
  pub id:           ItemId,
  pub name:         String,
  #[serde(default)]
  pub url:          Option<String>,
  #[serde(default)]
  pub body:         Option<String>,
  pub creator_id:   PersonId,
  pub community_id: i64,
  #[serde(deserialize_with = "deserialize_timestamp")]
  pub published:    DateTime<Utc>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPostAggregates {
  pub score:     i64,
  #[serde(default)]
  pub upvotes:   i64,
  #[serde(default)]
  pub downvotes: i64,
  #[serde(default)]
  pub comments:  i64
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPostView {
  pub post:      ApiPost,
  pub creator:   ApiPerson,
  pub community: ApiCommunity,
  pub counts:    ApiPostAggregates,
  #[serde(default)]
  pub saved:     bool,
  #[serde(default)]
  pub read:      bool,
  #[serde(default)]
  pub my_vote:   Option<i64>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiComment {
  pub id:         ItemId,
  pub creator_id: PersonId,
  pub post_id:    ItemId,
  pub content:    String,
  #[serde(deserialize_with = "deserialize_timestamp")]
  pub published:  DateTime<Utc>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCommentAggregates {
  pub score:       i64,
  #[serde(default)]
  pub upvotes:     i64,
  #[serde(default)]
  pub downvotes:   i64,
  #[serde(default)]
  pub child_count: i64
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCommentView {
  pub comment:   ApiComment,
  pub creator:   ApiPerson,
  pub post:      ApiPost,
  pub community: ApiCommunity,
  pub counts:    ApiCommentAggregates,
  #[serde(default)]
  pub saved:     bool,
  #[serde(default)]
  pub my_vote:   Option<i64>
}

impl FeedEntry for ApiPostView {
  const KIND: ItemKind = ItemKind::Post;

  fn id(&self) -> ItemId {
    self.post.id
  }

  fn published_at(&self) -> DateTime<Utc> {
    self.post.published
  }

  fn author_id(&self) -> PersonId {
    self.post.creator_id
  }

  fn saved(&self) -> bool {
    self.saved
  }

  fn vote(&self) -> Vote {
    Vote::from_score(
      self.my_vote.unwrap_or(0)
    )
  }

  fn score(&self) -> i64 {
    self.counts.score
  }

  fn apply_vote(
    &mut self,
    vote: Vote,
    score: i64
  ) {
    self.my_vote = Some(vote.as_score());
    self.counts.score = score;
  }

  fn apply_saved(&mut self, saved: bool) {
    self.saved = saved;
  }
}

impl FeedEntry for ApiCommentView {
  const KIND: ItemKind = ItemKind::Comment;

  fn id(&self) -> ItemId {
    self.comment.id
  }

  fn published_at(&self) -> DateTime<Utc> {
    self.comment.published
  }

  fn author_id(&self) -> PersonId {
    self.comment.creator_id
  }

  fn saved(&self) -> bool {
    self.saved
  }

  fn vote(&self) -> Vote {
    Vote::from_score(
      self.my_vote.unwrap_or(0)
    )
  }

  fn score(&self) -> i64 {
    self.counts.score
  }

  fn apply_vote(
    &mut self,
    vote: Vote,
    score: i64
  ) {
    self.my_vote = Some(vote.as_score());
    self.counts.score = score;
  }

  fn apply_saved(&mut self, saved: bool) {
    self.saved = saved;
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetPersonDetailsResponse {
  pub person_view: ApiPersonView,
  #[serde(default)]
  pub posts:       Vec<ApiPostView>,
  #[serde(default)]
  pub comments:    Vec<ApiCommentView>
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostResponse {
  pub post_view: ApiPostView
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentResponse {
  pub comment_view: ApiCommentView
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
  #[serde(default)]
  pub jwt: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockPersonResponse {
  pub person_view: ApiPersonView,
  pub blocked:     bool
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalUserView {
  pub person: ApiPerson
}

#[derive(Debug, Clone, Deserialize)]
pub struct MyUserInfo {
  pub local_user_view: LocalUserView
}

/// Only the signed-in user is read from
/// the site response.
#[derive(Debug, Clone, Deserialize)]
pub struct GetSiteResponse {
  #[serde(default)]
  pub my_user: Option<MyUserInfo>
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginForm<'a> {
  pub username_or_email: &'a str,
  pub password:          &'a str
}

#[derive(Debug, Serialize)]
pub(crate) struct CreatePostLike<'a> {
  pub post_id: ItemId,
  pub score:   i64,
  pub auth:    &'a str
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateCommentLike<'a> {
  pub comment_id: ItemId,
  pub score:      i64,
  pub auth:       &'a str
}

#[derive(Debug, Serialize)]
pub(crate) struct SavePost<'a> {
  pub post_id: ItemId,
  pub save:    bool,
  pub auth:    &'a str
}

#[derive(Debug, Serialize)]
pub(crate) struct SaveComment<'a> {
  pub comment_id: ItemId,
  pub save:       bool,
  pub auth:       &'a str
}

#[derive(Debug, Serialize)]
pub(crate) struct BlockPerson<'a> {
  pub person_id: PersonId,
  pub block:     bool,
  pub auth:      &'a str
}
