//! Domain models: item identity, votes,
//! the feed item union, fetch context and
//! sort orders.

use std::fmt;

use chrono::{
  DateTime,
  Utc
};
use serde::{
  Deserialize,
  Serialize
};

pub type ItemId = i64;
pub type PersonId = i64;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
  Post,
  Comment
}

impl fmt::Display for ItemKind {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    match self {
      | ItemKind::Post => f.write_str("post"),
      | ItemKind::Comment => {
        f.write_str("comment")
      }
    }
  }
}

/// Identity of an item across kinds. A
/// post and a comment may share a numeric
/// id, so `(kind, id)` is the only
/// globally unique key.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
)]
pub struct ItemKey {
  pub kind: ItemKind,
  pub id:   ItemId
}

impl ItemKey {
  pub fn post(id: ItemId) -> Self {
    Self {
      kind: ItemKind::Post,
      id
    }
  }

  pub fn comment(id: ItemId) -> Self {
    Self {
      kind: ItemKind::Comment,
      id
    }
  }
}

impl fmt::Display for ItemKey {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(f, "{}#{}", self.kind, self.id)
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
)]
pub enum Vote {
  Upvote,
  Downvote,
  #[default]
  None
}

impl Vote {
  /// Wire score: `1`, `-1` or `0`.
  pub fn as_score(self) -> i64 {
    match self {
      | Vote::Upvote => 1,
      | Vote::Downvote => -1,
      | Vote::None => 0
    }
  }

  pub fn from_score(score: i64) -> Self {
    match score.signum() {
      | 1 => Vote::Upvote,
      | -1 => Vote::Downvote,
      | _ => Vote::None
    }
  }
}

/// The accessor surface the core needs
/// from an application-owned payload.
/// Nothing else about the payload is
/// assumed.
pub trait FeedEntry {
  const KIND: ItemKind;

  fn id(&self) -> ItemId;

  fn published_at(&self) -> DateTime<Utc>;

  fn author_id(&self) -> PersonId;

  fn saved(&self) -> bool;

  fn vote(&self) -> Vote;

  fn score(&self) -> i64;

  /// Writes a server-confirmed vote back
  /// into the payload.
  fn apply_vote(
    &mut self,
    vote: Vote,
    score: i64
  );

  fn apply_saved(&mut self, saved: bool);

  fn key(&self) -> ItemKey {
    ItemKey {
      kind: Self::KIND,
      id:   self.id()
    }
  }
}

/// One entry of a merged feed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedItem<P, C> {
  Post(P),
  Comment(C)
}

impl<P, C> FeedItem<P, C>
where
  P: FeedEntry,
  C: FeedEntry
{
  pub fn kind(&self) -> ItemKind {
    match self {
      | FeedItem::Post(_) => ItemKind::Post,
      | FeedItem::Comment(_) => {
        ItemKind::Comment
      }
    }
  }

  pub fn key(&self) -> ItemKey {
    match self {
      | FeedItem::Post(post) => post.key(),
      | FeedItem::Comment(comment) => {
        comment.key()
      }
    }
  }

  pub fn id(&self) -> ItemId {
    self.key().id
  }

  pub fn published_at(
    &self
  ) -> DateTime<Utc> {
    match self {
      | FeedItem::Post(post) => {
        post.published_at()
      }
      | FeedItem::Comment(comment) => {
        comment.published_at()
      }
    }
  }

  pub fn author_id(&self) -> PersonId {
    match self {
      | FeedItem::Post(post) => {
        post.author_id()
      }
      | FeedItem::Comment(comment) => {
        comment.author_id()
      }
    }
  }

  pub fn saved(&self) -> bool {
    match self {
      | FeedItem::Post(post) => post.saved(),
      | FeedItem::Comment(comment) => {
        comment.saved()
      }
    }
  }

  pub fn vote(&self) -> Vote {
    match self {
      | FeedItem::Post(post) => post.vote(),
      | FeedItem::Comment(comment) => {
        comment.vote()
      }
    }
  }

  pub fn score(&self) -> i64 {
    match self {
      | FeedItem::Post(post) => post.score(),
      | FeedItem::Comment(comment) => {
        comment.score()
      }
    }
  }

  pub fn as_post(&self) -> Option<&P> {
    match self {
      | FeedItem::Post(post) => Some(post),
      | FeedItem::Comment(_) => None
    }
  }

  pub fn as_comment(&self) -> Option<&C> {
    match self {
      | FeedItem::Post(_) => None,
      | FeedItem::Comment(comment) => {
        Some(comment)
      }
    }
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct VoteConfirmation {
  pub key:   ItemKey,
  pub vote:  Vote,
  pub score: i64
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct SaveConfirmation {
  pub key:   ItemKey,
  pub saved: bool
}

/// Whose content a tracker pages through.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct OwnerContext {
  pub person_id: PersonId
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct FeedFilter {
  pub saved_only: bool,
  pub sort:       SortType
}

impl Default for FeedFilter {
  fn default() -> Self {
    Self {
      saved_only: false,
      sort:       SortType::New
    }
  }
}

impl FeedFilter {
  pub fn saved() -> Self {
    Self {
      saved_only: true,
      ..Self::default()
    }
  }
}

/// Post sort orders offered by the
/// remote API. Serialized with the API's
/// PascalCase names.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
)]
pub enum SortType {
  Hot,
  Active,
  New,
  Old,
  NewComments,
  MostComments,
  TopHour,
  TopSixHour,
  TopTwelveHour,
  TopDay,
  TopWeek,
  TopMonth,
  TopYear,
  TopAll
}

impl SortType {
  pub const OUTER: [SortType; 6] = [
    SortType::Hot,
    SortType::Active,
    SortType::New,
    SortType::Old,
    SortType::NewComments,
    SortType::MostComments
  ];
  pub const TOP: [SortType; 8] = [
    SortType::TopHour,
    SortType::TopSixHour,
    SortType::TopTwelveHour,
    SortType::TopDay,
    SortType::TopWeek,
    SortType::TopMonth,
    SortType::TopYear,
    SortType::TopAll
  ];

  /// Name used on the wire.
  pub fn as_str(self) -> &'static str {
    match self {
      | SortType::Hot => "Hot",
      | SortType::Active => "Active",
      | SortType::New => "New",
      | SortType::Old => "Old",
      | SortType::NewComments => {
        "NewComments"
      }
      | SortType::MostComments => {
        "MostComments"
      }
      | SortType::TopHour => "TopHour",
      | SortType::TopSixHour => {
        "TopSixHour"
      }
      | SortType::TopTwelveHour => {
        "TopTwelveHour"
      }
      | SortType::TopDay => "TopDay",
      | SortType::TopWeek => "TopWeek",
      | SortType::TopMonth => "TopMonth",
      | SortType::TopYear => "TopYear",
      | SortType::TopAll => "TopAll"
    }
  }

  /// Short menu label.
  pub fn label(self) -> &'static str {
    match self {
      | SortType::NewComments => {
        "New comments"
      }
      | SortType::MostComments => {
        "Most comments"
      }
      | SortType::TopHour => "Hour",
      | SortType::TopSixHour => {
        "Six hours"
      }
      | SortType::TopTwelveHour => {
        "Twelve hours"
      }
      | SortType::TopDay => "Day",
      | SortType::TopWeek => "Week",
      | SortType::TopMonth => "Month",
      | SortType::TopYear => "Year",
      | SortType::TopAll => "All time",
      | other => other.as_str()
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      | SortType::TopHour => {
        "Top of the last hour"
      }
      | SortType::TopSixHour => {
        "Top of the last six hours"
      }
      | SortType::TopTwelveHour => {
        "Top of the last twelve hours"
      }
      | SortType::TopDay => "Top of today",
      | SortType::TopWeek => {
        "Top of the week"
      }
      | SortType::TopMonth => {
        "Top of the month"
      }
      | SortType::TopYear => {
        "Top of the year"
      }
      | SortType::TopAll => {
        "Top of all time"
      }
      | other => other.label()
    }
  }

  pub fn is_top(self) -> bool {
    Self::TOP.contains(&self)
  }
}

impl fmt::Display for SortType {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for SortType {
  type Err = String;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    Self::OUTER
      .iter()
      .chain(Self::TOP.iter())
      .copied()
      .find(|sort| {
        sort
          .as_str()
          .eq_ignore_ascii_case(s.trim())
      })
      .ok_or_else(|| {
        format!("unknown sort type: {s}")
      })
  }
}

/// Which projection of a profile to show.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ProfileTab {
  #[default]
  Overview,
  Comments,
  Posts,
  Saved
}

impl ProfileTab {
  pub fn label(self) -> &'static str {
    match self {
      | ProfileTab::Overview => {
        "Overview"
      }
      | ProfileTab::Comments => {
        "Comments"
      }
      | ProfileTab::Posts => "Posts",
      | ProfileTab::Saved => "Saved"
    }
  }
}
