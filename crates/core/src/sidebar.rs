//! Sidebar entries for the community list.
//! Each entry decides which communities
//! it lists.

use std::collections::HashSet;

use regex::Regex;

use crate::domain::model::PersonId;

pub type CommunityId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityRef {
  pub id:       CommunityId,
  pub name:     String,
  /// Host of the community's home
  /// instance, shown after `@`.
  pub instance: Option<String>
}

pub trait SidebarEntry {
  fn label(&self) -> Option<&str>;

  fn icon(&self) -> Option<&str>;

  fn contains(
    &self,
    community: &CommunityRef,
    is_subscribed: bool,
    is_moderator: bool
  ) -> bool;
}

/// Top entry of the sidebar; lists
/// nothing.
#[derive(Debug, Clone, Default)]
pub struct EmptySidebarEntry {
  pub label: Option<String>,
  pub icon:  Option<String>
}

impl SidebarEntry for EmptySidebarEntry {
  fn label(&self) -> Option<&str> {
    self.label.as_deref()
  }

  fn icon(&self) -> Option<&str> {
    self.icon.as_deref()
  }

  fn contains(
    &self,
    _community: &CommunityRef,
    _is_subscribed: bool,
    _is_moderator: bool
  ) -> bool {
    false
  }
}

/// Subscribed communities whose name
/// starts with a match of the pattern.
#[derive(Debug, Clone)]
pub struct NamePrefixSidebarEntry {
  pattern:   Regex,
  pub label: Option<String>,
  pub icon:  Option<String>
}

impl NamePrefixSidebarEntry {
  pub fn new(
    pattern: &str,
    label: Option<String>,
    icon: Option<String>
  ) -> Result<Self, regex::Error> {
    let pattern =
      Regex::new(&format!("^(?:{pattern})"))?;
    Ok(Self {
      pattern,
      label,
      icon
    })
  }
}

impl SidebarEntry for NamePrefixSidebarEntry {
  fn label(&self) -> Option<&str> {
    self.label.as_deref()
  }

  fn icon(&self) -> Option<&str> {
    self.icon.as_deref()
  }

  fn contains(
    &self,
    community: &CommunityRef,
    is_subscribed: bool,
    _is_moderator: bool
  ) -> bool {
    is_subscribed
      && self.pattern.is_match(&community.name)
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct FavoriteCommunity {
  pub account_id:   PersonId,
  pub community_id: CommunityId
}

/// Communities the given account has
/// favorited.
#[derive(Debug, Clone)]
pub struct FavoritesSidebarEntry {
  favorites: HashSet<CommunityId>,
  pub label: Option<String>,
  pub icon:  Option<String>
}

impl FavoritesSidebarEntry {
  pub fn new(
    account_id: PersonId,
    favorites: &[FavoriteCommunity],
    label: Option<String>,
    icon: Option<String>
  ) -> Self {
    let favorites = favorites
      .iter()
      .filter(|fav| {
        fav.account_id == account_id
      })
      .map(|fav| fav.community_id)
      .collect();
    Self {
      favorites,
      label,
      icon
    }
  }
}

impl SidebarEntry for FavoritesSidebarEntry {
  fn label(&self) -> Option<&str> {
    self.label.as_deref()
  }

  fn icon(&self) -> Option<&str> {
    self.icon.as_deref()
  }

  fn contains(
    &self,
    community: &CommunityRef,
    _is_subscribed: bool,
    _is_moderator: bool
  ) -> bool {
    self.favorites.contains(&community.id)
  }
}

#[derive(Debug, Clone, Default)]
pub struct ModeratedSidebarEntry {
  pub label: Option<String>,
  pub icon:  Option<String>
}

impl SidebarEntry for ModeratedSidebarEntry {
  fn label(&self) -> Option<&str> {
    self.label.as_deref()
  }

  fn icon(&self) -> Option<&str> {
    self.icon.as_deref()
  }

  fn contains(
    &self,
    _community: &CommunityRef,
    _is_subscribed: bool,
    is_moderator: bool
  ) -> bool {
    is_moderator
  }
}

/// A community as listed in the sidebar,
/// with the viewer's relationship to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityListing {
  pub community:     CommunityRef,
  pub is_subscribed: bool,
  pub is_moderator:  bool
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarSection {
  pub label:       Option<String>,
  pub icon:        Option<String>,
  pub communities: Vec<CommunityRef>
}

/// Groups communities, sorted by name,
/// under every entry that contains them.
/// Sections with no communities are
/// dropped.
pub fn sidebar_sections(
  entries: &[&dyn SidebarEntry],
  listings: &[CommunityListing]
) -> Vec<SidebarSection> {
  let mut sorted: Vec<&CommunityListing> =
    listings.iter().collect();
  sorted.sort_by(|a, b| {
    a.community.name.cmp(&b.community.name)
  });

  entries
    .iter()
    .filter_map(|entry| {
      let communities: Vec<CommunityRef> =
        sorted
          .iter()
          .filter(|listing| {
            entry.contains(
              &listing.community,
              listing.is_subscribed,
              listing.is_moderator
            )
          })
          .map(|listing| {
            listing.community.clone()
          })
          .collect();

      if communities.is_empty() {
        return None;
      }

      Some(SidebarSection {
        label: entry
          .label()
          .map(str::to_string),
        icon: entry
          .icon()
          .map(str::to_string),
        communities
      })
    })
    .collect()
}
