//! Reqwest-backed client implementing the
//! `PageSource` and `MutationSink` ports
//! against the Lemmy v3 API.

use std::sync::{
  PoisonError,
  RwLock
};
use std::time::Duration;

use lemfeed_core::infra::config::ClientConfig;
use lemfeed_core::{
  FeedEntry,
  FeedFilter,
  FetchError,
  ItemKey,
  ItemKind,
  MutationSink,
  OwnerContext,
  Page,
  PageSource,
  PersonId,
  SaveConfirmation,
  SortType,
  Vote,
  VoteConfirmation
};
use reqwest::{
  RequestBuilder,
  Url
};
use serde::de::DeserializeOwned;
use tracing::{
  debug,
  info,
  warn
};

use crate::error::{
  classify_status,
  classify_transport,
  ClientError
};
use crate::models::{
  ApiCommentView,
  ApiPostView,
  BlockPerson,
  BlockPersonResponse,
  CommentResponse,
  CreateCommentLike,
  CreatePostLike,
  GetPersonDetailsResponse,
  GetSiteResponse,
  LoginForm,
  LoginResponse,
  PostResponse,
  SaveComment,
  SavePost
};

pub struct LemmyClient {
  http:     reqwest::Client,
  api_base: Url,
  token:    RwLock<Option<String>>
}

impl LemmyClient {
  pub fn new(
    instance_url: &str,
    timeout_ms: u64,
    user_agent: &str
  ) -> Result<Self, ClientError> {
    let api_base = api_base(instance_url)?;
    let http = reqwest::Client::builder()
      .user_agent(user_agent)
      .timeout(Duration::from_millis(
        timeout_ms
      ))
      .pool_idle_timeout(
        Duration::from_secs(120)
      )
      .build()?;

    Ok(Self {
      http,
      api_base,
      token: RwLock::new(None)
    })
  }

  pub fn from_config(
    config: &ClientConfig
  ) -> Result<Self, ClientError> {
    Self::new(
      &config.server.instance_url,
      config.server.timeout_ms,
      &config.server.user_agent
    )
  }

  pub fn with_token(
    self,
    token: String
  ) -> Self {
    self.set_token(Some(token));
    self
  }

  pub fn token(&self) -> Option<String> {
    self
      .token
      .read()
      .unwrap_or_else(
        PoisonError::into_inner
      )
      .clone()
  }

  fn set_token(
    &self,
    token: Option<String>
  ) {
    *self
      .token
      .write()
      .unwrap_or_else(
        PoisonError::into_inner
      ) = token;
  }

  fn require_token(
    &self
  ) -> Result<String, FetchError> {
    self
      .token()
      .ok_or(FetchError::Unauthorized)
  }

  pub fn is_logged_in(&self) -> bool {
    self.token().is_some()
  }

  pub fn endpoint(
    &self,
    path: &str
  ) -> Result<Url, FetchError> {
    self.api_base.join(path).map_err(|e| {
      FetchError::Network(format!(
        "bad endpoint {path}: {e}"
      ))
    })
  }

  /// Exchanges credentials for a session
  /// token used by every later call.
  pub async fn login(
    &self,
    username: &str,
    password: &str
  ) -> Result<(), ClientError> {
    let url = self.endpoint("user/login")?;
    let resp: LoginResponse = send_json(
      self.http.post(url).json(&LoginForm {
        username_or_email: username,
        password
      })
    )
    .await?;

    let token =
      resp.jwt.ok_or(ClientError::NoToken)?;
    self.set_token(Some(token));
    info!(username, "logged in");
    Ok(())
  }

  /// Person id of the signed-in user, or
  /// `None` when anonymous.
  pub async fn my_person_id(
    &self
  ) -> Result<Option<PersonId>, FetchError> {
    let Some(token) = self.token() else {
      return Ok(None);
    };
    let mut url = self.endpoint("site")?;
    url
      .query_pairs_mut()
      .append_pair("auth", &token);

    let site: GetSiteResponse =
      send_json(self.http.get(url)).await?;
    Ok(site.my_user.map(|me| {
      me.local_user_view.person.id
    }))
  }

  pub async fn person_details(
    &self,
    person_id: PersonId,
    page: u32,
    limit: u32,
    saved_only: bool,
    sort: SortType
  ) -> Result<
    GetPersonDetailsResponse,
    FetchError
  > {
    let mut url = self.endpoint("user")?;
    {
      let mut pairs = url.query_pairs_mut();
      pairs
        .append_pair(
          "person_id",
          &person_id.to_string()
        )
        .append_pair(
          "page",
          &page.to_string()
        )
        .append_pair(
          "limit",
          &limit.to_string()
        )
        .append_pair(
          "saved_only",
          &saved_only.to_string()
        )
        .append_pair("sort", sort.as_str());
      if let Some(token) = self.token() {
        pairs.append_pair("auth", &token);
      }
    }

    debug!(
      person_id,
      page,
      limit,
      saved_only,
      "GET person details"
    );
    send_json(self.http.get(url)).await
  }

  pub async fn fetch_post(
    &self,
    post_id: i64
  ) -> Result<ApiPostView, FetchError> {
    let url = self.read_url("post", post_id)?;
    let resp: PostResponse =
      send_json(self.http.get(url)).await?;
    Ok(resp.post_view)
  }

  pub async fn fetch_comment(
    &self,
    comment_id: i64
  ) -> Result<ApiCommentView, FetchError> {
    let url =
      self.read_url("comment", comment_id)?;
    let resp: CommentResponse =
      send_json(self.http.get(url)).await?;
    Ok(resp.comment_view)
  }

  pub async fn block_person(
    &self,
    person_id: PersonId,
    block: bool
  ) -> Result<BlockPersonResponse, FetchError> {
    let auth = self.require_token()?;
    let url = self.endpoint("user/block")?;
    send_json(self.http.post(url).json(
      &BlockPerson {
        person_id,
        block,
        auth: &auth
      }
    ))
    .await
  }

  fn read_url(
    &self,
    path: &str,
    id: i64
  ) -> Result<Url, FetchError> {
    let mut url = self.endpoint(path)?;
    {
      let mut pairs = url.query_pairs_mut();
      pairs
        .append_pair("id", &id.to_string());
      if let Some(token) = self.token() {
        pairs.append_pair("auth", &token);
      }
    }
    Ok(url)
  }
}

/// `https://host/` -> `https://host/api/v3/`.
fn api_base(
  instance_url: &str
) -> Result<Url, ClientError> {
  let mut base =
    instance_url.trim().to_string();
  if !base.ends_with('/') {
    base.push('/');
  }
  Url::parse(&base)
    .and_then(|url| url.join("api/v3/"))
    .map_err(|e| {
      ClientError::Url(e.to_string())
    })
}

async fn send_json<T: DeserializeOwned>(
  request: RequestBuilder
) -> Result<T, FetchError> {
  let resp =
    request.send().await.map_err(|e| {
      warn!(error = %e, "request failed");
      classify_transport(&e)
    })?;

  let status = resp.status();
  if !status.is_success() {
    let body =
      resp.text().await.unwrap_or_default();
    let err = classify_status(status, &body);
    warn!(
      %status,
      error = %err,
      "request rejected"
    );
    return Err(err);
  }

  resp
    .json::<T>()
    .await
    .map_err(|e| {
      FetchError::Decode(e.to_string())
    })
}

#[async_trait::async_trait]
impl PageSource<ApiPostView> for LemmyClient {
  async fn fetch_page(
    &self,
    owner: &OwnerContext,
    page: u32,
    page_size: u32,
    filter: &FeedFilter
  ) -> Result<Page<ApiPostView>, FetchError> {
    let details = self
      .person_details(
        owner.person_id,
        page,
        page_size,
        filter.saved_only,
        filter.sort
      )
      .await?;
    Ok(Page::new(details.posts))
  }
}

#[async_trait::async_trait]
impl PageSource<ApiCommentView>
  for LemmyClient
{
  async fn fetch_page(
    &self,
    owner: &OwnerContext,
    page: u32,
    page_size: u32,
    filter: &FeedFilter
  ) -> Result<
    Page<ApiCommentView>,
    FetchError
  > {
    let details = self
      .person_details(
        owner.person_id,
        page,
        page_size,
        filter.saved_only,
        filter.sort
      )
      .await?;
    Ok(Page::new(details.comments))
  }
}

#[async_trait::async_trait]
impl MutationSink for LemmyClient {
  async fn submit_vote(
    &self,
    key: ItemKey,
    vote: Vote
  ) -> Result<VoteConfirmation, FetchError> {
    let auth = self.require_token()?;
    let score = vote.as_score();

    match key.kind {
      | ItemKind::Post => {
        let url =
          self.endpoint("post/like")?;
        let body = CreatePostLike {
          post_id: key.id,
          score,
          auth: &auth
        };
        let resp: PostResponse = send_json(
          self.http.post(url).json(&body)
        )
        .await?;
        Ok(vote_confirmation(
          key,
          &resp.post_view
        ))
      }
      | ItemKind::Comment => {
        let url =
          self.endpoint("comment/like")?;
        let body = CreateCommentLike {
          comment_id: key.id,
          score,
          auth: &auth
        };
        let resp: CommentResponse =
          send_json(
            self.http.post(url).json(&body)
          )
          .await?;
        Ok(vote_confirmation(
          key,
          &resp.comment_view
        ))
      }
    }
  }

  async fn submit_save(
    &self,
    key: ItemKey,
    saved: bool
  ) -> Result<SaveConfirmation, FetchError> {
    let auth = self.require_token()?;

    let saved = match key.kind {
      | ItemKind::Post => {
        let url =
          self.endpoint("post/save")?;
        let body = SavePost {
          post_id: key.id,
          save: saved,
          auth: &auth
        };
        let resp: PostResponse = send_json(
          self.http.put(url).json(&body)
        )
        .await?;
        resp.post_view.saved
      }
      | ItemKind::Comment => {
        let url =
          self.endpoint("comment/save")?;
        let body = SaveComment {
          comment_id: key.id,
          save: saved,
          auth: &auth
        };
        let resp: CommentResponse =
          send_json(
            self.http.put(url).json(&body)
          )
          .await?;
        resp.comment_view.saved
      }
    };

    Ok(SaveConfirmation {
      key,
      saved
    })
  }
}

fn vote_confirmation<E: FeedEntry>(
  key: ItemKey,
  view: &E
) -> VoteConfirmation {
  VoteConfirmation {
    key,
    vote: view.vote(),
    score: view.score()
  }
}
