use std::path::PathBuf;

use anyhow::{
  bail,
  Context
};
use clap::{
  Parser,
  Subcommand,
  ValueEnum
};
use lemfeed_client::models::{
  ApiCommentView,
  ApiPostView
};
use lemfeed_client::LemmyClient;
use lemfeed_core::infra::config::{
  resolve_config_path,
  ClientConfig,
  ConfigLoader
};
use lemfeed_core::infra::logging::init_logging;
use lemfeed_core::{
  FeedEntry,
  FeedFilter,
  FeedItem,
  FeedMerger,
  Interactions,
  ItemKey,
  ItemKind,
  ItemTracker,
  MergeSource,
  OwnerContext,
  PersonId,
  ProfileFeed,
  ProfileTab,
  SortType,
  Vote
};
use tracing::{
  debug,
  info
};

type Item =
  FeedItem<ApiPostView, ApiCommentView>;

#[derive(Parser)]
#[command(
  author,
  version,
  about = "lemfeed profile feed CLI"
)]
struct Args {
  /// Path to lemfeed.toml (defaults to
  /// LEMFEED_CONFIG or ./lemfeed.toml).
  #[arg(long, global = true)]
  config:  Option<PathBuf>,
  #[command(subcommand)]
  command: Command
}

#[derive(Subcommand)]
enum Command {
  /// Validate the TOML config.
  Validate,
  /// Show one tab of a person's profile.
  Profile {
    person_id: PersonId,
    #[arg(
      long,
      value_enum,
      default_value = "overview"
    )]
    tab:       Tab,
    /// Overrides feed.sort.
    #[arg(long)]
    sort:      Option<SortType>
  },
  /// Page through a person's posts and/or
  /// comments.
  Feed {
    person_id: PersonId,
    #[arg(
      long,
      value_enum,
      default_value = "all"
    )]
    kind:      FeedKind,
    /// Number of pages to load.
    #[arg(long, default_value_t = 1)]
    pages:     u32,
    /// Only saved items (own profile).
    #[arg(long)]
    saved:     bool,
    #[arg(long)]
    sort:      Option<SortType>
  },
  /// Vote on an item. Repeating the
  /// current vote clears it.
  Vote {
    #[arg(value_enum)]
    kind:      Kind,
    id:        i64,
    #[arg(value_enum)]
    direction: Direction
  },
  /// Save an item, or unsave it with
  /// --unsave.
  Save {
    #[arg(value_enum)]
    kind:   Kind,
    id:     i64,
    #[arg(long)]
    unsave: bool
  },
  /// Block a person, or unblock with
  /// --unblock.
  Block {
    person_id: PersonId,
    #[arg(long)]
    unblock:   bool
  }
}

#[derive(Clone, Copy, ValueEnum)]
enum Tab {
  Overview,
  Comments,
  Posts,
  Saved
}

impl From<Tab> for ProfileTab {
  fn from(tab: Tab) -> Self {
    match tab {
      | Tab::Overview => ProfileTab::Overview,
      | Tab::Comments => ProfileTab::Comments,
      | Tab::Posts => ProfileTab::Posts,
      | Tab::Saved => ProfileTab::Saved
    }
  }
}

#[derive(Clone, Copy, ValueEnum)]
enum FeedKind {
  All,
  Posts,
  Comments
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
  Post,
  Comment
}

impl Kind {
  fn key(self, id: i64) -> ItemKey {
    match self {
      | Kind::Post => ItemKey::post(id),
      | Kind::Comment => ItemKey::comment(id)
    }
  }
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
  Up,
  Down,
  None
}

impl From<Direction> for Vote {
  fn from(direction: Direction) -> Self {
    match direction {
      | Direction::Up => Vote::Upvote,
      | Direction::Down => Vote::Downvote,
      | Direction::None => Vote::None
    }
  }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let args = Args::parse();
  let cfg_path =
    resolve_config_path(args.config);

  let config = ConfigLoader::load(&cfg_path)
    .await
    .with_context(|| {
      format!(
        "loading config {}",
        cfg_path.display()
      )
    })?;

  if let Command::Validate = args.command {
    println!(
      "ok: config validated at {}",
      cfg_path.display()
    );
    return Ok(());
  }

  init_logging(&config.logging.level)
    .context("installing logging")?;
  let client = connect(&config).await?;

  match args.command {
    | Command::Validate => {}
    | Command::Profile {
      person_id,
      tab,
      sort
    } => {
      let viewer_id = client
        .my_person_id()
        .await
        .context("looking up signed-in user")?
        .unwrap_or_default();
      let feed: ProfileFeed<
        ApiPostView,
        ApiCommentView
      > = ProfileFeed::new(
          person_id,
          viewer_id,
          sort.unwrap_or(config.feed.sort),
          config.feed.page_size
        );

      feed
        .load(
          &client,
          &client,
          config.feed.profile_limit
        )
        .await
        .context("loading profile")?;

      let tab = ProfileTab::from(tab);
      let items = feed.feed(tab);
      println!(
        "{} of person {person_id}: {} items",
        tab.label(),
        items.len()
      );
      print_items(&items);
    }
    | Command::Feed {
      person_id,
      kind,
      pages,
      saved,
      sort
    } => {
      let owner = OwnerContext {
        person_id
      };
      let filter = FeedFilter {
        saved_only: saved,
        sort:       sort
          .unwrap_or(config.feed.sort)
      };
      let page_size = config.feed.page_size;
      let posts: ItemTracker<ApiPostView> =
        ItemTracker::new(
          owner, filter, page_size
        );
      let comments: ItemTracker<
        ApiCommentView
      > = ItemTracker::new(
        owner, filter, page_size
      );

      let mut sources = Vec::new();
      if matches!(
        kind,
        FeedKind::All | FeedKind::Posts
      ) {
        load_pages(
          &posts, &client, page_size, pages
        )
        .await
        .context("loading posts")?;
        sources
          .push(MergeSource::Posts(&posts));
      }
      if matches!(
        kind,
        FeedKind::All | FeedKind::Comments
      ) {
        load_pages(
          &comments, &client, page_size,
          pages
        )
        .await
        .context("loading comments")?;
        sources.push(MergeSource::Comments(
          &comments
        ));
      }

      let items =
        FeedMerger::merge(&sources);
      println!(
        "feed of person {person_id}: {} items{}",
        items.len(),
        if FeedMerger::is_exhausted(&sources) {
          " (end)"
        } else {
          ""
        }
      );
      print_items(&items);
    }
    | Command::Vote {
      kind,
      id,
      direction
    } => {
      require_session(&client)?;
      let interactions =
        Interactions::new(client);
      let requested = Vote::from(direction);

      let confirmation = match kind {
        | Kind::Post => {
          let view = interactions
            .sink()
            .fetch_post(id)
            .await
            .context("fetching post")?;
          interactions
            .vote(&view, requested)
            .await
        }
        | Kind::Comment => {
          let view = interactions
            .sink()
            .fetch_comment(id)
            .await
            .context("fetching comment")?;
          interactions
            .vote(&view, requested)
            .await
        }
      }
      .with_context(|| {
        format!("voting on {}", kind.key(id))
      })?;

      println!(
        "ok: {} vote={:?} score={}",
        confirmation.key,
        confirmation.vote,
        confirmation.score
      );
    }
    | Command::Save {
      kind,
      id,
      unsave
    } => {
      require_session(&client)?;
      let interactions =
        Interactions::new(client);

      let confirmation = match kind {
        | Kind::Post => {
          let view = interactions
            .sink()
            .fetch_post(id)
            .await
            .context("fetching post")?;
          interactions
            .set_saved(&view, !unsave)
            .await
        }
        | Kind::Comment => {
          let view = interactions
            .sink()
            .fetch_comment(id)
            .await
            .context("fetching comment")?;
          interactions
            .set_saved(&view, !unsave)
            .await
        }
      }
      .with_context(|| {
        format!("saving {}", kind.key(id))
      })?;

      println!(
        "ok: {} saved={}",
        confirmation.key, confirmation.saved
      );
    }
    | Command::Block {
      person_id,
      unblock
    } => {
      require_session(&client)?;
      let resp = client
        .block_person(person_id, !unblock)
        .await
        .context("blocking person")?;
      println!(
        "ok: {} blocked={}",
        resp.person_view.person.name,
        resp.blocked
      );
    }
  }

  Ok(())
}

async fn connect(
  config: &ClientConfig
) -> anyhow::Result<LemmyClient> {
  let client =
    LemmyClient::from_config(config)
      .context("building http client")?;

  if let Some((username, password)) =
    config.credentials()
  {
    client
      .login(username, password)
      .await
      .context("logging in")?;
  } else {
    debug!(
      "no credentials configured, \
       browsing anonymously"
    );
  }

  Ok(client)
}

fn require_session(
  client: &LemmyClient
) -> anyhow::Result<()> {
  if !client.is_logged_in() {
    bail!(
      "this command needs auth.username \
       and auth.password in the config"
    );
  }
  Ok(())
}

async fn load_pages<T>(
  tracker: &ItemTracker<T>,
  client: &LemmyClient,
  page_size: u32,
  pages: u32
) -> anyhow::Result<()>
where
  T: FeedEntry + Clone + Send,
  LemmyClient: lemfeed_core::PageSource<T>
{
  tracker.refresh(client, page_size).await?;
  for _ in 1..pages.max(1) {
    if tracker.is_exhausted() {
      break;
    }
    tracker
      .load_next_page(client, page_size)
      .await?;
  }
  info!(
    kind = %T::KIND,
    loaded = tracker.len(),
    exhausted = tracker.is_exhausted(),
    "pages loaded"
  );
  Ok(())
}

fn print_items(items: &[Item]) {
  for item in items {
    println!("{}", render(item));
  }
}

fn render(item: &Item) -> String {
  let when = item
    .published_at()
    .format("%Y-%m-%d %H:%M");
  let marker = match item.vote() {
    | Vote::Upvote => "^",
    | Vote::Downvote => "v",
    | Vote::None => " "
  };
  let saved =
    if item.saved() { "*" } else { " " };

  let text = match item {
    | FeedItem::Post(view) => format!(
      "c/{}  {}",
      view.community.name, view.post.name
    ),
    | FeedItem::Comment(view) => format!(
      "c/{}  re: {}  {}",
      view.community.name,
      view.post.name,
      first_line(&view.comment.content)
    )
  };

  let tag = match item.kind() {
    | ItemKind::Post => "post",
    | ItemKind::Comment => "comment"
  };

  format!(
    "{when} {saved}{marker}{:>6} {tag}#{:<8} {text}",
    item.score(),
    item.id()
  )
}

fn first_line(text: &str) -> &str {
  text.lines().next().unwrap_or_default()
}
