//! # Grapevine CLI
//!
//! Assembles settings, tracing, the HTTP gateway and the services, then runs
//! one subcommand.

mod cli;

use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use api_adapters::HttpGateway;
use configs::{LogSettings, Settings};
use domains::{Community, CommunityDraft, Navigator, Post, PostDraft, ResourceGateway, SessionProvider};
use services::{CommunityDirectory, Listing, PostFeed, SessionResolver};

use crate::cli::{Cli, Command};

/// Session backed by a fixed username (settings or `--user`).
struct StaticSession {
    username: Option<String>,
}

impl SessionProvider for StaticSession {
    fn current_username(&self) -> Option<String> {
        self.username.clone()
    }
}

/// Nothing to route in a terminal; the redirect target is reported instead.
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&self, route: &str) {
        tracing::info!(route, "navigate");
        println!("-> {route}");
    }
}

fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_posts(posts: &Listing<Post>) {
    match posts {
        Listing::Populated(posts) => {
            for post in posts {
                let when = post
                    .created_at
                    .map(|t| t.to_rfc2822())
                    .unwrap_or_else(|| "-".into());
                println!(
                    "@{}  {}\n    {}\n    {}",
                    post.username.as_deref().unwrap_or("?"),
                    when,
                    post.image_link,
                    post.description
                );
            }
        }
        _ => println!("No posts to display."),
    }
}

fn print_communities(communities: &Listing<Community>, empty: &str) {
    match communities {
        Listing::Populated(communities) => {
            for community in communities {
                println!(
                    "{}  {}  (key: {})",
                    community.community_id, community.name, community.key
                );
            }
        }
        _ => println!("{empty}"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load().context("loading settings")?;
    init_tracing(&settings.log);
    tracing::debug!(
        base_url = %settings.gateway.base_url,
        timeout_ms = settings.gateway.timeout_ms,
        "settings loaded"
    );

    let gateway: Arc<dyn ResourceGateway> = Arc::new(
        HttpGateway::new(&settings.gateway.base_url, settings.gateway.timeout())
            .context("building gateway")?,
    );
    let navigator: Arc<dyn Navigator> = Arc::new(PrintNavigator);
    let session = StaticSession {
        username: cli.user.or(settings.session.username),
    };

    let resolver = SessionResolver::new(Arc::clone(&gateway));
    let identity = resolver.require(&session).await?;
    let user = identity.user_id;

    match cli.command {
        Command::Posts { scope } => {
            let feed = PostFeed::new(gateway, navigator, scope.into());
            feed.load(&user).await?;
            print_posts(&feed.posts().await);
        }
        Command::Post {
            description,
            image_link,
        } => {
            let feed = PostFeed::new(gateway, navigator, domains::FeedScope::All);
            feed.creation().open().await;
            feed.creation()
                .edit(|draft| *draft = PostDraft::new(description, image_link))
                .await;
            let post = feed.create_post(&user).await?;
            println!("created post {}", post.post_id);
            print_posts(&feed.posts().await);
        }
        Command::Communities => {
            let directory = CommunityDirectory::new(gateway, navigator);
            directory.load(&user).await?;
            print_communities(&directory.communities().await, "No communities found.");
        }
        Command::Search { term, by_key } => {
            let directory = CommunityDirectory::new(gateway, navigator);
            let results = if by_key {
                directory.search_by_key(&term).await?
            } else {
                directory.search(&term).await?
            };
            print_communities(&results, "No communities found.");
        }
        Command::Community { key } => {
            let directory = CommunityDirectory::new(gateway, navigator);
            match directory.open(&key).await? {
                Some(community) => {
                    println!("{}", community.name);
                    if let Some(description) = &community.description {
                        println!("{description}");
                    }
                    if let Some(privacy) = &community.privacy {
                        println!("Privacy: {privacy}");
                    }
                }
                None => println!("overview"),
            }
        }
        Command::CreateCommunity { name, description } => {
            let directory = CommunityDirectory::new(gateway, navigator);
            directory.load(&user).await?;
            directory.creation().open().await;
            directory
                .creation()
                .edit(|draft| *draft = CommunityDraft::new(name, description))
                .await;
            let community = directory.create_community(&user).await?;
            println!(
                "created community {} (key: {})",
                community.name, community.key
            );
        }
        Command::Leave { community_id } => {
            let directory = CommunityDirectory::new(gateway, navigator);
            directory.load(&user).await?;
            let community = directory
                .communities()
                .await
                .items()
                .iter()
                .find(|c| c.community_id == community_id)
                .cloned()
                .ok_or_else(|| anyhow!("you are not a member of community {community_id}"))?;
            directory.leave(&community, &user).await?;
            if let Some(status) = directory.status().await {
                println!("{status}");
            }
            print_communities(&directory.communities().await, "No communities found.");
        }
    }

    Ok(())
}
