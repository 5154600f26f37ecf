use clap::{Parser, Subcommand, ValueEnum};

use domains::FeedScope;

#[derive(Parser, Debug)]
#[command(name = "grapevine")]
#[command(about = "Browse and create Grapevine posts and communities")]
#[command(version)]
pub struct Cli {
    /// Act as this user instead of `session.username` from the settings
    #[arg(long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List posts
    Posts {
        #[arg(long, value_enum, default_value_t = Scope::All)]
        scope: Scope,
    },
    /// Create a post
    Post {
        #[arg(long)]
        description: String,
        #[arg(long)]
        image_link: String,
    },
    /// List the communities you belong to
    Communities,
    /// Search communities by name, or by shareable key
    Search {
        term: String,
        #[arg(long)]
        by_key: bool,
    },
    /// Show one community by its key
    Community { key: String },
    /// Create a community and join it
    CreateCommunity {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Leave a community by its id
    Leave { community_id: String },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Scope {
    All,
    User,
}

impl From<Scope> for FeedScope {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::All => FeedScope::All,
            Scope::User => FeedScope::User,
        }
    }
}
