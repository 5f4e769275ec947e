use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use karrot_core::config::{ConfigLoader, ShareConfig};
use karrot_core::{FetchOutcome, LoggingHooks, Stores};
use karrot_types::{Conversation, ConversationId, GroupId, HistoryFilter, StoreId, UserId};
use log::LevelFilter;
use serde::Serialize;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[clap(
    name = "karrot",
    author,
    version,
    about = "Command-line client for the Karrot REST API"
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(long, short, help = "Path to a YAML configuration file")]
    config: Option<String>,

    #[clap(long, short, help = "Log level (off, error, warn, info, debug, trace)")]
    log_level: Option<String>,

    #[clap(long, help = "Base URL of the Karrot API, overrides the configuration")]
    api_url: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the activity history of a group, user or store
    History {
        #[clap(long)]
        group: Option<GroupId>,

        #[clap(long)]
        user: Option<UserId>,

        #[clap(long)]
        store: Option<StoreId>,

        #[clap(long, default_value_t = 1, help = "Number of pages to load")]
        pages: usize,
    },
    /// Show the messages of a conversation, newest first
    Messages {
        #[clap(long)]
        conversation: ConversationId,

        #[clap(long, default_value_t = 1, help = "Number of pages to load")]
        pages: usize,
    },
    /// Post a message to a conversation
    SendMessage {
        #[clap(long)]
        conversation: ConversationId,

        content: String,
    },
    /// Manage group invitations
    Invitations {
        #[clap(subcommand)]
        action: InvitationCommands,
    },
}

#[derive(Subcommand, Debug)]
enum InvitationCommands {
    /// List the invitations sent for a group
    List {
        #[clap(long)]
        group: GroupId,
    },
    /// Invite an e-mail address into a group
    Send {
        #[clap(long)]
        group: GroupId,

        #[clap(long)]
        email: String,
    },
    /// Accept an invitation by its token
    Accept { token: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).await?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    let log_level_filter = config.logging.level.parse().unwrap_or(LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .init();

    let stores = Stores::from_config(&config, Arc::new(LoggingHooks))?;

    match cli.command {
        Commands::History {
            group,
            user,
            store,
            pages,
        } => {
            let filter = match (group, user, store) {
                (Some(id), _, _) => HistoryFilter::Group(id),
                (_, Some(id), _) => HistoryFilter::User(id),
                (_, _, Some(id)) => HistoryFilter::Store(id),
                _ => bail!("One of --group, --user or --store is required"),
            };
            check(stores.history.fetch_filtered(filter).await)?;
            for _ in 1..pages {
                if !stores.history.can_load_more().await {
                    break;
                }
                check(stores.history.fetch_more().await)?;
            }
            print_json(&stores.history.all().await)?;
        }
        Commands::Messages {
            conversation,
            pages,
        } => {
            check(
                stores
                    .conversations
                    .set_active(Conversation::new(conversation))
                    .await,
            )?;
            for _ in 1..pages {
                if !stores.conversations.can_load_more().await {
                    break;
                }
                check(stores.conversations.fetch_more().await)?;
            }
            print_json(&stores.conversations.active_messages().await)?;
        }
        Commands::SendMessage {
            conversation,
            content,
        } => {
            check(
                stores
                    .conversations
                    .set_active(Conversation::new(conversation))
                    .await,
            )?;
            let message = stores.conversations.send_message(&content).await?;
            print_json(&message)?;
        }
        Commands::Invitations { action } => match action {
            InvitationCommands::List { group } => {
                check(stores.invitations.fetch_for_group(group).await)?;
                print_json(&stores.invitations.list().await)?;
            }
            InvitationCommands::Send { group, email } => {
                let invitation = stores.invitations.send(&email, group).await?;
                print_json(&invitation)?;
            }
            InvitationCommands::Accept { token } => {
                stores.invitations.accept(&token).await?;
                print_json(&serde_json::json!({ "accepted": token }))?;
            }
        },
    }

    Ok(())
}

async fn load_config(path: Option<&str>) -> Result<ShareConfig> {
    let config = match path {
        Some(path) => ConfigLoader::from_file(path)
            .await
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => ConfigLoader::from_str("")?,
    };
    Ok(config)
}

fn check(outcome: FetchOutcome) -> Result<()> {
    match outcome {
        FetchOutcome::Failed(error) => Err(error.into()),
        other => {
            log::debug!("Fetch finished: {:?}", other);
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
