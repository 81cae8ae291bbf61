//! user-directory: resolve and update directory users from the command line.
//!
//! Configuration is read from an optional YAML file and `USER_DIRECTORY_*`
//! environment variables. Results are printed to stdout as JSON, logs go to
//! stderr.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use user_directory::{UserDirectoryConfig, UserDirectoryModule};
use user_directory_sdk::{CriteriaType, User, UserDirectoryClient, UserMetadata};

#[derive(Parser)]
#[command(name = "user-directory")]
#[command(about = "Resolve and update users in the identity directory")]
#[command(version)]
struct Cli {
    /// YAML configuration file
    #[arg(long, env = "UD_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an identifier (token, `provider|id` subject, or username)
    Lookup {
        input: String,
    },

    /// Fetch a user by directory id
    Get {
        user_id: String,

        /// Caller token; the service credential is used when absent
        #[arg(long, env = "UD_TOKEN")]
        token: Option<String>,
    },

    /// Search a user by email or username
    Search {
        term: String,

        /// `email` or `username`
        #[arg(long, default_value = CriteriaType::USERNAME)]
        criteria: String,

        /// Caller token; the service credential is used when absent
        #[arg(long, env = "UD_TOKEN")]
        token: Option<String>,
    },

    /// Lookup, then fetch or search, the way an API handler would
    Resolve {
        input: String,
    },

    /// Replace the caller's `user_metadata`
    Update {
        /// Caller token with the `update:current_user_metadata` scope
        #[arg(long, env = "UD_TOKEN")]
        token: String,

        /// JSON object, e.g. '{"theme":"dark"}'
        #[arg(long)]
        metadata: String,
    },
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Cancel `token` on Ctrl-C.
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling");
            token.cancel();
        }
    });
}

fn with_token(user: User, token: Option<String>) -> User {
    match token {
        Some(token) => user.token(token),
        None => user,
    }
}

fn print_user(user: &User) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(user)?);
    Ok(())
}

async fn resolve(
    client: &Arc<dyn UserDirectoryClient>,
    cancel: &CancellationToken,
    input: &str,
) -> anyhow::Result<User> {
    let user = client.metadata_lookup(cancel, input).await?;
    let user = if user.user_id.is_empty() {
        client.search_user(cancel, user, CriteriaType::USERNAME).await?
    } else {
        client.get_user(cancel, user).await?
    };
    Ok(user)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let cfg = UserDirectoryConfig::load(cli.config.as_deref())
        .context("failed to load configuration")?;
    let client = UserDirectoryModule::build(&cfg)?;

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let user = match cli.command {
        Commands::Lookup { input } => client.metadata_lookup(&cancel, &input).await?,
        Commands::Get { user_id, token } => {
            client
                .get_user(&cancel, with_token(User::with_user_id(user_id), token))
                .await?
        }
        Commands::Search {
            term,
            criteria,
            token,
        } => {
            let user = if criteria == CriteriaType::EMAIL {
                User::with_email(term)
            } else {
                User::with_username(term)
            };
            client
                .search_user(&cancel, with_token(user, token), &criteria)
                .await?
        }
        Commands::Resolve { input } => resolve(&client, &cancel, &input).await?,
        Commands::Update { token, metadata } => {
            let metadata: UserMetadata =
                serde_json::from_str(&metadata).context("metadata must be a JSON object")?;
            client
                .update_user(&cancel, User::default().token(token).metadata(metadata))
                .await?
        }
    };

    info!("done");
    print_user(&user)
}
