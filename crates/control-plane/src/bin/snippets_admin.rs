// Snippet Manager administrative CLI
//
// Design Decision: Credentials are created only through this tool (or the
// startup bootstrap), never through the public API.
// Design Decision: Talks to PostgreSQL directly; there is nothing to administer
// in an in-memory store from another process.
//
// Usage:
//   snippets-admin create-user admin --password snippets123
//   snippets-admin create-api-key ci-pipeline
//   snippets-admin disable <credential-id>
//   snippets-admin seed --with-sample-user

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use snippets_control_plane::services::{
    seed_sample_snippets, seed_sample_user, SAMPLE_PASSWORD, SAMPLE_USERNAME,
};
use snippets_control_plane::storage::Stores;
use snippets_core::telemetry::{init_telemetry, TelemetryConfig};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "snippets-admin")]
#[command(about = "Snippet Manager admin tool - manage credentials and sample data")]
#[command(version)]
struct Cli {
    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a user for HTTP Basic authentication
    CreateUser {
        /// Unique, case-sensitive username
        username: String,

        /// Password (prefer the env var over the command line)
        #[arg(long, env = "SNIPPETS_USER_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Issue an API key. The key is printed once and cannot be recovered.
    CreateApiKey {
        /// Label of whoever the key is issued to
        owner: String,
    },

    /// Disable a credential (API key or user) by ID
    Disable { id: Uuid },

    /// Re-enable a disabled credential by ID
    Enable { id: Uuid },

    /// Insert sample snippets if the database has none
    Seed {
        /// Also create the well-known sample login if that username is free
        #[arg(long)]
        with_sample_user: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let mut telemetry_config = TelemetryConfig::from_env();
    telemetry_config.service_name = "snippets-admin".to_string();
    if telemetry_config.log_filter.is_none() {
        telemetry_config.log_filter = Some("warn".to_string());
    }
    let _telemetry_guard = init_telemetry(telemetry_config);

    let cli = Cli::parse();
    let stores = Stores::postgres(&cli.database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Command::CreateUser { username, password } => {
            let user = stores
                .credentials
                .create_user(&username, &password)
                .await
                .context("Failed to create user")?;
            println!("Created user '{}' ({})", user.username, user.id);
        }
        Command::CreateApiKey { owner } => {
            let issued = stores
                .credentials
                .create_api_key(&owner)
                .await
                .context("Failed to create API key")?;
            println!("Created API key {} for '{}'", issued.credential.id, owner);
            println!();
            println!("  {}", issued.token);
            println!();
            println!("Store this key now; it will not be shown again.");
        }
        Command::Disable { id } => set_active(&stores, id, false).await?,
        Command::Enable { id } => set_active(&stores, id, true).await?,
        Command::Seed { with_sample_user } => {
            if with_sample_user {
                let created = seed_sample_user(stores.credentials.as_ref())
                    .await
                    .context("Failed to seed sample user")?;
                if created {
                    println!("Created user '{SAMPLE_USERNAME}' with password '{SAMPLE_PASSWORD}'.");
                    println!("Do not keep this account on a shared deployment.");
                } else {
                    println!("User '{SAMPLE_USERNAME}' already exists. Skipping.");
                }
            }

            let created = seed_sample_snippets(stores.snippets.as_ref())
                .await
                .context("Failed to seed sample data")?;
            if created == 0 {
                println!("Database already has snippets. Skipping seed.");
            } else {
                println!("Created {} sample snippets.", created);
            }
        }
    }

    Ok(())
}

async fn set_active(stores: &Stores, id: Uuid, active: bool) -> Result<()> {
    let found = stores
        .credentials
        .set_active(id, active)
        .await
        .context("Failed to update credential")?;
    if !found {
        bail!("no credential with id {}", id);
    }

    let state = if active { "enabled" } else { "disabled" };
    println!("Credential {} {}", id, state);
    Ok(())
}
