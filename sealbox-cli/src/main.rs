//! `sealbox` CLI: key provisioning and encrypted user storage.

#![warn(clippy::pedantic, clippy::nursery)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sealbox::cipher::AesGcmCipher;
use sealbox::secrets::{self, Secrets};
use sealbox_store::codec::RecordCodec;
use sealbox_store::record::{NewUser, UserFilter};
use sealbox_store::service::UserService;
use sealbox_store::sqlite::SqliteUserRepository;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sealbox")]
#[command(about = "Encrypted user store with exact-match search", long_about = None)]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long, env = "SEALBOX_DB", default_value = "sealbox.db")]
    db: PathBuf,

    /// Hex-encoded AES key, 16 or 32 bytes once decoded
    #[arg(long, env = "SEALBOX_KEY", hide_env_values = true)]
    key: Option<String>,

    /// Hex-encoded search digest pepper
    #[arg(long, env = "SEALBOX_PEPPER", hide_env_values = true)]
    pepper: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a fresh key and pepper
    Keygen,
    /// Create a user with encrypted name and email
    Create {
        /// Full name (searchable by exact match)
        name: String,
        /// Email address
        email: String,
    },
    /// Find users by exact name match; lists everyone when omitted
    Find {
        /// Name to match exactly
        name: Option<String>,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Keygen => keygen(),
        Commands::Create { name, email } => {
            let service = build_service(&cli)?;
            let user = service
                .create(NewUser {
                    name: name.clone(),
                    email: email.clone(),
                })
                .context("create failed")?;
            println!(
                "created {} name={:?} email={:?} at {}",
                user.id,
                user.name,
                user.email,
                user.created_at.to_rfc3339()
            );
            Ok(())
        }
        Commands::Find { name } => {
            let service = build_service(&cli)?;
            let users = service
                .find_many(&UserFilter { name: name.clone() })
                .context("find failed")?;
            for user in &users {
                println!(
                    "{} name={:?} email={:?} at {}",
                    user.id,
                    user.name,
                    user.email,
                    user.created_at.to_rfc3339()
                );
            }
            println!("{} user(s)", users.len());
            Ok(())
        }
    }
}

fn keygen() -> Result<()> {
    let key = secrets::generate_key().context("key generation failed")?;
    let pepper = secrets::generate_pepper().context("pepper generation failed")?;

    println!("SEALBOX_KEY={}", hex::encode(key));
    println!("SEALBOX_PEPPER={}", hex::encode(pepper));
    Ok(())
}

fn build_service(cli: &Cli) -> Result<UserService> {
    let Some(key_hex) = cli.key.as_deref() else {
        bail!("missing secret key: pass --key or set SEALBOX_KEY (see `sealbox keygen`)");
    };
    let Some(pepper_hex) = cli.pepper.as_deref() else {
        bail!("missing pepper: pass --pepper or set SEALBOX_PEPPER (see `sealbox keygen`)");
    };

    let key = hex::decode(key_hex).context("key is not valid hex")?;
    let pepper = hex::decode(pepper_hex).context("pepper is not valid hex")?;

    let secrets = Secrets::new(key, pepper).context("invalid secret material")?;
    let crypto = AesGcmCipher::new(secrets).context("cipher construction failed")?;

    let repository = Arc::new(
        SqliteUserRepository::open(&cli.db)
            .with_context(|| format!("cannot open database at {}", cli.db.display()))?,
    );

    Ok(UserService::new(RecordCodec::new(Arc::new(crypto)), repository))
}
