//! CardSnap Vault - local vault management CLI
//!
//! Each invocation opens the vault fresh, optionally unlocks it with the
//! supplied PIN for the duration of the command, and exits. The duress
//! PIN works here exactly as in the app: the command sees the decoy view
//! and nothing on disk changes.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cardsnap_core::{mask_card_number, CardCategory};
use cardsnap_vault::{FileBlobStore, SessionState, SystemClock, VaultController};

/// CardSnap Vault - encrypted card vault with duress protection
#[derive(Parser)]
#[command(name = "cardsnap-vault")]
#[command(about = "PIN-protected encrypted card vault")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to vault storage
    #[arg(long, default_value = "./cardsnap_data")]
    data_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the vault storage directory
    Init,

    /// Show vault status
    Status,

    /// List cards in the active vault view
    List {
        /// PIN to unlock with
        #[arg(long)]
        pin: String,

        /// Filter by category
        #[arg(long)]
        category: Option<String>,

        /// Case-insensitive text filter
        #[arg(long, default_value = "")]
        query: String,
    },

    /// Record one use of a card
    Use {
        /// PIN to unlock with
        #[arg(long)]
        pin: String,

        /// Card ID
        #[arg(long)]
        id: uuid::Uuid,
    },

    /// Delete a card
    Delete {
        /// PIN to unlock with
        #[arg(long)]
        pin: String,

        /// Card ID
        #[arg(long)]
        id: uuid::Uuid,
    },

    /// Show the audit trail
    Audit {
        /// PIN to unlock with
        #[arg(long)]
        pin: String,
    },

    /// Change the vault PINs
    SetPins {
        /// Current PIN (real sessions only)
        #[arg(long)]
        pin: String,

        /// New main PIN (4 digits)
        #[arg(long)]
        real: String,

        /// New duress PIN (4 digits)
        #[arg(long)]
        duress: String,
    },

    /// Permanently erase all vault data
    Wipe {
        /// Required confirmation flag
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cardsnap_vault=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let blobs = FileBlobStore::new(cli.data_dir.clone())?;
    let mut vault = VaultController::new(blobs, SystemClock)?;

    match cli.command {
        Commands::Init => {
            // Construction above already provisioned the device key and defaults
            info!("Vault storage ready at {:?}", cli.data_dir);
            println!("Vault initialized. Default PINs are active; change them with set-pins.");
        }

        Commands::Status => {
            let status = vault.status();
            println!("\n=== Vault Status ===\n");
            println!(
                "State:      {}",
                match status.state {
                    SessionState::Locked { by_timer: true } => "locked (auto)",
                    SessionState::Locked { by_timer: false } => "locked",
                    SessionState::Unlocked { .. } => "unlocked",
                }
            );
            println!("Premium:    {}", status.is_premium);
            println!("Scans used: {}", status.scan_count);
            println!("Audit log:  {} entries", status.audit_len);
        }

        Commands::List {
            pin,
            category,
            query,
        } => {
            unlock_or_exit(&mut vault, &pin)?;
            let category = category
                .as_deref()
                .map(parse_category)
                .transpose()
                .map_err(|c| anyhow::anyhow!("unknown category: {}", c))?;

            let store = vault.cards()?;
            let cards = store.filtered(category, &query);
            if cards.is_empty() {
                println!("No cards.");
                return Ok(());
            }

            println!("\n=== Cards ===\n");
            for card in cards {
                println!(
                    "{} | {} | {} | {} | {} uses",
                    card.id,
                    card.category.label(),
                    card.issuer,
                    mask_card_number(&card.number),
                    card.usage_count
                );
            }
        }

        Commands::Use { pin, id } => {
            unlock_or_exit(&mut vault, &pin)?;
            let count = vault.use_card(id)?;
            println!("Card {} now at {} uses.", id, count);
        }

        Commands::Delete { pin, id } => {
            unlock_or_exit(&mut vault, &pin)?;
            vault.delete_card(id)?;
            println!("Card {} deleted.", id);
        }

        Commands::Audit { pin } => {
            unlock_or_exit(&mut vault, &pin)?;
            let records = vault.audit_log();
            if records.is_empty() {
                println!("Audit log is empty.");
                return Ok(());
            }

            println!("\n=== Audit Trail ===\n");
            for record in records {
                println!(
                    "{} | {} | {}",
                    chrono::DateTime::from_timestamp_millis(record.timestamp as i64)
                        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    record.event,
                    record.details
                );
            }
        }

        Commands::SetPins { pin, real, duress } => {
            unlock_or_exit(&mut vault, &pin)?;
            let mut settings = vault.security_settings().clone();
            settings.real_pin = real;
            settings.duress_pin = duress;
            vault.update_security_config(settings)?;
            println!("PINs updated.");
        }

        Commands::Wipe { yes } => {
            if !yes {
                error!("Refusing to wipe without --yes");
                return Ok(());
            }
            vault.wipe();
            warn!("All vault data has been erased");
            println!("Vault wiped.");
        }
    }

    Ok(())
}

fn unlock_or_exit<S, C>(vault: &mut VaultController<S, C>, pin: &str) -> anyhow::Result<()>
where
    S: cardsnap_vault::BlobStore,
    C: cardsnap_vault::Clock,
{
    let outcome = vault.submit_pin(pin);
    if outcome.ok {
        return Ok(());
    }
    if outcome.wiped {
        anyhow::bail!("too many failed attempts; vault data has been erased");
    }
    anyhow::bail!(
        "incorrect PIN ({} attempts remaining)",
        outcome.remaining_attempts.unwrap_or(0)
    )
}

fn parse_category(s: &str) -> Result<CardCategory, String> {
    let lower = s.to_lowercase();
    CardCategory::ALL
        .iter()
        .copied()
        .find(|c| c.label().to_lowercase().starts_with(&lower))
        .ok_or_else(|| s.to_string())
}
