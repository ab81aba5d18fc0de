//! `slots` CLI — generate bookable slots from a scheduling snapshot, and replay
//! billing webhooks into tenant billing state.
//!
//! ## Usage
//!
//! ```sh
//! # Free slots for offering 42 on a Monday, anchored in UTC
//! slots generate --data snapshot.json --offering 42 --date 2026-03-02
//!
//! # Same, with windows anchored to Sao Paulo local midnight and a fetch deadline
//! slots generate -d snapshot.json --offering 42 --date 2026-03-02 \
//!     --timezone America/Sao_Paulo --timeout-ms 500
//!
//! # Snapshot from stdin, result to a file
//! cat snapshot.json | slots generate --offering 42 --date 2026-03-02 -o slots.json
//!
//! # Replay webhook events for tenants 1 and 2
//! slots billing --tenant 1 --tenant 2 -i events.json
//! ```
//!
//! `SLOTS_TIMEZONE` and `SLOTS_FETCH_TIMEOUT_MS` supply defaults for the
//! corresponding flags. Ctrl-C cancels an in-flight generation.

mod logging;

use std::io::{self, Read};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use billing_sync::{parse_batch, SubscriptionLedger, TenantBilling, TenantId};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use serde::Serialize;
use slot_engine::{
    parse_timezone, GeneratorConfig, InMemoryStore, OfferingId, Slot, SlotGenerator,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Bookable slot generation from weekly windows minus booked intervals"
)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the free slots of one offering on one date as JSON
    Generate {
        /// Snapshot JSON with `windows` and `bookings` (reads stdin if omitted)
        #[arg(short, long)]
        data: Option<String>,
        /// Offering to generate slots for
        #[arg(long)]
        offering: u64,
        /// Calendar date, YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// IANA timezone whose local midnight anchors the windows
        #[arg(long)]
        timezone: Option<String>,
        /// Deadline for loading windows and bookings, in milliseconds (0 disables)
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Replay billing webhook events and print the resulting tenant states
    Billing {
        /// JSON array of webhook events (reads stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Tenant to register before replay; repeat for several
        #[arg(long = "tenant", required = true)]
        tenants: Vec<u64>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// A slot as printed: ISO-8601 timestamps in the anchoring timezone.
#[derive(Serialize)]
struct SlotDto {
    starts_at: String,
    ends_at: String,
}

impl SlotDto {
    fn new(slot: &Slot, timezone: Tz) -> Self {
        Self {
            starts_at: slot.starts_at.with_timezone(&timezone).to_rfc3339(),
            ends_at: slot.ends_at.with_timezone(&timezone).to_rfc3339(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    match cli.command {
        Commands::Generate {
            data,
            offering,
            date,
            timezone,
            timeout_ms,
            output,
        } => {
            let mut config = GeneratorConfig::from_env();
            if let Some(raw) = timezone {
                config = config.with_timezone(parse_timezone(&raw)?);
            }
            if let Some(ms) = timeout_ms {
                config = config.with_fetch_timeout((ms > 0).then(|| Duration::from_millis(ms)));
            }

            let snapshot = read_input(data.as_deref())?;
            let slots = generate(&snapshot, OfferingId(offering), &date, config).await?;
            write_output(output.as_deref(), &slots)?;
        }
        Commands::Billing {
            input,
            tenants,
            output,
        } => {
            let events = read_input(input.as_deref())?;
            let report = replay_billing(&events, &tenants)?;
            write_output(output.as_deref(), &report)?;
        }
    }

    Ok(())
}

async fn generate(
    snapshot: &str,
    offering_id: OfferingId,
    date: &str,
    config: GeneratorConfig,
) -> Result<String> {
    let store =
        Arc::new(InMemoryStore::from_json(snapshot).context("Failed to parse snapshot JSON")?);
    let timezone = config.timezone;
    let generator = SlotGenerator::new(store.clone(), store, config);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let slots = generator
        .generate_slots_for_str(offering_id, date, &cancel)
        .await
        .with_context(|| {
            format!("Failed to generate slots for offering {} on {}", offering_id, date)
        })?;

    info!(
        %offering_id,
        date,
        timezone = timezone.name(),
        count = slots.len(),
        "generated slots"
    );

    let dtos: Vec<SlotDto> = slots.iter().map(|slot| SlotDto::new(slot, timezone)).collect();
    serde_json::to_string_pretty(&dtos).context("Failed to serialize slots")
}

fn replay_billing(events: &str, tenants: &[u64]) -> Result<String> {
    let events = parse_batch(events).context("Failed to parse webhook events")?;

    let mut ledger = SubscriptionLedger::new();
    for &tenant_id in tenants {
        ledger.register_tenant(TenantId(tenant_id), None);
    }
    for event in &events {
        ledger.apply(event);
    }

    let report: Vec<&TenantBilling> = ledger.tenants().collect();
    serde_json::to_string_pretty(&report).context("Failed to serialize tenant billing state")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
