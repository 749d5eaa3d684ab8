use clap::Parser;
use client::decoder::{decode, decode_payload};
use client::decompress::DEFAULT_MAX_DECOMPRESSED_BYTES;
use client::poller::{PayloadFormat, Poller, PollerConfig};
use client::source::{FileSource, PayloadSource};
use client::store::SnapshotStore;
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Payload file to read on every tick
    #[arg(short = 'p', long)]
    payload: String,

    /// Poll interval in milliseconds
    #[arg(short = 'i', long, default_value = "1000")]
    interval_ms: u64,

    /// Upper bound on the inflated payload size
    #[arg(long, default_value_t = DEFAULT_MAX_DECOMPRESSED_BYTES)]
    max_payload_bytes: usize,

    /// Decode the payload once and print the expanded snapshot as JSON
    #[arg(long)]
    once: bool,

    /// Payload is already-inflated JSON text rather than gzip
    #[arg(long)]
    text: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();
    let mut source = FileSource::new(&args.payload);

    if args.once {
        let bytes = source.fetch().await?;
        let snapshot = if args.text {
            decode(&String::from_utf8(bytes)?)?
        } else {
            decode_payload(bytes, args.max_payload_bytes).await?
        };
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let config = PollerConfig {
        interval: Duration::from_millis(args.interval_ms.max(1)),
        max_payload_bytes: args.max_payload_bytes,
        format: if args.text {
            PayloadFormat::Text
        } else {
            PayloadFormat::Gzip
        },
    };

    info!("Starting live map poller...");
    info!("Reading payloads from: {}", source.path().display());

    let store = Arc::new(SnapshotStore::new());
    let mut frames = store.subscribe();

    let watcher = tokio::spawn(async move {
        while frames.changed().await.is_ok() {
            let Some(frame) = frames.borrow_and_update().clone() else {
                continue;
            };
            let snapshot = &frame.snapshot;
            info!(
                "Snapshot #{}: {} players ({} driving), {} police, {} ems, {} staff",
                frame.sequence,
                snapshot.players.len(),
                snapshot.players.iter().filter(|p| p.is_driving()).count(),
                snapshot.on_duty.police.len(),
                snapshot.on_duty.ems.len(),
                snapshot.staff.len()
            );
        }
    });

    let mut poller = Poller::new(source, Arc::clone(&store), config);
    poller
        .run_until(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => println!("Received Ctrl+C, shutting down gracefully..."),
                Err(e) => {
                    error!("Failed to listen for Ctrl+C, polling until killed: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        })
        .await;

    watcher.abort();
    Ok(())
}
