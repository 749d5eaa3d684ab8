//! Poll loop driving fetch -> inflate -> decode -> publish once per tick.
//!
//! Ticks never overlap: the next fetch is only issued after the previous
//! pipeline has settled, so snapshots are published strictly in tick order.
//! A failed tick is logged and skipped; the store keeps the last good frame.

use crate::decoder::{decode, decode_payload};
use crate::decompress::DEFAULT_MAX_DECOMPRESSED_BYTES;
use crate::error::DecodeError;
use crate::source::PayloadSource;
use crate::store::SnapshotStore;
use log::{debug, error, info, warn};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

/// Consecutive failed ticks after which failures are reported as errors.
const FAILURE_ESCALATION_THRESHOLD: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    /// Gzip-compressed text, as sent by the game server.
    Gzip,
    /// Text that has already been inflated.
    Text,
}

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub interval: Duration,
    pub max_payload_bytes: usize,
    pub format: PayloadFormat,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
            max_payload_bytes: DEFAULT_MAX_DECOMPRESSED_BYTES,
            format: PayloadFormat::Gzip,
        }
    }
}

#[derive(Debug)]
pub enum TickOutcome {
    Published { sequence: u64, players: usize },
    FetchFailed(std::io::Error),
    DecodeFailed(DecodeError),
    /// The store already held a newer frame.
    Stale { sequence: u64 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollStats {
    pub ticks: u64,
    pub published: u64,
    pub fetch_failures: u64,
    pub decode_failures: u64,
    pub consecutive_failures: u64,
}

pub struct Poller<S> {
    source: S,
    store: Arc<SnapshotStore>,
    config: PollerConfig,
    sequence: u64,
    stats: PollStats,
}

impl<S: PayloadSource> Poller<S> {
    pub fn new(source: S, store: Arc<SnapshotStore>, config: PollerConfig) -> Self {
        Self {
            source,
            store,
            config,
            sequence: 0,
            stats: PollStats::default(),
        }
    }

    pub fn stats(&self) -> &PollStats {
        &self.stats
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Runs a single pipeline to completion.
    pub async fn poll_once(&mut self) -> TickOutcome {
        self.sequence += 1;
        self.stats.ticks += 1;
        let sequence = self.sequence;

        let bytes = match self.source.fetch().await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.stats.fetch_failures += 1;
                self.record_failure(&format!("fetch failed: {}", e));
                return TickOutcome::FetchFailed(e);
            }
        };
        debug!("Tick {}: fetched {} bytes", sequence, bytes.len());

        let decoded = match self.config.format {
            PayloadFormat::Gzip => decode_payload(bytes, self.config.max_payload_bytes).await,
            PayloadFormat::Text => decode_text(bytes).await,
        };

        let snapshot = match decoded {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.stats.decode_failures += 1;
                self.record_failure(&format!("decode failed: {}", e));
                return TickOutcome::DecodeFailed(e);
            }
        };

        let players = snapshot.players.len();
        if !self.store.publish(sequence, snapshot) {
            debug!("Tick {}: store holds a newer frame, dropping", sequence);
            return TickOutcome::Stale { sequence };
        }

        if self.stats.consecutive_failures > 0 {
            info!(
                "Recovered after {} failed tick(s)",
                self.stats.consecutive_failures
            );
        }
        self.stats.consecutive_failures = 0;
        self.stats.published += 1;
        debug!("Tick {}: published {} players", sequence, players);

        TickOutcome::Published { sequence, players }
    }

    /// Polls on the configured interval until `shutdown` resolves.
    ///
    /// A tick that fires while a pipeline is still running is skipped rather
    /// than queued. Shutdown is only observed between ticks, so it waits for
    /// the pipeline in flight to settle.
    pub async fn run_until<F>(&mut self, shutdown: F) -> PollStats
    where
        F: Future,
    {
        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "Polling every {}ms (format: {:?})",
            self.config.interval.as_millis(),
            self.config.format
        );

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    self.poll_once().await;
                }
            }
        }

        info!(
            "Polling stopped: {} ticks, {} published, {} fetch failures, {} decode failures",
            self.stats.ticks,
            self.stats.published,
            self.stats.fetch_failures,
            self.stats.decode_failures
        );
        self.stats.clone()
    }

    fn record_failure(&mut self, reason: &str) {
        self.stats.consecutive_failures += 1;
        let failures = self.stats.consecutive_failures;
        if failures >= FAILURE_ESCALATION_THRESHOLD {
            error!(
                "Tick {}: {} ({} consecutive failures, map is stale)",
                self.sequence, reason, failures
            );
        } else {
            warn!("Tick {}: {}, keeping last snapshot", self.sequence, reason);
        }
    }
}

async fn decode_text(bytes: Vec<u8>) -> Result<shared::Snapshot, DecodeError> {
    tokio::task::spawn_blocking(move || {
        let text = String::from_utf8(bytes)
            .map_err(|e| DecodeError::CorruptPayload(format!("payload is not utf-8: {}", e)))?;
        decode(&text)
    })
    .await
    .map_err(|e| DecodeError::Worker(e.to_string()))?
}
