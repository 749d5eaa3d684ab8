//! # Live Map Client Library
//!
//! Client side of the admin panel's live map. The game server publishes a
//! compact, gzip-compressed snapshot of every connected player; this crate
//! turns that payload into the typed [`shared::Snapshot`] the map draws from,
//! once per poll tick.
//!
//! ## Pipeline
//!
//! Each tick runs fetch -> inflate -> decode -> publish to completion before
//! the next one starts:
//!
//! - [`source`] fetches the raw bytes (`PayloadSource`)
//! - [`decompress`] inflates the gzip container into text
//! - [`decoder`] classifies the root layout and expands the single-letter keys
//!   through the tables in [`schema`]
//! - [`store`] swaps the new snapshot in for renderers
//! - [`poller`] drives the above on a timer and absorbs failed ticks
//!
//! Inflation and decoding run on tokio's blocking pool, so a large payload
//! never stalls the task that renders.
//!
//! ## Failure Handling
//!
//! A corrupt payload, unparseable JSON, or an unknown root layout fails only
//! the current tick ([`error::DecodeError`]); the last good snapshot stays on
//! screen. Inside a well-formed payload, bad or missing player fields fall
//! back to defaults instead of dropping the player.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::poller::{Poller, PollerConfig};
//! use client::source::FileSource;
//! use client::store::SnapshotStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(SnapshotStore::new());
//!     let mut renderer_rx = store.subscribe();
//!
//!     tokio::spawn(async move {
//!         while renderer_rx.changed().await.is_ok() {
//!             if let Some(frame) = renderer_rx.borrow_and_update().clone() {
//!                 println!("{} players on the map", frame.snapshot.players.len());
//!             }
//!         }
//!     });
//!
//!     let mut poller = Poller::new(
//!         FileSource::new("snapshot.json.gz"),
//!         store,
//!         PollerConfig::default(),
//!     );
//!     poller.run_until(tokio::signal::ctrl_c()).await;
//! }
//! ```

pub mod decoder;
pub mod decompress;
pub mod error;
pub mod poller;
pub mod schema;
pub mod source;
pub mod store;

pub use decoder::{decode, decode_payload};
pub use error::DecodeError;
