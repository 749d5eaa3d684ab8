//! Turns live-map telemetry text into a canonical [`Snapshot`].
//!
//! Two root layouts are accepted. The compact layout (`p`/`d`/`s`) comes from the
//! game server and is expanded through the key tables in [`crate::schema`]. The
//! expanded layout (`players`/`on_duty`/`staff`) comes from older, uncompressed
//! producers and is deserialized as-is. The layout is classified once at the
//! root; a document is never partially expanded.

use crate::decompress::decompress;
use crate::error::{DecodeError, DecodeResult};
use crate::schema::{apply_fields, coerce_int, PLAYER_FIELDS};
use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};
use shared::wire;
use shared::{CharacterId, OnDuty, Player, Snapshot};

/// Root layout of a parsed payload.
#[derive(Debug)]
pub enum WireShape<'a> {
    Compact {
        players: &'a [Value],
        duty: &'a Map<String, Value>,
        staff: &'a [Value],
    },
    Expanded,
}

impl<'a> WireShape<'a> {
    pub fn classify(value: &'a Value) -> DecodeResult<Self> {
        let root = value.as_object().ok_or_else(|| {
            DecodeError::InvalidSnapshotShape("root is not an object".to_string())
        })?;

        let compact = (
            root.get(wire::ROOT_PLAYERS).and_then(Value::as_array),
            root.get(wire::ROOT_DUTY).and_then(Value::as_object),
            root.get(wire::ROOT_STAFF).and_then(Value::as_array),
        );
        if let (Some(players), Some(duty), Some(staff)) = compact {
            return Ok(WireShape::Compact {
                players,
                duty,
                staff,
            });
        }

        let expanded = root.get(wire::EXPANDED_PLAYERS).map_or(false, Value::is_array)
            && root.get(wire::EXPANDED_DUTY).map_or(false, Value::is_object)
            && root.get(wire::EXPANDED_STAFF).map_or(false, Value::is_array);
        if expanded {
            return Ok(WireShape::Expanded);
        }

        Err(DecodeError::InvalidSnapshotShape(
            "expected p/d/s or players/on_duty/staff".to_string(),
        ))
    }
}

/// Decodes already-inflated payload text.
pub fn decode(text: &str) -> DecodeResult<Snapshot> {
    let value: Value = serde_json::from_str(text)?;
    decode_value(&value)
}

pub fn decode_value(value: &Value) -> DecodeResult<Snapshot> {
    match WireShape::classify(value)? {
        WireShape::Compact {
            players,
            duty,
            staff,
        } => Ok(expand(players, duty, staff)),
        WireShape::Expanded => Snapshot::deserialize(value)
            .map_err(|e| DecodeError::InvalidSnapshotShape(e.to_string())),
    }
}

/// Inflates and decodes a raw gzip payload on the blocking pool.
///
/// The caller's task is suspended while the work runs, leaving the executor
/// free for rendering and input.
pub async fn decode_payload(bytes: Vec<u8>, limit: usize) -> DecodeResult<Snapshot> {
    tokio::task::spawn_blocking(move || {
        let text = decompress(&bytes, limit)?;
        decode(&text)
    })
    .await
    .map_err(|e| DecodeError::Worker(e.to_string()))?
}

fn expand(players: &[Value], duty: &Map<String, Value>, staff: &[Value]) -> Snapshot {
    Snapshot {
        players: players.iter().map(expand_player).collect(),
        on_duty: OnDuty {
            police: expand_roster(duty.get(wire::DUTY_POLICE)),
            ems: expand_roster(duty.get(wire::DUTY_EMS)),
        },
        staff: staff.to_vec(),
    }
}

/// A malformed entry still yields a player; its fields fall back to defaults.
pub fn expand_player(value: &Value) -> Player {
    let mut player = Player::default();
    match value {
        Value::Object(object) => apply_fields(&mut player, object, PLAYER_FIELDS),
        other => debug!("Player entry is not an object ({}), using defaults", other),
    }
    player
}

fn expand_roster(roster: Option<&Value>) -> Vec<CharacterId> {
    let Some(entries) = roster.and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let id = entry.get(wire::DUTY_CHARACTER_ID).and_then(coerce_int);
            if id.is_none() {
                debug!("Skipping duty entry without a character id: {}", entry);
            }
            id
        })
        .collect()
}
