//! Declarative mapping from the compact wire keys onto the canonical model.
//!
//! Each table row names one wire key, the model field it feeds, and how to apply
//! a wire value to that field. A row only writes when the value has a usable
//! type; otherwise the target keeps its `Default` value. Keys without a row are
//! ignored so newer publishers can add fields freely.

use serde_json::{Map, Value};
use shared::wire::{self, POSITION_DELIMITER, POSITION_MIN_COORDS, POSITION_MIN_HEADING, POSITION_MIN_SPEED};
use shared::{Character, Coordinates, Player, Vehicle};

pub struct WireField<T> {
    pub key: &'static str,
    pub field: &'static str,
    pub apply: fn(&mut T, &Value),
}

impl<T> WireField<T> {
    const fn new(key: &'static str, field: &'static str, apply: fn(&mut T, &Value)) -> Self {
        Self { key, field, apply }
    }
}

pub const PLAYER_FIELDS: &[WireField<Player>] = &[
    WireField::new(wire::player::AFK, "afk", |p, v| set_int(&mut p.afk, v)),
    WireField::new(wire::player::CHARACTER, "character", |p, v| {
        p.character = Some(expand_object(v, CHARACTER_FIELDS));
    }),
    WireField::new(wire::player::POSITION, "coords", |p, v| {
        if let Some(text) = v.as_str() {
            let (coords, heading, speed) = parse_position(text);
            p.coords = coords;
            p.heading = heading;
            p.speed = speed;
        }
    }),
    WireField::new(wire::player::FLAGS, "flags", |p, v| set_int(&mut p.flags, v)),
    WireField::new(wire::player::INVISIBLE_SINCE, "invisible_since", |p, v| {
        set_int(&mut p.invisible_since, v)
    }),
    WireField::new(wire::player::NAME, "name", |p, v| set_text(&mut p.name, v)),
    WireField::new(wire::player::SOURCE, "source", |p, v| set_int(&mut p.source, v)),
    WireField::new(wire::player::STEAM_IDENTIFIER, "steam_identifier", |p, v| {
        set_text(&mut p.steam_identifier, v)
    }),
    WireField::new(wire::player::VEHICLE, "vehicle", |p, v| {
        p.vehicle = Some(expand_object(v, VEHICLE_FIELDS));
    }),
    WireField::new(wire::player::INSTANCE, "instance", |p, v| set_int(&mut p.instance, v)),
];

pub const CHARACTER_FIELDS: &[WireField<Character>] = &[
    WireField::new(wire::character::FLAGS, "flags", |c, v| set_int(&mut c.flags, v)),
    WireField::new(wire::character::FULL_NAME, "full_name", |c, v| {
        set_text(&mut c.full_name, v)
    }),
    WireField::new(wire::character::ID, "id", |c, v| set_int(&mut c.id, v)),
];

pub const VEHICLE_FIELDS: &[WireField<Vehicle>] = &[
    WireField::new(wire::vehicle::DRIVING, "driving", |c, v| set_flag(&mut c.driving, v)),
    WireField::new(wire::vehicle::ID, "id", |c, v| set_int(&mut c.id, v)),
    WireField::new(wire::vehicle::MODEL, "model", |c, v| set_text(&mut c.model, v)),
    WireField::new(wire::vehicle::NAME, "name", |c, v| set_text(&mut c.name, v)),
];

/// Builds a `T` from a wire object using `table`.
///
/// Anything that is not an object yields `T::default()`; a present key always
/// produces a fully populated value.
pub fn expand_object<T: Default>(value: &Value, table: &[WireField<T>]) -> T {
    let mut target = T::default();
    if let Value::Object(object) = value {
        apply_fields(&mut target, object, table);
    }
    target
}

pub fn apply_fields<T>(target: &mut T, object: &Map<String, Value>, table: &[WireField<T>]) {
    for row in table {
        if let Some(value) = object.get(row.key) {
            (row.apply)(target, value);
        }
    }
}

/// Splits a packed `x,y,z,heading,speed` string.
///
/// Coordinates need at least three components, heading four and speed five.
/// Unparseable components read as zero so the player still gets a marker.
pub fn parse_position(text: &str) -> (Coordinates, f64, f64) {
    let parts: Vec<&str> = text.split(POSITION_DELIMITER).collect();
    let component = |index: usize| parts.get(index).map_or(0.0, |part| parse_float(part));

    let coords = if parts.len() >= POSITION_MIN_COORDS {
        Coordinates::new(component(0), component(1), component(2))
    } else {
        Coordinates::default()
    };
    let heading = if parts.len() >= POSITION_MIN_HEADING {
        component(3)
    } else {
        0.0
    };
    let speed = if parts.len() >= POSITION_MIN_SPEED {
        component(4)
    } else {
        0.0
    };

    (coords, heading, speed)
}

fn parse_float(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Reads an integer, accepting integral floats that fit in `i64`.
pub fn coerce_int(value: &Value) -> Option<i64> {
    if let Some(int) = value.as_i64() {
        return Some(int);
    }
    // u64 values above i64::MAX also land here as floats.
    let float = value.as_f64()?;
    let in_range = float >= i64::MIN as f64 && float < i64::MAX as f64;
    (float.is_finite() && float.fract() == 0.0 && in_range).then(|| float as i64)
}

fn set_int(slot: &mut i64, value: &Value) {
    if let Some(int) = coerce_int(value) {
        *slot = int;
    }
}

fn set_text(slot: &mut String, value: &Value) {
    match value {
        Value::String(text) => *slot = text.clone(),
        Value::Number(number) => *slot = number.to_string(),
        _ => {}
    }
}

fn set_flag(slot: &mut bool, value: &Value) {
    match value {
        Value::Bool(flag) => *slot = *flag,
        Value::Number(number) => *slot = number.as_f64().map_or(false, |n| n != 0.0),
        _ => {}
    }
}
