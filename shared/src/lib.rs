use serde::{Deserialize, Serialize};

pub mod wire;

/// Character ids as they appear in duty rosters and on players.
pub type CharacterId = i64;

/// Staff entries are opaque to the map and kept exactly as the publisher sent them.
pub type StaffEntry = serde_json::Value;

/// One fully-decoded, point-in-time view of every connected player.
///
/// A snapshot is rebuilt from scratch on every poll tick and handed out behind an
/// `Arc`; it is never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub players: Vec<Player>,
    pub on_duty: OnDuty,
    pub staff: Vec<StaffEntry>,
}

impl Snapshot {
    pub fn player_by_source(&self, source: i64) -> Option<&Player> {
        self.players.iter().find(|player| player.source == source)
    }

    pub fn is_police(&self, id: CharacterId) -> bool {
        self.on_duty.police.contains(&id)
    }

    pub fn is_ems(&self, id: CharacterId) -> bool {
        self.on_duty.ems.contains(&id)
    }
}

/// Duty rosters. Ids are not required to belong to a connected player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnDuty {
    #[serde(default)]
    pub police: Vec<CharacterId>,
    #[serde(default)]
    pub ems: Vec<CharacterId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Player {
    pub afk: i64,
    #[serde(with = "presence")]
    pub character: Option<Character>,
    pub coords: Coordinates,
    pub heading: f64,
    pub flags: i64,
    pub invisible_since: i64,
    pub name: String,
    pub source: i64,
    pub speed: f64,
    #[serde(rename = "steamIdentifier")]
    pub steam_identifier: String,
    #[serde(with = "presence")]
    pub vehicle: Option<Vehicle>,
    pub instance: i64,
}

impl Player {
    pub fn character_id(&self) -> Option<CharacterId> {
        self.character.as_ref().map(|character| character.id)
    }

    /// True only when the player sits in a vehicle's driver seat.
    pub fn is_driving(&self) -> bool {
        self.vehicle.as_ref().map_or(false, |vehicle| vehicle.driving)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    pub flags: i64,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub id: CharacterId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vehicle {
    pub driving: bool,
    pub id: i64,
    pub model: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coordinates {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Optional substructures travel as an object when present and as `false` when absent.
mod presence {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_bool(false),
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Slot<T> {
        Present(T),
        Flag(bool),
        Null,
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        match Slot::deserialize(deserializer)? {
            Slot::Present(inner) => Ok(Some(inner)),
            Slot::Flag(false) | Slot::Null => Ok(None),
            Slot::Flag(true) => Err(D::Error::custom(
                "expected an object or `false`, found `true`",
            )),
        }
    }
}
