//! Key names of the compact telemetry payload published by the game server.
//!
//! The publisher aliases every field to a single letter to keep the per-tick
//! payload small. The letters are reused at each nesting level, so the meaning of
//! a key depends on which object it appears in.

/// Root of the compact payload.
pub const ROOT_PLAYERS: &str = "p";
pub const ROOT_DUTY: &str = "d";
pub const ROOT_STAFF: &str = "s";

/// Inside the duty object.
pub const DUTY_POLICE: &str = "p";
pub const DUTY_EMS: &str = "e";
/// Inside each duty roster entry.
pub const DUTY_CHARACTER_ID: &str = "c";

/// Root of the already-expanded payload emitted by uncompressed producers.
pub const EXPANDED_PLAYERS: &str = "players";
pub const EXPANDED_DUTY: &str = "on_duty";
pub const EXPANDED_STAFF: &str = "staff";

pub mod player {
    pub const AFK: &str = "a";
    pub const CHARACTER: &str = "b";
    pub const POSITION: &str = "c";
    pub const FLAGS: &str = "d";
    pub const INVISIBLE_SINCE: &str = "e";
    pub const NAME: &str = "f";
    pub const SOURCE: &str = "g";
    pub const STEAM_IDENTIFIER: &str = "h";
    pub const VEHICLE: &str = "i";
    pub const INSTANCE: &str = "j";
}

pub mod character {
    pub const FLAGS: &str = "a";
    pub const FULL_NAME: &str = "b";
    pub const ID: &str = "c";
}

pub mod vehicle {
    pub const DRIVING: &str = "a";
    pub const ID: &str = "b";
    pub const MODEL: &str = "c";
    pub const NAME: &str = "d";
}

/// Separator of the packed `x,y,z,heading,speed` position string.
pub const POSITION_DELIMITER: char = ',';

/// Minimum component counts for each part of the position string to count as present.
pub const POSITION_MIN_COORDS: usize = 3;
pub const POSITION_MIN_HEADING: usize = 4;
pub const POSITION_MIN_SPEED: usize = 5;
