use crate::pitch::Location;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

pub const PASS: u32 = 30;
pub const SHOT: u32 = 16;
pub const SUBSTITUTION: u32 = 19;
pub const STARTING_XI: u32 = 35;
pub const TACTICAL_SHIFT: u32 = 36;

/// A player id as a string key.
///
/// Source files carry numeric ids, but every table in this crate joins on the string form so that
/// ids read from different places always compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl From<u64> for PlayerId {
    fn from(id: u64) -> PlayerId {
        PlayerId(id.to_string())
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> PlayerId {
        PlayerId(id.trim().to_owned())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PlayerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<PlayerId, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(u64),
            Str(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(id) => PlayerId::from(id),
            Raw::Str(id) => PlayerId::from(id.as_str()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TypeRef {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TeamRef {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlayerRef {
    pub id: PlayerId,
    pub name: String,
}

/// One on-ball or off-ball action from a match event file.
///
/// Only `id`, `index` and `type` are required. Everything else defaults to absent so a record
/// missing a key it would normally carry still takes part in aggregation.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub index: u32,
    #[serde(default)]
    pub period: u8,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub minute: u16,
    #[serde(default)]
    pub second: u8,
    #[serde(rename = "type")]
    pub kind: TypeRef,
    #[serde(default)]
    pub possession: Option<u32>,
    #[serde(default)]
    pub possession_team: Option<TeamRef>,
    #[serde(default)]
    pub play_pattern: Option<TypeRef>,
    #[serde(default)]
    pub team: Option<TeamRef>,
    #[serde(default)]
    pub player: Option<PlayerRef>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub tactics: Option<Tactics>,
    #[serde(default)]
    pub pass: Option<Pass>,
    #[serde(default)]
    pub shot: Option<Shot>,
    #[serde(default)]
    pub substitution: Option<Substitution>,
}

impl Event {
    pub fn is_type(&self, type_id: u32) -> bool {
        self.kind.id == type_id
    }

    pub fn team_id(&self) -> Option<u32> {
        self.team.as_ref().map(|team| team.id)
    }

    pub fn possession_team_id(&self) -> Option<u32> {
        self.possession_team.as_ref().map(|team| team.id)
    }

    pub fn player_id(&self) -> Option<&PlayerId> {
        self.player.as_ref().map(|player| &player.id)
    }

    pub fn lineup(&self) -> Option<&[LineupEntry]> {
        match &self.tactics {
            Some(tactics) if !tactics.lineup.is_empty() => Some(&tactics.lineup),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tactics {
    #[serde(default)]
    pub formation: Option<u32>,
    #[serde(default)]
    pub lineup: Vec<LineupEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineupEntry {
    pub player: PlayerRef,
    #[serde(default)]
    pub position: Option<TypeRef>,
    #[serde(default)]
    pub jersey_number: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pass {
    #[serde(default)]
    pub recipient: Option<PlayerRef>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub angle: Option<f64>,
    #[serde(default)]
    pub height: Option<TypeRef>,
    #[serde(default)]
    pub end_location: Option<Location>,
    #[serde(default)]
    pub outcome: Option<TypeRef>,
    #[serde(default)]
    pub body_part: Option<TypeRef>,
    #[serde(default)]
    pub technique: Option<TypeRef>,
    #[serde(default)]
    pub cross: Option<bool>,
}

impl Pass {
    /// A pass is unsuccessful when it has no recipient or is marked "Incomplete".
    pub fn is_complete(&self) -> bool {
        self.recipient.is_some()
            && self.outcome.as_ref().map_or(true, |outcome| outcome.name != "Incomplete")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Shot {
    #[serde(default)]
    pub end_location: Option<Location>,
    #[serde(default)]
    pub statsbomb_xg: Option<f64>,
    #[serde(default)]
    pub outcome: Option<TypeRef>,
    #[serde(default)]
    pub technique: Option<TypeRef>,
    #[serde(default)]
    pub body_part: Option<TypeRef>,
    #[serde(default, rename = "type")]
    pub kind: Option<TypeRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Substitution {
    #[serde(default)]
    pub replacement: Option<PlayerRef>,
}
