use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const PITCH_LENGTH: f64 = 120.0;
pub const PITCH_WIDTH: f64 = 80.0;

/// A point on the pitch, in pitch units: `x` runs 0..=120 along its length, `y` 0..=80 across.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    pub fn new(x: f64, y: f64) -> Location {
        Location { x, y }
    }

    pub fn distance(self, other: Location) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Direction of travel towards `other`, in radians, measured the same way the event files
    /// measure pass angles.
    pub fn angle_to(self, other: Location) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    pub fn is_on_pitch(self) -> bool {
        (0.0..=PITCH_LENGTH).contains(&self.x) && (0.0..=PITCH_WIDTH).contains(&self.y)
    }
}

// Locations are stored as `[x, y]`, or `[x, y, z]` for shot end locations; the height is dropped.
impl<'de> Deserialize<'de> for Location {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Location, D::Error> {
        struct LocationVisitor;

        impl<'de> Visitor<'de> for LocationVisitor {
            type Value = Location;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an array of two or three coordinates")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Location, A::Error> {
                let x = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let y = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                while seq.next_element::<de::IgnoredAny>()?.is_some() {}
                Ok(Location::new(x, y))
            }
        }

        deserializer.deserialize_seq(LocationVisitor)
    }
}
