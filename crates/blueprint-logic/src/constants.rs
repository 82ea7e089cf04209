//! Layout constants: room types, adjacency weight bands, and per-type tables.
//!
//! Room types travel through the input/output contract as lowercase strings
//! (`"living room"`). Known types get their own variant; anything else is kept
//! verbatim in [`RoomType::Other`] and falls back to the default table rows.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of room. Serializes as its display string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoomType {
    Bedroom,
    MasterBedroom,
    Bathroom,
    Kitchen,
    LivingRoom,
    DiningRoom,
    Garage,
    LaundryRoom,
    Entryway,
    Hallway,
    Other(String),
}

impl RoomType {
    pub fn as_str(&self) -> &str {
        match self {
            RoomType::Bedroom => "bedroom",
            RoomType::MasterBedroom => "master bedroom",
            RoomType::Bathroom => "bathroom",
            RoomType::Kitchen => "kitchen",
            RoomType::LivingRoom => "living room",
            RoomType::DiningRoom => "dining room",
            RoomType::Garage => "garage",
            RoomType::LaundryRoom => "laundry room",
            RoomType::Entryway => "entryway",
            RoomType::Hallway => "hallway",
            RoomType::Other(name) => name,
        }
    }

    /// Bedrooms and master bedrooms share the forced living-room pairing.
    pub fn is_bedroom(&self) -> bool {
        matches!(self, RoomType::Bedroom | RoomType::MasterBedroom)
    }

    /// Default `(width, height)` in grid cells before area scaling.
    pub fn default_dimensions(&self) -> (usize, usize) {
        match self {
            RoomType::Bedroom => (4, 4),
            RoomType::Bathroom => (2, 3),
            RoomType::Kitchen => (4, 3),
            RoomType::LivingRoom => (5, 5),
            RoomType::DiningRoom => (4, 4),
            RoomType::Garage => (5, 5),
            RoomType::LaundryRoom => (2, 2),
            RoomType::Entryway => (3, 3),
            _ => (3, 3),
        }
    }

    /// Placement importance. Added to the room's cell count to get its
    /// position in the placement order.
    pub fn importance(&self) -> u32 {
        match self {
            RoomType::LivingRoom => 100,
            RoomType::Kitchen => 90,
            RoomType::Hallway => 88,
            RoomType::MasterBedroom => 85,
            RoomType::Bedroom => 80,
            RoomType::DiningRoom => 75,
            RoomType::Bathroom => 50,
            _ => 0,
        }
    }

    /// Fill color used by the labeled renderer.
    pub fn color(&self) -> &'static str {
        match self {
            RoomType::Bedroom => "#C5D8FF",
            RoomType::Bathroom => "#AEE1FF",
            RoomType::Kitchen => "#FFCBA4",
            RoomType::LivingRoom => "#D7FFD7",
            RoomType::DiningRoom => "#FFD7D7",
            RoomType::Garage => "#DADADA",
            RoomType::LaundryRoom => "#D4F0F0",
            RoomType::Entryway => "#FFE4B5",
            _ => "#FFFFFF",
        }
    }
}

impl From<&str> for RoomType {
    fn from(s: &str) -> Self {
        match s {
            "bedroom" => RoomType::Bedroom,
            "master bedroom" => RoomType::MasterBedroom,
            "bathroom" => RoomType::Bathroom,
            "kitchen" => RoomType::Kitchen,
            "living room" => RoomType::LivingRoom,
            "dining room" => RoomType::DiningRoom,
            "garage" => RoomType::Garage,
            "laundry room" => RoomType::LaundryRoom,
            "entryway" => RoomType::Entryway,
            "hallway" => RoomType::Hallway,
            other => RoomType::Other(other.to_string()),
        }
    }
}

impl From<String> for RoomType {
    fn from(s: String) -> Self {
        RoomType::from(s.as_str())
    }
}

impl From<RoomType> for String {
    fn from(t: RoomType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Adjacency edge weights. Each band has a fixed meaning; higher bands
/// override lower ones for the same room pair.
pub mod weights {
    /// Bedroom/master bedroom ↔ living room, hallway ↔ living room.
    pub const FORCED: u32 = 20;
    /// Hallway ↔ bedroom, added only when the pair has no edge yet.
    pub const FORCED_SECONDARY: u32 = 15;
    /// Explicit user request.
    pub const REQUESTED: u32 = 10;
    /// Common architectural pattern.
    pub const COMMON: u32 = 5;
    /// Connectivity repair.
    pub const REPAIR: u32 = 1;
}

/// Common-pattern pairs, connected at [`weights::COMMON`] when no edge exists.
pub const COMMON_ADJACENCIES: [(RoomType, RoomType); 5] = [
    (RoomType::Bedroom, RoomType::Bathroom),
    (RoomType::Kitchen, RoomType::DiningRoom),
    (RoomType::LivingRoom, RoomType::DiningRoom),
    (RoomType::Entryway, RoomType::LivingRoom),
    (RoomType::Garage, RoomType::Kitchen),
];

/// Grid cell values.
pub mod cells {
    pub const EMPTY: i32 = 0;
    pub const DOORWAY: i32 = -1;

    /// Cell value for a room id (`id + 1`).
    pub const fn room_value(room_id: usize) -> i32 {
        room_id as i32 + 1
    }
}
