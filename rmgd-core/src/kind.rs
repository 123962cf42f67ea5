use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The two catalogs kept by the database.
///
/// Centralizes collection names, display names and the suggested category
/// lists so commands don't match on raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Games,
    Devices,
}

const ALL_KINDS: &[RecordKind] = &[RecordKind::Games, RecordKind::Devices];

const GAME_CATEGORIES: &[&str] = &[
    "action",
    "adventure",
    "arcade",
    "puzzle",
    "racing",
    "rpg",
    "sports",
    "strategy",
    "shooter",
    "platformer",
    "other",
];

const DEVICE_CATEGORIES: &[&str] = &[
    "handheld",
    "mobile_phone",
    "pda",
    "lcd_game",
    "console",
    "accessory",
    "other",
];

impl RecordKind {
    /// Collection name used by the record store and REST paths.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Games => "games",
            Self::Devices => "devices",
        }
    }

    /// Singular display name ("Game", "Device").
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Games => "Game",
            Self::Devices => "Device",
        }
    }

    /// Folder used for uploaded images of this kind.
    pub fn image_folder(&self) -> &'static str {
        match self {
            Self::Games => "game-images",
            Self::Devices => "device-images",
        }
    }

    /// Suggested values for the `category` field. Free text is still accepted.
    pub fn suggested_categories(&self) -> &'static [&'static str] {
        match self {
            Self::Games => GAME_CATEGORIES,
            Self::Devices => DEVICE_CATEGORIES,
        }
    }

    /// Lowercase aliases accepted when parsing.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Games => &["game", "games", "g"],
            Self::Devices => &["device", "devices", "hardware", "d"],
        }
    }

    pub fn all() -> &'static [RecordKind] {
        ALL_KINDS
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.collection())
    }
}

/// Error returned when a string is not a known record kind.
#[derive(Debug, Clone, Error)]
#[error("unknown record kind: '{0}' (expected games or devices)")]
pub struct KindParseError(pub String);

impl std::str::FromStr for RecordKind {
    type Err = KindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ALL_KINDS
            .iter()
            .copied()
            .find(|kind| kind.aliases().contains(&lower.as_str()))
            .ok_or_else(|| KindParseError(s.to_string()))
    }
}
