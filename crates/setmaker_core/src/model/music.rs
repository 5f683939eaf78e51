//! Musical key and tonality value types for songs.

use crate::model::validation::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-G])([#b]?)$").expect("valid musical key regex"));

/// One of the twelve pitch classes, spelled with sharps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MusicalKey {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl MusicalKey {
    const BY_SEMITONE: [MusicalKey; 12] = [
        Self::C,
        Self::CSharp,
        Self::D,
        Self::DSharp,
        Self::E,
        Self::F,
        Self::FSharp,
        Self::G,
        Self::GSharp,
        Self::A,
        Self::ASharp,
        Self::B,
    ];

    /// Canonical spelling (`C`, `C#`, ... `B`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::C => "C",
            Self::CSharp => "C#",
            Self::D => "D",
            Self::DSharp => "D#",
            Self::E => "E",
            Self::F => "F",
            Self::FSharp => "F#",
            Self::G => "G",
            Self::GSharp => "G#",
            Self::A => "A",
            Self::ASharp => "A#",
            Self::B => "B",
        }
    }
}

impl FromStr for MusicalKey {
    type Err = ValidationError;

    /// Accepts sharp or flat spellings; `E#`, `B#`, `Fb` and `Cb` are rejected.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidKey(value.to_string());
        let captures = KEY_RE.captures(value.trim()).ok_or_else(invalid)?;

        let natural: i32 = match &captures[1] {
            "C" => 0,
            "D" => 2,
            "E" => 4,
            "F" => 5,
            "G" => 7,
            "A" => 9,
            "B" => 11,
            _ => return Err(invalid()),
        };
        let semitone = match (natural, &captures[2]) {
            (4 | 11, "#") | (0 | 5, "b") => return Err(invalid()),
            (n, "#") => n + 1,
            (n, "b") => n - 1,
            (n, _) => n,
        };

        Ok(Self::BY_SEMITONE[semitone.rem_euclid(12) as usize])
    }
}

impl Display for MusicalKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for MusicalKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MusicalKey> for String {
    fn from(value: MusicalKey) -> Self {
        value.as_str().to_string()
    }
}

/// Major or minor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tonality {
    Major,
    Minor,
}

impl Tonality {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
        }
    }
}

impl FromStr for Tonality {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            _ => Err(ValidationError::InvalidTonality(value.to_string())),
        }
    }
}

impl Display for Tonality {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
