use serde::de;
use serde::{Deserialize, Deserializer};
use std::fmt;

use crate::game::distance::Coordinates;

pub type SchoolId = u32;

pub const MASK_TOKEN: &str = "〇〇";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D>(deserializer: D) -> Result<Difficulty, D::Error>
    where
        D: Deserializer<'de>,
    {
        match String::deserialize(deserializer)?
            .trim()
            .to_lowercase()
            .as_ref()
        {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(de::Error::invalid_value(
                de::Unexpected::Str(other),
                &"easy, medium, hard or blank",
            )),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(label)
    }
}

/// Clues of increasing specificity.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Hints {
    pub prefecture: String,
    pub region: String,
    pub landmark: String,
}

impl Hints {
    pub fn get(&self, index: usize) -> Option<&str> {
        match index {
            0 => Some(&self.prefecture),
            1 => Some(&self.region),
            2 => Some(&self.landmark),
            _ => None,
        }
    }
}

/// One row of a CSV dataset.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RawRecord {
    pub id: SchoolId,
    pub school_name: String,
    pub prefecture: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub lyrics: String,
    pub masked_lyrics: String,
    pub difficulty: Difficulty,
    pub hint_prefecture: String,
    pub hint_region: String,
    pub hint_landmark: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchoolRecord {
    pub id: SchoolId,
    pub school_name: String,
    pub prefecture: String,
    pub city: String,
    pub coordinates: Coordinates,
    pub lyrics: String,
    pub masked_lyrics: String,
    pub difficulty: Difficulty,
    pub hints: Hints,
    #[serde(default)]
    pub notes: String,
}

impl SchoolRecord {
    pub fn location(&self) -> String {
        format!("{} {}", self.prefecture, self.city)
    }
}

impl From<RawRecord> for SchoolRecord {
    fn from(raw_record: RawRecord) -> Self {
        SchoolRecord {
            id: raw_record.id,
            school_name: raw_record.school_name,
            prefecture: raw_record.prefecture,
            city: raw_record.city,
            coordinates: Coordinates::new(raw_record.latitude, raw_record.longitude),
            lyrics: raw_record.lyrics,
            masked_lyrics: raw_record.masked_lyrics,
            difficulty: raw_record.difficulty,
            hints: Hints {
                prefecture: raw_record.hint_prefecture,
                region: raw_record.hint_region,
                landmark: raw_record.hint_landmark,
            },
            notes: raw_record.notes.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
pub fn example_record(id: SchoolId) -> SchoolRecord {
    SchoolRecord {
        id,
        school_name: format!("example school {}", id),
        prefecture: "大阪府".to_owned(),
        city: "大阪市".to_owned(),
        coordinates: Coordinates::new(34.5 + id as f64 * 0.01, 135.5),
        lyrics: format!("example lyrics for school {}, sung to a slow and steady tune", id),
        masked_lyrics: format!(
            "example lyrics for school {}, sung to a slow and steady tune",
            MASK_TOKEN
        ),
        difficulty: Difficulty::Medium,
        hints: Hints {
            prefecture: "example prefecture hint".to_owned(),
            region: "example region hint".to_owned(),
            landmark: "example landmark hint".to_owned(),
        },
        notes: String::new(),
    }
}
