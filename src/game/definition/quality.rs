use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

use crate::game::definition::record::{SchoolId, SchoolRecord, MASK_TOKEN};
use crate::game::distance::{distance_km, Coordinates};

lazy_static! {
    static ref FOUNDER_PREFIX_REGEX: Regex = Regex::new("^[^立]*立").unwrap();
    static ref SCHOOL_TYPE_SUFFIX_REGEX: Regex =
        Regex::new("(小学校|中学校|高等学校|高校)$").unwrap();
}

const DUPLICATE_DISTANCE_KM: f64 = 0.1;
const MIN_LYRICS_LENGTH: usize = 50;
const MIN_HINT_LENGTH: usize = 6;

// (min latitude, max latitude, min longitude, max longitude)
const JAPAN_BOUNDS: (f64, f64, f64, f64) = (24.0, 46.0, 123.0, 146.0);
const PREFECTURE_BOUNDS: [(&str, (f64, f64, f64, f64)); 4] = [
    ("北海道", (42.0, 46.0, 139.0, 146.0)),
    ("東京都", (35.5, 36.0, 139.0, 140.0)),
    ("大阪府", (34.2, 35.0, 135.0, 136.0)),
    ("沖縄県", (24.0, 27.0, 123.0, 132.0)),
];

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Severity {
    Warning,
    Failure,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Problem {
    MissingFields(Vec<&'static str>),
    MissingCoordinates,
    OutsideJapan,
    OutsidePrefecture(String),
    MissingMask,
    ShortLyrics(usize),
    ShortHints(Vec<&'static str>),
    DuplicateId,
    DuplicateName(SchoolId),
    DuplicateLocation(SchoolId),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Issue {
    pub school_id: SchoolId,
    pub school_name: String,
    pub problem: Problem,
}

impl Issue {
    fn new(record: &SchoolRecord, problem: Problem) -> Self {
        Issue {
            school_id: record.id,
            school_name: record.school_name.clone(),
            problem,
        }
    }

    pub fn severity(&self) -> Severity {
        match self.problem {
            Problem::MissingFields(_)
            | Problem::MissingCoordinates
            | Problem::OutsideJapan
            | Problem::DuplicateId => Severity::Failure,
            Problem::OutsidePrefecture(_)
            | Problem::MissingMask
            | Problem::ShortLyrics(_)
            | Problem::ShortHints(_)
            | Problem::DuplicateName(_)
            | Problem::DuplicateLocation(_) => Severity::Warning,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Problem::*;
        let description = match &self.problem {
            MissingFields(fields) => format!("missing fields: {}", fields.iter().join(", ")),
            MissingCoordinates => "coordinates are not set".to_owned(),
            OutsideJapan => "coordinates are outside of Japan".to_owned(),
            OutsidePrefecture(prefecture) => {
                format!("coordinates do not seem to be in {}", prefecture)
            }
            MissingMask => format!("masked lyrics do not contain {}", MASK_TOKEN),
            ShortLyrics(length) => format!("lyrics are too short ({} characters)", length),
            ShortHints(hints) => format!("hints are too vague: {}", hints.iter().join(", ")),
            DuplicateId => "id is used by another school".to_owned(),
            DuplicateName(other) => format!("same name as school #{}", other),
            DuplicateLocation(other) => format!("less than 100m away from school #{}", other),
        };
        let severity = match self.severity() {
            Severity::Warning => "warning",
            Severity::Failure => "failure",
        };
        write!(
            f,
            "[{}] #{} {}: {}",
            severity, self.school_id, self.school_name, description
        )
    }
}

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::A, Grade::B, Grade::C, Grade::D];

    fn from_score(score: f64) -> Grade {
        if score >= 0.9 {
            Grade::A
        } else if score >= 0.7 {
            Grade::B
        } else if score >= 0.5 {
            Grade::C
        } else {
            Grade::D
        }
    }

    /// Whether records of this grade are good enough to be played.
    pub fn is_playable(self) -> bool {
        self <= Grade::B
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        };
        f.write_str(label)
    }
}

pub fn normalize_school_name(name: &str) -> String {
    let name = FOUNDER_PREFIX_REGEX.replace(name.trim(), "");
    let name = SCHOOL_TYPE_SUFFIX_REGEX.replace(&name, "");
    name.trim().to_owned()
}

fn in_bounds(coordinates: &Coordinates, bounds: &(f64, f64, f64, f64)) -> bool {
    let (lat_min, lat_max, lng_min, lng_max) = *bounds;
    coordinates.latitude >= lat_min
        && coordinates.latitude <= lat_max
        && coordinates.longitude >= lng_min
        && coordinates.longitude <= lng_max
}

fn check_required_fields(record: &SchoolRecord) -> Option<Problem> {
    let fields = [
        ("school_name", record.school_name.as_str()),
        ("prefecture", record.prefecture.as_str()),
        ("lyrics", record.lyrics.as_str()),
        ("masked_lyrics", record.masked_lyrics.as_str()),
        ("hint_prefecture", record.hints.prefecture.as_str()),
        ("hint_region", record.hints.region.as_str()),
        ("hint_landmark", record.hints.landmark.as_str()),
    ];
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        None
    } else {
        Some(Problem::MissingFields(missing))
    }
}

fn check_coordinates(record: &SchoolRecord) -> Option<Problem> {
    let coordinates = &record.coordinates;
    if !coordinates.is_finite() || (coordinates.latitude == 0.0 && coordinates.longitude == 0.0)
    {
        return Some(Problem::MissingCoordinates);
    }
    if !in_bounds(coordinates, &JAPAN_BOUNDS) {
        return Some(Problem::OutsideJapan);
    }
    PREFECTURE_BOUNDS
        .iter()
        .find(|(prefecture, _)| *prefecture == record.prefecture)
        .filter(|(_, bounds)| !in_bounds(coordinates, bounds))
        .map(|(prefecture, _)| Problem::OutsidePrefecture(prefecture.to_string()))
}

fn check_mask(record: &SchoolRecord) -> Option<Problem> {
    if record.masked_lyrics.contains(MASK_TOKEN) {
        None
    } else {
        Some(Problem::MissingMask)
    }
}

fn check_lyrics_length(record: &SchoolRecord) -> Option<Problem> {
    let length = record.lyrics.trim().chars().count();
    if length > 0 && length < MIN_LYRICS_LENGTH {
        Some(Problem::ShortLyrics(length))
    } else {
        None
    }
}

fn check_hints(record: &SchoolRecord) -> Option<Problem> {
    let hints = [
        ("hint_prefecture", record.hints.prefecture.as_str()),
        ("hint_region", record.hints.region.as_str()),
        ("hint_landmark", record.hints.landmark.as_str()),
    ];
    // Blank hints are reported as missing fields
    let vague: Vec<&'static str> = hints
        .iter()
        .filter(|(_, hint)| {
            let length = hint.trim().chars().count();
            length > 0 && length < MIN_HINT_LENGTH
        })
        .map(|(name, _)| *name)
        .collect();
    if vague.is_empty() {
        None
    } else {
        Some(Problem::ShortHints(vague))
    }
}

fn record_problems(record: &SchoolRecord) -> Vec<Problem> {
    vec![
        check_required_fields(record),
        check_coordinates(record),
        check_lyrics_length(record),
        check_mask(record),
        check_hints(record),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Weighted quality score of a single record, between 0 and 1.
pub fn quality_score(record: &SchoolRecord) -> f64 {
    let mut fields: f64 = 1.0;
    let mut coordinates: f64 = 1.0;
    let mut lyrics: f64 = 1.0;
    let mut hints: f64 = 1.0;
    for problem in record_problems(record) {
        match problem {
            Problem::MissingFields(missing) => {
                fields = 0.0;
                if missing.contains(&"lyrics") {
                    lyrics = 0.0;
                }
                let blank_hints = missing.iter().filter(|f| f.starts_with("hint_")).count();
                hints -= blank_hints as f64 / 3.0;
            }
            Problem::MissingCoordinates | Problem::OutsideJapan => coordinates = 0.0,
            Problem::OutsidePrefecture(_) => coordinates = 0.5,
            Problem::ShortLyrics(_) => lyrics = lyrics.min(0.5),
            Problem::MissingMask => lyrics = lyrics.min(0.75),
            Problem::ShortHints(vague) => hints -= vague.len() as f64 / 3.0,
            Problem::DuplicateId | Problem::DuplicateName(_) | Problem::DuplicateLocation(_) => (),
        }
    }
    (3.0 * fields + 2.0 * coordinates + 2.0 * lyrics + hints.max(0.0)) / 8.0
}

pub fn grade(record: &SchoolRecord) -> Grade {
    Grade::from_score(quality_score(record))
}

/// Number of records per grade, best grade first.
pub fn grade_distribution(records: &[SchoolRecord]) -> Vec<(Grade, usize)> {
    let grades: Vec<Grade> = records.iter().map(grade).collect();
    Grade::ALL
        .iter()
        .map(|g| (*g, grades.iter().filter(|other| *other == g).count()))
        .collect()
}

fn check_duplicates(records: &[SchoolRecord], issues: &mut Vec<Issue>) {
    let mut seen_ids: HashMap<SchoolId, usize> = HashMap::new();
    let mut seen_names: HashMap<String, SchoolId> = HashMap::new();

    for (index, record) in records.iter().enumerate() {
        if seen_ids.insert(record.id, index).is_some() {
            issues.push(Issue::new(record, Problem::DuplicateId));
        }

        let name = normalize_school_name(&record.school_name);
        if !name.is_empty() {
            if let Some(other) = seen_names.get(&name) {
                issues.push(Issue::new(record, Problem::DuplicateName(*other)));
            } else {
                seen_names.insert(name, record.id);
            }
        }

        if let Some(other) = records[..index].iter().find(|other| {
            distance_km(&other.coordinates, &record.coordinates) < DUPLICATE_DISTANCE_KM
        }) {
            issues.push(Issue::new(record, Problem::DuplicateLocation(other.id)));
        }
    }
}

pub fn inspect(records: &[SchoolRecord]) -> Vec<Issue> {
    let mut issues = Vec::new();
    for record in records {
        for problem in record_problems(record) {
            issues.push(Issue::new(record, problem));
        }
    }
    check_duplicates(records, &mut issues);
    issues
}
