/// Types for normalized schedule data
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fixed bell timetable of the table source: pair number, start, end.
pub const PAIR_TIMES: [(&str, &str, &str); 8] = [
    ("1", "08:30", "10:00"),
    ("2", "10:10", "11:40"),
    ("3", "11:50", "13:20"),
    ("4", "13:50", "15:20"),
    ("5", "15:30", "17:00"),
    ("6", "17:10", "18:40"),
    ("7", "18:50", "20:20"),
    ("8", "20:30", "22:00"),
];

/// Looks up the canonical start/end of a pair number.
pub fn pair_time(number: &str) -> Option<(&'static str, &'static str)> {
    PAIR_TIMES
        .iter()
        .find(|(n, _, _)| *n == number)
        .map(|(_, start, end)| (*start, *end))
}

/// The fixed timetable as the `pair_times` mapping of a [`Schedule`].
pub fn pair_time_table() -> BTreeMap<String, (String, String)> {
    PAIR_TIMES
        .iter()
        .map(|(n, start, end)| (n.to_string(), (start.to_string(), end.to_string())))
        .collect()
}

/// A group as listed by a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// What end users type, e.g. "ПИ(б)-21"
    pub display_name: String,
    /// What the source uses in URLs
    pub internal_id: String,
    /// Direction or faculty label, when the source provides one
    pub direction: Option<String>,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.direction {
            Some(direction) if !direction.is_empty() => {
                write!(f, "{} ({})", self.display_name, direction)
            }
            _ => write!(f, "{}", self.display_name),
        }
    }
}

/// One timetabled period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairInfo {
    pub label: Option<String>,
    pub number: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub time_range: Option<String>,
}

/// Numerator/denominator week marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WeekType {
    /// "числ."
    Numerator,
    /// "знам."
    Denominator,
    /// Anything the source writes that is not one of the above
    Other(String),
}

impl WeekType {
    pub fn as_str(&self) -> &str {
        match self {
            WeekType::Numerator => "числ.",
            WeekType::Denominator => "знам.",
            WeekType::Other(raw) => raw,
        }
    }
}

impl From<String> for WeekType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "числ." => WeekType::Numerator,
            "знам." => WeekType::Denominator,
            _ => WeekType::Other(value),
        }
    }
}

impl From<WeekType> for String {
    fn from(value: WeekType) -> Self {
        match value {
            WeekType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for WeekType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub name: String,
    pub title: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub pair: PairInfo,
    pub week_type: Option<WeekType>,
    pub subject: Option<String>,
    pub lesson_type: Option<String>,
    pub lesson_type_full: Option<String>,
    pub date_range: Option<String>,
    pub subgroups: Vec<String>,
    pub rooms: Vec<Room>,
    pub teachers: Vec<Teacher>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub name: String,
    pub lessons: Vec<Lesson>,
}

/// Normalized schedule of one group, as produced from the table source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub provider: String,
    pub group: String,
    pub group_id: String,
    pub source: String,
    pub retrieved_at: DateTime<Utc>,
    pub pair_times: BTreeMap<String, (String, String)>,
    pub days: Vec<Day>,
}

/// What a provider returns for a schedule request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScheduleData {
    /// Normalized record built from an HTML table
    Table(Schedule),
    /// Raw `scheduleData` array lifted from the page script
    Embedded(serde_json::Value),
}

impl ScheduleData {
    /// Canonical group label of a table schedule.
    pub fn group(&self) -> Option<&str> {
        match self {
            ScheduleData::Table(schedule) => Some(&schedule.group),
            ScheduleData::Embedded(_) => None,
        }
    }
}
