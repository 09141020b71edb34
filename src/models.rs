use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// One day's learning log as stored in `<date>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDocument {
    pub date: NaiveDate,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub vocabulary: Vec<VocabEntry>,
    #[serde(default)]
    pub sentences: Vec<SentenceEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabEntry {
    pub arabic: String,
    pub english: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urdu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Example>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub arabic: String,
    pub english: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceEntry {
    pub arabic: String,
    pub english: String,
}

/// A vocabulary entry tagged with the date of the note that introduced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VocabularyRecord {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub entry: VocabEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyEntry {
    pub arabic: String,
    pub english: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total_vocabulary: u64,
    pub total_sentences: u64,
    pub day_count: u64,
    pub top_frequency: Vec<FrequencyEntry>,
    pub series: Vec<DailyCount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    DateDesc,
    DateAsc,
    WordAsc,
    WordDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::DateDesc,
        SortKey::DateAsc,
        SortKey::WordAsc,
        SortKey::WordDesc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::DateDesc => "date-desc",
            SortKey::DateAsc => "date-asc",
            SortKey::WordAsc => "word-asc",
            SortKey::WordDesc => "word-desc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::DateDesc => "Newest first",
            SortKey::DateAsc => "Oldest first",
            SortKey::WordAsc => "A to Z",
            SortKey::WordDesc => "Z to A",
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == value)
            .ok_or_else(|| {
                "sort must be one of 'date-desc', 'date-asc', 'word-asc', 'word-desc'".to_string()
            })
    }
}

#[derive(Debug, Clone, Default)]
pub struct VocabularyQuery {
    pub filter: Option<String>,
    pub sort: SortKey,
}

/// Outcome of one load cycle as seen by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Complete,
    Partial,
    NoData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Desert,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Desert => "desert",
        }
    }

    /// Flips between light and dark; desert falls back to light.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark | Theme::Desert => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "desert" => Ok(Theme::Desert),
            _ => Err("theme must be 'light', 'dark' or 'desert'".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
}

#[derive(Debug, Deserialize, Default)]
pub struct VocabularyParams {
    pub q: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PracticeParams {
    pub card: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ToggleThemeForm {
    pub back: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ThemeRequest {
    pub theme: String,
}

#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub theme: Theme,
}

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub status: LoadStatus,
    pub missing: Vec<NaiveDate>,
    pub notes: Vec<NoteDocument>,
}

#[derive(Debug, Serialize)]
pub struct VocabularyResponse {
    pub status: LoadStatus,
    pub missing: Vec<NaiveDate>,
    pub records: Vec<VocabularyRecord>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub status: LoadStatus,
    pub missing: Vec<NaiveDate>,
    pub statistics: Statistics,
}
