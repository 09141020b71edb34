use crate::models::{
    DailyCount, FrequencyEntry, LoadStatus, NoteDocument, SortKey, Statistics, VocabularyQuery,
    VocabularyRecord,
};
use crate::source::LoadOutcome;
use chrono::NaiveDate;
use icu_collator::{Collator, CollatorOptions};
use std::{cmp::Ordering, collections::HashMap};
use tracing::warn;

const TOP_FREQUENCY_LIMIT: usize = 10;

/// Derived views over the documents of one load cycle.
#[derive(Debug, Clone)]
pub struct NoteAggregator {
    documents: Vec<NoteDocument>,
    status: LoadStatus,
    missing: Vec<NaiveDate>,
}

impl NoteAggregator {
    pub fn new(documents: Vec<NoteDocument>) -> Self {
        Self {
            documents,
            status: LoadStatus::Complete,
            missing: Vec::new(),
        }
    }

    /// Duplicate dates are kept; every copy counts towards the statistics.
    pub fn from_outcome(outcome: LoadOutcome) -> Self {
        let status = outcome.status();
        let mut seen: HashMap<NaiveDate, usize> = HashMap::new();
        for document in &outcome.documents {
            *seen.entry(document.date).or_default() += 1;
        }
        for (date, copies) in seen.into_iter().filter(|(_, copies)| *copies > 1) {
            warn!("{copies} note documents share the date {date}");
        }

        Self {
            documents: outcome.documents,
            status,
            missing: outcome.missing,
        }
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn missing(&self) -> &[NaiveDate] {
        &self.missing
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Newest first; documents sharing a date keep their input order.
    pub fn feed(&self) -> Vec<NoteDocument> {
        let mut feed = self.documents.clone();
        feed.sort_by(|a, b| b.date.cmp(&a.date));
        feed
    }

    pub fn vocabulary(&self, query: &VocabularyQuery) -> Vec<VocabularyRecord> {
        let needle = query
            .filter
            .as_deref()
            .map(|text| text.trim().to_lowercase())
            .filter(|text| !text.is_empty());

        let mut records: Vec<VocabularyRecord> = self
            .documents
            .iter()
            .flat_map(|document| {
                document.vocabulary.iter().map(|entry| VocabularyRecord {
                    date: document.date,
                    entry: entry.clone(),
                })
            })
            .filter(|record| needle.as_deref().is_none_or(|needle| matches(record, needle)))
            .collect();

        match query.sort {
            SortKey::DateDesc => records.sort_by(|a, b| b.date.cmp(&a.date)),
            SortKey::DateAsc => records.sort_by(|a, b| a.date.cmp(&b.date)),
            SortKey::WordAsc => {
                let order = WordOrder::new();
                records.sort_by(|a, b| order.compare(&a.entry.english, &b.entry.english))
            }
            SortKey::WordDesc => {
                let order = WordOrder::new();
                records.sort_by(|a, b| order.compare(&b.entry.english, &a.entry.english))
            }
        }
        records
    }

    pub fn statistics(&self) -> Statistics {
        let total_vocabulary = self
            .documents
            .iter()
            .map(|document| document.vocabulary.len() as u64)
            .sum();
        let total_sentences = self
            .documents
            .iter()
            .map(|document| document.sentences.len() as u64)
            .sum();

        let mut series: Vec<DailyCount> = self
            .documents
            .iter()
            .map(|document| DailyCount {
                date: document.date,
                count: document.vocabulary.len() as u64,
            })
            .collect();
        series.sort_by(|a, b| a.date.cmp(&b.date));

        Statistics {
            total_vocabulary,
            total_sentences,
            day_count: self.day_count(),
            top_frequency: self.top_frequency(),
            series,
        }
    }

    /// Days from the earliest to the latest note, both ends included.
    fn day_count(&self) -> u64 {
        let earliest = self.documents.iter().map(|document| document.date).min();
        let latest = self.documents.iter().map(|document| document.date).max();
        match (earliest, latest) {
            (Some(earliest), Some(latest)) => (latest - earliest).num_days() as u64 + 1,
            _ => 0,
        }
    }

    fn top_frequency(&self) -> Vec<FrequencyEntry> {
        let mut positions: HashMap<(&str, &str), usize> = HashMap::new();
        let mut entries: Vec<FrequencyEntry> = Vec::new();

        for entry in self.documents.iter().flat_map(|document| &document.vocabulary) {
            let key = (entry.arabic.as_str(), entry.english.as_str());
            match positions.get(&key) {
                Some(&index) => entries[index].count += 1,
                None => {
                    positions.insert(key, entries.len());
                    entries.push(FrequencyEntry {
                        arabic: entry.arabic.clone(),
                        english: entry.english.clone(),
                        count: 1,
                    });
                }
            }
        }

        // stable: ties stay in first-seen order
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        entries.truncate(TOP_FREQUENCY_LIMIT);
        entries
    }
}

fn matches(record: &VocabularyRecord, needle: &str) -> bool {
    let entry = &record.entry;
    entry.arabic.to_lowercase().contains(needle)
        || entry.english.to_lowercase().contains(needle)
        || entry
            .urdu
            .as_deref()
            .is_some_and(|urdu| urdu.to_lowercase().contains(needle))
}

/// Root-locale collation of English glosses. Fully equal words compare equal,
/// so the stable sort keeps their input order.
struct WordOrder(Option<Collator>);

impl WordOrder {
    fn new() -> Self {
        match Collator::try_new(&Default::default(), CollatorOptions::new()) {
            Ok(collator) => Self(Some(collator)),
            Err(err) => {
                warn!("word collation unavailable, sorting by code point: {err}");
                Self(None)
            }
        }
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.0 {
            Some(collator) => collator.compare(a, b),
            None => a.cmp(b),
        }
    }
}
