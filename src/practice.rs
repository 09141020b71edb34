use crate::models::VocabularyRecord;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

const STARTER_DECK: [(&str, &str); 3] = [("Hello", "مرحبا"), ("Thank you", "شكرا"), ("Water", "ماء")];

/// One card per distinct word pair, in the order the records are given.
/// Falls back to a small starter deck when there is no vocabulary.
pub fn build_deck(records: &[VocabularyRecord]) -> Vec<Flashcard> {
    let mut seen = HashSet::new();
    let deck: Vec<Flashcard> = records
        .iter()
        .filter(|record| seen.insert((record.entry.arabic.as_str(), record.entry.english.as_str())))
        .map(|record| Flashcard {
            front: record.entry.english.clone(),
            back: record.entry.arabic.clone(),
        })
        .collect();

    if !deck.is_empty() {
        return deck;
    }
    STARTER_DECK
        .iter()
        .map(|(front, back)| Flashcard {
            front: front.to_string(),
            back: back.to_string(),
        })
        .collect()
}

/// Wraps any index, negative ones included, onto the deck.
pub fn wrap_index(index: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    index.rem_euclid(len as i64) as usize
}
