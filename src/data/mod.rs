//! Read-only reference tables bundled into the binary.
//!
//! Every table is keyed by a stable string ID (or by position for the
//! curriculum and free-text lists) and is never mutated after loading.

use std::collections::BTreeMap;

use rust_embed::Embed;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::engine::curriculum::LetterExerciseDescriptor;

#[derive(Embed)]
#[folder = "assets/data/"]
struct DataAssets;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("missing bundled dataset: {0}")]
    Missing(String),
    #[error("malformed dataset {name}: {source}")]
    Malformed {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

fn load_json<T: DeserializeOwned>(name: &str) -> Result<T, DataError> {
    let file = DataAssets::get(name).ok_or_else(|| DataError::Missing(name.to_string()))?;
    serde_json::from_slice(file.data.as_ref()).map_err(|source| DataError::Malformed {
        name: name.to_string(),
        source,
    })
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterTable {
    pub hebrew_letters: Vec<char>,
    pub final_letters: BTreeMap<char, char>,
    pub windows_geresh: char,
    pub mac_geresh: char,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TextExerciseData {
    pub label: String,
    pub text: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct VocabItem {
    pub id: String,
    pub hebrew: String,
    pub transliteration: String,
    pub english: String,
    pub category: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Phrase {
    pub id: String,
    pub hebrew: String,
    pub transliteration: String,
    pub english: String,
    pub category: String,
}

pub fn letter_table() -> Result<LetterTable, DataError> {
    load_json("letters.json")
}

pub fn letter_exercises() -> Result<Vec<LetterExerciseDescriptor>, DataError> {
    load_json("letter_exercises.json")
}

pub fn text_exercises() -> Result<Vec<TextExerciseData>, DataError> {
    load_json("text_exercises.json")
}

pub fn vocabulary() -> Result<Vec<VocabItem>, DataError> {
    load_json("vocabulary.json")
}

pub fn phrases() -> Result<Vec<Phrase>, DataError> {
    load_json("phrases.json")
}

pub fn drill_words() -> Result<Vec<String>, DataError> {
    load_json("words.json")
}

/// An entry that has (or may have) a pre-rendered audio clip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeakableItem {
    pub id: String,
    pub hebrew: String,
}

/// Vocabulary followed by phrases, the same set the clip renderer walks.
pub fn speakable_items() -> Result<Vec<SpeakableItem>, DataError> {
    let mut items: Vec<SpeakableItem> = vocabulary()?
        .into_iter()
        .map(|v| SpeakableItem {
            id: v.id,
            hebrew: v.hebrew,
        })
        .collect();
    items.extend(phrases()?.into_iter().map(|p| SpeakableItem {
        id: p.id,
        hebrew: p.hebrew,
    }));
    Ok(items)
}

pub fn find_speakable(id: &str) -> Result<Option<SpeakableItem>, DataError> {
    Ok(speakable_items()?.into_iter().find(|item| item.id == id))
}

pub fn vocabulary_categories(items: &[VocabItem]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for item in items {
        if !categories.contains(&item.category) {
            categories.push(item.category.clone());
        }
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_tables_parse() {
        assert_eq!(letter_table().unwrap().hebrew_letters.len(), 22);
        assert!(!letter_exercises().unwrap().is_empty());
        assert_eq!(text_exercises().unwrap().len(), 7);
        assert!(!vocabulary().unwrap().is_empty());
        assert!(!phrases().unwrap().is_empty());
        assert!(!drill_words().unwrap().is_empty());
    }

    #[test]
    fn speakable_ids_are_unique() {
        let items = speakable_items().unwrap();
        let mut ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        ids.sort();
        let before = ids.len();
        ids.dedup();
        assert_eq!(before, ids.len());
    }

    #[test]
    fn find_speakable_by_id() {
        let item = find_speakable("v001").unwrap().unwrap();
        assert_eq!(item.hebrew, "שלום");
        assert!(find_speakable("phrase-1").unwrap().is_some());
        assert!(find_speakable("nope").unwrap().is_none());
    }

    #[test]
    fn categories_keep_first_seen_order() {
        let categories = vocabulary_categories(&vocabulary().unwrap());
        assert_eq!(categories.first().map(String::as_str), Some("greetings"));
        assert!(categories.contains(&"nouns".to_string()));
    }
}
