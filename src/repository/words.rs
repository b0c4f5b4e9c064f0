//! The cross-language word index
//!
//! Every built word is also indexed by its English gloss, so the front end
//! can answer "which languages have a word for water" with one sharded
//! lookup. Shard files are named by the sha256 of the gloss, which keeps
//! file names filesystem-safe for arbitrary glosses.

use crate::types::WordEntry;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Words grouped by English gloss, in gloss order.
#[derive(Debug, Clone, Default)]
pub struct WordIndex {
    entries: BTreeMap<String, Vec<WordEntry>>,
}

impl WordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one built word under its gloss. The entry is expected to carry
    /// its language back-reference already.
    pub fn push(&mut self, word: WordEntry) {
        self.entries
            .entry(word.english.clone())
            .or_default()
            .push(word);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<WordEntry>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shard file name for a gloss: hex sha256 of the gloss plus `.json`.
pub fn shard_name(gloss: &str) -> String {
    let digest = Sha256::digest(gloss.as_bytes());
    format!("{}.json", hex::encode(digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MediaSource, WordLanguageRef};

    fn word(english: &str, code: &str) -> WordEntry {
        WordEntry {
            english: english.to_string(),
            indigenous: "x".to_string(),
            english_alternate: None,
            media: MediaSource::default(),
            language: Some(WordLanguageRef {
                code: code.to_string(),
                name: format!("Lang {}", code),
            }),
        }
    }

    #[test]
    fn same_gloss_from_two_languages_shares_one_key() {
        let mut index = WordIndex::new();
        index.push(word("water", "N151"));
        index.push(word("water", "C5"));
        index.push(word("fire", "N151"));

        assert_eq!(index.len(), 2);
        let (gloss, entries) = index.iter().find(|(g, _)| *g == "water").unwrap();
        assert_eq!(gloss, "water");
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn iteration_is_gloss_ordered() {
        let mut index = WordIndex::new();
        index.push(word("water", "N151"));
        index.push(word("fire", "N151"));
        index.push(word("ash", "N151"));

        let glosses: Vec<&str> = index.iter().map(|(g, _)| g.as_str()).collect();
        assert_eq!(glosses, vec!["ash", "fire", "water"]);
    }

    #[test]
    fn shard_name_is_deterministic_sha256() {
        assert_eq!(shard_name("water"), shard_name("water"));
        assert_ne!(shard_name("water"), shard_name("fire"));
        // Known digest of "water".
        assert_eq!(
            shard_name("water"),
            "0f4168490e38b8447e11ba4bd656aa11b925bd22af30bac464bc153fdb608501.json"
        );
    }

    #[test]
    fn shard_name_is_filesystem_safe_for_any_gloss() {
        let name = shard_name("walk / run (go quickly)");
        assert!(name.ends_with(".json"));
        assert_eq!(name.len(), 64 + ".json".len());
        assert!(name
            .trim_end_matches(".json")
            .chars()
            .all(|c| c.is_ascii_hexdigit()));
    }
}
