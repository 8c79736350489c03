//! High score leaderboard
//!
//! Persisted to LocalStorage as a plain JSON array of
//! `{name, score, level}` records, ordered by score descending, top 10.

use serde::{Deserialize, Serialize};

use crate::persistence;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single leaderboard entry, immutable once recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Player display name ("Anonymous" when left blank)
    pub name: String,
    /// Final score
    pub score: u32,
    /// Level reached at game over
    pub level: u32,
}

/// High score leaderboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores {
    entries: Vec<ScoreEntry>,
}

impl HighScores {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "basket_catcher_scores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Ordered entries, best first
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Record a finished session: append, re-sort descending (stable on
    /// ties, so earlier entries outrank equal later ones), keep the top
    /// 10, persist. Returns the updated ordered list.
    pub fn record(&mut self, entry: ScoreEntry) -> &[ScoreEntry] {
        self.entries.push(entry);
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
        self.save();
        &self.entries
    }

    /// Parse a persisted list; anything malformed counts as "no scores yet"
    fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|err| {
            log::warn!("Discarding malformed score list: {err}");
            Self::new()
        })
    }

    /// Load the leaderboard from storage
    pub fn load() -> Self {
        match persistence::get_item(Self::STORAGE_KEY) {
            Some(json) => {
                let scores = Self::from_json(&json);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            None => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
        }
    }

    /// Save the leaderboard to storage
    pub fn save(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            persistence::set_item(Self::STORAGE_KEY, &json);
            log::info!("High scores saved ({} entries)", self.entries.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u32) -> ScoreEntry {
        ScoreEntry {
            name: name.to_string(),
            score,
            level: 1 + score / 50,
        }
    }

    #[test]
    fn test_record_sorts_descending() {
        let mut scores = HighScores::new();
        scores.record(entry("a", 30));
        scores.record(entry("b", 90));
        scores.record(entry("c", 60));
        let ordered: Vec<u32> = scores.entries().iter().map(|e| e.score).collect();
        assert_eq!(ordered, vec![90, 60, 30]);
    }

    #[test]
    fn test_twelve_records_keep_top_ten() {
        let mut scores = HighScores::new();
        for i in 0..12u32 {
            scores.record(entry("p", i * 10));
        }
        assert_eq!(scores.entries().len(), MAX_HIGH_SCORES);
        let ordered: Vec<u32> = scores.entries().iter().map(|e| e.score).collect();
        // 110 down to 20, strictly descending
        assert_eq!(ordered, vec![110, 100, 90, 80, 70, 60, 50, 40, 30, 20]);
        for pair in ordered.windows(2) {
            assert!(pair[0] > pair[1]);
        }
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut scores = HighScores::new();
        scores.record(entry("first", 50));
        scores.record(entry("second", 50));
        scores.record(entry("third", 50));
        let names: Vec<&str> = scores.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_score_equal_to_lowest_does_not_displace_it() {
        let mut scores = HighScores::new();
        for i in 1..=10u32 {
            scores.record(entry("held", i * 10));
        }
        // Ties sort after the existing equal entry, so the newcomer is the
        // one truncated; the list never exceeds ten
        scores.record(entry("newcomer", 10));
        assert_eq!(scores.entries().len(), MAX_HIGH_SCORES);
        assert!(scores.entries().iter().all(|e| e.name == "held"));
    }

    #[test]
    fn test_qualifies() {
        let mut scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert!(scores.qualifies(10));
        for i in 1..=10u32 {
            scores.record(entry("p", i * 10));
        }
        assert!(!scores.qualifies(5));
        assert!(!scores.qualifies(10));
        assert!(scores.qualifies(15));
        assert_eq!(scores.top_score(), Some(100));
    }

    #[test]
    fn test_wire_format_is_plain_array() {
        let mut scores = HighScores::new();
        scores.record(ScoreEntry {
            name: "Ada".to_string(),
            score: 120,
            level: 3,
        });
        let json = serde_json::to_string(&scores).expect("serialize");
        assert_eq!(json, r#"[{"name":"Ada","score":120,"level":3}]"#);

        let back = HighScores::from_json(&json);
        assert_eq!(back.entries(), scores.entries());
    }

    #[test]
    fn test_malformed_json_treated_as_empty() {
        assert!(HighScores::from_json("not json").is_empty());
        assert!(HighScores::from_json(r#"{"scores": 3}"#).is_empty());
        assert!(HighScores::from_json("").is_empty());
    }

    #[test]
    fn test_native_load_is_empty() {
        assert!(HighScores::load().is_empty());
    }
}
