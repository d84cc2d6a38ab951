use serde::{Deserialize, Serialize};

use crate::constants::LEADERBOARD_CAPACITY;
use crate::types::ScoreRecord;

/// Score-descending list of finished rounds, capped at `LEADERBOARD_CAPACITY`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<ScoreRecord>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a board from records in any order, keeping the best ones.
    pub fn from_records(records: impl IntoIterator<Item = ScoreRecord>) -> Self {
        let mut board = Self::new();
        for record in records {
            board.add(record);
        }
        board
    }

    /// Inserts `record` after every entry with an equal or higher score.
    /// Returns the 1-based rank, or `None` when it falls off a full board.
    pub fn add(&mut self, record: ScoreRecord) -> Option<usize> {
        let pos = self
            .entries
            .iter()
            .position(|entry| record.score > entry.score)
            .unwrap_or(self.entries.len());
        if pos >= LEADERBOARD_CAPACITY {
            return None;
        }
        self.entries.insert(pos, record);
        self.entries.truncate(LEADERBOARD_CAPACITY);
        Some(pos + 1)
    }

    pub fn entries(&self) -> &[ScoreRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|entry| entry.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Difficulty, Skin};

    fn record(score: u32, skin: Skin) -> ScoreRecord {
        ScoreRecord {
            score,
            difficulty: Difficulty::Normal,
            skin,
        }
    }

    #[test]
    fn keeps_scores_descending_with_stable_ties() {
        let mut board = Leaderboard::new();
        assert_eq!(board.add(record(50, Skin::Yellow)), Some(1));
        assert_eq!(board.add(record(80, Skin::Yellow)), Some(1));
        assert_eq!(board.add(record(50, Skin::Green)), Some(3));
        assert_eq!(board.add(record(0, Skin::Pink)), Some(4));

        let scores: Vec<u32> = board.entries().iter().map(|entry| entry.score).collect();
        assert_eq!(scores, vec![80, 50, 50, 0]);
        assert_eq!(board.entries()[1].skin, Skin::Yellow);
        assert_eq!(board.entries()[2].skin, Skin::Green);
        assert_eq!(board.top_score(), Some(80));
    }

    #[test]
    fn caps_at_capacity() {
        let mut board = Leaderboard::new();
        for score in 1..=LEADERBOARD_CAPACITY as u32 {
            board.add(record(score * 10, Skin::Yellow));
        }
        assert_eq!(board.len(), LEADERBOARD_CAPACITY);
        assert_eq!(board.add(record(10, Skin::Pink)), None);
        assert_eq!(board.add(record(5, Skin::Pink)), None);
        assert_eq!(board.add(record(15, Skin::Pink)), Some(LEADERBOARD_CAPACITY));
        assert_eq!(board.len(), LEADERBOARD_CAPACITY);
        assert_eq!(board.entries().last().map(|entry| entry.score), Some(15));
    }

    #[test]
    fn from_records_sorts_and_trims() {
        let board = Leaderboard::from_records((0..15).map(|score| record(score, Skin::Yellow)));
        assert_eq!(board.len(), LEADERBOARD_CAPACITY);
        assert_eq!(board.top_score(), Some(14));
        assert_eq!(board.entries().last().map(|entry| entry.score), Some(5));
    }
}
