use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PaxmanError, PaxmanResult};
use crate::leaderboard::Leaderboard;
use crate::types::ScoreRecord;

const STORE_VERSION: u8 = 1;

#[derive(Clone, Debug, Serialize)]
struct RankingStoreFile<'a> {
    version: u8,
    #[serde(rename = "updatedAt")]
    updated_at: String,
    records: &'a [ScoreRecord],
}

#[derive(Clone, Debug, Deserialize)]
struct RankingStoreFileRaw {
    version: u8,
    #[serde(default)]
    records: Vec<serde_json::Value>,
}

pub struct RankingStore {
    file_path: PathBuf,
    leaderboard: Leaderboard,
}

impl RankingStore {
    pub fn new(file_path: PathBuf) -> Self {
        let leaderboard = match load_leaderboard(&file_path) {
            Ok(board) => board,
            Err(PaxmanError::Io(error)) if error.kind() == std::io::ErrorKind::NotFound => {
                Leaderboard::new()
            }
            Err(error) => {
                log::warn!(
                    "[ranking-store] failed to load {}: {error}",
                    file_path.display()
                );
                Leaderboard::new()
            }
        };
        Self {
            file_path,
            leaderboard,
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn take_leaderboard(&mut self) -> Leaderboard {
        std::mem::take(&mut self.leaderboard)
    }

    pub fn replace(&mut self, leaderboard: Leaderboard) {
        self.leaderboard = leaderboard;
    }

    pub fn record(&mut self, record: ScoreRecord) -> Option<usize> {
        self.leaderboard.add(record)
    }

    pub fn save(&self) -> PaxmanResult<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = RankingStoreFile {
            version: STORE_VERSION,
            updated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            records: self.leaderboard.entries(),
        };
        let text = serde_json::to_string_pretty(&payload)?;
        fs::write(&self.file_path, text)?;
        log::debug!(
            "[ranking-store] saved {} records to {}",
            self.leaderboard.len(),
            self.file_path.display()
        );
        Ok(())
    }
}

pub fn load_leaderboard(path: &Path) -> PaxmanResult<Leaderboard> {
    let text = fs::read_to_string(path)?;
    let parsed: RankingStoreFileRaw = serde_json::from_str(&text)?;
    if parsed.version != STORE_VERSION {
        return Err(PaxmanError::UnsupportedVersion(parsed.version));
    }

    let mut records = Vec::with_capacity(parsed.records.len());
    for (index, raw) in parsed.records.into_iter().enumerate() {
        match serde_json::from_value::<ScoreRecord>(raw) {
            Ok(record) => records.push(record),
            Err(error) => log::warn!(
                "[ranking-store] skipping record {index} in {}: {error}",
                path.display()
            ),
        }
    }
    Ok(Leaderboard::from_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Difficulty, Skin};

    fn temp_file(name: &str) -> PathBuf {
        let unique = format!(
            "{}-{}-{}",
            name,
            std::process::id(),
            rand::random::<u32>()
        );
        std::env::temp_dir().join(unique).join("scores.json")
    }

    fn cleanup(path: &Path) {
        let _ = fs::remove_file(path);
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn missing_file_starts_empty() {
        let path = temp_file("ranking-store-missing");
        let store = RankingStore::new(path.clone());
        assert!(store.leaderboard().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn save_then_reload_keeps_order() {
        let path = temp_file("ranking-store-save");
        let mut store = RankingStore::new(path.clone());
        store.record(ScoreRecord {
            score: 120,
            difficulty: Difficulty::Hard,
            skin: Skin::Pink,
        });
        store.record(ScoreRecord {
            score: 340,
            difficulty: Difficulty::Easy,
            skin: Skin::Green,
        });
        store.save().expect("save succeeds");

        let text = fs::read_to_string(&path).expect("file written");
        let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
        assert_eq!(value["version"], 1);
        assert!(value["updatedAt"].as_str().is_some_and(|at| at.ends_with('Z')));
        assert_eq!(value["records"][0]["difficulty"], "easy");

        let reloaded = RankingStore::new(path.clone());
        assert_eq!(reloaded.leaderboard(), store.leaderboard());
        assert_eq!(reloaded.leaderboard().top_score(), Some(340));

        cleanup(&path);
    }

    #[test]
    fn load_skips_invalid_records_and_resorts() {
        let path = temp_file("ranking-store-partial");
        let parent = path.parent().expect("parent exists").to_path_buf();
        fs::create_dir_all(&parent).expect("create dir");
        let raw = r#"{
  "version": 1,
  "updatedAt": "2026-01-01T00:00:00.000Z",
  "records": [
    { "score": 10, "difficulty": "normal", "skin": "yellow" },
    { "score": -5, "difficulty": "normal", "skin": "yellow" },
    { "score": 90, "difficulty": "hard", "skin": "teal" },
    { "score": 70, "difficulty": "hard", "skin": "green" }
  ]
}"#;
        fs::write(&path, raw).expect("write file");

        let store = RankingStore::new(path.clone());
        let scores: Vec<u32> = store
            .leaderboard()
            .entries()
            .iter()
            .map(|record| record.score)
            .collect();
        assert_eq!(scores, vec![70, 10]);

        cleanup(&path);
    }

    #[test]
    fn unsupported_version_is_reported_and_store_starts_empty() {
        let path = temp_file("ranking-store-version");
        let parent = path.parent().expect("parent exists").to_path_buf();
        fs::create_dir_all(&parent).expect("create dir");
        fs::write(&path, r#"{ "version": 2, "records": [] }"#).expect("write file");

        assert!(matches!(
            load_leaderboard(&path),
            Err(PaxmanError::UnsupportedVersion(2))
        ));
        assert!(RankingStore::new(path.clone()).leaderboard().is_empty());

        cleanup(&path);
    }

    #[test]
    fn take_and_replace_round_trip_the_board() {
        let path = temp_file("ranking-store-take");
        let mut store = RankingStore::new(path);
        store.record(ScoreRecord {
            score: 5,
            difficulty: Difficulty::Normal,
            skin: Skin::Yellow,
        });
        let mut board = store.take_leaderboard();
        assert!(store.leaderboard().is_empty());
        board.add(ScoreRecord {
            score: 50,
            difficulty: Difficulty::Normal,
            skin: Skin::Yellow,
        });
        store.replace(board);
        assert_eq!(store.leaderboard().len(), 2);
    }
}
