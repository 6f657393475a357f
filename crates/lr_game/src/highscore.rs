//! High-score persistence: one decimal integer in one file.
//!
//! The path is injected at construction. Reads never fail: a missing or
//! garbled file is a score of zero. Writes replace the file wholesale and
//! only happen when the new score strictly beats the stored one.

use std::fs;
use std::path::{Path, PathBuf};

pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn load(&self) -> u64 {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            // First run: no file yet.
            Err(_) => return 0,
        };
        match raw.trim().parse::<u64>() {
            Ok(score) => score,
            Err(err) => {
                log::warn!(
                    "High-score file {} is unreadable ({err}), treating as 0",
                    self.path.display()
                );
                0
            }
        }
    }

    /// Persist `current` if it beats the stored score. Returns the effective
    /// high score either way. Write failures are logged and ignored; losing
    /// a record is not worth crashing over.
    pub fn update(&self, current: u64) -> u64 {
        let stored = self.load();
        if current > stored {
            if let Err(err) = fs::write(&self.path, current.to_string()) {
                log::warn!(
                    "Failed to write high score to {}: {err}",
                    self.path.display()
                );
            }
            current
        } else {
            stored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "lanerush_highscore_test_{}_{}_{}.txt",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn missing_file_reads_as_zero() {
        let store = HighScoreStore::new(&temp_file_path("missing"));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn garbage_content_reads_as_zero() {
        let path = temp_file_path("garbage");
        fs::write(&path, "not a number").expect("write temp file");
        let store = HighScoreStore::new(&path);
        assert_eq!(store.load(), 0);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn update_writes_and_reads_back() {
        let path = temp_file_path("roundtrip");
        let store = HighScoreStore::new(&path);
        assert_eq!(store.update(9), 9);
        assert_eq!(store.load(), 9);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn lower_score_does_not_overwrite() {
        let path = temp_file_path("idempotent");
        let store = HighScoreStore::new(&path);
        assert_eq!(store.update(5), 5);
        assert_eq!(store.update(3), 5);
        assert_eq!(store.load(), 5);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn equal_score_does_not_rewrite() {
        let path = temp_file_path("equal");
        let store = HighScoreStore::new(&path);
        store.update(7);
        assert_eq!(store.update(7), 7);
        assert_eq!(store.load(), 7);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn whitespace_around_number_is_tolerated() {
        let path = temp_file_path("whitespace");
        fs::write(&path, " 42\n").expect("write temp file");
        let store = HighScoreStore::new(&path);
        assert_eq!(store.load(), 42);
        let _ = fs::remove_file(path);
    }
}
