//! On-disk layout of the data directory.
//!
//! ```text
//! <data_dir>/user_table.json
//! <data_dir>/<slot>/meta.json
//! <data_dir>/<slot>/<game_id>.dat
//! <data_dir>/<slot>/backups/<game_id>.dat.<ts>.bak   (copy taken before an overwrite)
//! <data_dir>/<slot>/backups/<game_id>.dat.<ts>.del   (soft-deleted blob)
//! <data_dir>/<slot>/backups/meta.json.<ts>.bak
//! ```

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use uuid::Uuid;

use crate::error::{Result, StorageError};

pub const USER_TABLE_FILE: &str = "user_table.json";
pub const META_FILE: &str = "meta.json";
pub const BACKUP_DIR: &str = "backups";
pub const DATA_EXT: &str = "dat";

/// Suffix of a backup taken before an overwrite.
pub const BACKUP_SUFFIX: &str = "bak";
/// Suffix of a soft-deleted blob.
pub const DELETED_SUFFIX: &str = "del";

/// Paths inside one user's slot directory.
#[derive(Debug, Clone)]
pub struct SlotLayout {
    dir: PathBuf,
}

impl SlotLayout {
    pub fn new(data_dir: &Path, slot_id: &str) -> Self {
        Self {
            dir: data_dir.join(slot_id),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn meta(&self) -> PathBuf {
        self.dir.join(META_FILE)
    }

    pub fn backups(&self) -> PathBuf {
        self.dir.join(BACKUP_DIR)
    }

    /// Blob file for `game_id`. The id must already be validated.
    pub fn game_data(&self, game_id: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", game_id, DATA_EXT))
    }

    /// A backup path for `file_name` (e.g. `chess.dat`) that does not exist yet.
    ///
    /// Names are `<file_name>.<secs>.<micros>.<suffix>`; a counter is appended when two
    /// backups land in the same microsecond.
    pub async fn fresh_backup_path(&self, file_name: &str, suffix: &str) -> PathBuf {
        let ts = timestamp();
        let backups = self.backups();
        let mut candidate = backups.join(format!("{}.{}.{}", file_name, ts, suffix));
        let mut n = 1;
        while fs::try_exists(&candidate).await.unwrap_or(false) {
            candidate = backups.join(format!("{}.{}-{}.{}", file_name, ts, n, suffix));
            n += 1;
        }
        candidate
    }
}

/// Current time as `<secs>.<micros>`, the timestamp component of backup names.
pub fn timestamp() -> String {
    let now = Utc::now();
    format!("{}.{:06}", now.timestamp(), now.timestamp_subsec_micros())
}

/// Random slot identifier. Callers still check it against existing directories.
pub fn random_slot_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Game ids become file names, so they must be a single path component that is not hidden.
/// A leading dot also rules out `.` and `..`. Spaces and non-ASCII are fine.
pub fn validate_game_id(game_id: &str) -> Result<()> {
    let valid = !game_id.is_empty()
        && !game_id.starts_with('.')
        && !game_id.contains(|c| matches!(c, '/' | '\\' | '\0'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidGameId(game_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_game_id() {
        assert!(validate_game_id("chess").is_ok());
        assert!(validate_game_id("tic-tac_toe.v2").is_ok());
        assert!(validate_game_id("").is_err());
        assert!(validate_game_id("..").is_err());
        assert!(validate_game_id("../etc").is_err());
        assert!(validate_game_id("a/b").is_err());
        assert!(validate_game_id(".hidden").is_err());
        assert!(validate_game_id("a\\b").is_err());
        assert!(validate_game_id("nul\0byte").is_err());

        assert!(validate_game_id("象棋").is_ok());
        assert!(validate_game_id("my game").is_ok());
        assert!(validate_game_id("save..old").is_ok());
        assert!(validate_game_id("échecs (v2)").is_ok());
    }

    #[test]
    fn test_slot_paths() {
        let layout = SlotLayout::new(Path::new("/data"), "abc");
        assert_eq!(layout.meta(), Path::new("/data/abc/meta.json"));
        assert_eq!(layout.game_data("chess"), Path::new("/data/abc/chess.dat"));
        assert_eq!(layout.backups(), Path::new("/data/abc/backups"));
    }

    #[tokio::test]
    async fn test_fresh_backup_path_avoids_existing() {
        let dir = tempfile::tempdir().unwrap();
        let layout = SlotLayout::new(dir.path(), "slot");
        std::fs::create_dir_all(layout.backups()).unwrap();

        let first = layout.fresh_backup_path("chess.dat", BACKUP_SUFFIX).await;
        std::fs::write(&first, b"x").unwrap();
        let second = layout.fresh_backup_path("chess.dat", BACKUP_SUFFIX).await;

        assert_ne!(first, second);
        let name = second.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("chess.dat."));
        assert!(name.ends_with(".bak"));
    }

    #[test]
    fn test_random_slot_ids_differ() {
        assert_ne!(random_slot_id(), random_slot_id());
        assert_eq!(random_slot_id().len(), 32);
    }
}
