//! User registry and per-user game data store.
//!
//! The registry maps an external user id (the platform's) to a random slot id naming the user's
//! directory. Mutating operations are serialized by one process-wide writer lock; the in-memory
//! table sits behind its own `RwLock` so predicates only take a short read lock.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, StorageError};
use crate::layout::{
    random_slot_id, validate_game_id, SlotLayout, BACKUP_SUFFIX, DATA_EXT, DELETED_SUFFIX,
    META_FILE, USER_TABLE_FILE,
};
use crate::models::{UserMeta, RESERVED_META_KEYS};

/// Slot ids are regenerated at most this many times when they collide with an existing directory.
const MAX_SLOT_ATTEMPTS: usize = 16;

/// File-backed user registry + game data store. Share it as `Arc<UserManager>`.
pub struct UserManager {
    data_dir: PathBuf,
    user_table: RwLock<HashMap<String, String>>,
    /// Single-writer lock: held for the whole of every mutating operation (except the
    /// file move in `delete_data`).
    write_lock: Mutex<()>,
}

impl UserManager {
    /// Opens the store rooted at `data_dir`, creating it and an empty `user_table.json` if missing.
    #[instrument(skip_all, fields(data_dir = %data_dir.as_ref().display()))]
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir).await?;

        let table_path = data_dir.join(USER_TABLE_FILE);
        let user_table: HashMap<String, String> = if fs::try_exists(&table_path).await? {
            let raw = fs::read(&table_path).await?;
            serde_json::from_slice(&raw)?
        } else {
            fs::write(&table_path, b"{}").await?;
            HashMap::new()
        };

        info!(users = user_table.len(), "User table loaded");
        Ok(Self {
            data_dir,
            user_table: RwLock::new(user_table),
            write_lock: Mutex::new(()),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Registers `external_id` under a fresh slot and persists the table.
    ///
    /// Anything failing after the slot directory is created rolls back the mapping and removes
    /// the directory again, so the table and the disk never disagree about this user.
    #[instrument(skip(self))]
    pub async fn register(&self, external_id: &str, source: Option<&str>) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        if self.user_table.read().await.contains_key(external_id) {
            return Err(StorageError::DuplicateUser(external_id.to_string()));
        }

        let slot_id = self.create_slot_dir().await?;
        let layout = SlotLayout::new(&self.data_dir, &slot_id);
        self.user_table
            .write()
            .await
            .insert(external_id.to_string(), slot_id.clone());

        let result = async {
            let meta = UserMeta::new(external_id, source);
            write_file(&layout.meta(), &serde_json::to_vec(&meta)?).await?;
            fs::create_dir(layout.backups()).await?;
            self.save_user_table().await
        }
        .await;

        if let Err(e) = result {
            self.user_table.write().await.remove(external_id);
            if let Err(cleanup) = fs::remove_dir_all(layout.dir()).await {
                warn!(
                    slot_id = %slot_id,
                    error = %cleanup,
                    "Failed to remove slot directory after failed registration"
                );
            }
            return Err(e);
        }

        info!(slot_id = %slot_id, "User registered");
        Ok(())
    }

    /// Removes the mapping for `external_id`. The user's files stay on disk.
    #[instrument(skip(self))]
    pub async fn unregister(&self, external_id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let slot_id = self
            .user_table
            .write()
            .await
            .remove(external_id)
            .ok_or_else(|| StorageError::UserNotFound(external_id.to_string()))?;

        if let Err(e) = self.save_user_table().await {
            self.user_table
                .write()
                .await
                .insert(external_id.to_string(), slot_id);
            return Err(e);
        }

        info!(slot_id = %slot_id, "User unregistered");
        Ok(())
    }

    pub async fn has_user(&self, external_id: &str) -> bool {
        self.user_table.read().await.contains_key(external_id)
    }

    /// Snapshot of the external id → slot id table.
    pub async fn dump_user_table(&self) -> HashMap<String, String> {
        self.user_table.read().await.clone()
    }

    /// Reads the blob stored under `game_id`.
    #[instrument(skip(self))]
    pub async fn get_data(&self, external_id: &str, game_id: &str) -> Result<Vec<u8>> {
        validate_game_id(game_id)?;
        let layout = self.layout_for(external_id).await?;
        let path = layout.game_data(game_id);

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(not_found(external_id, game_id));
        }

        fs::read(&path).await.map_err(|e| {
            StorageError::DataCorruption(format!(
                "failed to read {} for game {} of user {}: {}",
                path.display(),
                game_id,
                external_id,
                e
            ))
        })
    }

    /// False for unknown users as well as missing blobs.
    pub async fn has_data(&self, external_id: &str, game_id: &str) -> bool {
        if validate_game_id(game_id).is_err() {
            return false;
        }
        match self.layout_for(external_id).await {
            Ok(layout) => fs::try_exists(layout.game_data(game_id))
                .await
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Writes `data` under `game_id`.
    ///
    /// With `backup`, an existing blob is first copied to `backups/<game_id>.dat.<ts>.bak`; if that
    /// copy fails nothing is written. The new blob goes to a temp file and is renamed into place.
    #[instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn set_data(
        &self,
        external_id: &str,
        game_id: &str,
        data: &[u8],
        backup: bool,
    ) -> Result<()> {
        validate_game_id(game_id)?;
        let _guard = self.write_lock.lock().await;

        let layout = self.layout_for(external_id).await?;
        let path = layout.game_data(game_id);

        if backup && fs::try_exists(&path).await.unwrap_or(false) {
            let file_name = format!("{}.{}", game_id, DATA_EXT);
            let backup_path = layout.fresh_backup_path(&file_name, BACKUP_SUFFIX).await;
            fs::copy(&path, &backup_path).await.map_err(|e| {
                StorageError::Backup(format!(
                    "failed to back up game {} of user {} to {}: {}",
                    game_id,
                    external_id,
                    backup_path.display(),
                    e
                ))
            })?;
            debug!(backup = %backup_path.display(), "Previous data backed up");
        }

        write_file(&path, data).await.map_err(|e| {
            StorageError::DataCorruption(format!(
                "failed to write {} for game {} of user {}: {}",
                path.display(),
                game_id,
                external_id,
                e
            ))
        })
    }

    /// Soft delete: moves the blob to `backups/<game_id>.dat.<ts>.del`. Returns the new path.
    ///
    /// The writer lock covers only the lookup; the move itself runs unlocked, so it is not atomic
    /// with respect to a concurrent `unregister`.
    #[instrument(skip(self))]
    pub async fn delete_data(&self, external_id: &str, game_id: &str) -> Result<PathBuf> {
        validate_game_id(game_id)?;
        let (path, deleted_path) = {
            let _guard = self.write_lock.lock().await;
            let layout = self.layout_for(external_id).await?;
            let file_name = format!("{}.{}", game_id, DATA_EXT);
            (
                layout.game_data(game_id),
                layout.fresh_backup_path(&file_name, DELETED_SUFFIX).await,
            )
        };

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(not_found(external_id, game_id));
        }

        fs::rename(&path, &deleted_path).await?;
        info!(moved_to = %deleted_path.display(), "Game data soft-deleted");
        Ok(deleted_path)
    }

    /// Reads `meta.json`.
    pub async fn meta_get(&self, external_id: &str) -> Result<UserMeta> {
        let layout = self.layout_for(external_id).await?;
        let raw = fs::read(layout.meta()).await?;
        serde_json::from_slice(&raw).map_err(|e| {
            StorageError::DataCorruption(format!("meta.json of user {}: {}", external_id, e))
        })
    }

    /// Sets one top-level key in `meta.json`, backing up the previous file first.
    /// A failure anywhere in the read-modify-write is returned as is.
    ///
    /// `external_id` and `registration` belong to the store and are refused with
    /// [`StorageError::ReservedMetaKey`] before anything is touched.
    #[instrument(skip(self, value))]
    pub async fn meta_set(&self, external_id: &str, key: &str, value: Value) -> Result<()> {
        if RESERVED_META_KEYS.contains(&key) {
            return Err(StorageError::ReservedMetaKey(key.to_string()));
        }
        let _guard = self.write_lock.lock().await;

        let layout = self.layout_for(external_id).await?;
        let meta_path = layout.meta();
        let backup_path = layout.fresh_backup_path(META_FILE, BACKUP_SUFFIX).await;

        fs::copy(&meta_path, &backup_path).await.map_err(|e| {
            StorageError::Backup(format!(
                "failed to back up meta.json of user {}: {}",
                external_id, e
            ))
        })?;

        let raw = fs::read(&meta_path).await?;
        let mut meta: Map<String, Value> = serde_json::from_slice(&raw).map_err(|e| {
            StorageError::DataCorruption(format!("meta.json of user {}: {}", external_id, e))
        })?;
        meta.insert(key.to_string(), value);
        write_file(&meta_path, &serde_json::to_vec(&meta)?).await?;
        Ok(())
    }

    /// File names in the user's backups directory, sorted.
    pub async fn list_backups(&self, external_id: &str) -> Result<Vec<PathBuf>> {
        let layout = self.layout_for(external_id).await?;
        let mut entries = fs::read_dir(layout.backups()).await?;
        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            paths.push(entry.path());
        }
        paths.sort();
        Ok(paths)
    }

    async fn layout_for(&self, external_id: &str) -> Result<SlotLayout> {
        let table = self.user_table.read().await;
        let slot_id = table
            .get(external_id)
            .ok_or_else(|| StorageError::UserNotFound(external_id.to_string()))?;
        Ok(SlotLayout::new(&self.data_dir, slot_id))
    }

    /// Creates a directory for a new, unused slot id and returns the id.
    async fn create_slot_dir(&self) -> Result<String> {
        for _ in 0..MAX_SLOT_ATTEMPTS {
            let slot_id = random_slot_id();
            match fs::create_dir(self.data_dir.join(&slot_id)).await {
                Ok(()) => return Ok(slot_id),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    warn!(slot_id = %slot_id, "Slot id collision, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "no free slot id found",
        )))
    }

    async fn save_user_table(&self) -> Result<()> {
        let json = serde_json::to_vec(&*self.user_table.read().await)?;
        write_file(&self.data_dir.join(USER_TABLE_FILE), &json).await?;
        Ok(())
    }
}

fn not_found(external_id: &str, game_id: &str) -> StorageError {
    StorageError::GameDataNotFound {
        external_id: external_id.to_string(),
        game_id: game_id.to_string(),
    }
}

/// Writes to `<path>.tmp` then renames over `path`, so readers never see a half-written file.
/// The temp file is removed again when either step fails.
async fn write_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let result = match fs::write(&tmp, data).await {
        Ok(()) => fs::rename(&tmp, path).await,
        Err(e) => Err(e),
    };
    if result.is_err() {
        if let Err(cleanup) = fs::remove_file(&tmp).await {
            if cleanup.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %tmp.display(), error = %cleanup, "Failed to remove temp file");
            }
        }
    }
    result
}
