//! Durable identity storage.
//!
//! The (nickname, room id) pair survives restarts so that `join` without
//! arguments resumes the previous session. The pair is overwritten on the
//! next join and never cleared.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The durable (nickname, room id) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Identity {
    pub nickname: String,
    pub room_id: String,
}

/// File-backed identity store.
///
/// Every mutation persists the full pair. Persistence is best-effort; write
/// failures are logged, not propagated. No validation happens here; the
/// room-management API is the authority on what is joinable.
#[derive(Debug)]
pub struct IdentityStore {
    path: PathBuf,
    identity: Identity,
}

impl IdentityStore {
    /// Open the store at `path`, starting from an empty identity when the
    /// file is missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let identity = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("Ignoring corrupt identity file {:?}: {}", path, e);
                Identity::default()
            }),
            Err(_) => Identity::default(),
        };
        Self { path, identity }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn set_nickname(&mut self, nickname: &str) {
        self.identity.nickname = nickname.to_string();
        self.persist();
    }

    pub fn set_room_id(&mut self, room_id: &str) {
        self.identity.room_id = room_id.to_string();
        self.persist();
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.identity) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize identity: {}", e);
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, json) {
            tracing::warn!("Failed to persist identity to {:?}: {}", self.path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("chat-user.json")
    }

    #[test]
    fn test_open_with_missing_file_starts_empty() {
        // テスト項目: ファイルが存在しない場合、空の identity から開始する
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();

        // when (操作):
        let store = IdentityStore::open(store_path(&dir));

        // then (期待する結果):
        assert_eq!(store.identity(), &Identity::default());
    }

    #[test]
    fn test_mutation_persists_the_full_pair() {
        // テスト項目: 変更のたびにペア全体が永続化され、再オープンで復元される
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();
        let path = store_path(&dir);
        let mut store = IdentityStore::open(&path);

        // when (操作):
        store.set_nickname("bob");
        store.set_room_id("R1");
        let reopened = IdentityStore::open(&path);

        // then (期待する結果):
        assert_eq!(reopened.identity().nickname, "bob");
        assert_eq!(reopened.identity().room_id, "R1");
    }

    #[test]
    fn test_next_join_overwrites_previous_identity() {
        // テスト項目: 次の join で以前の identity が上書きされる
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();
        let path = store_path(&dir);
        let mut store = IdentityStore::open(&path);
        store.set_nickname("bob");
        store.set_room_id("R1");

        // when (操作):
        store.set_nickname("alice");
        store.set_room_id("R2");
        let reopened = IdentityStore::open(&path);

        // then (期待する結果):
        assert_eq!(reopened.identity().nickname, "alice");
        assert_eq!(reopened.identity().room_id, "R2");
    }

    #[test]
    fn test_open_with_corrupt_file_starts_empty() {
        // テスト項目: 壊れたファイルは無視され、空の identity から開始する
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();
        let path = store_path(&dir);
        fs::write(&path, "not json").unwrap();

        // when (操作):
        let store = IdentityStore::open(&path);

        // then (期待する結果):
        assert_eq!(store.identity(), &Identity::default());
    }
}
