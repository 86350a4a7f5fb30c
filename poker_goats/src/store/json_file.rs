//! One JSON file per group under a data directory.

use async_trait::async_trait;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use super::{GroupSnapshot, GroupStore, StoreResult};
use crate::group::GroupId;

#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create the store, making `dir` if it doesn't exist.
    pub async fn new(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, group_id: GroupId) -> PathBuf {
        self.dir.join(format!("group_{group_id}.json"))
    }
}

#[async_trait]
impl GroupStore for JsonFileStore {
    async fn load(&self, group_id: GroupId) -> StoreResult<Option<GroupSnapshot>> {
        let bytes = match tokio::fs::read(self.path_for(group_id)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn save(&self, group_id: GroupId, snapshot: &GroupSnapshot) -> StoreResult<()> {
        let path = self.path_for(group_id);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(snapshot)?;

        // Rename over the old file so a crash never leaves half a document.
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        log::debug!("Saved group {} to {}", group_id, path.display());
        Ok(())
    }
}
