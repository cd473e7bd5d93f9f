use std::{
    io,
    path::{Path, PathBuf},
};

use market_sim::{SaveBundle, SimError};
use tokio::fs;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("save file i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Decode(#[from] SimError),
}

/// A single JSON save slot on disk.
#[derive(Clone, Debug)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn write(&self, bundle: &SaveBundle) -> Result<(), StoreError> {
        let payload = bundle.to_json()?;
        if let Some(parent) = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, payload).await?;
        Ok(())
    }

    /// `Ok(None)` when nothing has been saved yet.
    pub async fn read(&self) -> Result<Option<SaveBundle>, StoreError> {
        let payload = match fs::read_to_string(&self.path).await {
            Ok(payload) => payload,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(SaveBundle::from_json(&payload)?))
    }
}
