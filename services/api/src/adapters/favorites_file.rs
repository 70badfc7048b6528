//! services/api/src/adapters/favorites_file.rs
//!
//! A `FavoritesSlot` backed by one JSON file per key inside a directory.
//! Writes go to a temporary file that is renamed over the old one, so a
//! reader never sees a half-written collection.
//!
//! The server keeps no favorites itself; this adapter is for clients that
//! embed `api_lib` and want their favorites on local disk.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use itinerary_core::ports::{FavoritesSlot, PortError, PortResult};

#[derive(Debug, Clone)]
pub struct JsonFileSlot {
    dir: PathBuf,
}

impl JsonFileSlot {
    /// Uses `dir` for slot files, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> PortResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            PortError::Unexpected(format!("cannot create {}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl FavoritesSlot for JsonFileSlot {
    fn read(&self, key: &str) -> PortResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PortError::Unexpected(e.to_string())),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> PortResult<()> {
        let target = self.path_for(key);
        let staging = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&staging, value).map_err(|e| PortError::Unexpected(e.to_string()))?;
        fs::rename(&staging, &target).map_err(|e| PortError::Unexpected(e.to_string()))
    }
}
