//! JSON file persistence for timers
//!
//! All timers live in a single document. Every change rewrites it through a
//! temp file and a rename so a crash never leaves a half-written file.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::StoreError,
    ports::TimerStore,
    state::{Timer, TimerId},
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    timers: Vec<Timer>,
}

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    timers: Mutex<BTreeMap<TimerId, Timer>>,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty when the file does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let timers = match fs::read_to_string(&path) {
            Ok(content) => {
                let file: StoreFile = serde_json::from_str(&content)?;
                info!("Loaded {} timers from {}", file.timers.len(), path.display());
                file.timers.into_iter().map(|t| (t.id(), t)).collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No timer file at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            timers: Mutex::new(timers),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, timers: &BTreeMap<TimerId, Timer>) -> Result<(), StoreError> {
        let file = StoreFile {
            timers: timers.values().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json.as_bytes())?;
        fs::rename(&tmp_path, &self.path)?;
        debug!("Wrote {} timers to {}", file.timers.len(), self.path.display());
        Ok(())
    }

    fn update<F>(&self, apply: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut BTreeMap<TimerId, Timer>),
    {
        let mut timers = self.timers.lock().map_err(|_| StoreError::Poisoned)?;
        let mut next = timers.clone();
        apply(&mut next);
        self.write(&next)?;
        *timers = next;
        Ok(())
    }
}

impl TimerStore for JsonFileStore {
    fn persist(&self, timer: &Timer) -> Result<(), StoreError> {
        self.update(|timers| {
            timers.insert(timer.id(), timer.clone());
        })
    }

    fn remove(&self, id: TimerId) -> Result<(), StoreError> {
        self.update(|timers| {
            timers.remove(&id);
        })
    }

    fn load_all(&self) -> Result<Vec<Timer>, StoreError> {
        let timers = self.timers.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(timers.values().cloned().collect())
    }
}
