//! User profile persistence with file locking.
//!
//! The profile holds the last metrics the user saved and their saved
//! recipes. It is a single JSON document, rewritten atomically.

use crate::{Error, Result, UserMetrics};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Persistent per-user data
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct UserProfile {
    #[serde(default)]
    pub metrics: Option<UserMetrics>,
    #[serde(default)]
    pub saved_recipes: Vec<String>,
}

impl UserProfile {
    /// Load the profile with a shared lock
    ///
    /// A missing file gives the default profile. So does an unreadable or
    /// corrupt one, after a warning.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No profile found at {:?}, using default", path);
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open profile {:?}: {}. Using defaults.", path, e);
                return Ok(Self::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock profile {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;

        if let Err(e) = read {
            tracing::warn!("Failed to read profile {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        match serde_json::from_str::<UserProfile>(&contents) {
            Ok(profile) => {
                tracing::debug!("Loaded profile from {:?}", path);
                Ok(profile)
            }
            Err(e) => {
                tracing::warn!("Failed to parse profile {:?}: {}. Using defaults.", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Save the profile atomically: temp file, fsync, rename
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::Other(format!("profile path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved profile to {:?}", path);
        Ok(())
    }

    /// Load, modify and save the profile
    ///
    /// Holds an exclusive lock on `<profile>.lock` for the whole
    /// read-modify-write, so concurrent updates are serialized.
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut UserProfile) -> Result<()>,
    {
        let lock_path = lock_path(path);
        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let lock = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)?;
        lock.lock_exclusive()?;

        let result = Self::load(path).and_then(|mut profile| {
            f(&mut profile)?;
            profile.save(path)?;
            Ok(profile)
        });

        lock.unlock()?;
        result
    }

    /// Add a recipe to the saved list; returns false if it was already there
    pub fn save_recipe(&mut self, recipe_id: &str) -> bool {
        if self.saved_recipes.iter().any(|id| id == recipe_id) {
            return false;
        }
        self.saved_recipes.push(recipe_id.to_string());
        true
    }

    /// Remove a recipe from the saved list; returns false if it was absent
    pub fn remove_recipe(&mut self, recipe_id: &str) -> bool {
        let before = self.saved_recipes.len();
        self.saved_recipes.retain(|id| id != recipe_id);
        self.saved_recipes.len() != before
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".lock");
    path.with_file_name(name)
}
