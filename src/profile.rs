//! Local persistence of the user profile.
//!
//! The profile lives as one JSON record under a single key. It is read once
//! when the store is opened and rewritten in full after every mutation.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, warn};

use crate::models::{Recipe, UserHealthData, UserProfile};

/// Key under which the profile record is stored.
pub const PROFILE_KEY: &str = "smartChef_profile_v2";

/// A minimal string key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow!("Failed to read {}: {}", path.display(), e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.path(key);
        // Atomic replace
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

/// Result of toggling a favorite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteChange {
    Added,
    Removed,
}

type Observer = Box<dyn Fn(&UserProfile) + Send + Sync>;

/// Owns the in-memory profile and mirrors every change to storage.
///
/// Writes are last-writer-wins; there is no merge with what is on disk.
pub struct ProfileStore<S: KeyValueStore> {
    store: S,
    profile: UserProfile,
    observers: Vec<Observer>,
}

impl<S: KeyValueStore> ProfileStore<S> {
    /// Load the profile from `store`, falling back to defaults.
    pub fn open(store: S) -> Self {
        let profile = load(&store);
        Self {
            store,
            profile,
            observers: Vec::new(),
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a callback run after every persisted change.
    pub fn subscribe(&mut self, observer: impl Fn(&UserProfile) + Send + Sync + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Persist the current profile in full.
    pub fn save(&self) -> Result<()> {
        self.write(&self.profile)
    }

    fn write(&self, profile: &UserProfile) -> Result<()> {
        let json = serde_json::to_string(profile)?;
        self.store.set(PROFILE_KEY, &json)?;
        debug!(key = PROFILE_KEY, favorites = profile.favorites.len(), "saved profile");
        Ok(())
    }

    /// Re-read the profile from storage, replacing the in-memory copy.
    pub fn reload(&mut self) {
        self.profile = load(&self.store);
    }

    /// Apply `change` to a copy of the profile and write it out. The
    /// in-memory profile is replaced and observers run only once the write
    /// has succeeded.
    fn update<R>(&mut self, change: impl FnOnce(&mut UserProfile) -> R) -> Result<R> {
        let mut next = self.profile.clone();
        let out = change(&mut next);
        self.write(&next)?;
        self.profile = next;
        for observer in &self.observers {
            observer(&self.profile);
        }
        Ok(out)
    }

    pub fn set_saved_restrictions(&mut self, restrictions: impl Into<String>) -> Result<()> {
        let restrictions = restrictions.into();
        self.update(|p| p.saved_restrictions = restrictions)
    }

    pub fn set_health_data(&mut self, health: Option<UserHealthData>) -> Result<()> {
        self.update(|p| p.health_data = health)
    }

    pub fn set_show_images(&mut self, show: bool) -> Result<()> {
        self.update(|p| p.show_images = show)
    }

    /// Add `recipe` to favorites, or remove it if a recipe with the same id
    /// is already there.
    pub fn toggle_favorite(&mut self, recipe: &Recipe) -> Result<FavoriteChange> {
        self.update(|p| match p.favorites.iter().position(|f| f.id == recipe.id) {
            Some(idx) => {
                p.favorites.remove(idx);
                FavoriteChange::Removed
            }
            None => {
                p.favorites.push(recipe.clone());
                FavoriteChange::Added
            }
        })
    }

    /// Store a new custom image on a favorited recipe. Returns false if the
    /// recipe is not a favorite, in which case nothing is written.
    pub fn set_favorite_image(&mut self, recipe_id: &str, image: Option<String>) -> Result<bool> {
        if !self.profile.is_favorite(recipe_id) {
            return Ok(false);
        }
        self.update(|p| {
            for fav in p.favorites.iter_mut().filter(|f| f.id == recipe_id) {
                fav.custom_image = image.clone();
            }
        })?;
        Ok(true)
    }
}

/// Read the profile record. A missing record yields the default; a corrupt
/// one is discarded and also yields the default.
pub fn load(store: &dyn KeyValueStore) -> UserProfile {
    let raw = match store.get(PROFILE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return UserProfile::default(),
        Err(e) => {
            warn!(key = PROFILE_KEY, error = %e, "could not read profile, using defaults");
            return UserProfile::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(profile) => profile,
        Err(e) => {
            warn!(key = PROFILE_KEY, error = %e, "discarding corrupt profile");
            if let Err(e) = store.remove(PROFILE_KEY) {
                warn!(key = PROFILE_KEY, error = %e, "could not remove corrupt profile");
            }
            UserProfile::default()
        }
    }
}
