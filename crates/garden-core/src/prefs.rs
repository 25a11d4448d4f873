//! Persisted sound preferences (enabled flag and volume).
//!
//! The store is an explicit container over a [`KeyValueStorage`] so the web
//! frontend can back it with `localStorage` while tests use [`MemoryStorage`].
//! Stored JSON keeps the `{ "state": {..}, "version": 0 }` envelope the site
//! has always written under `ui-store`, so existing visitors keep their
//! settings.

use crate::constants::{DEFAULT_VOLUME, PREFS_STORAGE_KEY};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage write failed: {0}")]
    Write(String),
    #[error("malformed preferences: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Minimal string key/value storage, shaped like the browser's `Storage`.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, PrefsError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PrefsError>;
}

/// In-memory storage for tests and for browsers that refuse `localStorage`.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, PrefsError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn default_enabled() -> bool {
    true
}

fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundPreferences {
    #[serde(default = "default_enabled")]
    pub sound_enabled: bool,
    #[serde(default = "default_volume")]
    pub sound_volume: f32,
}

impl Default for SoundPreferences {
    fn default() -> Self {
        Self {
            sound_enabled: default_enabled(),
            sound_volume: default_volume(),
        }
    }
}

impl SoundPreferences {
    /// Gain the master bus should ramp toward.
    pub fn effective_volume(&self) -> f32 {
        crate::gain::preference_target(self.sound_enabled, self.sound_volume)
    }
}

#[derive(Deserialize)]
struct Persisted<T> {
    state: T,
}

/// Typed getters/setters over persisted [`SoundPreferences`].
///
/// Every setter updates the in-memory value first; a failed write is logged
/// and otherwise ignored. `revision` increments on every effective change so
/// pollers (the frame loop) can cheaply notice updates.
pub struct PreferenceStore<S: KeyValueStorage> {
    storage: S,
    key: String,
    prefs: SoundPreferences,
    revision: u64,
}

impl<S: KeyValueStorage> PreferenceStore<S> {
    pub fn load(storage: S) -> Self {
        Self::load_with_key(storage, PREFS_STORAGE_KEY)
    }

    pub fn load_with_key(storage: S, key: &str) -> Self {
        let prefs = match read_prefs(&storage, key) {
            Ok(Some(p)) => p,
            Ok(None) => SoundPreferences::default(),
            Err(e) => {
                log::warn!("[prefs] ignoring stored preferences: {}", e);
                SoundPreferences::default()
            }
        };
        Self {
            storage,
            key: key.to_string(),
            prefs: sanitize(prefs),
            revision: 0,
        }
    }

    #[inline]
    pub fn snapshot(&self) -> SoundPreferences {
        self.prefs
    }

    #[inline]
    pub fn sound_enabled(&self) -> bool {
        self.prefs.sound_enabled
    }

    #[inline]
    pub fn sound_volume(&self) -> f32 {
        self.prefs.sound_volume
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        if self.prefs.sound_enabled != enabled {
            self.prefs.sound_enabled = enabled;
            self.commit();
        }
    }

    pub fn toggle_sound(&mut self) {
        self.set_sound_enabled(!self.prefs.sound_enabled);
    }

    /// Set the volume (clamped to [0, 1]). Raising the volume above zero
    /// while muted also unmutes, matching the volume slider's behavior.
    pub fn set_sound_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            log::warn!("[prefs] ignoring non-finite volume");
            return;
        }
        let v = volume.clamp(0.0, 1.0);
        let unmute = v > 0.0 && !self.prefs.sound_enabled;
        if (self.prefs.sound_volume - v).abs() > f32::EPSILON || unmute {
            self.prefs.sound_volume = v;
            if unmute {
                self.prefs.sound_enabled = true;
            }
            self.commit();
        }
    }

    pub fn nudge_volume(&mut self, delta: f32) {
        self.set_sound_volume(self.prefs.sound_volume + delta);
    }

    fn commit(&mut self) {
        self.revision += 1;
        if let Err(e) = self.save() {
            log::warn!("[prefs] could not persist preferences: {}", e);
        }
    }

    /// Write the current preferences to storage. Other fields already stored
    /// under the same key (sidebar, theme) are preserved.
    pub fn save(&mut self) -> Result<(), PrefsError> {
        let existing = self
            .storage
            .get_item(&self.key)?
            .and_then(|raw| serde_json::from_str::<Value>(&raw).ok());
        let mut root = match existing {
            Some(Value::Object(m)) => m,
            _ => Map::new(),
        };
        let mut state = match root.remove("state") {
            Some(Value::Object(m)) => m,
            _ => Map::new(),
        };
        if let Value::Object(fields) = serde_json::to_value(self.prefs)? {
            state.extend(fields);
        }
        root.insert("state".to_string(), Value::Object(state));
        root.entry("version").or_insert(Value::from(0));
        let json = serde_json::to_string(&Value::Object(root))?;
        self.storage.set_item(&self.key, &json)
    }
}

fn read_prefs<S: KeyValueStorage>(
    storage: &S,
    key: &str,
) -> Result<Option<SoundPreferences>, PrefsError> {
    let Some(raw) = storage.get_item(key)? else {
        return Ok(None);
    };
    let persisted: Persisted<SoundPreferences> = serde_json::from_str(&raw)?;
    Ok(Some(persisted.state))
}

fn sanitize(mut prefs: SoundPreferences) -> SoundPreferences {
    if !prefs.sound_volume.is_finite() {
        prefs.sound_volume = DEFAULT_VOLUME;
    }
    prefs.sound_volume = prefs.sound_volume.clamp(0.0, 1.0);
    prefs
}
