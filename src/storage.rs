use garden_core::{KeyValueStorage, PrefsError};
use web_sys as web;

/// `window.localStorage` behind the core's storage trait.
pub struct LocalStorage {
    storage: web::Storage,
}

impl LocalStorage {
    /// `None` when storage is disabled (privacy modes, sandboxed iframes).
    pub fn open() -> Option<Self> {
        let window = web::window()?;
        match window.local_storage() {
            Ok(Some(storage)) => Some(Self { storage }),
            Ok(None) => None,
            Err(e) => {
                log::warn!("[prefs] localStorage unavailable: {:?}", e);
                None
            }
        }
    }
}

impl KeyValueStorage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, PrefsError> {
        self.storage
            .get_item(key)
            .map_err(|e| PrefsError::Unavailable(format!("{:?}", e)))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| PrefsError::Write(format!("{:?}", e)))
    }
}

/// Local storage when the page has it, otherwise an in-memory map so the
/// preference store keeps working for the session.
pub enum PageStorage {
    Local(LocalStorage),
    Memory(garden_core::MemoryStorage),
}

impl PageStorage {
    pub fn open() -> Self {
        match LocalStorage::open() {
            Some(local) => PageStorage::Local(local),
            None => {
                log::warn!("[prefs] falling back to in-memory preferences");
                PageStorage::Memory(garden_core::MemoryStorage::new())
            }
        }
    }
}

impl KeyValueStorage for PageStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, PrefsError> {
        match self {
            PageStorage::Local(s) => s.get_item(key),
            PageStorage::Memory(s) => s.get_item(key),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        match self {
            PageStorage::Local(s) => s.set_item(key, value),
            PageStorage::Memory(s) => s.set_item(key, value),
        }
    }
}
