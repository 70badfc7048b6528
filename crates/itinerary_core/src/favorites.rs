//! crates/itinerary_core/src/favorites.rs
//!
//! The favorites store: an ordered collection of saved itineraries persisted
//! through a `FavoritesSlot`.
//!
//! Entries are kept newest-first. Every mutation builds the next collection,
//! writes it to the slot and only then replaces the in-memory copy, so a
//! failed write leaves the store untouched.

use serde::Deserialize;
use tracing::warn;

use crate::domain::FavoriteEntry;
use crate::ports::{FavoritesSlot, PortError, PortResult};

/// The slot key the collection lives under.
pub const FAVORITES_KEY: &str = "favorites";

/// How `save` treats a text that is already stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FavoritesPolicy {
    pub allow_duplicates: bool,
}

impl Default for FavoritesPolicy {
    fn default() -> Self {
        Self {
            allow_duplicates: true,
        }
    }
}

/// Persisted layouts accepted on load. Older clients stored plain texts.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredFavorites {
    Entries(Vec<FavoriteEntry>),
    Texts(Vec<String>),
}

pub struct FavoritesStore<S: FavoritesSlot> {
    slot: S,
    policy: FavoritesPolicy,
    entries: Vec<FavoriteEntry>,
}

impl<S: FavoritesSlot> FavoritesStore<S> {
    /// Loads the collection from `slot`.
    ///
    /// Missing, unreadable or corrupt data yields an empty store. A legacy
    /// list of plain texts is upgraded to full entries and written back so
    /// the new ids stay stable across reopens.
    pub fn open(slot: S, policy: FavoritesPolicy) -> Self {
        let mut upgraded = false;
        let entries = match slot.read(FAVORITES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<StoredFavorites>(&raw) {
                Ok(StoredFavorites::Entries(entries)) => entries,
                Ok(StoredFavorites::Texts(texts)) => {
                    upgraded = true;
                    texts.into_iter().map(FavoriteEntry::new).collect()
                }
                Err(e) => {
                    warn!("Discarding corrupt favorites data: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Could not read favorites, starting empty: {}", e);
                Vec::new()
            }
        };

        let mut store = Self {
            slot,
            policy,
            entries,
        };
        if upgraded {
            if let Err(e) = write_entries(&mut store.slot, &store.entries) {
                warn!("Could not persist upgraded favorites: {}", e);
            }
        }
        store
    }

    /// Newest first.
    pub fn list(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&FavoriteEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Saves `text` as a new favorite at the front of the list.
    ///
    /// When duplicates are disallowed and the exact text is already stored,
    /// the existing entry is returned and nothing is written.
    pub fn save(&mut self, text: impl Into<String>) -> PortResult<FavoriteEntry> {
        let text = text.into();
        if !self.policy.allow_duplicates {
            if let Some(existing) = self.entries.iter().find(|entry| entry.text == text) {
                return Ok(existing.clone());
            }
        }

        let entry = FavoriteEntry::new(text);
        let mut next = Vec::with_capacity(self.entries.len() + 1);
        next.push(entry.clone());
        next.extend(self.entries.iter().cloned());
        self.commit(next)?;
        Ok(entry)
    }

    /// Replaces the text of an entry, keeping its id and creation time.
    pub fn edit(&mut self, id: &str, new_text: impl Into<String>) -> PortResult<FavoriteEntry> {
        let position = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| PortError::NotFound(format!("favorite {id}")))?;

        let mut next = self.entries.clone();
        next[position].text = new_text.into();
        let edited = next[position].clone();
        self.commit(next)?;
        Ok(edited)
    }

    /// Removes an entry. Unknown ids are ignored.
    pub fn delete(&mut self, id: &str) -> PortResult<()> {
        if self.get(id).is_none() {
            return Ok(());
        }
        let next = self
            .entries
            .iter()
            .filter(|entry| entry.id != id)
            .cloned()
            .collect();
        self.commit(next)
    }

    fn commit(&mut self, next: Vec<FavoriteEntry>) -> PortResult<()> {
        write_entries(&mut self.slot, &next)?;
        self.entries = next;
        Ok(())
    }

    pub fn into_slot(self) -> S {
        self.slot
    }
}

fn write_entries<S: FavoritesSlot>(slot: &mut S, entries: &[FavoriteEntry]) -> PortResult<()> {
    let serialized =
        serde_json::to_string(entries).map_err(|e| PortError::Unexpected(e.to_string()))?;
    slot.write(FAVORITES_KEY, &serialized)
}

//=========================================================================================
// In-Memory Slot
//=========================================================================================

/// A `FavoritesSlot` kept in memory. Useful for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    values: std::collections::HashMap<String, String>,
}

impl MemorySlot {
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut slot = Self::default();
        slot.values.insert(key.to_string(), value.to_string());
        slot
    }
}

impl FavoritesSlot for MemorySlot {
    fn read(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> PortResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
