//! Profile stores: the shipped (default) and operator (local) INI files.
//!
//! Section and key lookups are case-insensitive. A missing store file is an
//! empty store, and a profile that is not in a store reads as no items, so the
//! resolver can fall through to built-in defaults.

mod parse;

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use parse::{parse_store, DEFAULT_SECTION};

/// Reserved section supplying proxy defaults to every profile in the same store.
pub const GLOBALS_SECTION: &str = "globals";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot read {path}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{origin}, line {line}: {message}")]
    Syntax {
        origin: String,
        line: usize,
        message: String,
    },
}

/// One `[name]` section with its items in file order.
#[derive(Debug, Clone, Default)]
pub struct Section {
    pub name: String,
    pub items: Vec<(String, String)>,
}

/// A parsed store file.
#[derive(Debug, Clone, Default)]
pub struct Store {
    sections: Vec<Section>,
    defaults: Vec<(String, String)>,
}

impl Store {
    /// Read a store from disk; a file that does not exist yields an empty store.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("profile store {} not found; treating as empty", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        let store = parse_store(&text, &path.display().to_string())?;
        tracing::debug!(
            "loaded {} profile section(s) from {}",
            store.sections.len(),
            path.display()
        );
        Ok(store)
    }

    pub fn parse(text: &str) -> Result<Self, StoreError> {
        parse_store(text, "<memory>")
    }

    /// Section names in file order, with their literal spelling.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    /// First section whose name matches `name` ignoring case.
    pub fn find_section(&self, name: &str) -> Option<&Section> {
        let low = name.to_lowercase();
        self.sections.iter().find(|s| s.name.to_lowercase() == low)
    }

    /// Items of profile `name` (with `[DEFAULT]` inheritance), or nothing if the
    /// store has no such section.
    pub fn profile_items(&self, name: &str) -> Vec<(String, String)> {
        let Some(section) = self.find_section(name) else {
            return Vec::new();
        };
        let mut items = self.defaults.clone();
        for (key, value) in &section.items {
            match items.iter_mut().find(|(k, _)| k == key) {
                Some(slot) => slot.1 = value.clone(),
                None => items.push((key.clone(), value.clone())),
            }
        }
        items
    }

    pub fn globals(&self) -> Vec<(String, String)> {
        self.profile_items(GLOBALS_SECTION)
    }
}

/// Both stores, read once per invocation.
#[derive(Debug, Clone, Default)]
pub struct ProfileStores {
    pub default: Store,
    pub local: Store,
}

impl ProfileStores {
    pub fn load(default_path: &Path, local_path: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            default: Store::load(default_path)?,
            local: Store::load(local_path)?,
        })
    }

    /// Profile names across both stores, default store first, deduplicated
    /// ignoring case while keeping the earliest spelling. `globals` is not a profile.
    pub fn list_profiles(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        let mut names = Vec::new();
        for name in self.default.section_names().chain(self.local.section_names()) {
            let low = name.to_lowercase();
            if low == GLOBALS_SECTION || name == DEFAULT_SECTION || seen.contains(&low) {
                continue;
            }
            seen.push(low);
            names.push(name.to_string());
        }
        names
    }

    /// True if either store has a section named `name` (ignoring case).
    pub fn is_saved_profile(&self, name: &str) -> bool {
        self.default.find_section(name).is_some() || self.local.find_section(name).is_some()
    }
}
