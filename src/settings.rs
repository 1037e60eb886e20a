//! Settings collaborator: difficulty, mode and the custom opt-out lists, persisted as JSON.

use crate::catalog::Category;
use crate::store;
use crate::{Difficulty, GameMode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

pub const SETTINGS_FILE: &str = "settings.json";

/// Per-category list of disabled values. Only consulted when difficulty is `Custom`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomConfig {
    pub stances: Vec<String>,
    pub rotations: Vec<String>,
    pub degrees: Vec<String>,
    pub tricks: Vec<String>,
    pub grinds: Vec<String>,
}

impl CustomConfig {
    /// Disabled values for a category; tries has no list and is always empty.
    pub fn disabled(&self, category: Category) -> &[String] {
        match category {
            Category::Stance => &self.stances,
            Category::Rotation => &self.rotations,
            Category::Degree => &self.degrees,
            Category::Trick => &self.tricks,
            Category::Grind => &self.grinds,
            Category::Tries => &[],
        }
    }

    pub fn is_disabled(&self, category: Category, value: &str) -> bool {
        self.disabled(category).iter().any(|v| v == value)
    }

    fn list_mut(&mut self, category: Category) -> Option<&mut Vec<String>> {
        match category {
            Category::Stance => Some(&mut self.stances),
            Category::Rotation => Some(&mut self.rotations),
            Category::Degree => Some(&mut self.degrees),
            Category::Trick => Some(&mut self.tricks),
            Category::Grind => Some(&mut self.grinds),
            Category::Tries => None,
        }
    }

    /// Disable `value` if enabled, enable it if disabled. Returns false for tries.
    pub fn toggle(&mut self, category: Category, value: &str) -> bool {
        let Some(list) = self.list_mut(category) else {
            return false;
        };
        if list.iter().any(|v| v == value) {
            list.retain(|v| v != value);
        } else {
            list.push(value.to_string());
        }
        true
    }

    /// (enabled, total) faces of a category, counting duplicates once.
    pub fn enabled_count(&self, category: Category) -> (usize, usize) {
        let faces = category.faces();
        let enabled = faces
            .iter()
            .filter(|f| !self.is_disabled(category, f.value))
            .count();
        (enabled, faces.len())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub mode: GameMode,
    pub custom: CustomConfig,
}

/// Read side of the settings collaborator as seen by the spin coordinator.
/// `revision` changes on every mutation so readers can notice updates.
pub trait SettingsSource {
    fn current(&self) -> &Settings;
    fn revision(&self) -> u64;
}

/// Settings backed by an optional JSON file. Failures fall back to defaults and are logged.
#[derive(Debug)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    settings: Settings,
    revision: u64,
}

impl SettingsStore {
    /// Settings that live only in memory.
    pub fn in_memory(settings: Settings) -> Self {
        Self {
            path: None,
            settings,
            revision: 0,
        }
    }

    /// Load from `path`; missing or unreadable files yield defaults.
    pub fn load(path: PathBuf) -> Self {
        let settings = match store::load_json::<Settings>(&path) {
            Ok(Some(s)) => s,
            Ok(None) => Settings::default(),
            Err(e) => {
                warn!(error = %e, "failed to load settings, using defaults");
                Settings::default()
            }
        };
        Self {
            path: Some(path),
            settings,
            revision: 0,
        }
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if self.settings.difficulty != difficulty {
            self.settings.difficulty = difficulty;
            self.changed();
        }
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        if self.settings.mode != mode {
            self.settings.mode = mode;
            self.changed();
        }
    }

    pub fn toggle_custom(&mut self, category: Category, value: &str) {
        if self.settings.custom.toggle(category, value) {
            self.changed();
        }
    }

    fn changed(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        debug!(revision = self.revision, settings = ?self.settings, "settings changed");
        self.save();
    }

    fn save(&self) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = store::save_json(path, &self.settings) {
            warn!(error = %e, "failed to save settings");
        }
    }
}

impl SettingsSource for SettingsStore {
    fn current(&self) -> &Settings {
        &self.settings
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}
