//! Profile persistence for the GUI.
//!
//! The user profile is kept as a small JSON file next to the working
//! directory. A missing file is the normal first-run case and falls back
//! to the default profile; a failed write is logged and the in-memory
//! value still applies for the running session.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use log::warn;
use pulse_core::profile::UserProfile;

pub const DEFAULT_SETTINGS_FILE: &str = "pulse_profile.json";

#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    profile: UserProfile,
}

impl SettingsStore {
    /// Loads the profile from `path`, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let profile = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(profile) => profile,
                Err(err) => {
                    warn!("ignoring malformed profile at {}: {err}", path.display());
                    UserProfile::default()
                }
            },
            Err(_) => UserProfile::default(),
        };

        Self { path, profile }
    }

    pub fn profile(&self) -> UserProfile {
        self.profile
    }

    pub fn age(&self) -> u8 {
        self.profile.age
    }

    /// Applies a new age and persists it.
    ///
    /// Validation failure leaves the stored profile untouched. A persist
    /// failure is logged and swallowed, keeping the new age in memory.
    pub fn set_age(&mut self, age: u8) -> Result<()> {
        self.profile = UserProfile::with_age(age)?;
        if let Err(err) = self.persist() {
            warn!("profile not saved: {err:#}");
        }
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        let serialized = serde_json::to_string_pretty(&self.profile)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("failed to write profile to {}", self.path.display()))
    }
}
