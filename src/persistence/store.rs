//! Profile file on disk (pretty JSON)

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::error::{BossRushError, Result};
use crate::persistence::profile::{Profile, PROFILE_VERSION};

/// Reads and writes one profile file
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the profile; a missing file is an empty profile
    pub fn load(&self) -> Result<Profile> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No profile yet, starting fresh");
                return Ok(Profile::new());
            }
            Err(e) => return Err(e.into()),
        };

        let profile = parse_profile(&contents)?;
        tracing::debug!(path = %self.path.display(), "Profile loaded");
        Ok(profile)
    }

    /// Write the profile, creating parent directories as needed
    pub fn save(&self, profile: &Profile) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(profile)?;
        fs::write(&self.path, json)?;
        tracing::info!(path = %self.path.display(), "Profile saved");
        Ok(())
    }

    /// Load, apply `change`, save
    pub fn update<F>(&self, change: F) -> Result<Profile>
    where
        F: FnOnce(&mut Profile),
    {
        let mut profile = self.load()?;
        change(&mut profile);
        self.save(&profile)?;
        Ok(profile)
    }
}

/// Parse profile JSON, rejecting other layout versions
pub fn parse_profile(contents: &str) -> Result<Profile> {
    #[derive(serde::Deserialize)]
    struct VersionOnly {
        version: u32,
    }

    let header: VersionOnly = serde_json::from_str(contents)?;
    if header.version != PROFILE_VERSION {
        return Err(BossRushError::ProfileVersionMismatch {
            expected: PROFILE_VERSION,
            found: header.version,
        });
    }

    let mut profile: Profile = serde_json::from_str(contents)?;
    profile.options = profile.options.normalized();
    Ok(profile)
}
