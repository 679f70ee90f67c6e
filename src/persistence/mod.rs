//! Persisted profile: the typed bridge between loadout, battle and results

pub mod profile;
pub mod store;

pub use profile::{AudioOptions, Profile, DEFAULT_VOLUME, PROFILE_VERSION};
pub use store::{parse_profile, ProfileStore};
