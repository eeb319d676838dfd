//! Log storage
//!
//! Session logs are stored as text under
//! `{patient}/{game}/{session timestamp}/{channel}.txt`. The [`LogStore`]
//! trait hides where that tree lives; [`DirectoryStore`] keeps it on the
//! local filesystem.

pub mod directory;

pub use directory::DirectoryStore;

use crate::codec::LogEncoder;
use crate::session::{SessionContext, SessionLog};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// File name prefix written by the headset logger
pub const HEADSET_LOG_PREFIX: &str = "quest_game_log_";

/// Extension of stored logs
pub const LOG_EXTENSION: &str = "txt";

/// Location of one channel log of one session
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StorageKey {
    pub patient_id: String,
    pub game_name: String,
    /// Session start, formatted with [`crate::session::SESSION_TIMESTAMP_FORMAT`]
    pub session_stamp: String,
    pub channel: String,
}

impl StorageKey {
    /// Build a key, rejecting components that would escape the tree
    pub fn new(
        patient_id: impl Into<String>,
        game_name: impl Into<String>,
        session_stamp: impl Into<String>,
        channel: impl Into<String>,
    ) -> crate::Result<Self> {
        let key = Self {
            patient_id: patient_id.into(),
            game_name: game_name.into(),
            session_stamp: session_stamp.into(),
            channel: channel.into(),
        };
        for component in key.components() {
            validate_component(component)?;
        }
        Ok(key)
    }

    /// Key for `channel` of the session described by `context`
    pub fn for_session(context: &SessionContext, channel: &str) -> crate::Result<Self> {
        Self::new(
            context.patient_id.clone(),
            context.game_name.clone(),
            context.session_stamp(),
            channel,
        )
    }

    fn components(&self) -> [&str; 4] {
        [&self.patient_id, &self.game_name, &self.session_stamp, &self.channel]
    }

    /// Path relative to the store root
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(&self.patient_id)
            .join(&self.game_name)
            .join(&self.session_stamp)
            .join(format!("{}.{}", self.channel, LOG_EXTENSION))
    }

    /// Parse a relative path back into a key
    pub fn from_relative_path(path: &Path) -> Option<Self> {
        let parts: Vec<&str> = path
            .components()
            .map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?;

        match parts.as_slice() {
            [patient, game, stamp, file] => {
                let channel = channel_from_file_name(file)?;
                Self::new(*patient, *game, *stamp, channel).ok()
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.relative_path().display())
    }
}

fn validate_component(component: &str) -> crate::Result<()> {
    let invalid = component.is_empty()
        || component == "."
        || component == ".."
        || component.contains(['/', '\\'])
        || component.chars().any(char::is_control);
    if invalid {
        return Err(crate::Error::Storage(format!(
            "invalid path component: {:?}",
            component
        )));
    }
    Ok(())
}

/// Channel name from a log file name.
///
/// `quest_game_log_right.txt` and `right.txt` both give `right`.
pub fn channel_from_file_name(file_name: &str) -> Option<String> {
    let stem = file_name.strip_suffix(&format!(".{}", LOG_EXTENSION))?;
    let channel = stem.strip_prefix(HEADSET_LOG_PREFIX).unwrap_or(stem);
    if channel.is_empty() {
        None
    } else {
        Some(channel.to_string())
    }
}

/// Backend holding session log texts
pub trait LogStore {
    /// Write (or replace) the text at `key`
    fn put(&self, key: &StorageKey, text: &str) -> crate::Result<()>;

    /// Read the text at `key`
    fn get(&self, key: &StorageKey) -> crate::Result<String>;

    /// Every stored key, sorted
    fn list(&self) -> crate::Result<Vec<StorageKey>>;
}

/// Encode and store every channel log of a finished session
pub fn store_session<S: LogStore + ?Sized>(
    store: &S,
    context: &SessionContext,
    logs: &[SessionLog],
    encoder: &mut LogEncoder,
) -> crate::Result<Vec<StorageKey>> {
    let mut keys = Vec::with_capacity(logs.len());
    for log in logs {
        let key = StorageKey::for_session(context, &log.logger_name)?;
        store.put(&key, &encoder.encode(log))?;
        tracing::info!(key = %key, points = log.points, "Stored session log");
        keys.push(key);
    }
    Ok(keys)
}
