/// User settings persisted in storage.local
use crate::error::HostError;
use crate::host::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub const COPY_FORMAT_KEY: &str = "copyFormat";
pub const PASTE_BEHAVIOR_KEY: &str = "pasteBehavior";

/// How each copied tab is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyFormat {
    #[default]
    Text,
    Markdown,
    Html,
}

/// Where pasted URLs are opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasteBehavior {
    #[default]
    Current,
    New,
}

impl CopyFormat {
    pub const ALL: [CopyFormat; 3] = [CopyFormat::Text, CopyFormat::Markdown, CopyFormat::Html];

    pub fn as_str(self) -> &'static str {
        match self {
            CopyFormat::Text => "text",
            CopyFormat::Markdown => "markdown",
            CopyFormat::Html => "html",
        }
    }
}

impl PasteBehavior {
    pub const ALL: [PasteBehavior; 2] = [PasteBehavior::Current, PasteBehavior::New];

    pub fn as_str(self) -> &'static str {
        match self {
            PasteBehavior::Current => "current",
            PasteBehavior::New => "new",
        }
    }
}

impl fmt::Display for CopyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PasteBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CopyFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CopyFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| format!("unknown copy format: {}", s))
    }
}

impl FromStr for PasteBehavior {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PasteBehavior::ALL
            .into_iter()
            .find(|behavior| behavior.as_str() == s)
            .ok_or_else(|| format!("unknown paste behavior: {}", s))
    }
}

/// The complete settings record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub copy_format: CopyFormat,
    pub paste_behavior: PasteBehavior,
}

impl Settings {
    /// Build settings from raw stored values, using the default for any key
    /// that is missing or holds something we cannot read
    pub fn from_stored(stored: &Map<String, Value>) -> Settings {
        Settings {
            copy_format: read_key(stored, COPY_FORMAT_KEY),
            paste_behavior: read_key(stored, PASTE_BEHAVIOR_KEY),
        }
    }
}

fn read_key<T: DeserializeOwned + Default>(stored: &Map<String, Value>, key: &str) -> T {
    match stored.get(key) {
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            log::warn!("Ignoring stored {}: {}", key, e);
            T::default()
        }),
        None => T::default(),
    }
}

/// A partial settings update; only the fields that are set get written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy_format: Option<CopyFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paste_behavior: Option<PasteBehavior>,
}

impl SettingsPatch {
    pub fn copy_format(format: CopyFormat) -> Self {
        SettingsPatch {
            copy_format: Some(format),
            ..Default::default()
        }
    }

    pub fn paste_behavior(behavior: PasteBehavior) -> Self {
        SettingsPatch {
            paste_behavior: Some(behavior),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.copy_format.is_none() && self.paste_behavior.is_none()
    }

    fn to_items(self) -> Map<String, Value> {
        let mut items = Map::new();
        if let Some(format) = self.copy_format {
            items.insert(COPY_FORMAT_KEY.to_string(), Value::from(format.as_str()));
        }
        if let Some(behavior) = self.paste_behavior {
            items.insert(PASTE_BEHAVIOR_KEY.to_string(), Value::from(behavior.as_str()));
        }
        items
    }
}

/// Settings access over a key-value store
pub struct SettingsStore<S> {
    store: S,
}

impl<S: KeyValueStore> SettingsStore<S> {
    pub fn new(store: S) -> Self {
        SettingsStore { store }
    }

    /// Current settings; storage failures yield the defaults
    pub async fn get(&self) -> Settings {
        match self.store.get_all().await {
            Ok(stored) => Settings::from_stored(&stored),
            Err(e) => {
                log::warn!("Settings unavailable, using defaults: {}", e);
                Settings::default()
            }
        }
    }

    /// Persist only the fields present in `patch`
    pub async fn set(&self, patch: SettingsPatch) -> Result<(), HostError> {
        if patch.is_empty() {
            return Ok(());
        }
        self.store.set(patch.to_items()).await
    }
}
