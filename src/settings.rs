// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;
use serde::Serialize;

use crate::identity::LoggerId;
use crate::severity::Severity;

/// One persisted configuration record for a logger identity.
///
/// Records are addressed: applying a record to a logger with a different
/// identity is a no-op rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    identity: LoggerId,
    muted: bool,
    level: Severity,
    fail_fast: bool,
}

impl LoggerSettings {
    /// Level a fresh settings record starts at.
    pub const DEFAULT_LEVEL: Severity = Severity::Info;

    /// Creates the stock record for `identity`: unmuted, default level, no
    /// fail-fast.
    pub fn create_default(identity: LoggerId) -> LoggerSettings {
        LoggerSettings {
            identity,
            muted: false,
            level: LoggerSettings::DEFAULT_LEVEL,
            fail_fast: false,
        }
    }

    #[must_use]
    pub fn with_muted(mut self, muted: bool) -> LoggerSettings {
        self.muted = muted;
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: Severity) -> LoggerSettings {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_fail_fast(mut self, fail_fast: bool) -> LoggerSettings {
        self.fail_fast = fail_fast;
        self
    }

    /// Whether this record is addressed to `identity`.
    pub fn applies_to(&self, identity: &LoggerId) -> bool {
        self.identity == *identity
    }

    pub fn identity(&self) -> &LoggerId {
        &self.identity
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    pub fn fail_fast(&self) -> bool {
        self.fail_fast
    }
}

/// Source of persisted [`LoggerSettings`] records.
///
/// A missing record means "use defaults"; stores never invent records.
pub trait SettingsStore: fmt::Debug + Send + Sync + 'static {
    /// Looks up the record addressed to `identity`.
    fn find_setting(&self, identity: &LoggerId) -> Option<LoggerSettings>;

    /// Whether a record addressed to `identity` exists.
    fn has_setting(&self, identity: &LoggerId) -> bool {
        self.find_setting(identity).is_some()
    }
}

/// An in-memory store, for tests and hosts that configure in code.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<LoggerSettings>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    #[must_use]
    pub fn with(mut self, settings: LoggerSettings) -> MemoryStore {
        self.records.push(settings);
        self
    }
}

impl SettingsStore for MemoryStore {
    fn find_setting(&self, identity: &LoggerId) -> Option<LoggerSettings> {
        self.records
            .iter()
            .find(|record| record.applies_to(identity))
            .cloned()
    }
}

/// A store backed by one JSON file holding the ordered settings list.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: Vec<LoggerSettings>,
}

impl JsonFileStore {
    /// Loads the store at `path`, creating an empty settings file when none
    /// exists.
    pub fn load_or_create(path: impl Into<PathBuf>) -> anyhow::Result<JsonFileStore> {
        let path = path.into();
        if !path.exists() {
            let store = JsonFileStore {
                path,
                records: vec![],
            };
            store.save()?;
            return Ok(store);
        }
        let content = fs::read_to_string(&path).context("failed to read settings file")?;
        let records = serde_json::from_str(&content).context("failed to parse settings file")?;
        Ok(JsonFileStore { path, records })
    }

    /// Loads the store at `path`, degrading to an empty store on any failure.
    pub fn load_or_default(path: impl Into<PathBuf>) -> JsonFileStore {
        let path = path.into();
        match JsonFileStore::load_or_create(path.clone()) {
            Ok(store) => store,
            Err(err) => {
                eprintln!("failed to load log settings from {}: {err}", path.display());
                JsonFileStore {
                    path,
                    records: vec![],
                }
            }
        }
    }

    /// Writes the current records back to the backing file.
    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).context("failed to create settings directory")?;
            }
        }
        let content = serde_json::to_string_pretty(&self.records)
            .context("failed to serialize log settings")?;
        fs::write(&self.path, content).context("failed to write settings file")?;
        Ok(())
    }

    /// Replaces the record addressed to the same identity, or appends a new
    /// one.
    pub fn upsert(&mut self, settings: LoggerSettings) {
        let identity = settings.identity().clone();
        match self
            .records
            .iter_mut()
            .find(|record| record.applies_to(&identity))
        {
            Some(record) => *record = settings,
            None => self.records.push(settings),
        }
    }

    pub fn records(&self) -> &[LoggerSettings] {
        &self.records
    }
}

impl SettingsStore for JsonFileStore {
    fn find_setting(&self, identity: &LoggerId) -> Option<LoggerSettings> {
        self.records
            .iter()
            .find(|record| record.applies_to(identity))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::JsonFileStore;
    use super::LoggerSettings;
    use super::MemoryStore;
    use super::SettingsStore;
    use crate::identity::LoggerId;
    use crate::severity::Severity;

    #[test]
    fn test_default_record() {
        let settings = LoggerSettings::create_default(LoggerId::new("app"));
        assert!(!settings.muted());
        assert_eq!(settings.level(), Severity::Info);
        assert!(!settings.fail_fast());
    }

    #[test]
    fn test_applies_to_is_exact() {
        let settings = LoggerSettings::create_default(LoggerId::new("app"));
        assert!(settings.applies_to(&LoggerId::new("app")));
        assert!(!settings.applies_to(&LoggerId::new("app.network")));
        assert!(!settings.applies_to(&LoggerId::new("ap")));
    }

    #[test]
    fn test_json_shape() {
        let settings = LoggerSettings::create_default(LoggerId::new("app"))
            .with_level(Severity::Warn)
            .with_fail_fast(true);
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(
            json,
            r#"{"identity":"app","muted":false,"level":"warn","fail_fast":true}"#
        );
    }

    #[test]
    fn test_memory_store_lookup() {
        let store = MemoryStore::new()
            .with(LoggerSettings::create_default(LoggerId::new("app")).with_muted(true));
        assert!(store.has_setting(&LoggerId::new("app")));
        assert!(!store.has_setting(&LoggerId::new("other")));
        let found = store.find_setting(&LoggerId::new("app")).unwrap();
        assert!(found.muted());
    }

    #[test]
    fn test_json_store_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config").join("loggers.json");

        let mut store = JsonFileStore::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert!(store.records().is_empty());

        store.upsert(LoggerSettings::create_default(LoggerId::new("app")).with_level(Severity::Error));
        store.upsert(LoggerSettings::create_default(LoggerId::new("net")));
        store.upsert(LoggerSettings::create_default(LoggerId::new("app")).with_muted(true));
        store.save().unwrap();

        let reloaded = JsonFileStore::load_or_create(&path).unwrap();
        assert_eq!(reloaded.records().len(), 2);
        let app = reloaded.find_setting(&LoggerId::new("app")).unwrap();
        assert!(app.muted());
        assert_eq!(app.level(), Severity::Info);
    }

    #[test]
    fn test_json_store_degrades_on_corrupt_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("loggers.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::load_or_default(&path);
        assert!(store.records().is_empty());
    }
}
