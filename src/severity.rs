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
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// The severity of a log entry, or the threshold of a logger or target.
///
/// Levels are totally ordered from [`Severity::Trace`] up to [`Severity::Fatal`].
/// [`Severity::None`] sorts above everything else; used as a threshold it
/// suppresses every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    /// Not a real level; a threshold set to `None` lets nothing through.
    None,
}

impl Severity {
    /// Whether a threshold set to `self` lets an entry at `entry` through.
    ///
    /// # Examples
    ///
    /// ```
    /// use perceptor::Severity;
    ///
    /// assert!(Severity::Info.allows(Severity::Error));
    /// assert!(!Severity::Info.allows(Severity::Debug));
    /// assert!(!Severity::None.allows(Severity::Fatal));
    /// ```
    pub fn allows(self, entry: Severity) -> bool {
        self != Severity::None && self <= entry
    }

    /// The four-letter tag used as a line prefix. [`Severity::None`] has no tag.
    pub fn short_code(self) -> Option<&'static str> {
        match self {
            Severity::Trace => Some("TRAC"),
            Severity::Debug => Some("DEBG"),
            Severity::Info => Some("INFO"),
            Severity::Warn => Some("WARN"),
            Severity::Error => Some("ERRO"),
            Severity::Fatal => Some("FATL"),
            Severity::None => None,
        }
    }

    /// The spelled-out level name.
    pub fn name(self) -> &'static str {
        match self {
            Severity::Trace => "Trace",
            Severity::Debug => "Debug",
            Severity::Info => "Info",
            Severity::Warn => "Warn",
            Severity::Error => "Error",
            Severity::Fatal => "Fatal",
            Severity::None => "None",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Severity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            "none" => Ok(Severity::None),
            _ => Err(anyhow::anyhow!("unknown severity: {s}")),
        }
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Severity {
        match level {
            log::Level::Error => Severity::Error,
            log::Level::Warn => Severity::Warn,
            log::Level::Info => Severity::Info,
            log::Level::Debug => Severity::Debug,
            log::Level::Trace => Severity::Trace,
        }
    }
}
