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

use std::borrow::Cow;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// A stable key naming one logical log stream.
///
/// Identities are plain strings, unique within a registry and never recycled
/// while the process lives. Well-known identities can be declared as
/// constants:
///
/// ```
/// use perceptor::LoggerId;
///
/// static NETWORK: LoggerId = LoggerId::from_static("network");
///
/// assert_eq!(NETWORK.as_str(), "network");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoggerId(Cow<'static, str>);

impl LoggerId {
    /// The identity of the fallback logger every registry owns.
    pub const DEFAULT: LoggerId = LoggerId::from_static("default");

    /// Creates an identity from a static string without allocating.
    pub const fn from_static(id: &'static str) -> LoggerId {
        LoggerId(Cow::Borrowed(id))
    }

    /// Creates an identity from a runtime string.
    pub fn new(id: impl Into<String>) -> LoggerId {
        LoggerId(Cow::Owned(id.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for LoggerId {
    fn from(id: &'static str) -> LoggerId {
        LoggerId(Cow::Borrowed(id))
    }
}

impl From<String> for LoggerId {
    fn from(id: String) -> LoggerId {
        LoggerId(Cow::Owned(id))
    }
}

#[cfg(test)]
mod tests {
    use super::LoggerId;

    #[test]
    fn test_identity_equality() {
        let borrowed = LoggerId::from_static("network");
        let owned = LoggerId::new(String::from("network"));
        assert_eq!(borrowed, owned);
        assert_ne!(borrowed, LoggerId::DEFAULT);
    }

    #[test]
    fn test_serde_transparent() {
        let id: LoggerId = serde_json::from_str("\"audio\"").unwrap();
        assert_eq!(id, LoggerId::from_static("audio"));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"audio\"");
    }
}
