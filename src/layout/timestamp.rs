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

use jiff::tz::TimeZone;
use jiff::Zoned;

use crate::layout::Layout;
use crate::record::Record;

const DEFAULT_PATTERN: &str = "%H:%M:%S";

/// A layout that emits the wall-clock time of formatting.
///
/// The pattern is a strftime string, `%H:%M:%S` by default. The system
/// timezone is used unless one is set explicitly.
#[derive(Debug, Clone)]
pub struct TimestampLayout {
    pattern: String,
    tz: Option<TimeZone>,
}

impl Default for TimestampLayout {
    fn default() -> Self {
        TimestampLayout {
            pattern: DEFAULT_PATTERN.to_string(),
            tz: None,
        }
    }
}

impl TimestampLayout {
    pub fn new() -> TimestampLayout {
        TimestampLayout::default()
    }

    /// Replaces the strftime pattern.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> TimestampLayout {
        self.pattern = pattern.into();
        self
    }

    /// Renders timestamps in `tz` instead of the system timezone.
    #[must_use]
    pub fn timezone(mut self, tz: TimeZone) -> TimestampLayout {
        self.tz = Some(tz);
        self
    }

    pub(crate) fn format(&self, _record: &Record) -> String {
        let now = match self.tz.clone() {
            Some(tz) => Zoned::now().with_time_zone(tz),
            None => Zoned::now(),
        };

        // A broken pattern degrades to the default instead of failing the line.
        match jiff::fmt::strtime::format(&self.pattern, &now) {
            Ok(out) => out,
            Err(_) => now.strftime(DEFAULT_PATTERN).to_string(),
        }
    }
}

impl From<TimestampLayout> for Layout {
    fn from(layout: TimestampLayout) -> Self {
        Layout::Timestamp(layout)
    }
}
