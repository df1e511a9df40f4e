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

#[cfg(feature = "colored")]
use colored::Color;
#[cfg(feature = "colored")]
use colored::Colorize;

use crate::layout::Layout;
use crate::record::Record;
#[cfg(feature = "colored")]
use crate::severity::Severity;

/// A layout that emits the severity tag of the record.
///
/// The short form is the four-letter code (`TRAC`, `DEBG`, `INFO`, `WARN`,
/// `ERRO`, `FATL`); entries at `Severity::None` yield an empty string. The
/// long form spells out the level name instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeverityTagLayout {
    long: bool,
    #[cfg(feature = "colored")]
    colors: Option<SeverityColor>,
}

/// Customize the color of each severity tag.
#[cfg(feature = "colored")]
#[derive(Debug, Clone, Copy)]
pub struct SeverityColor {
    pub fatal: Color,
    pub error: Color,
    pub warn: Color,
    pub info: Color,
    pub debug: Color,
    pub trace: Color,
}

#[cfg(feature = "colored")]
impl Default for SeverityColor {
    fn default() -> Self {
        SeverityColor {
            fatal: Color::Red,
            error: Color::Red,
            warn: Color::Yellow,
            info: Color::Green,
            debug: Color::Blue,
            trace: Color::Magenta,
        }
    }
}

impl SeverityTagLayout {
    pub fn new() -> SeverityTagLayout {
        SeverityTagLayout::default()
    }

    /// Emits the spelled-out level name instead of the four-letter code.
    #[must_use]
    pub fn long(mut self) -> SeverityTagLayout {
        self.long = true;
        self
    }

    /// Colors the tag by severity with the default palette.
    #[cfg(feature = "colored")]
    #[must_use]
    pub fn colored(mut self) -> SeverityTagLayout {
        self.colors = Some(SeverityColor::default());
        self
    }

    /// Colors the tag by severity with a custom palette.
    #[cfg(feature = "colored")]
    #[must_use]
    pub fn colors(mut self, colors: SeverityColor) -> SeverityTagLayout {
        self.colors = Some(colors);
        self
    }

    pub(crate) fn format(&self, record: &Record) -> String {
        let tag = if self.long {
            record.severity().name().to_string()
        } else {
            record.severity().short_code().unwrap_or_default().to_string()
        };
        #[cfg(feature = "colored")]
        if let Some(colors) = self.colors {
            return colorize(&tag, record.severity(), colors);
        }
        tag
    }
}

#[cfg(feature = "colored")]
fn colorize(tag: &str, severity: Severity, colors: SeverityColor) -> String {
    let color = match severity {
        Severity::Trace => colors.trace,
        Severity::Debug => colors.debug,
        Severity::Info => colors.info,
        Severity::Warn => colors.warn,
        Severity::Error => colors.error,
        Severity::Fatal => colors.fatal,
        Severity::None => return tag.to_string(),
    };
    tag.color(color).to_string()
}

impl From<SeverityTagLayout> for Layout {
    fn from(layout: SeverityTagLayout) -> Self {
        Layout::SeverityTag(layout)
    }
}

#[cfg(all(test, feature = "colored"))]
mod tests {
    use super::SeverityTagLayout;
    use crate::record::Record;
    use crate::severity::Severity;

    #[test]
    fn test_colored_tag_carries_ansi_codes() {
        colored::control::set_override(true);
        let layout = SeverityTagLayout::new().colored();
        let tag = layout.format(&Record::new(Severity::Error, "boom"));
        colored::control::unset_override();

        assert!(tag.starts_with('\u{1b}'));
        assert!(tag.contains("ERRO"));
    }

    #[test]
    fn test_uncolored_tag_stays_plain() {
        colored::control::set_override(true);
        let layout = SeverityTagLayout::new();
        let tag = layout.format(&Record::new(Severity::Error, "boom"));
        colored::control::unset_override();

        assert_eq!(tag, "ERRO");
    }
}
