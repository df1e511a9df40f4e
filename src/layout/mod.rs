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

//! Layouts assembling the final text of a log line.

pub use composite::CompositeLayout;
pub use custom::CustomLayout;
pub use raw::RawTextLayout;
#[cfg(feature = "colored")]
pub use tag::SeverityColor;
pub use tag::SeverityTagLayout;
pub use timestamp::TimestampLayout;

mod composite;
mod custom;
mod raw;
mod tag;
mod timestamp;

use crate::record::Record;

/// Represents a layout turning one record into a line of text.
///
/// Layouts are pure functions of the record and the wall clock; they are safe
/// to call from any number of threads at once.
#[derive(Debug, Clone)]
pub enum Layout {
    RawText(RawTextLayout),
    SeverityTag(SeverityTagLayout),
    Timestamp(TimestampLayout),
    Composite(CompositeLayout),
    Custom(CustomLayout),
}

impl Layout {
    /// Formats one record.
    pub fn format(&self, record: &Record) -> String {
        match self {
            Layout::RawText(layout) => layout.format(record),
            Layout::SeverityTag(layout) => layout.format(record),
            Layout::Timestamp(layout) => layout.format(record),
            Layout::Composite(layout) => layout.format(record),
            Layout::Custom(layout) => layout.format(record),
        }
    }

    /// Chains `other` after `self`, joining the two outputs with `delimiter`.
    ///
    /// # Examples
    ///
    /// ```
    /// use perceptor::layout::Layout;
    /// use perceptor::layout::RawTextLayout;
    /// use perceptor::layout::SeverityTagLayout;
    /// use perceptor::Record;
    /// use perceptor::Severity;
    ///
    /// let layout = Layout::from(SeverityTagLayout::new()).append(RawTextLayout, "> ");
    /// let record = Record::new(Severity::Info, "ready");
    /// assert_eq!(layout.format(&record), "INFO> ready");
    /// ```
    #[must_use]
    pub fn append(self, other: impl Into<Layout>, delimiter: impl Into<String>) -> Layout {
        CompositeLayout::new()
            .delimiter(delimiter)
            .push(self)
            .push(other)
            .into()
    }
}
