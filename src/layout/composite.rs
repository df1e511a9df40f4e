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

use crate::layout::Layout;
use crate::record::Record;

/// A layout that chains other layouts, joining their outputs in order.
///
/// The delimiter (`#` unless replaced) goes between part outputs, never at
/// the ends. An empty chain formats to the empty string.
#[derive(Debug, Clone)]
pub struct CompositeLayout {
    parts: Vec<Layout>,
    delimiter: String,
}

impl Default for CompositeLayout {
    fn default() -> Self {
        CompositeLayout {
            parts: vec![],
            delimiter: "#".to_string(),
        }
    }
}

impl CompositeLayout {
    pub fn new() -> CompositeLayout {
        CompositeLayout::default()
    }

    /// Replaces the delimiter inserted between part outputs.
    #[must_use]
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> CompositeLayout {
        self.delimiter = delimiter.into();
        self
    }

    /// Adds a layout to the end of the chain.
    #[must_use]
    pub fn push(mut self, layout: impl Into<Layout>) -> CompositeLayout {
        self.parts.push(layout.into());
        self
    }

    pub(crate) fn format(&self, record: &Record) -> String {
        let mut out = String::new();
        for (index, part) in self.parts.iter().enumerate() {
            if index > 0 {
                out.push_str(&self.delimiter);
            }
            out.push_str(&part.format(record));
        }
        out
    }
}

impl From<CompositeLayout> for Layout {
    fn from(layout: CompositeLayout) -> Self {
        Layout::Composite(layout)
    }
}
