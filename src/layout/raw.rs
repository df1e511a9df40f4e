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

/// A layout that emits the record message unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawTextLayout;

impl RawTextLayout {
    pub(crate) fn format(&self, record: &Record) -> String {
        record.message().to_string()
    }
}

impl From<RawTextLayout> for Layout {
    fn from(layout: RawTextLayout) -> Self {
        Layout::RawText(layout)
    }
}
