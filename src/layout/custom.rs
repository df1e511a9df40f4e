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

use std::fmt::Debug;
use std::fmt::Formatter;
use std::sync::Arc;

use crate::layout::Layout;
use crate::record::Record;

// TODO(tisonkun): use trait alias when it's stable - https://github.com/rust-lang/rust/issues/41517
//  then we can use the alias for both `dyn` and `impl`.
type FormatFunction = dyn Fn(&Record) -> String + Send + Sync + 'static;

/// A layout that you can pass the custom layout function.
///
/// The custom layout function accepts a [`Record`] and returns the formatted
/// line. For example:
///
/// ```rust
/// use perceptor::Record;
/// use perceptor::layout::CustomLayout;
///
/// let layout = CustomLayout::new(|record: &Record| {
///     format!("{} - {}", record.severity(), record.message())
/// });
/// ```
#[derive(Clone)]
pub struct CustomLayout {
    f: Arc<FormatFunction>,
}

impl Debug for CustomLayout {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "CustomLayout {{ ... }}")
    }
}

impl CustomLayout {
    pub fn new(layout: impl Fn(&Record) -> String + Send + Sync + 'static) -> Self {
        CustomLayout {
            f: Arc::new(layout),
        }
    }

    pub(crate) fn format(&self, record: &Record) -> String {
        (self.f)(record)
    }
}

impl From<CustomLayout> for Layout {
    fn from(layout: CustomLayout) -> Self {
        Layout::Custom(layout)
    }
}
