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

//! Log targets, the sinks a logger writes entries into.

use std::fmt;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

pub(crate) mod console;
mod file;
mod pipe;
mod testing;

pub use self::console::Console;
pub use self::file::RotatingFile;
pub use self::pipe::Pipe;
pub use self::testing::Capture;
pub use self::testing::CaptureHandle;
pub use self::testing::CapturedEntry;

use crate::layout::Layout;
use crate::logger::Logger;
use crate::record::Record;
use crate::settings::LoggerSettings;
use crate::severity::Severity;

/// A trait representing a sink that log entries can be dispatched to.
///
/// A target filters entries through its own [`TargetState`] and then writes
/// the ones that pass to wherever it points.
pub trait Target: fmt::Debug + Send + Sync + 'static {
    /// Writes one entry to the sink, applying the target's own gates.
    fn log(&self, record: &Record) -> anyhow::Result<()>;

    /// The mute/threshold/fail-fast state and formatter override.
    fn state(&self) -> &TargetState;

    /// Flushes any buffered output.
    fn flush(&self) {}

    /// Periodic hook forwarded from the host, for sinks that poll.
    fn tick(&self) {}

    /// The logger this target forwards into, if it is a pipe.
    fn pipe_destination(&self) -> Option<&Arc<Logger>> {
        None
    }
}

/// Snapshot of the mutable knobs every target carries.
#[derive(Debug, Clone, Copy)]
pub struct TargetConfig {
    muted: bool,
    level: Severity,
    fail_fast: bool,
}

impl Default for TargetConfig {
    fn default() -> Self {
        TargetConfig {
            muted: false,
            level: Severity::Debug,
            fail_fast: false,
        }
    }
}

impl TargetConfig {
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

/// The filtering state shared by every target kind.
///
/// An entry passes when the target is not muted, the threshold is not
/// [`Severity::None`], and the entry's severity reaches the threshold.
/// Settings updates are atomic as seen by concurrent `log` calls.
#[derive(Debug, Default)]
pub struct TargetState {
    config: RwLock<TargetConfig>,
    layout: RwLock<Option<Layout>>,
}

impl TargetState {
    pub fn new() -> TargetState {
        TargetState::default()
    }

    #[must_use]
    pub(crate) fn with_layout(self, layout: Layout) -> TargetState {
        TargetState {
            config: self.config,
            layout: RwLock::new(Some(layout)),
        }
    }

    /// Returns the current config when an entry at `severity` passes the
    /// gates, or `None` when the entry must be dropped.
    pub(crate) fn admits(&self, severity: Severity) -> Option<TargetConfig> {
        let config = *self.config.read().unwrap_or_else(PoisonError::into_inner);
        if config.muted || !config.level.allows(severity) {
            return None;
        }
        Some(config)
    }

    /// Copies the mute/level/fail-fast knobs out of a settings record.
    pub fn apply(&self, settings: &LoggerSettings) {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        config.muted = settings.muted();
        config.level = settings.level();
        config.fail_fast = settings.fail_fast();
    }

    pub fn config(&self) -> TargetConfig {
        *self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs the formatter override, if one is set.
    pub(crate) fn render(&self, record: &Record) -> Option<String> {
        let layout = self.layout.read().unwrap_or_else(PoisonError::into_inner);
        layout.as_ref().map(|layout| layout.format(record))
    }

    // Registry-wide default; a target keeps its own override if it has one.
    pub(crate) fn adopt_default_layout(&self, layout: &Layout) {
        let mut slot = self.layout.write().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(layout.clone());
        }
    }
}
