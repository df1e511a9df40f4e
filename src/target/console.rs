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

use std::io::Write;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use crate::layout::Layout;
use crate::record::Record;
use crate::severity::Severity;
use crate::target::Target;
use crate::target::TargetState;

static SILENCED: AtomicUsize = AtomicUsize::new(0);

// Serializes tests that assert on the process-wide silence latch.
#[cfg(test)]
pub(crate) static SILENCE_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Keeps the console sink silenced until dropped. Guards nest.
pub(crate) struct SilenceGuard(());

pub(crate) fn silence() -> SilenceGuard {
    SILENCED.fetch_add(1, Ordering::SeqCst);
    SilenceGuard(())
}

impl Drop for SilenceGuard {
    fn drop(&mut self) {
        SILENCED.fetch_sub(1, Ordering::SeqCst);
    }
}

pub(crate) fn silenced() -> bool {
    SILENCED.load(Ordering::SeqCst) > 0
}

// Used for lines that must reach the console without passing through any
// target, like pre-initialization fallbacks. Ignores the silence latch.
pub(crate) fn raw_emit(severity: Severity, line: &str) {
    let mut bytes = line.as_bytes().to_vec();
    bytes.push(b'\n');
    let _ = match severity {
        Severity::Warn | Severity::Error | Severity::Fatal => {
            std::io::stderr().write_all(&bytes)
        }
        _ => std::io::stdout().write_all(&bytes),
    };
}

/// A target that routes lines to the process console.
///
/// Trace, Debug and Info lines go to stdout; Warn, Error and Fatal lines go
/// to stderr. With the fail-fast flag set, Error and Fatal panic with the
/// built line instead of writing it.
///
/// # Examples
///
/// ```
/// use perceptor::target::Console;
///
/// let console = Console::new();
/// ```
#[derive(Debug, Default)]
pub struct Console {
    state: TargetState,
}

impl Console {
    pub fn new() -> Console {
        Console::default()
    }

    /// Sets the formatter this console uses instead of the registry-wide
    /// default.
    #[must_use]
    pub fn with_layout(mut self, layout: impl Into<Layout>) -> Console {
        self.state = self.state.with_layout(layout.into());
        self
    }
}

impl Target for Console {
    fn log(&self, record: &Record) -> anyhow::Result<()> {
        let Some(config) = self.state.admits(record.severity()) else {
            return Ok(());
        };
        if silenced() {
            return Ok(());
        }

        let line = match self.state.render(record) {
            Some(line) => line,
            None => record.message().to_string(),
        };
        if config.fail_fast() && matches!(record.severity(), Severity::Error | Severity::Fatal) {
            panic!("{line}");
        }

        let mut bytes = line.into_bytes();
        bytes.push(b'\n');
        match record.severity() {
            Severity::Trace | Severity::Debug | Severity::Info => {
                std::io::stdout().write_all(&bytes)?;
            }
            Severity::Warn | Severity::Error | Severity::Fatal => {
                std::io::stderr().write_all(&bytes)?;
            }
            Severity::None => {}
        }
        Ok(())
    }

    fn state(&self) -> &TargetState {
        &self.state
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
    }
}
