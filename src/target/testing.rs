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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

use crate::layout::Layout;
use crate::record::Record;
use crate::severity::Severity;
use crate::target::Target;
use crate::target::TargetState;

/// A target that keeps every admitted line in memory, for assertions in
/// tests.
///
/// Grab a [`CaptureHandle`] before attaching the target; the handle stays
/// readable afterwards.
///
/// # Examples
///
/// ```
/// use perceptor::target::Capture;
///
/// let capture = Capture::new();
/// let handle = capture.handle();
/// ```
#[derive(Debug, Default)]
pub struct Capture {
    state: TargetState,
    entries: Arc<Mutex<Vec<CapturedEntry>>>,
}

/// One line a [`Capture`] target accepted.
#[derive(Debug, Clone)]
pub struct CapturedEntry {
    severity: Severity,
    line: String,
}

impl CapturedEntry {
    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn line(&self) -> &str {
        &self.line
    }
}

impl Capture {
    pub fn new() -> Capture {
        Capture::default()
    }

    /// Sets the formatter this capture uses instead of the raw message.
    #[must_use]
    pub fn with_layout(mut self, layout: impl Into<Layout>) -> Capture {
        self.state = self.state.with_layout(layout.into());
        self
    }

    pub fn handle(&self) -> CaptureHandle {
        CaptureHandle {
            entries: self.entries.clone(),
        }
    }
}

impl Target for Capture {
    fn log(&self, record: &Record) -> anyhow::Result<()> {
        if self.state.admits(record.severity()).is_none() {
            return Ok(());
        }
        let line = match self.state.render(record) {
            Some(line) => line,
            None => record.message().to_string(),
        };
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CapturedEntry {
                severity: record.severity(),
                line,
            });
        Ok(())
    }

    fn state(&self) -> &TargetState {
        &self.state
    }
}

/// Reads back what a [`Capture`] target has collected.
#[derive(Debug, Clone)]
pub struct CaptureHandle {
    entries: Arc<Mutex<Vec<CapturedEntry>>>,
}

impl CaptureHandle {
    pub fn collect(&self) -> Vec<CapturedEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.collect()
            .into_iter()
            .map(|entry| entry.line)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
