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

use std::collections::HashMap;
use std::mem;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

use jiff::Zoned;

use crate::identity::LoggerId;
use crate::logger::Logger;
use crate::severity::Severity;
use crate::target::console;

/// Default number of entries buffered per identity before overflow.
pub const DEFAULT_PRECACHE_CAPACITY: usize = 1000;

/// A single buffered log line waiting for initialization to finish.
#[derive(Debug, Clone)]
pub struct PrecacheEntry {
    severity: Severity,
    message: String,
    context: Option<String>,
    captured_at: Zoned,
}

impl PrecacheEntry {
    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Wall-clock time the entry was captured, not replayed.
    pub fn captured_at(&self) -> &Zoned {
        &self.captured_at
    }
}

/// Buffers log entries issued before the registry is initialized.
///
/// Each identity gets its own bounded queue. The queue that fills up gains
/// one trailing overflow marker and then drops everything else until it is
/// flushed or cleared.
#[derive(Debug)]
pub struct Precache {
    capacity: usize,
    entries: Mutex<HashMap<LoggerId, Vec<PrecacheEntry>>>,
}

impl Default for Precache {
    fn default() -> Self {
        Precache::new()
    }
}

impl Precache {
    /// Creates a buffer holding [`DEFAULT_PRECACHE_CAPACITY`] entries per
    /// identity.
    pub fn new() -> Precache {
        Precache::with_capacity(DEFAULT_PRECACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Precache {
        Precache {
            capacity,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Buffers one entry for `identity`.
    ///
    /// Returns whether the entry was accepted. The call that crosses the
    /// capacity threshold appends a single overflow marker and returns false;
    /// later calls return false without leaving any trace.
    pub fn record(
        &self,
        identity: &LoggerId,
        severity: Severity,
        message: &str,
        context: Option<&str>,
    ) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let queue = entries.entry(identity.clone()).or_default();
        if queue.len() < self.capacity {
            queue.push(PrecacheEntry {
                severity,
                message: message.to_string(),
                context: context.map(str::to_string),
                captured_at: Zoned::now(),
            });
            return true;
        }
        if queue.len() == self.capacity {
            queue.push(PrecacheEntry {
                severity: Severity::Warn,
                message: format!("The cache for logger '{identity}' has overflowed."),
                context: None,
                captured_at: Zoned::now(),
            });
        }
        false
    }

    /// Replays every buffered entry into its live logger and empties the
    /// buffer.
    ///
    /// Entries replay in recorded order per identity. Identities without a
    /// live logger fall back to a raw console line carrying the identity and
    /// capture time. The console sink stays silenced for the whole replay so
    /// lines already surfaced at capture time are not printed twice.
    pub(crate) fn flush(&self, loggers: &HashMap<LoggerId, Arc<Logger>>) {
        let drained = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            mem::take(&mut *entries)
        };
        if drained.is_empty() {
            return;
        }

        let _quiet = console::silence();
        for (identity, queue) in drained {
            match loggers.get(&identity) {
                Some(logger) => {
                    for entry in queue {
                        logger.log(entry.severity, &entry.message, entry.context.as_deref());
                    }
                }
                None => {
                    for entry in queue {
                        let stamp = entry.captured_at.strftime("%H:%M:%S");
                        let line = format!("[{identity}] {stamp} {}", entry.message);
                        console::raw_emit(Severity::Info, &line);
                    }
                }
            }
        }
    }

    /// Discards every buffered entry without replaying anything.
    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
    }
}
