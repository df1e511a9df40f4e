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
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::RwLock;

use crate::identity::LoggerId;
use crate::record::Record;
use crate::settings::LoggerSettings;
use crate::severity::Severity;
use crate::target::Target;

// Serializes attachments so two racing calls cannot weave a pipe cycle that
// each check alone would have passed.
static ATTACH: Mutex<()> = Mutex::new(());

#[derive(Debug, Clone, Copy)]
struct LoggerConfig {
    muted: bool,
    level: Severity,
    fail_fast: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig {
            muted: false,
            level: Severity::Debug,
            fail_fast: false,
        }
    }
}

/// One live logger for one identity.
///
/// A logger fans every entry out to all of its targets; each target applies
/// its own mute and threshold gates. Settings records addressed to another
/// identity are ignored.
#[derive(Debug)]
pub struct Logger {
    identity: LoggerId,
    config: RwLock<LoggerConfig>,
    targets: RwLock<Vec<Arc<dyn Target>>>,
}

impl Logger {
    pub fn new(identity: LoggerId) -> Logger {
        Logger {
            identity,
            config: RwLock::new(LoggerConfig::default()),
            targets: RwLock::new(vec![]),
        }
    }

    pub fn identity(&self) -> &LoggerId {
        &self.identity
    }

    pub fn muted(&self) -> bool {
        self.config.read().unwrap_or_else(PoisonError::into_inner).muted
    }

    pub fn level(&self) -> Severity {
        self.config.read().unwrap_or_else(PoisonError::into_inner).level
    }

    pub fn fail_fast(&self) -> bool {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .fail_fast
    }

    pub fn target_count(&self) -> usize {
        self.targets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Dispatches one entry to every attached target.
    pub fn log(&self, severity: Severity, message: &str, context: Option<&str>) {
        let record = Record::new(severity, message)
            .with_context(context)
            .with_sender(&self.identity);
        let targets = self.targets.read().unwrap_or_else(PoisonError::into_inner);
        for target in targets.iter() {
            if let Err(err) = target.log(&record) {
                handle_error(&record, err);
            }
        }
    }

    /// Applies a settings record to this logger and all of its targets.
    ///
    /// A record addressed to a different identity is a no-op.
    pub fn apply_settings(&self, settings: &LoggerSettings) {
        if !settings.applies_to(&self.identity) {
            return;
        }
        {
            let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
            config.muted = settings.muted();
            config.level = settings.level();
            config.fail_fast = settings.fail_fast();
        }
        let targets = self.targets.read().unwrap_or_else(PoisonError::into_inner);
        for target in targets.iter() {
            target.state().apply(settings);
        }
    }

    /// Attaches a target, refusing duplicates and pipe cycles.
    ///
    /// Returns whether the target was attached. A pipe target is rejected
    /// when its destination already forwards, directly or through other
    /// pipes, back into this logger.
    pub fn append_target(self: &Arc<Self>, target: Arc<dyn Target>) -> bool {
        let _attach = ATTACH.lock().unwrap_or_else(PoisonError::into_inner);

        {
            let targets = self.targets.read().unwrap_or_else(PoisonError::into_inner);
            if targets.iter().any(|existing| Arc::ptr_eq(existing, &target)) {
                return false;
            }
        }

        if let Some(destination) = target.pipe_destination() {
            if reaches(destination, self) {
                return false;
            }
        }

        self.targets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(target);
        true
    }

    /// Forwards the host's periodic tick to every target.
    pub fn tick(&self) {
        let targets = self.targets.read().unwrap_or_else(PoisonError::into_inner);
        for target in targets.iter() {
            target.tick();
        }
    }

    /// Flushes every target.
    pub fn flush(&self) {
        let targets = self.targets.read().unwrap_or_else(PoisonError::into_inner);
        for target in targets.iter() {
            target.flush();
        }
    }
}

// Walks pipe destinations breadth-first. `from == to` counts as reaching, so
// a self-pipe is rejected by the same check.
fn reaches(from: &Arc<Logger>, to: &Arc<Logger>) -> bool {
    let mut visited: Vec<*const Logger> = vec![];
    let mut queue: Vec<Arc<Logger>> = vec![from.clone()];
    while let Some(current) = queue.pop() {
        if Arc::ptr_eq(&current, to) {
            return true;
        }
        let address = Arc::as_ptr(&current);
        if visited.contains(&address) {
            continue;
        }
        visited.push(address);
        let targets = current.targets.read().unwrap_or_else(PoisonError::into_inner);
        for target in targets.iter() {
            if let Some(next) = target.pipe_destination() {
                queue.push(next.clone());
            }
        }
    }
    false
}

fn handle_error(record: &Record, error: anyhow::Error) {
    let Err(fallback_error) = write!(
        std::io::stderr(),
        r###"
Error performing logging.
    Attempted to log: {message}
    Record: {record:?}
    Error: {error}
"###,
        message = record.message(),
    ) else {
        return;
    };

    panic!(
        r###"
Error performing stderr logging after error occurred during regular logging.
    Attempted to log: {message}
    Record: {record:?}
    Error: {error}
    Fallback error: {fallback_error}
"###,
        message = record.message(),
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::Logger;
    use crate::identity::LoggerId;
    use crate::settings::LoggerSettings;
    use crate::severity::Severity;
    use crate::target::Capture;
    use crate::target::Pipe;
    use crate::target::Target;

    fn logger(name: &str) -> Arc<Logger> {
        Arc::new(Logger::new(LoggerId::new(name.to_string())))
    }

    #[test]
    fn test_append_target_dedups_by_reference() {
        let logger = logger("app");
        let capture: Arc<dyn Target> = Arc::new(Capture::new());

        assert!(logger.append_target(capture.clone()));
        assert!(!logger.append_target(capture));
        assert_eq!(logger.target_count(), 1);
    }

    #[test]
    fn test_append_target_rejects_self_pipe() {
        let logger = logger("app");
        assert!(!logger.append_target(Arc::new(Pipe::new(logger.clone()))));
        assert_eq!(logger.target_count(), 0);
    }

    #[test]
    fn test_append_target_rejects_two_way_pipe() {
        let a = logger("a");
        let b = logger("b");

        assert!(a.append_target(Arc::new(Pipe::new(b.clone()))));
        assert!(!b.append_target(Arc::new(Pipe::new(a.clone()))));
        assert_eq!(b.target_count(), 0);
    }

    #[test]
    fn test_append_target_rejects_long_cycle() {
        let a = logger("a");
        let b = logger("b");
        let c = logger("c");

        assert!(a.append_target(Arc::new(Pipe::new(b.clone()))));
        assert!(b.append_target(Arc::new(Pipe::new(c.clone()))));
        assert!(!c.append_target(Arc::new(Pipe::new(a.clone()))));
    }

    #[test]
    fn test_apply_settings_is_addressed() {
        let logger = logger("app");

        let foreign = LoggerSettings::create_default(LoggerId::new("other"))
            .with_level(Severity::Fatal)
            .with_muted(true);
        logger.apply_settings(&foreign);
        assert!(!logger.muted());
        assert_eq!(logger.level(), Severity::Debug);

        let own = LoggerSettings::create_default(LoggerId::new("app")).with_level(Severity::Warn);
        logger.apply_settings(&own);
        assert_eq!(logger.level(), Severity::Warn);
    }

    #[test]
    fn test_apply_settings_reaches_targets() {
        let logger = logger("app");
        let capture = Capture::new();
        let handle = capture.handle();
        logger.append_target(Arc::new(capture));

        let own = LoggerSettings::create_default(LoggerId::new("app")).with_level(Severity::Error);
        logger.apply_settings(&own);

        logger.log(Severity::Info, "filtered out", None);
        logger.log(Severity::Error, "kept", None);
        assert_eq!(handle.lines(), vec!["kept"]);
    }

    #[test]
    fn test_log_fans_out_to_every_target() {
        let logger = logger("app");
        let first = Capture::new();
        let second = Capture::new();
        let first_handle = first.handle();
        let second_handle = second.handle();
        logger.append_target(Arc::new(first));
        logger.append_target(Arc::new(second));

        logger.log(Severity::Info, "everywhere", None);

        assert_eq!(first_handle.lines(), vec!["everywhere"]);
        assert_eq!(second_handle.lines(), vec!["everywhere"]);
    }
}
