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
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::RwLock;

use crate::identity::LoggerId;
use crate::layout::Layout;
use crate::logger::Logger;
use crate::precache::Precache;
use crate::precache::DEFAULT_PRECACHE_CAPACITY;
use crate::settings::LoggerSettings;
use crate::settings::SettingsStore;
use crate::severity::Severity;
use crate::target::console;
use crate::target::Console;
use crate::target::Pipe;
use crate::target::RotatingFile;
use crate::target::Target;

/// Yields the set of logger identities known to the process.
///
/// Any `Fn() -> Vec<LoggerId>` closure works as a discovery source. The set
/// is read once, during [`Registry::initialize`].
pub trait Discovery: Send + Sync + 'static {
    fn logger_ids(&self) -> Vec<LoggerId>;
}

impl<F> Discovery for F
where
    F: Fn() -> Vec<LoggerId> + Send + Sync + 'static,
{
    fn logger_ids(&self) -> Vec<LoggerId> {
        self()
    }
}

struct DiscoverySource(Box<dyn Discovery>);

impl fmt::Debug for DiscoverySource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "DiscoverySource {{ ... }}")
    }
}

/// A declarative description of one target, resolved into a concrete
/// [`Target`] while the registry initializes.
#[derive(Debug, Clone)]
pub enum TargetDescriptor {
    /// The process console.
    Console,
    /// A rotating log file at an explicit path.
    FilePath(PathBuf),
    /// A rotating log file at `logs/<name>.log`, with the name slugged.
    FileName(String),
    /// A pipe into the logger with this identity.
    Pipe(LoggerId),
}

/// Builds a [`Registry`].
///
/// Identities come from three places: explicit [`RegistryBuilder::logger`]
/// calls, the keys of configured target descriptors, and a [`Discovery`]
/// source. An identity with no descriptors gets a single console target; an
/// identity configured with an empty descriptor list gets no targets at all.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registered: Vec<LoggerId>,
    descriptors: HashMap<LoggerId, Vec<TargetDescriptor>>,
    discovery: Option<DiscoverySource>,
    store: Option<Box<dyn SettingsStore>>,
    default_layout: Option<Layout>,
    precache_capacity: Option<usize>,
    discard_precache: bool,
}

impl RegistryBuilder {
    pub fn new() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registers a logger identity.
    #[must_use]
    pub fn logger(mut self, identity: impl Into<LoggerId>) -> RegistryBuilder {
        self.registered.push(identity.into());
        self
    }

    /// Adds a discovery source consulted once during initialization.
    #[must_use]
    pub fn discovery(mut self, discovery: impl Discovery) -> RegistryBuilder {
        self.discovery = Some(DiscoverySource(Box::new(discovery)));
        self
    }

    /// Configures the targets an identity starts with.
    #[must_use]
    pub fn targets(
        mut self,
        identity: impl Into<LoggerId>,
        targets: impl IntoIterator<Item = TargetDescriptor>,
    ) -> RegistryBuilder {
        self.descriptors
            .entry(identity.into())
            .or_default()
            .extend(targets);
        self
    }

    /// Sets the persisted settings store consulted for identities without a
    /// runtime settings record.
    #[must_use]
    pub fn settings_store(mut self, store: impl SettingsStore) -> RegistryBuilder {
        self.store = Some(Box::new(store));
        self
    }

    /// Sets the formatter used by every target without its own override.
    #[must_use]
    pub fn default_layout(mut self, layout: impl Into<Layout>) -> RegistryBuilder {
        self.default_layout = Some(layout.into());
        self
    }

    /// Caps how many entries the precache buffers per identity.
    #[must_use]
    pub fn precache_capacity(mut self, capacity: usize) -> RegistryBuilder {
        self.precache_capacity = Some(capacity);
        self
    }

    /// Drops buffered pre-initialization entries instead of replaying them
    /// when the registry initializes.
    #[must_use]
    pub fn discard_precache(mut self) -> RegistryBuilder {
        self.discard_precache = true;
        self
    }

    pub fn build(self) -> Registry {
        Registry {
            initialize_started: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
            warned_uninitialized: AtomicBool::new(false),
            precache: Precache::with_capacity(
                self.precache_capacity.unwrap_or(DEFAULT_PRECACHE_CAPACITY),
            ),
            discard_precache: self.discard_precache,
            loggers: RwLock::new(HashMap::new()),
            settings: Mutex::new(vec![]),
            staged: Mutex::new(HashMap::new()),
            registered: self.registered,
            descriptors: self.descriptors,
            discovery: self.discovery,
            store: self.store,
            default_layout: self.default_layout,
        }
    }
}

/// The identity-to-logger table and the public logging entry points.
///
/// A registry starts inert: every [`Registry::log`] call is buffered (and
/// surfaced raw on the console) until [`Registry::initialize`] builds the
/// live loggers and replays the buffer. Construct one with
/// [`Registry::builder`], initialize it once at startup, then hand it out
/// behind an [`Arc`].
#[derive(Debug)]
pub struct Registry {
    initialize_started: AtomicBool,
    initialized: AtomicBool,
    warned_uninitialized: AtomicBool,
    precache: Precache,
    discard_precache: bool,
    loggers: RwLock<HashMap<LoggerId, Arc<Logger>>>,
    settings: Mutex<Vec<LoggerSettings>>,
    staged: Mutex<HashMap<LoggerId, Vec<Arc<dyn Target>>>>,
    registered: Vec<LoggerId>,
    descriptors: HashMap<LoggerId, Vec<TargetDescriptor>>,
    discovery: Option<DiscoverySource>,
    store: Option<Box<dyn SettingsStore>>,
    default_layout: Option<Layout>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Builds one live logger per known identity, attaches configured and
    /// staged targets, applies settings, and replays the precache.
    ///
    /// Identities are collected from explicit registrations, target
    /// descriptors, staged targets, and the discovery source; the default
    /// identity always exists. A second call is a no-op.
    pub fn initialize(&self) {
        if self.initialize_started.swap(true, Ordering::SeqCst) {
            return;
        }

        let mut identities = vec![LoggerId::DEFAULT];
        identities.extend(self.registered.iter().cloned());
        identities.extend(self.descriptors.keys().cloned());
        {
            let staged = self.staged.lock().unwrap_or_else(PoisonError::into_inner);
            identities.extend(staged.keys().cloned());
        }
        if let Some(discovery) = &self.discovery {
            identities.extend(discovery.0.logger_ids());
        }
        let mut unique: Vec<LoggerId> = vec![];
        for identity in identities {
            if !unique.contains(&identity) {
                unique.push(identity);
            }
        }

        let mut instances: HashMap<LoggerId, Arc<Logger>> = HashMap::with_capacity(unique.len());
        for identity in &unique {
            instances.insert(identity.clone(), Arc::new(Logger::new(identity.clone())));
        }

        for identity in &unique {
            let logger = &instances[identity];
            match self.descriptors.get(identity) {
                Some(descriptors) => {
                    for descriptor in descriptors {
                        match build_target(descriptor, &instances) {
                            Ok(target) => {
                                self.adopt_layout(&target);
                                if !logger.append_target(target) {
                                    eprintln!(
                                        "skipped a log target for '{identity}': duplicate or cyclic"
                                    );
                                }
                            }
                            Err(err) => {
                                eprintln!("failed to build log target for '{identity}': {err}");
                            }
                        }
                    }
                }
                None => {
                    let console: Arc<dyn Target> = Arc::new(Console::new());
                    self.adopt_layout(&console);
                    logger.append_target(console);
                }
            }
        }

        // The staged lock stays held until the initialized flag flips, so a
        // concurrent append_target either lands in the drain below or runs
        // against the live table.
        let mut staged = self.staged.lock().unwrap_or_else(PoisonError::into_inner);
        for (identity, targets) in staged.drain() {
            let logger = instances.entry(identity.clone()).or_insert_with(|| {
                let logger = Arc::new(Logger::new(identity.clone()));
                let console: Arc<dyn Target> = Arc::new(Console::new());
                self.adopt_layout(&console);
                logger.append_target(console);
                logger
            });
            for target in targets {
                self.adopt_layout(&target);
                if !logger.append_target(target) {
                    eprintln!("skipped a staged log target for '{identity}': duplicate or cyclic");
                }
            }
        }

        {
            let mut table = self.settings.lock().unwrap_or_else(PoisonError::into_inner);
            for (identity, logger) in &instances {
                let known = table
                    .iter()
                    .find(|record| record.applies_to(identity))
                    .cloned();
                let effective = match known {
                    Some(record) => Some(record),
                    None => self.store.as_ref().and_then(|store| {
                        let found = store.find_setting(identity);
                        if let Some(record) = &found {
                            table.push(record.clone());
                        }
                        found
                    }),
                };
                if let Some(record) = effective {
                    logger.apply_settings(&record);
                }
            }
        }

        {
            let mut loggers = self.loggers.write().unwrap_or_else(PoisonError::into_inner);
            *loggers = instances;
        }
        self.initialized.store(true, Ordering::SeqCst);
        drop(staged);

        if self.discard_precache {
            self.precache.clear();
        } else {
            let loggers = self.loggers.read().unwrap_or_else(PoisonError::into_inner);
            self.precache.flush(&loggers);
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Returns the live logger for `identity`, falling back to the default
    /// logger for identities the registry does not know.
    ///
    /// Returns `None` until [`Registry::initialize`] has completed.
    pub fn resolve(&self, identity: &LoggerId) -> Option<Arc<Logger>> {
        if !self.is_initialized() {
            return None;
        }
        let loggers = self.loggers.read().unwrap_or_else(PoisonError::into_inner);
        match loggers.get(identity) {
            Some(logger) => Some(logger.clone()),
            None => loggers.get(&LoggerId::DEFAULT).cloned(),
        }
    }

    /// Logs one entry through the logger resolved for `identity`.
    ///
    /// Passing `None` logs through the default logger. Before initialization
    /// the entry goes to the precache instead, is surfaced raw on the
    /// console, and a single "not initialized" warning is printed the first
    /// time this happens.
    pub fn log<'a>(
        &self,
        identity: impl Into<Option<&'a LoggerId>>,
        severity: Severity,
        message: &str,
        context: Option<&str>,
    ) {
        let default = LoggerId::DEFAULT;
        let identity = identity.into().unwrap_or(&default);
        match self.resolve(identity) {
            Some(logger) => logger.log(severity, message, context),
            None => self.backup_log(identity, severity, message, context),
        }
    }

    pub fn trace<'a>(&self, identity: impl Into<Option<&'a LoggerId>>, message: &str) {
        self.log(identity, Severity::Trace, message, None);
    }

    /// Like [`Registry::trace`], prefixing the caller's file and line.
    #[track_caller]
    pub fn trace_detailed<'a>(&self, identity: impl Into<Option<&'a LoggerId>>, message: &str) {
        let location = std::panic::Location::caller();
        let message = format!("[{}:{}] {message}", location.file(), location.line());
        self.log(identity, Severity::Trace, &message, None);
    }

    pub fn debug<'a>(&self, identity: impl Into<Option<&'a LoggerId>>, message: &str) {
        self.log(identity, Severity::Debug, message, None);
    }

    pub fn info<'a>(&self, identity: impl Into<Option<&'a LoggerId>>, message: &str) {
        self.log(identity, Severity::Info, message, None);
    }

    pub fn warn<'a>(&self, identity: impl Into<Option<&'a LoggerId>>, message: &str) {
        self.log(identity, Severity::Warn, message, None);
    }

    pub fn error<'a>(&self, identity: impl Into<Option<&'a LoggerId>>, message: &str) {
        self.log(identity, Severity::Error, message, None);
    }

    pub fn fatal<'a>(&self, identity: impl Into<Option<&'a LoggerId>>, message: &str) {
        self.log(identity, Severity::Fatal, message, None);
    }

    /// Attaches a target to the logger for `identity`.
    ///
    /// Before initialization the target is staged and attached while the
    /// registry initializes; in that case the call always reports success.
    /// After initialization the target is attached immediately, and the call
    /// reports false for unknown identities, duplicates, and pipe cycles.
    pub fn append_target(&self, identity: &LoggerId, target: Arc<dyn Target>) -> bool {
        let mut staged = self.staged.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.is_initialized() {
            staged.entry(identity.clone()).or_default().push(target);
            return true;
        }
        drop(staged);

        let logger = {
            let loggers = self.loggers.read().unwrap_or_else(PoisonError::into_inner);
            loggers.get(identity).cloned()
        };
        match logger {
            Some(logger) => {
                self.adopt_layout(&target);
                logger.append_target(target)
            }
            None => false,
        }
    }

    /// Sets the level and fail-fast flag in the settings record for
    /// `identity`, creating the record if none exists, and re-applies it to
    /// the live logger.
    pub fn set_level(&self, identity: &LoggerId, level: Severity, fail_fast: bool) {
        let settings = {
            let mut table = self.settings.lock().unwrap_or_else(PoisonError::into_inner);
            match table.iter_mut().find(|record| record.applies_to(identity)) {
                Some(record) => {
                    *record = record.clone().with_level(level).with_fail_fast(fail_fast);
                    record.clone()
                }
                None => {
                    let record = LoggerSettings::create_default(identity.clone())
                        .with_level(level)
                        .with_fail_fast(fail_fast);
                    table.push(record.clone());
                    record
                }
            }
        };
        if let Some(logger) = self.resolve(identity) {
            logger.apply_settings(&settings);
        }
    }

    /// Forwards the host's periodic tick to every live logger.
    pub fn tick(&self) {
        let loggers = self.loggers.read().unwrap_or_else(PoisonError::into_inner);
        for logger in loggers.values() {
            logger.tick();
        }
    }

    /// Flushes every live logger's targets.
    pub fn flush(&self) {
        let loggers = self.loggers.read().unwrap_or_else(PoisonError::into_inner);
        for logger in loggers.values() {
            logger.flush();
        }
    }

    fn backup_log(
        &self,
        identity: &LoggerId,
        severity: Severity,
        message: &str,
        context: Option<&str>,
    ) {
        if !self.warned_uninitialized.swap(true, Ordering::SeqCst) {
            console::raw_emit(
                Severity::Warn,
                "[WARNING] the log registry is not initialized yet, some of the following \
                 lines may be missing from their log files.",
            );
        }
        console::raw_emit(severity, message);
        self.precache.record(identity, severity, message, context);
    }

    fn adopt_layout(&self, target: &Arc<dyn Target>) {
        if let Some(layout) = &self.default_layout {
            target.state().adopt_default_layout(layout);
        }
    }
}

fn build_target(
    descriptor: &TargetDescriptor,
    instances: &HashMap<LoggerId, Arc<Logger>>,
) -> anyhow::Result<Arc<dyn Target>> {
    match descriptor {
        TargetDescriptor::Console => Ok(Arc::new(Console::new())),
        TargetDescriptor::FilePath(path) => Ok(Arc::new(RotatingFile::create(path)?)),
        TargetDescriptor::FileName(name) => Ok(Arc::new(RotatingFile::create_by_name(name)?)),
        TargetDescriptor::Pipe(identity) => match instances.get(identity) {
            Some(destination) => Ok(Arc::new(Pipe::new(destination.clone()))),
            None => anyhow::bail!("pipe destination '{identity}' is not a known logger"),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::Registry;
    use crate::identity::LoggerId;
    use crate::severity::Severity;
    use crate::target::Capture;

    #[test]
    fn test_resolve_before_initialize() {
        let registry = Registry::builder().build();
        assert!(!registry.is_initialized());
        assert!(registry.resolve(&LoggerId::DEFAULT).is_none());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let registry = Registry::builder().logger("app").build();
        registry.initialize();
        let first = registry.resolve(&LoggerId::new("app")).unwrap();
        registry.initialize();
        let second = registry.resolve(&LoggerId::new("app")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_unknown_identity_resolves_to_default() {
        let registry = Registry::builder().build();
        registry.initialize();
        let logger = registry.resolve(&LoggerId::new("nobody")).unwrap();
        assert_eq!(logger.identity(), &LoggerId::DEFAULT);
    }

    #[test]
    fn test_set_level_before_initialize_lands_on_logger() {
        let identity = LoggerId::new("app");
        let registry = Registry::builder().logger(identity.clone()).build();
        registry.set_level(&identity, Severity::Error, true);
        registry.initialize();

        let logger = registry.resolve(&identity).unwrap();
        assert_eq!(logger.level(), Severity::Error);
        assert!(logger.fail_fast());
    }

    #[test]
    fn test_staged_target_is_attached_on_initialize() {
        let identity = LoggerId::new("staged");
        let registry = Registry::builder().build();

        let capture = Capture::new();
        let handle = capture.handle();
        assert!(registry.append_target(&identity, Arc::new(capture)));

        registry.initialize();
        let logger = registry.resolve(&identity).unwrap();
        assert_eq!(logger.identity(), &identity);
        assert_eq!(logger.target_count(), 2);

        registry.log(&identity, Severity::Info, "through staged", None);
        assert_eq!(handle.lines(), vec!["through staged"]);
    }

    #[test]
    fn test_append_target_after_initialize_requires_known_identity() {
        let registry = Registry::builder().logger("app").build();
        registry.initialize();

        let accepted = registry.append_target(&LoggerId::new("app"), Arc::new(Capture::new()));
        let rejected = registry.append_target(&LoggerId::new("ghost"), Arc::new(Capture::new()));
        assert!(accepted);
        assert!(!rejected);
    }
}
