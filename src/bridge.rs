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

//! Integration with the `log` facade.
//!
//! Installing the bridge routes every `log` macro call into a [`Registry`],
//! using the record's target as the logger identity. Key-value pairs on the
//! record are appended to the message as `key=value`.

use std::fmt::Write;
use std::sync::Arc;

use log::kv::VisitSource;

use crate::identity::LoggerId;
use crate::registry::Registry;
use crate::severity::Severity;

/// Forwards `log` crate records into a [`Registry`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use perceptor::Registry;
///
/// let registry = Arc::new(Registry::builder().build());
/// registry.initialize();
/// perceptor::bridge::install(registry);
///
/// log::info!("bridged");
/// ```
#[derive(Debug)]
pub struct LogBridge {
    registry: Arc<Registry>,
}

impl LogBridge {
    pub fn new(registry: Arc<Registry>) -> LogBridge {
        LogBridge { registry }
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let identity = LoggerId::new(record.target());
        let mut message = record.args().to_string();
        let mut visitor = KvAppender(&mut message);
        let _ = record.key_values().visit(&mut visitor);
        self.registry
            .log(&identity, Severity::from(record.level()), &message, None);
    }

    fn flush(&self) {
        self.registry.flush();
    }
}

struct KvAppender<'a>(&'a mut String);

impl<'kvs> VisitSource<'kvs> for KvAppender<'_> {
    fn visit_pair(
        &mut self,
        key: log::kv::Key<'kvs>,
        value: log::kv::Value<'kvs>,
    ) -> Result<(), log::kv::Error> {
        let _ = write!(self.0, " {key}={value}");
        Ok(())
    }
}

/// Installs the bridge as the global `log` logger.
///
/// The `log` side max level is opened up to `Trace`; filtering is left to
/// the registry's targets.
pub fn try_install(registry: Arc<Registry>) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(LogBridge::new(registry)))?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Like [`try_install`], reporting failure on stderr instead of returning
/// it.
pub fn install(registry: Arc<Registry>) {
    if let Err(err) = try_install(registry) {
        eprintln!("failed to install the log bridge: {err}");
    }
}

#[cfg(test)]
mod tests {
    use log::kv::Source;

    use super::KvAppender;

    #[test]
    fn test_kv_pairs_append_to_message() {
        let source: &[(&str, &str)] = &[("user", "root"), ("attempt", "2")];
        let mut message = String::from("login failed");
        let mut visitor = KvAppender(&mut message);
        source.visit(&mut visitor).unwrap();
        assert_eq!(message, "login failed user=root attempt=2");
    }
}
