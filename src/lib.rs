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

//! Perceptor is a routed logging facade: named loggers fan entries out to
//! console, rotating-file, and pipe targets, with per-identity settings and
//! a buffer that captures everything logged before startup finishes.
//!
//! # Overview
//!
//! A [`Registry`] is built once at startup and holds one [`Logger`] per
//! identity. Each logger owns a list of targets; each target filters by its
//! own mute flag and severity threshold, formats the entry, and writes it.
//! Calls issued before [`Registry::initialize`] are surfaced raw on the
//! console and buffered, then replayed into the live loggers.
//!
//! # Examples
//!
//! Console logging through the default and a named logger:
//!
//! ```
//! use perceptor::LoggerId;
//! use perceptor::Registry;
//!
//! static APP: LoggerId = LoggerId::from_static("app");
//!
//! let registry = Registry::builder().logger(APP.clone()).build();
//! registry.initialize();
//!
//! registry.info(&APP, "service ready");
//! registry.warn(None, "falling back to defaults");
//! ```
//!
//! Routing one identity to the console and a rotating log file:
//!
//! ```no_run
//! use perceptor::LoggerId;
//! use perceptor::Registry;
//! use perceptor::TargetDescriptor;
//!
//! let network = LoggerId::new("network");
//! let registry = Registry::builder()
//!     .targets(network.clone(), [
//!         TargetDescriptor::Console,
//!         TargetDescriptor::FileName("network".to_string()),
//!     ])
//!     .build();
//! registry.initialize();
//!
//! registry.error(&network, "connection reset");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod bridge;
pub mod layout;
pub mod target;

mod identity;
mod logger;
mod precache;
mod record;
mod registry;
mod rotating;
mod settings;
mod severity;

pub use identity::LoggerId;
pub use layout::Layout;
pub use logger::Logger;
pub use precache::Precache;
pub use precache::PrecacheEntry;
pub use precache::DEFAULT_PRECACHE_CAPACITY;
pub use record::Record;
pub use registry::Discovery;
pub use registry::Registry;
pub use registry::RegistryBuilder;
pub use registry::TargetDescriptor;
pub use rotating::RotatingWriter;
pub use rotating::DEFAULT_MAX_FILE_SIZE;
pub use settings::JsonFileStore;
pub use settings::LoggerSettings;
pub use settings::MemoryStore;
pub use settings::SettingsStore;
pub use severity::Severity;
pub use target::Target;
