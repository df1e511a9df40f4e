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

use crate::identity::LoggerId;
use crate::severity::Severity;

/// One log entry, as handed to layouts and targets.
///
/// Records borrow their payload; they live for the duration of a single
/// dispatch. The optional context is a free-form annotation carried alongside
/// the message; built-in layouts leave it untouched, custom layouts and
/// capture targets can read it.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    severity: Severity,
    message: &'a str,
    context: Option<&'a str>,
    sender: Option<&'a LoggerId>,
}

impl<'a> Record<'a> {
    pub fn new(severity: Severity, message: &'a str) -> Record<'a> {
        Record {
            severity,
            message,
            context: None,
            sender: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: Option<&'a str>) -> Record<'a> {
        self.context = context;
        self
    }

    #[must_use]
    pub fn with_sender(mut self, sender: &'a LoggerId) -> Record<'a> {
        self.sender = Some(sender);
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        self.message
    }

    pub fn context(&self) -> Option<&str> {
        self.context
    }

    /// The identity of the logger dispatching this record, when known.
    pub fn sender(&self) -> Option<&LoggerId> {
        self.sender
    }
}
