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

use crate::layout::Layout;
use crate::logger::Logger;
use crate::record::Record;
use crate::target::Target;
use crate::target::TargetState;

/// A target that forwards built lines into another logger.
///
/// The receiving logger runs its own full target list, so one entry can fan
/// out across several sinks. Attaching a pipe that would let two loggers
/// feed each other is rejected at attach time.
#[derive(Debug)]
pub struct Pipe {
    state: TargetState,
    destination: Arc<Logger>,
}

impl Pipe {
    pub fn new(destination: Arc<Logger>) -> Pipe {
        Pipe {
            state: TargetState::new(),
            destination,
        }
    }

    /// Sets the formatter applied before the line is handed to the
    /// destination logger.
    #[must_use]
    pub fn with_layout(mut self, layout: impl Into<Layout>) -> Pipe {
        self.state = self.state.with_layout(layout.into());
        self
    }
}

impl Target for Pipe {
    fn log(&self, record: &Record) -> anyhow::Result<()> {
        if self.state.admits(record.severity()).is_none() {
            return Ok(());
        }
        let line = match self.state.render(record) {
            Some(line) => line,
            None => record.message().to_string(),
        };
        self.destination.log(record.severity(), &line, record.context());
        Ok(())
    }

    fn state(&self) -> &TargetState {
        &self.state
    }

    fn pipe_destination(&self) -> Option<&Arc<Logger>> {
        Some(&self.destination)
    }
}
