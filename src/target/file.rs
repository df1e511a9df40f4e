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

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use crate::layout::Layout;
use crate::record::Record;
use crate::rotating::RotatingWriter;
use crate::target::Target;
use crate::target::TargetState;

/// A target that appends lines to a rotating log file.
///
/// The actual writing goes through the shared [`RotatingWriter`] for the
/// file's resolved path, so several targets pointed at the same file stay
/// serialized. Without a formatter override the target prefixes each line
/// with the severity short code, like `INFO> ready`.
///
/// # Examples
///
/// ```no_run
/// use perceptor::target::RotatingFile;
///
/// let file = RotatingFile::create("logs/app.log").unwrap();
/// ```
#[derive(Debug)]
pub struct RotatingFile {
    state: TargetState,
    writer: Arc<RotatingWriter>,
}

impl RotatingFile {
    /// Opens the target for `path`, reusing the writer if one already exists
    /// for that path.
    pub fn create(path: impl AsRef<Path>) -> anyhow::Result<RotatingFile> {
        Ok(RotatingFile {
            state: TargetState::new(),
            writer: RotatingWriter::open(path)?,
        })
    }

    /// Like [`RotatingFile::create`] with an explicit size cap for rotation.
    pub fn create_with_max_size(
        path: impl AsRef<Path>,
        max_size: u64,
    ) -> anyhow::Result<RotatingFile> {
        Ok(RotatingFile {
            state: TargetState::new(),
            writer: RotatingWriter::open_with_max_size(path, max_size)?,
        })
    }

    /// Opens the target for a display name, deriving the path
    /// `logs/<name>.log` with the name trimmed, lowercased, and spaces
    /// replaced by dashes.
    pub fn create_by_name(name: &str) -> anyhow::Result<RotatingFile> {
        RotatingFile::create(path_for_name(name))
    }

    /// Sets the formatter this target uses instead of the severity prefix or
    /// the registry-wide default.
    #[must_use]
    pub fn with_layout(mut self, layout: impl Into<Layout>) -> RotatingFile {
        self.state = self.state.with_layout(layout.into());
        self
    }

    pub fn writer(&self) -> &Arc<RotatingWriter> {
        &self.writer
    }

    pub fn path(&self) -> &Path {
        self.writer.path()
    }
}

impl Target for RotatingFile {
    fn log(&self, record: &Record) -> anyhow::Result<()> {
        if self.state.admits(record.severity()).is_none() {
            return Ok(());
        }
        let line = match self.state.render(record) {
            Some(line) => line,
            None => match record.severity().short_code() {
                Some(code) => format!("{code}> {}", record.message()),
                None => record.message().to_string(),
            },
        };
        self.writer.write_line(&line)
    }

    fn state(&self) -> &TargetState {
        &self.state
    }
}

fn path_for_name(name: &str) -> PathBuf {
    let slug = name.trim().replace(' ', "-").to_lowercase();
    PathBuf::from(format!("logs/{slug}.log"))
}
