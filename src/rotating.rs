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
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::Mutex;
use std::sync::PoisonError;

use anyhow::Context;
use jiff::Zoned;

/// Default size cap of a primary log file, in bytes (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

const SESSION_SEPARATOR_LEN: usize = 68;

static WRITERS: LazyLock<Mutex<HashMap<PathBuf, Arc<RotatingWriter>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// A thread-safe append-only writer for one log file, rotating it into a
/// single backup when it outgrows its size cap.
///
/// Writers are deduplicated by resolved path: opening the same file twice,
/// even through different relative spellings, returns the same instance, so
/// every write to one file serializes through one lock. The size cap is fixed
/// by whichever open created the instance.
///
/// Opening a writer stamps the file with a session separator and an
/// "opened at" line, even when the file is brand new.
#[derive(Debug)]
pub struct RotatingWriter {
    path: PathBuf,
    backup_path: PathBuf,
    max_size: u64,
    lock: Mutex<()>,
}

impl RotatingWriter {
    /// Opens the writer for `path` with [`DEFAULT_MAX_FILE_SIZE`], or returns
    /// the existing instance for that path.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Arc<RotatingWriter>> {
        RotatingWriter::open_with_max_size(path, DEFAULT_MAX_FILE_SIZE)
    }

    /// Opens the writer for `path`, or returns the existing instance for that
    /// path (ignoring `max_size`).
    pub fn open_with_max_size(
        path: impl AsRef<Path>,
        max_size: u64,
    ) -> anyhow::Result<Arc<RotatingWriter>> {
        let path = resolve_path(path.as_ref());
        let mut writers = WRITERS.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(writer) = writers.get(&path) {
            return Ok(writer.clone());
        }
        let writer = Arc::new(RotatingWriter::create(path.clone(), max_size)?);
        writers.insert(path, writer.clone());
        Ok(writer)
    }

    fn create(path: PathBuf, max_size: u64) -> anyhow::Result<RotatingWriter> {
        let backup_path = backup_path_for(&path);
        let writer = RotatingWriter {
            path,
            backup_path,
            max_size,
            lock: Mutex::new(()),
        };
        writer.write_line(&"=".repeat(SESSION_SEPARATOR_LEN))?;
        let opened_at = Zoned::now().strftime("%Y-%m-%d %H:%M:%S");
        writer.write_line(&format!("Log opened at {opened_at}"))?;
        Ok(writer)
    }

    /// Appends `line` plus a trailing newline to the primary file, creating
    /// parent directories as needed.
    ///
    /// If the appended line would push the file past the size cap, the file
    /// is first rotated: copied over the backup, then truncated to zero.
    pub fn write_line(&self, line: &str) -> anyhow::Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).context("failed to create log directory")?;
            }
        }

        let size = fs::metadata(&self.path).map(|meta| meta.len()).unwrap_or(0);
        if size + line.len() as u64 > self.max_size {
            self.rotate()?;
        }

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .context("failed to create log file")?;
        let mut bytes = line.as_bytes().to_vec();
        bytes.push(b'\n');
        file.write_all(&bytes).context("failed to write log file")?;
        Ok(())
    }

    // The backup must be complete before the primary is truncated.
    fn rotate(&self) -> anyhow::Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        fs::copy(&self.path, &self.backup_path).context("failed to copy log file to backup")?;
        OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)
            .context("failed to truncate log file")?;
        Ok(())
    }

    /// Path of the primary log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path the primary file is copied to on rotation.
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// Size cap in bytes that triggers rotation.
    pub fn max_size(&self) -> u64 {
        self.max_size
    }
}

// Lexical resolution only; the file may not exist yet.
fn resolve_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    let mut resolved = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            part => resolved.push(part),
        }
    }
    resolved
}

fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_stem().unwrap_or_default().to_os_string();
    name.push("-prev");
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}
