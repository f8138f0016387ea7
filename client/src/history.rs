//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Append-only chat history

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::debug;

/// History log kept open across reconnects
pub type SharedHistory = Arc<Mutex<HistoryLog>>;

/// Append-only log of received, already decorated lines
#[derive(Debug)]
pub struct HistoryLog {
    path: PathBuf,
    file: File,
}

impl HistoryLog {
    /// Open `path` for appending, creating it if needed
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        Ok(Self { path, file })
    }

    /// Append one record. The line and its terminator go out in a single write.
    pub async fn append(&mut self, line: &str) -> io::Result<()> {
        let mut record = String::with_capacity(line.len() + 1);
        record.push_str(line);
        record.push('\n');
        self.file.write_all(record.as_bytes()).await?;
        self.file.flush().await
    }

    /// Location of the log
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wrap for sharing between successive readers
    pub fn shared(self) -> SharedHistory {
        Arc::new(Mutex::new(self))
    }
}

/// Send every line saved in `path` to `saved`, oldest first.
///
/// A missing file replays nothing. Returns the number of lines sent.
pub async fn replay(
    path: impl AsRef<Path>,
    saved: &mpsc::UnboundedSender<String>,
) -> io::Result<usize> {
    let file = match File::open(path.as_ref()).await {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let mut lines = BufReader::new(file).lines();
    let mut count = 0;
    while let Some(line) = lines.next_line().await? {
        if saved.send(line).is_err() {
            break;
        }
        count += 1;
    }
    debug!(path = %path.as_ref().display(), count, "Replayed history");
    Ok(count)
}
