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

//! `.env` backed credential persistence

use async_trait::async_trait;
use minechat_client::CredentialStore;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment key the account hash is stored under
pub const TOKEN_KEY: &str = "MINECHAT_TOKEN";

/// Writes newly assigned tokens into a dotenv file
#[derive(Debug, Clone)]
pub struct EnvFileCredentialStore {
    path: PathBuf,
}

impl EnvFileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for EnvFileCredentialStore {
    async fn save(&self, token: &str) -> io::Result<()> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e),
        };
        tokio::fs::write(&self.path, upsert(&contents, TOKEN_KEY, token)).await?;
        info!(path = %self.path.display(), "Token saved");
        Ok(())
    }
}

/// Set `key=value` in dotenv `contents`, replacing any previous assignment
/// and keeping every other line.
pub fn upsert(contents: &str, key: &str, value: &str) -> String {
    let assignment = format!("{key}={value}");
    let mut replaced = false;
    let mut lines = Vec::new();

    for line in contents.lines() {
        let assigned = line
            .trim_start()
            .strip_prefix(key)
            .is_some_and(|rest| rest.trim_start().starts_with('='));
        if !assigned {
            lines.push(line.to_string());
        } else if !replaced {
            lines.push(assignment.clone());
            replaced = true;
        }
    }
    if !replaced {
        lines.push(assignment);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
