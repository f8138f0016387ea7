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

//! Collaborator traits consulted by the supervisor

use async_trait::async_trait;
use std::io;
use std::sync::Mutex;

/// Asks the user for a nickname when the stored token is missing or rejected
///
/// # Example
///
/// ```no_run
/// use minechat_client::NicknamePrompt;
/// use async_trait::async_trait;
///
/// struct AlwaysAlice;
///
/// #[async_trait]
/// impl NicknamePrompt for AlwaysAlice {
///     async fn request_nickname(&self) -> Option<String> {
///         Some("Alice".to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait NicknamePrompt: Send + Sync + 'static {
    /// Return the desired nickname, or `None` if the user cancelled.
    ///
    /// An empty answer stops the client just like a cancel.
    async fn request_nickname(&self) -> Option<String>;
}

/// Persists a credential assigned during registration for future runs
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Store `token`. Failures are logged by the caller and never abort the
    /// connection.
    async fn save(&self, token: &str) -> io::Result<()>;
}

/// Closure-based prompt
///
/// ```
/// use minechat_client::CallbackPrompt;
///
/// let prompt = CallbackPrompt::new(|| Some("Alice".to_string()));
/// ```
pub struct CallbackPrompt {
    on_request: Box<dyn Fn() -> Option<String> + Send + Sync + 'static>,
}

impl CallbackPrompt {
    /// Answer every request with the result of `on_request`
    pub fn new(on_request: impl Fn() -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            on_request: Box::new(on_request),
        }
    }
}

#[async_trait]
impl NicknamePrompt for CallbackPrompt {
    async fn request_nickname(&self) -> Option<String> {
        (self.on_request)()
    }
}

/// Keeps credentials in memory; useful for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    saved: Mutex<Vec<String>>,
}

impl MemoryCredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently saved credential
    pub fn latest(&self) -> Option<String> {
        self.saved
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }

    /// Every credential saved so far, oldest first
    pub fn history(&self) -> Vec<String> {
        self.saved.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn save(&self, token: &str) -> io::Result<()> {
        self.saved
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(token.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_callback_prompt() {
        let prompt = CallbackPrompt::new(|| Some("Alice".into()));
        assert_eq!(prompt.request_nickname().await.as_deref(), Some("Alice"));

        let cancel = CallbackPrompt::new(|| None);
        assert_eq!(cancel.request_nickname().await, None);
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.latest(), None);
        store.save("one").await.unwrap();
        store.save("two").await.unwrap();
        assert_eq!(store.latest().as_deref(), Some("two"));
        assert_eq!(store.history(), vec!["one", "two"]);
    }
}
