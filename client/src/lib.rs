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

//! # Minechat Client
//!
//! Self-healing connection manager for the minechat line protocol.
//!
//! A chat session uses two TCP connections: an inbound stream the server
//! broadcasts chat lines on, and an outbound command channel used to log in,
//! post messages and answer keepalive probes. [`ConnectionSupervisor`] owns
//! both, logs in (or registers a new account), and keeps the pair alive
//! until it is shut down, reconnecting after every failure.
//!
//! ## Features
//!
//! - **Token login with registration fallback** - asks a [`NicknamePrompt`]
//!   and hands the new credential to a [`CredentialStore`]
//! - **Keepalive and watchdog** - silent connections are detected and dropped
//! - **Reconnection** - any failure tears down the attempt and starts over
//! - **Status events** - per-channel state transitions for a UI to render
//! - **History log** - every received line is appended to a local file
//!
//! ## Quick Start
//!
//! ```no_run
//! use minechat_client::{
//!     CallbackPrompt, ClientConfig, ConnectionSupervisor, MemoryCredentialStore,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("minechat.dvmn.org").with_ports(5000, 5050);
//!     let (mut supervisor, mut channels) = ConnectionSupervisor::new(
//!         config,
//!         Arc::new(CallbackPrompt::new(|| Some("Alice".to_string()))),
//!         Arc::new(MemoryCredentialStore::new()),
//!     );
//!
//!     channels.outbound.send("Hello, everyone!".to_string())?;
//!     tokio::spawn(async move {
//!         while let Some(message) = channels.inbound.recv().await {
//!             println!("{message}");
//!         }
//!     });
//!
//!     supervisor.run().await?;
//!     Ok(())
//! }
//! ```

mod auth;
mod config;
mod connection;
mod error;
mod handler;
mod history;
mod keepalive;
mod reader;
mod sender;
mod status;
mod supervisor;
mod watchdog;

pub use auth::{AuthOutcome, Session, authenticate, register};
pub use config::{
    ClientConfig, DEFAULT_HISTORY_PATH, DEFAULT_READ_PORT, DEFAULT_WRITE_PORT,
};
pub use connection::{LineConnection, LineReader, LineWriter, SharedWriter, read_line, write_frame};
pub use error::{ClientError, InterruptReason, Result};
pub use handler::{CallbackPrompt, CredentialStore, MemoryCredentialStore, NicknamePrompt};
pub use history::{HistoryLog, SharedHistory, replay};
pub use keepalive::{KeepAlive, LivenessEvent};
pub use reader::{InboundMessage, MessageReader, TIMESTAMP_FORMAT};
pub use sender::{MessageSender, OutboundQueue};
pub use status::{ConnectionState, ConnectionStatusGuard, StatusPublisher, StatusUpdate};
pub use supervisor::{ClientChannels, ConnectionSupervisor};
pub use watchdog::Watchdog;

// Re-export the wire types that appear in this crate's API
pub use minechat_wire::{CodecError, WireCodec, WireFrame, sanitize};
