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

//! Reconnecting connection supervisor

use crate::auth::{AuthOutcome, Session, authenticate, register};
use crate::connection::{LineConnection, LineReader, LineWriter};
use crate::history::{HistoryLog, SharedHistory};
use crate::keepalive::KeepAlive;
use crate::reader::{InboundMessage, MessageReader};
use crate::sender::{MessageSender, OutboundQueue};
use crate::status::{StatusPublisher, StatusUpdate};
use crate::watchdog::Watchdog;
use crate::{
    ClientConfig, ClientError, CredentialStore, InterruptReason, NicknamePrompt, Result,
};
use minechat_wire::sanitize;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Consumer-side ends of the queues owned by a [`ConnectionSupervisor`]
#[derive(Debug)]
pub struct ClientChannels {
    /// Submit raw user text; sanitized and framed by the sender
    pub outbound: mpsc::UnboundedSender<String>,
    /// Decorated lines received from the server
    pub inbound: mpsc::UnboundedReceiver<InboundMessage>,
    /// Connection state transitions and nickname notifications
    pub status: mpsc::UnboundedReceiver<StatusUpdate>,
}

/// Keeps a chat session alive across any number of connection failures.
///
/// Each attempt opens the inbound and outbound connections, logs in (or
/// registers), then runs the reader, sender, keepalive and watchdog as one
/// group. The first worker to finish ends the group, the remaining workers
/// are aborted, both sockets close, and after `reconnect_delay` the next
/// attempt starts from scratch.
///
/// # Example
///
/// ```no_run
/// use minechat_client::{ClientConfig, ConnectionSupervisor, CallbackPrompt, MemoryCredentialStore};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::new("minechat.dvmn.org").with_token(Some("hash".into()));
/// let (mut supervisor, mut channels) = ConnectionSupervisor::new(
///     config,
///     Arc::new(CallbackPrompt::new(|| None)),
///     Arc::new(MemoryCredentialStore::new()),
/// );
///
/// tokio::spawn(async move {
///     while let Some(message) = channels.inbound.recv().await {
///         println!("{message}");
///     }
/// });
/// supervisor.run().await?;
/// # Ok(())
/// # }
/// ```
pub struct ConnectionSupervisor {
    config: ClientConfig,
    token: Option<String>,
    status: StatusPublisher,
    inbound: mpsc::UnboundedSender<InboundMessage>,
    outbound: OutboundQueue,
    prompt: Arc<dyn NicknamePrompt>,
    credentials: Arc<dyn CredentialStore>,
    shutdown: CancellationToken,
    attempts: u64,
}

impl ConnectionSupervisor {
    /// Create a supervisor and the queues it feeds
    pub fn new(
        config: ClientConfig,
        prompt: Arc<dyn NicknamePrompt>,
        credentials: Arc<dyn CredentialStore>,
    ) -> (Self, ClientChannels) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (status, status_rx) = StatusPublisher::channel();

        let supervisor = Self {
            token: config.token.clone().filter(|t| !t.is_empty()),
            config,
            status,
            inbound: inbound_tx,
            outbound: Arc::new(Mutex::new(outbound_rx)),
            prompt,
            credentials,
            shutdown: CancellationToken::new(),
            attempts: 0,
        };
        let channels = ClientChannels {
            outbound: outbound_tx,
            inbound: inbound_rx,
            status: status_rx,
        };
        (supervisor, channels)
    }

    /// Stop [`run`](Self::run) when `token` is cancelled
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Token that stops [`run`](Self::run) when cancelled
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Credential used for the next login
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Number of connection attempts started so far
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Configuration every attempt connects with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Connect, and reconnect, until shut down or interrupted by the user.
    ///
    /// Returns `Ok(())` after the shutdown token is cancelled,
    /// `Err(ClientError::UserInterrupt(_))` when the user refuses to pick a
    /// nickname and `Err(ClientError::History(_))` when the history log can
    /// not be opened or written. Every other failure is logged and retried.
    pub async fn run(&mut self) -> Result<()> {
        let shutdown = self.shutdown.clone();
        let history = HistoryLog::open(&self.config.history_path)
            .await
            .map_err(ClientError::History)?
            .shared();

        loop {
            self.attempts += 1;
            let attempt = self.attempts;

            let outcome = tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Shutdown requested");
                    return Ok(());
                }
                outcome = self.run_attempt(&history) => outcome,
            };

            match outcome {
                Ok(()) => info!(attempt, "Connection ended, reconnecting"),
                Err(e) if !e.is_recoverable() => {
                    info!(attempt, error = %e, "Stopping");
                    return Err(e);
                }
                Err(e) => warn!(attempt, error = %e, "Connection attempt failed"),
            }

            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Shutdown requested");
                    return Ok(());
                }
                _ = sleep(self.config.reconnect_delay) => {}
            }
        }
    }

    async fn run_attempt(&mut self, history: &SharedHistory) -> Result<()> {
        debug!(host = %self.config.host, attempt = self.attempts, "Connecting");
        let inbound =
            LineConnection::connect(&self.config.host, self.config.read_port, &self.config)
                .await?;
        let outbound =
            LineConnection::connect(&self.config.host, self.config.write_port, &self.config)
                .await?;
        let _status = self.status.open();

        let (mut replies, mut writer) = outbound.into_split();
        let session = self.establish_session(&mut replies, &mut writer).await?;
        self.status.nickname(&session.nickname);

        let writer = Arc::new(Mutex::new(writer));
        let (liveness_tx, liveness_rx) = mpsc::unbounded_channel();

        let mut workers = JoinSet::new();
        workers.spawn(
            MessageReader::new(
                inbound.into_reader(),
                history.clone(),
                self.inbound.clone(),
                self.config.read_throttle,
            )
            .run(),
        );
        workers.spawn(MessageSender::new(self.outbound.clone(), writer.clone()).run());
        workers.spawn(Watchdog::new(liveness_rx, self.config.watch_connection_timeout).run());
        workers.spawn(
            KeepAlive::new(
                replies,
                writer,
                liveness_tx,
                self.config.ping_pong_timeout,
                self.config.ping_interval,
            )
            .run(),
        );
        info!(nickname = %session.nickname, "Session active");

        let first = workers.join_next().await;
        workers.shutdown().await;

        match first {
            Some(Ok(result)) => result,
            Some(Err(e)) => {
                error!(error = %e, "Worker task failed");
                Err(ClientError::Worker(e.to_string()))
            }
            None => Ok(()),
        }
    }

    /// Log in with the current token, falling back to registration.
    async fn establish_session<R, W>(
        &mut self,
        reader: &mut LineReader<R>,
        writer: &mut LineWriter<W>,
    ) -> Result<Session>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let token = self.token.clone().unwrap_or_default();
        let outcome = timeout(
            self.config.handshake_timeout,
            authenticate(reader, writer, &token),
        )
        .await
        .map_err(|_| ClientError::HandshakeTimeout)??;

        if let AuthOutcome::Authenticated { nickname } = outcome {
            return Ok(Session { token, nickname });
        }

        warn!("Token is invalid or missing, asking for a nickname");
        let username = match self.prompt.request_nickname().await {
            None => {
                info!("User cancelled nickname input");
                return Err(ClientError::UserInterrupt(InterruptReason::Cancelled));
            }
            Some(name) if sanitize(&name).trim().is_empty() => {
                info!("The user didn't enter a nickname");
                return Err(ClientError::UserInterrupt(InterruptReason::EmptyNickname));
            }
            Some(name) => name,
        };

        let session = timeout(
            self.config.handshake_timeout,
            register(reader, writer, &username),
        )
        .await
        .map_err(|_| ClientError::HandshakeTimeout)??;

        if let Err(e) = self.credentials.save(&session.token).await {
            warn!(error = %e, "Failed to persist credential");
        }
        self.token = Some(session.token.clone());
        Ok(session)
    }
}
