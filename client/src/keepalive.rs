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

//! Keepalive probing of the outbound connection

use crate::connection::{LineReader, SharedWriter, read_line};
use crate::{ClientError, Result};
use futures::SinkExt;
use minechat_wire::{ProbeReply, WireFrame};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};
use tracing::{trace, warn};

/// Evidence that the peer is still responsive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivenessEvent {
    /// Human-readable description, logged by the watchdog
    pub message: String,
}

impl LivenessEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Sends a probe, waits for any reply, then reports the connection alive
pub struct KeepAlive<R, W> {
    reader: LineReader<R>,
    writer: SharedWriter<W>,
    liveness: mpsc::UnboundedSender<LivenessEvent>,
    ping_pong_timeout: Duration,
    interval: Duration,
}

impl<R, W> KeepAlive<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(
        reader: LineReader<R>,
        writer: SharedWriter<W>,
        liveness: mpsc::UnboundedSender<LivenessEvent>,
        ping_pong_timeout: Duration,
        interval: Duration,
    ) -> Self {
        Self {
            reader,
            writer,
            liveness,
            ping_pong_timeout,
            interval,
        }
    }

    /// Probe forever. Posts one [`LivenessEvent`] per answered probe.
    ///
    /// An unanswered probe is [`ClientError::PingTimeout`]. Losing the route
    /// to the host is reported on the liveness queue and then returned as
    /// [`ClientError::Resolution`].
    pub async fn run(mut self) -> Result<()> {
        loop {
            match timeout(self.ping_pong_timeout, self.probe()).await {
                Ok(Ok(reply)) => trace!(reply = reply.as_str(), "Probe answered"),
                Ok(Err(error @ ClientError::Resolution(_))) => {
                    self.post("No network path to host");
                    return Err(error);
                }
                Ok(Err(error)) => return Err(error),
                Err(_) => {
                    warn!(timeout = ?self.ping_pong_timeout, "Probe unanswered");
                    return Err(ClientError::PingTimeout(self.ping_pong_timeout));
                }
            }

            sleep(self.interval).await;
            self.post("Connection is alive. Ping message sent");
        }
    }

    async fn probe(&mut self) -> Result<ProbeReply> {
        self.writer.lock().await.send(WireFrame::Probe).await?;
        let line = read_line(&mut self.reader).await?;
        Ok(ProbeReply::from_line(line))
    }

    fn post(&self, message: &str) {
        if self.liveness.send(LivenessEvent::new(message)).is_err() {
            trace!("Watchdog gone, liveness event dropped");
        }
    }
}
