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

//! Inbound message stream

use crate::connection::LineReader;
use crate::history::SharedHistory;
use crate::{ClientError, Result};
use chrono::{DateTime, Local};
use futures::StreamExt;
use std::fmt;
use std::time::Duration;
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info, trace};

/// Receipt timestamp format, e.g. `24.03.15 18:42`
pub const TIMESTAMP_FORMAT: &str = "%y.%m.%d %H:%M";

/// A received line, decorated for display and persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Local receipt time
    pub received_at: DateTime<Local>,
    /// `[YY.MM.DD HH:MM] text`
    pub line: String,
}

impl InboundMessage {
    /// Decorate `text` with the current local time
    pub fn new(text: &str) -> Self {
        Self::received(Local::now(), text)
    }

    /// Decorate `text` with `received_at`
    pub fn received(received_at: DateTime<Local>, text: &str) -> Self {
        let line = format!("[{}] {}", received_at.format(TIMESTAMP_FORMAT), text);
        Self { received_at, line }
    }
}

impl fmt::Display for InboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

/// Relays the inbound stream to the history log and the inbound queue
pub struct MessageReader<R> {
    lines: LineReader<R>,
    history: SharedHistory,
    inbound: mpsc::UnboundedSender<InboundMessage>,
    throttle: Duration,
}

impl<R> MessageReader<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(
        lines: LineReader<R>,
        history: SharedHistory,
        inbound: mpsc::UnboundedSender<InboundMessage>,
        throttle: Duration,
    ) -> Self {
        Self {
            lines,
            history,
            inbound,
            throttle,
        }
    }

    /// Read until the server closes the stream.
    ///
    /// End of stream returns `Ok(())`. Read errors are returned as is and a
    /// failed log write as [`ClientError::History`].
    pub async fn run(mut self) -> Result<()> {
        loop {
            let Some(text) = self.lines.next().await else {
                info!("Inbound stream closed by server");
                return Ok(());
            };
            let message = InboundMessage::new(&text?);

            self.history
                .lock()
                .await
                .append(&message.line)
                .await
                .map_err(ClientError::History)?;
            debug!(line = %message.line, "Received");
            if self.inbound.send(message).is_err() {
                trace!("Inbound consumer dropped");
            }

            sleep(self.throttle).await;
        }
    }
}
