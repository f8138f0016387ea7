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

//! Outbound message queue drain

use crate::connection::SharedWriter;
use crate::Result;
use futures::SinkExt;
use minechat_wire::WireFrame;
use std::sync::Arc;
use tokio::io::AsyncWrite;
use tokio::sync::{Mutex, mpsc};
use tracing::debug;

/// Receiving end of the outbound queue.
///
/// Outlives connection attempts: each attempt's sender locks it while
/// running, so queued text written during an outage is sent after reconnect.
pub type OutboundQueue = Arc<Mutex<mpsc::UnboundedReceiver<String>>>;

/// Writes queued user text to the outbound connection, one frame per message
pub struct MessageSender<W> {
    queue: OutboundQueue,
    writer: SharedWriter<W>,
}

impl<W> MessageSender<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(queue: OutboundQueue, writer: SharedWriter<W>) -> Self {
        Self { queue, writer }
    }

    /// Send messages in queue order until cancelled or a write fails.
    ///
    /// Once every producer is gone the sender parks instead of returning, so
    /// a closed input never tears the connection down.
    pub async fn run(self) -> Result<()> {
        let mut queue = self.queue.lock().await;
        loop {
            let Some(text) = queue.recv().await else {
                debug!("Outbound queue closed");
                return std::future::pending().await;
            };

            let mut writer = self.writer.lock().await;
            writer.send(WireFrame::Message(text)).await?;
            debug!("Message sent");
        }
    }
}
