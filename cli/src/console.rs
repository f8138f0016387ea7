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

//! Console input routing and output rendering

use async_trait::async_trait;
use minechat_client::{InboundMessage, NicknamePrompt, StatusUpdate};
use std::io::{self, BufRead};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

type PendingAnswer = Arc<Mutex<Option<oneshot::Sender<String>>>>;

/// Shares one stdin between chat input and the nickname prompt.
///
/// While a prompt is waiting, the next input line answers it; every other
/// line is queued as a chat message.
#[derive(Debug, Clone, Default)]
pub struct Console {
    pending: PendingAnswer,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompt(&self) -> ConsolePrompt {
        ConsolePrompt {
            pending: self.pending.clone(),
        }
    }

    /// Dispatch input lines until the input ends, then cancel `shutdown`.
    pub async fn route_input(
        self,
        mut input: mpsc::UnboundedReceiver<String>,
        outbound: mpsc::UnboundedSender<String>,
        shutdown: CancellationToken,
    ) {
        while let Some(line) = input.recv().await {
            let line = match self.take_pending() {
                Some(answer) => match answer.send(line) {
                    Ok(()) => continue,
                    Err(line) => {
                        debug!("Prompt abandoned before it was answered");
                        line
                    }
                },
                None => line,
            };
            if outbound.send(line).is_err() {
                warn!("Outbound queue closed");
                break;
            }
        }

        info!("Input closed");
        // An unanswered prompt resolves to a cancel
        drop(self.take_pending());
        shutdown.cancel();
    }

    fn take_pending(&self) -> Option<oneshot::Sender<String>> {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
    }
}

/// Nickname prompt answered by the next console line
#[derive(Debug)]
pub struct ConsolePrompt {
    pending: PendingAnswer,
}

#[async_trait]
impl NicknamePrompt for ConsolePrompt {
    async fn request_nickname(&self) -> Option<String> {
        let (tx, rx) = oneshot::channel();
        *self.pending.lock().unwrap_or_else(|e| e.into_inner()) = Some(tx);
        println!("Enter a nickname to register:");
        rx.await.ok()
    }
}

/// Read lines from `input` on a dedicated thread.
///
/// A blocking read can not be cancelled, so it must not hold up runtime
/// shutdown.
pub fn spawn_line_reader<R>(input: R) -> mpsc::UnboundedReceiver<String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in input.lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read input");
                    break;
                }
            }
        }
    });
    rx
}

/// Render a status update as one console line
pub fn describe(update: &StatusUpdate) -> String {
    match update {
        StatusUpdate::ReadConnection(state) => format!("Read connection {state}"),
        StatusUpdate::SendingConnection(state) => format!("Sending connection {state}"),
        StatusUpdate::NicknameReceived(nickname) => format!("Logged in as {nickname}"),
    }
}

pub async fn print_inbound(mut inbound: mpsc::UnboundedReceiver<InboundMessage>) {
    while let Some(message) = inbound.recv().await {
        println!("{message}");
    }
}

pub async fn print_status(mut status: mpsc::UnboundedReceiver<StatusUpdate>) {
    while let Some(update) = status.recv().await {
        eprintln!("* {}", describe(&update));
    }
}

/// Print previously saved lines ahead of the live stream
pub fn print_saved(mut saved: mpsc::UnboundedReceiver<String>) -> io::Result<usize> {
    use std::io::Write;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut count = 0;
    while let Ok(line) = saved.try_recv() {
        writeln!(out, "{line}")?;
        count += 1;
    }
    out.flush()?;
    Ok(count)
}
