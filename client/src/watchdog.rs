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

//! Idle-timeout watchdog

use crate::keepalive::LivenessEvent;
use crate::{ClientError, Result};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{info, warn};

/// Declares the connection dead when liveness evidence stops arriving
pub struct Watchdog {
    liveness: mpsc::UnboundedReceiver<LivenessEvent>,
    window: Duration,
}

impl Watchdog {
    pub fn new(liveness: mpsc::UnboundedReceiver<LivenessEvent>, window: Duration) -> Self {
        Self { liveness, window }
    }

    /// Consume liveness events until one fails to arrive within the window.
    ///
    /// Every event restarts the window. A closed queue means nobody can
    /// vouch for the connection any more and is treated like a timeout.
    pub async fn run(mut self) -> Result<()> {
        loop {
            match timeout(self.window, self.liveness.recv()).await {
                Ok(Some(event)) => info!("{}", event.message),
                Ok(None) => {
                    warn!("Liveness queue closed");
                    return Err(ClientError::WatchdogTimeout(self.window));
                }
                Err(_) => {
                    info!("{}s is elapsed", self.window.as_secs_f32());
                    return Err(ClientError::WatchdogTimeout(self.window));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_silence() {
        let (tx, rx) = mpsc::unbounded_channel();
        let watchdog = tokio::spawn(Watchdog::new(rx, Duration::from_secs(15)).run());

        tx.send(LivenessEvent::new("alive")).unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        tx.send(LivenessEvent::new("alive")).unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(!watchdog.is_finished());

        let result = watchdog.await.unwrap();
        assert!(matches!(result, Err(ClientError::WatchdogTimeout(w)) if w == Duration::from_secs(15)));
        drop(tx);
    }

    #[tokio::test]
    async fn test_closed_queue_is_dead_connection() {
        let (tx, rx) = mpsc::unbounded_channel::<LivenessEvent>();
        drop(tx);
        let result = Watchdog::new(rx, Duration::from_secs(60)).run().await;
        assert!(matches!(result, Err(ClientError::WatchdogTimeout(_))));
    }

    #[tokio::test(start_paused = true)]
    #[traced_test]
    async fn test_logs_events_and_expiry() {
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(LivenessEvent::new("Connection is alive. Ping message sent"))
            .unwrap();

        let result = Watchdog::new(rx, Duration::from_secs(1)).run().await;
        assert!(result.is_err());
        assert!(logs_contain("Connection is alive. Ping message sent"));
        assert!(logs_contain("1s is elapsed"));
        drop(tx);
    }
}
