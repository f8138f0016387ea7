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

//! Connection status notifications

use std::fmt;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Lifecycle of one channel within one connection attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Socket opened, not yet usable
    Initiated,
    /// Socket ready for traffic
    Established,
    /// Socket torn down
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initiated => write!(f, "initiated"),
            Self::Established => write!(f, "established"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// An update delivered to the status sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// State change of the inbound message stream
    ReadConnection(ConnectionState),
    /// State change of the outbound command channel
    SendingConnection(ConnectionState),
    /// The nickname the session is logged in as
    NicknameReceived(String),
}

/// Publishes ordered state transitions to an external status sink.
///
/// A dropped sink is tolerated; updates are then discarded.
#[derive(Debug, Clone)]
pub struct StatusPublisher {
    tx: mpsc::UnboundedSender<StatusUpdate>,
}

impl StatusPublisher {
    /// Publish into `tx`
    pub fn new(tx: mpsc::UnboundedSender<StatusUpdate>) -> Self {
        Self { tx }
    }

    /// Create a publisher together with the receiving end of its sink
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<StatusUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Announce a freshly opened connection pair.
    ///
    /// Emits `Initiated` then `Established` for both channels and returns a
    /// guard that emits `Closed` for both channels when dropped, whichever
    /// way the attempt ends.
    #[must_use = "dropping the guard immediately publishes CLOSED"]
    pub fn open(&self) -> ConnectionStatusGuard {
        self.publish(StatusUpdate::ReadConnection(ConnectionState::Initiated));
        self.publish(StatusUpdate::SendingConnection(ConnectionState::Initiated));
        self.publish(StatusUpdate::ReadConnection(ConnectionState::Established));
        self.publish(StatusUpdate::SendingConnection(ConnectionState::Established));
        debug!("Connection pair established");
        ConnectionStatusGuard {
            publisher: self.clone(),
        }
    }

    /// Announce the nickname of the current session
    pub fn nickname(&self, nickname: &str) {
        self.publish(StatusUpdate::NicknameReceived(nickname.to_string()));
    }

    fn publish(&self, update: StatusUpdate) {
        if self.tx.send(update).is_err() {
            trace!("Status sink dropped, discarding update");
        }
    }
}

/// Publishes `Closed` for both channels exactly once, on drop
#[derive(Debug)]
pub struct ConnectionStatusGuard {
    publisher: StatusPublisher,
}

impl Drop for ConnectionStatusGuard {
    fn drop(&mut self) {
        self.publisher
            .publish(StatusUpdate::ReadConnection(ConnectionState::Closed));
        self.publisher
            .publish(StatusUpdate::SendingConnection(ConnectionState::Closed));
        debug!("Connection pair closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(rx: &mut mpsc::UnboundedReceiver<StatusUpdate>) -> Vec<StatusUpdate> {
        let mut updates = Vec::new();
        while let Ok(update) = rx.try_recv() {
            updates.push(update);
        }
        updates
    }

    #[test]
    fn test_open_and_close_sequence() {
        let (publisher, mut rx) = StatusPublisher::channel();
        let guard = publisher.open();
        publisher.nickname("Alice");
        drop(guard);

        use ConnectionState::*;
        assert_eq!(
            drain(&mut rx),
            vec![
                StatusUpdate::ReadConnection(Initiated),
                StatusUpdate::SendingConnection(Initiated),
                StatusUpdate::ReadConnection(Established),
                StatusUpdate::SendingConnection(Established),
                StatusUpdate::NicknameReceived("Alice".into()),
                StatusUpdate::ReadConnection(Closed),
                StatusUpdate::SendingConnection(Closed),
            ]
        );
    }

    #[test]
    fn test_closed_on_unwind() {
        let (publisher, mut rx) = StatusPublisher::channel();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = publisher.open();
            panic!("attempt blew up");
        }));
        assert!(result.is_err());

        let closed = drain(&mut rx)
            .into_iter()
            .filter(|u| {
                matches!(
                    u,
                    StatusUpdate::ReadConnection(ConnectionState::Closed)
                        | StatusUpdate::SendingConnection(ConnectionState::Closed)
                )
            })
            .count();
        assert_eq!(closed, 2);
    }

    #[test]
    fn test_dropped_sink_is_ignored() {
        let (publisher, rx) = StatusPublisher::channel();
        drop(rx);
        let guard = publisher.open();
        publisher.nickname("Bob");
        drop(guard);
    }
}
