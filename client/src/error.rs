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

//! Client error types

use minechat_wire::CodecError;
use std::fmt;
use std::io;
use std::time::Duration;

/// Why the user aborted the registration prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptReason {
    /// The prompt was dismissed without an answer
    Cancelled,
    /// An empty nickname was submitted
    EmptyNickname,
}

impl fmt::Display for InterruptReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "nickname input cancelled"),
            Self::EmptyNickname => write!(f, "empty string as a nickname is not allowed"),
        }
    }
}

/// Client error type
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(io::Error),

    /// Connection refused by the server
    #[error("Connection refused")]
    ConnectionRefused,

    /// Connection reset or aborted by the peer
    #[error("Connection reset by peer")]
    ConnectionReset,

    /// Stream closed by the server mid-conversation
    #[error("Connection closed by server")]
    ConnectionClosed,

    /// Host could not be resolved or no network path to it exists
    #[error("No network path to {0}")]
    Resolution(String),

    /// Server reply violated the protocol
    #[error("Protocol error: {0}")]
    Protocol(CodecError),

    /// Connecting did not complete in time
    #[error("Connection timeout")]
    ConnectTimeout,

    /// Login or registration did not complete in time
    #[error("Handshake timeout")]
    HandshakeTimeout,

    /// Keepalive probe went unanswered
    #[error("No reply to keepalive probe within {0:?}")]
    PingTimeout(Duration),

    /// No liveness evidence arrived within the watchdog window
    #[error("No liveness event within {0:?}")]
    WatchdogTimeout(Duration),

    /// A worker task panicked or was aborted unexpectedly
    #[error("Worker task failed: {0}")]
    Worker(String),

    /// The local history log could not be opened or written
    #[error("History log error: {0}")]
    History(io::Error),

    /// The user declined to provide a nickname
    #[error("Interrupted by user: {0}")]
    UserInterrupt(InterruptReason),
}

impl ClientError {
    /// Check if the supervisor should reconnect after this error
    ///
    /// A user interrupt or a local history failure stops the retry loop.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ClientError::UserInterrupt(_) | ClientError::History(_))
    }

    /// Check if the error is a transport-level failure or timeout
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            ClientError::Io(_)
                | ClientError::ConnectionRefused
                | ClientError::ConnectionReset
                | ClientError::ConnectionClosed
                | ClientError::Resolution(_)
                | ClientError::ConnectTimeout
                | ClientError::HandshakeTimeout
                | ClientError::PingTimeout(_)
                | ClientError::WatchdogTimeout(_)
        )
    }

    /// Check if the server violated the protocol
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, ClientError::Protocol(_))
    }

    /// Check if the error is a user interrupt
    pub fn is_user_interrupt(&self) -> bool {
        matches!(self, ClientError::UserInterrupt(_))
    }
}

impl From<io::Error> for ClientError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::ConnectionRefused => Self::ConnectionRefused,
            io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => Self::ConnectionReset,
            io::ErrorKind::UnexpectedEof => Self::ConnectionClosed,
            io::ErrorKind::NetworkUnreachable
            | io::ErrorKind::HostUnreachable
            | io::ErrorKind::NetworkDown => Self::Resolution(error.to_string()),
            _ => Self::Io(error),
        }
    }
}

impl From<CodecError> for ClientError {
    fn from(error: CodecError) -> Self {
        match error {
            CodecError::Io(e) => e.into(),
            other => Self::Protocol(other),
        }
    }
}

/// Client result type
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mapping() {
        let refused = io::Error::from(io::ErrorKind::ConnectionRefused);
        assert!(matches!(ClientError::from(refused), ClientError::ConnectionRefused));

        let reset = io::Error::from(io::ErrorKind::BrokenPipe);
        assert!(matches!(ClientError::from(reset), ClientError::ConnectionReset));

        let unreachable = io::Error::from(io::ErrorKind::NetworkUnreachable);
        assert!(matches!(ClientError::from(unreachable), ClientError::Resolution(_)));

        let other = io::Error::other("disk on fire");
        assert!(matches!(ClientError::from(other), ClientError::Io(_)));
    }

    #[test]
    fn test_codec_error_mapping() {
        let io = CodecError::Io(io::Error::from(io::ErrorKind::ConnectionReset));
        assert!(matches!(ClientError::from(io), ClientError::ConnectionReset));

        let long = CodecError::LineTooLong { limit: 8 };
        let err = ClientError::from(long);
        assert!(err.is_protocol_error());
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_history_failure_is_fatal() {
        let err = ClientError::History(io::Error::from(io::ErrorKind::NotFound));
        assert!(!err.is_recoverable());
        assert!(!err.is_connection_error());
        assert!(!err.is_user_interrupt());
    }

    #[test]
    fn test_fatal_errors() {
        assert!(ClientError::ConnectionClosed.is_recoverable());
        assert!(ClientError::WatchdogTimeout(Duration::from_secs(15)).is_recoverable());
        assert!(ClientError::Resolution("example.com".into()).is_recoverable());
        assert!(!ClientError::UserInterrupt(InterruptReason::Cancelled).is_recoverable());
        assert!(!ClientError::UserInterrupt(InterruptReason::EmptyNickname).is_connection_error());
    }

    #[test]
    fn test_error_display() {
        let err = ClientError::UserInterrupt(InterruptReason::EmptyNickname);
        assert_eq!(
            err.to_string(),
            "Interrupted by user: empty string as a nickname is not allowed"
        );
        let err = ClientError::PingTimeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "No reply to keepalive probe within 10s");
    }
}
