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

//! Client configuration

use minechat_wire::DEFAULT_MAX_LINE_LENGTH;
use std::path::PathBuf;
use std::time::Duration;

/// Default port of the inbound message stream
pub const DEFAULT_READ_PORT: u16 = 5000;
/// Default port of the outbound command channel
pub const DEFAULT_WRITE_PORT: u16 = 5050;
/// Default chat history file
pub const DEFAULT_HISTORY_PATH: &str = "history.txt";

/// Chat client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server hostname or IP address
    pub host: String,

    /// Port streaming inbound chat lines
    pub read_port: u16,

    /// Port accepting the handshake, messages and probes
    pub write_port: u16,

    /// Account token (None or empty to register)
    pub token: Option<String>,

    /// Append-only log of received lines
    pub history_path: PathBuf,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Deadline for each of the login and registration handshakes
    pub handshake_timeout: Duration,

    /// Deadline for one probe round-trip
    pub ping_pong_timeout: Duration,

    /// Pause between successful probes
    pub ping_interval: Duration,

    /// Longest silence tolerated between liveness events
    pub watch_connection_timeout: Duration,

    /// Pause after each inbound line
    pub read_throttle: Duration,

    /// Delay before reconnection attempt
    pub reconnect_delay: Duration,

    /// Longest accepted protocol line in bytes
    pub max_line_length: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            read_port: DEFAULT_READ_PORT,
            write_port: DEFAULT_WRITE_PORT,
            token: None,
            history_path: PathBuf::from(DEFAULT_HISTORY_PATH),
            connect_timeout: Duration::from_secs(10),
            handshake_timeout: Duration::from_secs(15),
            ping_pong_timeout: Duration::from_secs(10),
            ping_interval: Duration::from_secs(10),
            watch_connection_timeout: Duration::from_secs(15),
            read_throttle: Duration::from_secs(1),
            reconnect_delay: Duration::from_secs(3),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

impl ClientConfig {
    /// Create a new client configuration for the given host with default ports
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    /// Set both server ports
    pub fn with_ports(mut self, read_port: u16, write_port: u16) -> Self {
        self.read_port = read_port;
        self.write_port = write_port;
        self
    }

    /// Set the account token; an empty string is treated as no token
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Set the history file
    pub fn with_history_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_path = path.into();
        self
    }

    /// Set the connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the handshake timeout
    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Set the keepalive probe timeout and interval
    pub fn with_keepalive(mut self, timeout: Duration, interval: Duration) -> Self {
        self.ping_pong_timeout = timeout;
        self.ping_interval = interval;
        self
    }

    /// Set the watchdog window
    pub fn with_watch_connection_timeout(mut self, timeout: Duration) -> Self {
        self.watch_connection_timeout = timeout;
        self
    }

    /// Set the pause applied after every inbound line
    pub fn with_read_throttle(mut self, delay: Duration) -> Self {
        self.read_throttle = delay;
        self
    }

    /// Set the reconnection delay
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Set the maximum line length
    pub fn with_max_line_length(mut self, max: usize) -> Self {
        self.max_line_length = max;
        self
    }

    /// Address of the inbound stream
    pub fn read_address(&self) -> String {
        format!("{}:{}", self.host, self.read_port)
    }

    /// Address of the outbound channel
    pub fn write_address(&self) -> String {
        format!("{}:{}", self.host, self.write_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.read_port, 5000);
        assert_eq!(config.write_port, 5050);
        assert_eq!(config.history_path, PathBuf::from("history.txt"));
        assert_eq!(config.watch_connection_timeout, Duration::from_secs(15));
        assert_eq!(config.ping_pong_timeout, Duration::from_secs(10));
        assert!(config.token.is_none());
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("minechat.dvmn.org")
            .with_ports(6000, 6050)
            .with_token(Some("abc".into()))
            .with_reconnect_delay(Duration::from_millis(10));
        assert_eq!(config.read_address(), "minechat.dvmn.org:6000");
        assert_eq!(config.write_address(), "minechat.dvmn.org:6050");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.reconnect_delay, Duration::from_millis(10));
    }

    #[test]
    fn test_empty_token_is_none() {
        let config = ClientConfig::default().with_token(Some(String::new()));
        assert!(config.token.is_none());
    }
}
