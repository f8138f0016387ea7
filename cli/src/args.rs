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

//! Command line and environment configuration

use clap::Parser;
use minechat_client::{ClientConfig, DEFAULT_HISTORY_PATH, DEFAULT_READ_PORT, DEFAULT_WRITE_PORT};
use std::path::PathBuf;

/// Console client for minechat servers
///
/// Every option can also be set in the environment or in a `.env` file.
#[derive(Debug, Clone, Parser)]
#[command(name = "minechat", version, about)]
pub struct Args {
    /// Chat server host
    #[arg(long, env = "MINECHAT_SERVER_HOST", default_value = "localhost")]
    pub host: String,

    /// Port of the inbound message stream
    #[arg(long, env = "MINECHAT_SERVER_READ_PORT", default_value_t = DEFAULT_READ_PORT)]
    pub read_port: u16,

    /// Port of the outbound command channel
    #[arg(long, env = "MINECHAT_SERVER_WRITE_PORT", default_value_t = DEFAULT_WRITE_PORT)]
    pub write_port: u16,

    /// Account hash used to log in; registration is offered when absent
    #[arg(long, env = "MINECHAT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// File received messages are appended to
    #[arg(long, env = "MINECHAT_HISTORY", default_value = DEFAULT_HISTORY_PATH)]
    pub history: PathBuf,

    /// File a newly registered token is written to
    #[arg(long, env = "MINECHAT_ENV_FILE", default_value = ".env")]
    pub env_file: PathBuf,

    /// Log filter directive, e.g. `info` or `minechat_client=debug`
    #[arg(long = "log-level", env = "MINECHAT_LOG", default_value = "warn")]
    pub log_level: String,
}

impl Args {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.host.clone())
            .with_ports(self.read_port, self.write_port)
            .with_token(self.token.clone())
            .with_history_path(self.history.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_arguments() {
        let args = Args::try_parse_from([
            "minechat",
            "--host",
            "minechat.dvmn.org",
            "--read-port",
            "6000",
            "--write-port",
            "6050",
            "--token",
            "abc123",
            "--history",
            "/tmp/chat.log",
            "--log-level",
            "debug",
        ])
        .unwrap();

        let config = args.client_config();
        assert_eq!(config.read_address(), "minechat.dvmn.org:6000");
        assert_eq!(config.write_address(), "minechat.dvmn.org:6050");
        assert_eq!(config.token.as_deref(), Some("abc123"));
        assert_eq!(config.history_path, PathBuf::from("/tmp/chat.log"));
        assert_eq!(args.log_level, "debug");
    }

    #[test]
    fn test_empty_token_means_none() {
        let args = Args::try_parse_from(["minechat", "--token", ""]).unwrap();
        assert_eq!(args.client_config().token, None);
    }

    #[test]
    fn test_rejects_invalid_port() {
        assert!(Args::try_parse_from(["minechat", "--read-port", "70000"]).is_err());
    }
}
