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

//! Login and registration handshakes
//!
//! Both handshakes run on the outbound connection before any worker starts.
//!
//! ```text
//! login                           registration
//! S: greeting                     S: greeting
//! C: token                        C: (empty line)
//! S: null | {"nickname": ..}      S: prompt
//! S: welcome (objects only)       S: prompt
//!                                 C: nickname
//!                                 S: {"account_hash": ..}
//! ```

use crate::connection::{LineReader, LineWriter, read_line, write_frame};
use crate::Result;
use minechat_wire::{RegistrationResponse, WireFrame, parse_auth_response, sanitize};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info};

/// Identity valid for one connection attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Account credential
    pub token: String,
    /// Display name
    pub nickname: String,
}

/// Result of a login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The token was accepted
    Authenticated {
        /// Nickname bound to the token
        nickname: String,
    },
    /// No token was given or the server rejected it
    Unauthenticated,
}

impl AuthOutcome {
    /// Check if the server accepted the token
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated { .. })
    }

    /// Nickname bound to an accepted token
    pub fn nickname(&self) -> Option<&str> {
        match self {
            AuthOutcome::Authenticated { nickname } => Some(nickname),
            AuthOutcome::Unauthenticated => None,
        }
    }
}

/// Log in with `token`.
///
/// An empty token short-circuits to [`AuthOutcome::Unauthenticated`] without
/// touching the connection. A malformed reply is a protocol error.
pub async fn authenticate<R, W>(
    reader: &mut LineReader<R>,
    writer: &mut LineWriter<W>,
    token: &str,
) -> Result<AuthOutcome>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    if token.is_empty() {
        debug!("No token configured, skipping login");
        return Ok(AuthOutcome::Unauthenticated);
    }

    let greeting = read_line(reader).await?;
    debug!(%greeting, "Login greeting");

    write_frame(writer, WireFrame::Line(token.to_string())).await?;

    let reply = read_line(reader).await?;
    let Some(account) = parse_auth_response(&reply)? else {
        info!("Invalid token");
        return Ok(AuthOutcome::Unauthenticated);
    };

    let welcome = read_line(reader).await?;
    debug!(%welcome, "Received");
    Ok(AuthOutcome::Authenticated {
        nickname: account.nickname,
    })
}

/// Register a new account named `username` and return its session.
///
/// The nickname reported by the server wins over the requested one.
pub async fn register<R, W>(
    reader: &mut LineReader<R>,
    writer: &mut LineWriter<W>,
    username: &str,
) -> Result<Session>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let username = sanitize(username);
    info!(%username, "Registering");

    read_line(reader).await?;
    // Declining a token switches the server into registration mode
    write_frame(writer, WireFrame::Line(String::new())).await?;
    for _ in 0..2 {
        read_line(reader).await?;
    }

    write_frame(writer, WireFrame::Line(username.clone())).await?;
    let reply = read_line(reader).await?;
    let response = RegistrationResponse::parse(&reply)?;

    let session = Session {
        token: response.account_hash,
        nickname: response.nickname.unwrap_or(username),
    };
    info!(nickname = %session.nickname, "Registered");
    Ok(session)
}
