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

//! Schemas for the server's handshake and keepalive replies

use crate::{CodecError, CodecResult};
use serde::{Deserialize, Serialize};

/// Account details returned by the server for an accepted token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Nickname bound to the token
    pub nickname: String,
    /// The token itself, echoed back by some servers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_hash: Option<String>,
}

/// Parse the reply to a login token.
///
/// `null` means the token was rejected and yields `Ok(None)`; an object with a
/// `nickname` field yields the account. Anything else is malformed.
///
/// ```
/// use minechat_wire::parse_auth_response;
///
/// assert_eq!(parse_auth_response("null").unwrap(), None);
/// let account = parse_auth_response(r#"{"nickname":"Bob","account_hash":"x1"}"#).unwrap();
/// assert_eq!(account.unwrap().nickname, "Bob");
/// assert!(parse_auth_response("false").is_err());
/// ```
pub fn parse_auth_response(line: &str) -> CodecResult<Option<AccountInfo>> {
    serde_json::from_str(line.trim()).map_err(|e| CodecError::malformed("auth", line, e))
}

/// Reply to a completed registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationResponse {
    /// The freshly assigned credential
    pub account_hash: String,
    /// Nickname as accepted by the server, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

impl RegistrationResponse {
    /// Parse a registration reply line
    pub fn parse(line: &str) -> CodecResult<Self> {
        serde_json::from_str(line.trim()).map_err(|e| CodecError::malformed("registration", line, e))
    }
}

/// Reply to a keepalive probe. Any line counts as proof of life.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReply(pub String);

impl ProbeReply {
    /// Wrap the line read after a probe
    pub fn from_line(line: String) -> Self {
        ProbeReply(line)
    }

    /// The raw reply text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_null_is_rejection() {
        assert_eq!(parse_auth_response("null").unwrap(), None);
        assert_eq!(parse_auth_response("null\r").unwrap(), None);
    }

    #[test]
    fn test_auth_object() {
        let account = parse_auth_response(r#"{"nickname": "Eager Bob", "account_hash": "abc"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(account.nickname, "Eager Bob");
        assert_eq!(account.account_hash.as_deref(), Some("abc"));
    }

    #[test]
    fn test_auth_shape_mismatch_fails_closed() {
        for line in ["", "{}", "[]", "0", "\"text\"", "{\"nick\":1}", "not json"] {
            let err = parse_auth_response(line).unwrap_err();
            assert!(err.is_protocol_error(), "{line:?} should be malformed");
        }
    }

    #[test]
    fn test_registration_response() {
        let reg = RegistrationResponse::parse(r#"{"account_hash":"abc123"}"#).unwrap();
        assert_eq!(reg.account_hash, "abc123");
        assert_eq!(reg.nickname, None);

        let reg =
            RegistrationResponse::parse(r#"{"nickname":"Alice","account_hash":"h"}"#).unwrap();
        assert_eq!(reg.nickname.as_deref(), Some("Alice"));

        assert!(RegistrationResponse::parse("null").is_err());
        assert!(RegistrationResponse::parse(r#"{"nickname":"Alice"}"#).is_err());
    }

    #[test]
    fn test_probe_reply_accepts_anything() {
        assert_eq!(ProbeReply::from_line(String::new()).as_str(), "");
        assert_eq!(ProbeReply::from_line("pong".into()).as_str(), "pong");
    }
}
