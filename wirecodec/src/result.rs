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

/// Result Type for Codec Operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while framing or interpreting protocol lines.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// An I/O error occurred while reading from or writing to the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line grew past the configured maximum without a terminator.
    #[error("line exceeds maximum length of {limit} bytes")]
    LineTooLong {
        /// The configured limit in bytes
        limit: usize,
    },

    /// A handshake reply did not match the expected schema.
    ///
    /// Covers non-JSON input as well as JSON of the wrong shape.
    #[error("malformed {expected} response {line:?}: {reason}")]
    MalformedResponse {
        /// Name of the schema the line was parsed against
        expected: &'static str,
        /// The offending line
        line: String,
        /// Parser diagnostics
        reason: String,
    },
}

impl CodecError {
    pub(crate) fn malformed(expected: &'static str, line: &str, err: serde_json::Error) -> Self {
        CodecError::MalformedResponse {
            expected,
            line: line.to_string(),
            reason: err.to_string(),
        }
    }

    /// Check if the error came from the peer violating the protocol
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            CodecError::LineTooLong { .. } | CodecError::MalformedResponse { .. }
        )
    }
}
