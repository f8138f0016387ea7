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

//! Outgoing frame shapes

use bytes::{BufMut, BytesMut};

/// Line terminator used by every frame
pub const TERMINATOR: char = '\n';

/// Strip every line terminator (`\n` and `\r`) from `text`.
///
/// Applied to every user-supplied payload so that a single chat message or
/// nickname can never be split into several protocol lines.
///
/// ```
/// assert_eq!(minechat_wire::sanitize("hi\r\nthere\n"), "hithere");
/// ```
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

/// A unit written by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireFrame {
    /// A single handshake line: `sanitize(text)\n`
    Line(String),
    /// A chat message terminated by a blank line: `sanitize(text)\n\n`
    Message(String),
    /// Keepalive probe: a bare `\n`
    Probe,
}

impl WireFrame {
    /// Write the encoded frame to `dst`
    pub fn encode_into(&self, dst: &mut BytesMut) {
        match self {
            WireFrame::Line(text) => {
                let text = sanitize(text);
                dst.reserve(text.len() + 1);
                dst.put_slice(text.as_bytes());
                dst.put_u8(b'\n');
            }
            WireFrame::Message(text) => {
                let text = sanitize(text);
                dst.reserve(text.len() + 2);
                dst.put_slice(text.as_bytes());
                dst.put_slice(b"\n\n");
            }
            WireFrame::Probe => dst.put_u8(b'\n'),
        }
    }

    /// Name of the frame kind, used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            WireFrame::Line(_) => "line",
            WireFrame::Message(_) => "message",
            WireFrame::Probe => "probe",
        }
    }
}
