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

use crate::{CodecError, CodecResult, WireFrame};
use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

/// Default upper bound on a single decoded line in bytes
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;

/// Line codec for the minechat protocol.
///
/// Decoding yields one `String` per `\n`-terminated line with the terminator
/// (and a preceding `\r`, if any) removed. Empty lines are yielded as empty
/// strings; only the end of the stream yields `None`. Invalid UTF-8 is
/// replaced rather than rejected, since inbound lines carry other users' text.
///
/// Encoding accepts [`WireFrame`]s.
#[derive(Debug, Clone)]
pub struct WireCodec {
    max_line_length: usize,
    /// Index into the buffer up to which no terminator has been found
    next_index: usize,
}

impl WireCodec {
    /// Creates a codec with [`DEFAULT_MAX_LINE_LENGTH`].
    ///
    /// # Example
    /// ```
    /// use minechat_wire::WireCodec;
    ///
    /// let codec = WireCodec::new();
    /// assert_eq!(codec.max_line_length(), minechat_wire::DEFAULT_MAX_LINE_LENGTH);
    /// ```
    pub fn new() -> WireCodec {
        WireCodec::default()
    }

    /// Creates a codec rejecting lines longer than `max_line_length` bytes.
    pub fn with_max_line_length(max_line_length: usize) -> WireCodec {
        WireCodec {
            max_line_length,
            next_index: 0,
        }
    }

    /// The configured line length limit in bytes
    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    fn take_line(&mut self, src: &mut BytesMut, end: usize, consumed: usize) -> String {
        self.next_index = 0;
        let mut line = src.split_to(consumed);
        line.truncate(end);
        if line.last() == Some(&b'\r') {
            line.truncate(line.len() - 1);
        }
        String::from_utf8_lossy(&line).into_owned()
    }
}

impl Default for WireCodec {
    fn default() -> Self {
        WireCodec {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            next_index: 0,
        }
    }
}

impl Decoder for WireCodec {
    type Item = String;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> CodecResult<Option<Self::Item>> {
        let newline = src[self.next_index..]
            .iter()
            .position(|b| *b == b'\n')
            .map(|offset| self.next_index + offset);

        match newline {
            Some(end) if end > self.max_line_length => Err(CodecError::LineTooLong {
                limit: self.max_line_length,
            }),
            Some(end) => {
                let line = self.take_line(src, end, end + 1);
                trace!(len = line.len(), "decoded line");
                Ok(Some(line))
            }
            None if src.len() > self.max_line_length => Err(CodecError::LineTooLong {
                limit: self.max_line_length,
            }),
            None => {
                self.next_index = src.len();
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> CodecResult<Option<Self::Item>> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        if src.is_empty() {
            return Ok(None);
        }
        let len = src.len();
        let line = self.take_line(src, len, len);
        trace!(len = line.len(), "decoded unterminated trailing line");
        Ok(Some(line))
    }
}

impl Encoder<WireFrame> for WireCodec {
    type Error = CodecError;

    fn encode(&mut self, item: WireFrame, dst: &mut BytesMut) -> CodecResult<()> {
        trace!(kind = item.kind(), "encoding frame");
        item.encode_into(dst);
        Ok(())
    }
}

impl Encoder<&WireFrame> for WireCodec {
    type Error = CodecError;

    fn encode(&mut self, item: &WireFrame, dst: &mut BytesMut) -> CodecResult<()> {
        item.encode_into(dst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_single_line() {
        let mut codec = WireCodec::new();
        let mut buf = BytesMut::from(&b"hello\n"[..]);
        assert_eq!(codec.decode(&mut buf).unwrap(), Some("hello".to_string()));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_partial_then_complete() {
        let mut codec = WireCodec::new();
        let mut buf = BytesMut::from(&b"hel"[..]);
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        buf.extend_from_slice(b"lo\r\nnext");
        assert_eq!(codec.decode(&mut buf).unwrap(), Some("hello".to_string()));
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        assert_eq!(&buf[..], b"next");
    }

    #[test]
    fn test_empty_line_is_not_eof() {
        let mut codec = WireCodec::new();
        let mut buf = BytesMut::from(&b"\n"[..]);
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(String::new()));
    }

    #[test]
    fn test_decode_eof_yields_trailing_fragment() {
        let mut codec = WireCodec::new();
        let mut buf = BytesMut::from(&b"tail"[..]);
        assert_eq!(codec.decode_eof(&mut buf).unwrap(), Some("tail".to_string()));
        assert_eq!(codec.decode_eof(&mut buf).unwrap(), None);
    }

    #[test]
    fn test_line_too_long() {
        let mut codec = WireCodec::with_max_line_length(4);
        let mut buf = BytesMut::from(&b"abcdefgh"[..]);
        assert!(matches!(
            codec.decode(&mut buf),
            Err(CodecError::LineTooLong { limit: 4 })
        ));

        let mut codec = WireCodec::with_max_line_length(4);
        let mut buf = BytesMut::from(&b"abcdef\n"[..]);
        assert!(codec.decode(&mut buf).is_err());
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut codec = WireCodec::new();
        let mut buf = BytesMut::from(&b"ok \xff\n"[..]);
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some("ok \u{FFFD}".to_string())
        );
    }

    #[test]
    fn test_encode_frames() {
        let mut codec = WireCodec::new();
        let mut dst = BytesMut::new();
        codec
            .encode(WireFrame::Line("tok\nen".into()), &mut dst)
            .unwrap();
        codec
            .encode(WireFrame::Message("hi".into()), &mut dst)
            .unwrap();
        codec.encode(&WireFrame::Probe, &mut dst).unwrap();
        assert_eq!(&dst[..], b"token\nhi\n\n\n");
    }
}
