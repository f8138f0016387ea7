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

//! Framing tests over in-memory streams

use futures::{SinkExt, StreamExt};
use minechat_wire::{CodecError, WireCodec, WireFrame};
use tokio::io::{AsyncWriteExt, duplex};
use tokio_util::codec::{FramedRead, FramedWrite};

#[tokio::test]
async fn test_lines_split_across_writes() {
    let (mut server, client) = duplex(64);
    let mut lines = FramedRead::new(client, WireCodec::new());

    server.write_all(b"Hello %user").await.unwrap();
    server.write_all(b"name%\n\nEnter preferred").await.unwrap();
    server.write_all(b" name\n").await.unwrap();
    drop(server);

    assert_eq!(lines.next().await.unwrap().unwrap(), "Hello %username%");
    assert_eq!(lines.next().await.unwrap().unwrap(), "");
    assert_eq!(lines.next().await.unwrap().unwrap(), "Enter preferred name");
    assert!(lines.next().await.is_none());
}

#[tokio::test]
async fn test_eof_without_data_ends_stream() {
    let (server, client) = duplex(64);
    drop(server);
    let mut lines = FramedRead::new(client, WireCodec::new());
    assert!(lines.next().await.is_none());
}

#[tokio::test]
async fn test_messages_written_in_order() {
    let (client, server) = duplex(1024);
    let mut frames = FramedWrite::new(client, WireCodec::new());
    let mut lines = FramedRead::new(server, WireCodec::new());

    for text in ["first", "sec\nond", "third\r\n"] {
        frames.send(WireFrame::Message(text.to_string())).await.unwrap();
    }
    drop(frames);

    let mut received = Vec::new();
    while let Some(line) = lines.next().await {
        received.push(line.unwrap());
    }
    assert_eq!(received, vec!["first", "", "second", "", "third", ""]);
}

#[tokio::test]
async fn test_oversized_line_is_protocol_error() {
    let (mut server, client) = duplex(256);
    let mut lines = FramedRead::new(client, WireCodec::with_max_line_length(8));
    server.write_all(b"0123456789abcdef\n").await.unwrap();

    match lines.next().await {
        Some(Err(err @ CodecError::LineTooLong { .. })) => assert!(err.is_protocol_error()),
        other => panic!("unexpected result: {other:?}"),
    }
}
