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

//! Framed TCP connections

use crate::{ClientConfig, ClientError, Result};
use futures::{SinkExt, StreamExt};
use minechat_wire::{WireCodec, WireFrame};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, lookup_host};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info};

/// Line-decoding read side of a connection
pub type LineReader<R = OwnedReadHalf> = FramedRead<R, WireCodec>;

/// Frame-encoding write side of a connection
pub type LineWriter<W = OwnedWriteHalf> = FramedWrite<W, WireCodec>;

/// Write side shared by the message sender and the keepalive probe
pub type SharedWriter<W = OwnedWriteHalf> = Arc<Mutex<LineWriter<W>>>;

/// An open TCP connection to one chat port
///
/// The socket closes when the connection, or every half split from it, is
/// dropped.
#[derive(Debug)]
pub struct LineConnection {
    stream: TcpStream,
    peer_addr: SocketAddr,
    max_line_length: usize,
}

impl LineConnection {
    /// Resolve `host` and connect to `port` within the configured timeout.
    pub async fn connect(host: &str, port: u16, config: &ClientConfig) -> Result<Self> {
        let address = format!("{host}:{port}");
        debug!(%address, "Resolving");

        let targets: Vec<SocketAddr> = timeout(config.connect_timeout, lookup_host(&address))
            .await
            .map_err(|_| ClientError::ConnectTimeout)?
            .map_err(|e| ClientError::Resolution(format!("{address}: {e}")))?
            .collect();
        if targets.is_empty() {
            return Err(ClientError::Resolution(format!("{address}: no addresses")));
        }

        let stream = timeout(config.connect_timeout, TcpStream::connect(&targets[..]))
            .await
            .map_err(|_| ClientError::ConnectTimeout)??;
        stream.set_nodelay(true)?;
        let peer_addr = stream.peer_addr()?;
        info!(%peer_addr, port, "Connection established");

        Ok(Self {
            stream,
            peer_addr,
            max_line_length: config.max_line_length,
        })
    }

    /// Address of the connected server
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Split into a line reader and a frame writer
    pub fn into_split(self) -> (LineReader, LineWriter) {
        let (read, write) = self.stream.into_split();
        (
            FramedRead::new(read, WireCodec::with_max_line_length(self.max_line_length)),
            FramedWrite::new(write, WireCodec::with_max_line_length(self.max_line_length)),
        )
    }

    /// Use the whole stream for reading only.
    ///
    /// Unlike [`into_split`](Self::into_split) this never half-closes the
    /// socket, so a server that reacts to FIN keeps streaming.
    pub fn into_reader(self) -> LineReader<TcpStream> {
        FramedRead::new(
            self.stream,
            WireCodec::with_max_line_length(self.max_line_length),
        )
    }
}

/// Read one line; the end of the stream is [`ClientError::ConnectionClosed`].
pub async fn read_line<R>(reader: &mut LineReader<R>) -> Result<String>
where
    R: AsyncRead + Unpin,
{
    match reader.next().await {
        Some(line) => Ok(line?),
        None => Err(ClientError::ConnectionClosed),
    }
}

/// Encode `frame` and flush it.
pub async fn write_frame<W>(writer: &mut LineWriter<W>, frame: WireFrame) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.send(frame).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt, duplex};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_read_line_reports_eof_as_closed() {
        let (mut server, client) = duplex(64);
        let mut reader = FramedRead::new(client, WireCodec::new());
        server.write_all(b"one\n").await.unwrap();
        drop(server);

        assert_eq!(read_line(&mut reader).await.unwrap(), "one");
        assert!(matches!(
            read_line(&mut reader).await,
            Err(ClientError::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn test_write_frame_flushes() {
        let (client, mut server) = duplex(64);
        let mut writer = FramedWrite::new(client, WireCodec::new());
        write_frame(&mut writer, WireFrame::Line("hi".into()))
            .await
            .unwrap();

        let mut buf = [0u8; 3];
        server.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"hi\n");
    }

    #[tokio::test]
    async fn test_connect_and_split() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server_task = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"greeting\n").await.unwrap();
            let mut buf = [0u8; 6];
            socket.read_exact(&mut buf).await.unwrap();
            buf
        });

        let config = ClientConfig::new("127.0.0.1");
        let conn = LineConnection::connect("127.0.0.1", port, &config)
            .await
            .unwrap();
        assert_eq!(conn.peer_addr().port(), port);

        let (mut reader, mut writer) = conn.into_split();
        assert_eq!(read_line(&mut reader).await.unwrap(), "greeting");
        write_frame(&mut writer, WireFrame::Line("token".into()))
            .await
            .unwrap();

        assert_eq!(&server_task.await.unwrap(), b"token\n");
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = ClientConfig::new("127.0.0.1");
        let err = LineConnection::connect("127.0.0.1", port, &config)
            .await
            .unwrap_err();
        assert!(err.is_connection_error());
    }
}
