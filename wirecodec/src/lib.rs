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

//! # Minechat Wire Protocol Codec
//!
//! Line-oriented framing for the minechat chat protocol. Every protocol unit is
//! UTF-8 text terminated by `\n`:
//!
//! - **Handshake lines**: the token, the requested nickname, and the server's
//!   JSON replies, one per line.
//! - **Chat messages**: the message text followed by a blank line.
//! - **Keepalive probes**: a bare terminator, answered by any line.
//!
//! ## Core Components
//!
//! ### [`WireCodec`]
//!
//! Implements [`Decoder`](tokio_util::codec::Decoder) producing one `String`
//! per line and [`Encoder`](tokio_util::codec::Encoder) for [`WireFrame`].
//!
//! ### [`WireFrame`]
//!
//! The three outgoing frame shapes. Every text payload is passed through
//! [`sanitize`] before it hits the wire so a user can never break framing.
//!
//! ### Handshake schemas
//!
//! [`AccountInfo`], [`RegistrationResponse`] and [`ProbeReply`] describe the
//! server replies. Parsing fails closed with [`CodecError::MalformedResponse`].
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use minechat_wire::{WireCodec, WireFrame};
//! use tokio_util::codec::{FramedRead, FramedWrite};
//! use tokio::net::TcpStream;
//! use futures::{SinkExt, StreamExt};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let stream = TcpStream::connect("127.0.0.1:5050").await?;
//! let (read, write) = stream.into_split();
//! let mut lines = FramedRead::new(read, WireCodec::new());
//! let mut frames = FramedWrite::new(write, WireCodec::new());
//!
//! frames.send(WireFrame::Message("hello".to_string())).await?;
//! if let Some(line) = lines.next().await {
//!     println!("server said: {}", line?);
//! }
//! # Ok(())
//! # }
//! ```

mod codec;
mod frame;
mod handshake;
mod result;

pub use codec::{DEFAULT_MAX_LINE_LENGTH, WireCodec};
pub use frame::{TERMINATOR, WireFrame, sanitize};
pub use handshake::{AccountInfo, ProbeReply, RegistrationResponse, parse_auth_response};
pub use result::{CodecError, CodecResult};
