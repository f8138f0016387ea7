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

//! # minechat
//!
//! Console chat client. Received messages go to stdout, connection status
//! and logs to stderr, and every line typed on stdin is posted to the chat.
//!
//! ```bash
//! MINECHAT_SERVER_HOST=minechat.dvmn.org minechat --log-level info
//! ```

mod args;
mod console;
mod envfile;

use crate::args::Args;
use crate::console::{Console, print_inbound, print_saved, print_status, spawn_line_reader};
use crate::envfile::EnvFileCredentialStore;
use clap::Parser;
use minechat_client::{ClientError, ConnectionSupervisor, replay};
use std::io::BufReader;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = args.client_config();
    info!(host = %config.host, read_port = config.read_port, write_port = config.write_port, "Starting");

    let (saved_tx, saved_rx) = mpsc::unbounded_channel();
    replay(&config.history_path, &saved_tx).await?;
    drop(saved_tx);
    let replayed = print_saved(saved_rx)?;
    debug!(replayed, "History replayed");

    let console = Console::new();
    let (mut supervisor, channels) = ConnectionSupervisor::new(
        config,
        Arc::new(console.prompt()),
        Arc::new(EnvFileCredentialStore::new(args.env_file.clone())),
    );
    let shutdown = supervisor.shutdown_token();

    let interrupt = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted");
            interrupt.cancel();
        }
    });

    let input = spawn_line_reader(BufReader::new(std::io::stdin()));
    tokio::spawn(console.route_input(input, channels.outbound, shutdown));
    tokio::spawn(print_inbound(channels.inbound));
    tokio::spawn(print_status(channels.status));

    match supervisor.run().await {
        Ok(()) => Ok(()),
        Err(ClientError::UserInterrupt(reason)) => {
            eprintln!("{reason}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
