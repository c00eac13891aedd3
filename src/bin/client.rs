//! CLI chat client for short-lived chat rooms.
//!
//! `create` spins up a room through the room-management API and prints a
//! ready-to-paste join command. `join` enters a room and runs the chat
//! session; without arguments it resumes the identity stored from the last
//! join. The live connection reconnects automatically and re-announces
//! presence after every reconnect.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin client -- create --room-name Standup
//! cargo run --bin client -- join --room-id <id> --nickname bob
//! cargo run --bin client -- join
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use idobata::client::{ClientConfig, run_create, run_join};
use idobata::common::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "Chat client for short-lived rooms with reconnect support", long_about = None)]
struct Args {
    /// Room-management API base URL
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    api_url: String,

    /// WebSocket server URL
    #[arg(long, default_value = "ws://127.0.0.1:8080/ws")]
    ws_url: String,

    /// Identity file used to resume the last session
    #[arg(long, default_value = "chat-user.json")]
    profile: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new room
    Create {
        /// Display name of the room
        #[arg(short = 'n', long)]
        room_name: String,

        /// Minutes until the room expires
        #[arg(short = 'e', long, default_value_t = 60)]
        expires_in_minutes: u32,

        /// Maximum number of simultaneous users
        #[arg(short = 'm', long, default_value_t = 10)]
        max_users: u32,
    },
    /// Join a room (falls back to the stored identity)
    Join {
        /// Room code to join
        #[arg(short = 'r', long)]
        room_id: Option<String>,

        /// Nickname shown to other participants
        #[arg(short = 'c', long)]
        nickname: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let config = ClientConfig {
        api_url: args.api_url,
        ws_url: args.ws_url,
        profile: args.profile,
    };

    let result = match args.command {
        Command::Create {
            room_name,
            expires_in_minutes,
            max_users,
        } => run_create(&config, room_name, expires_in_minutes, max_users).await,
        Command::Join { room_id, nickname } => run_join(&config, room_id, nickname).await,
    };

    if let Err(e) = result {
        tracing::error!("Client error: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
