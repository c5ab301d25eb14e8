//! Server configuration from command-line flags and environment variables.

use std::time::Duration;

use clap::Parser;

use crate::domain::{DEFAULT_CHAT_HISTORY_CAPACITY, DEFAULT_MAX_PARTICIPANTS, RoomConfig};

/// Default outbound queue length per connection.
pub const DEFAULT_OUTBOUND_QUEUE_CAPACITY: usize = 64;

/// WebRTC signaling and room-coordination server
#[derive(Debug, Clone, Parser)]
#[command(name = "kaigi-server", version, about)]
pub struct ServerArgs {
    /// Address to bind
    #[arg(long, env = "KAIGI_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "KAIGI_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Maximum participants per room
    #[arg(long, env = "KAIGI_MAX_PARTICIPANTS", default_value_t = DEFAULT_MAX_PARTICIPANTS)]
    pub max_participants: usize,

    /// Chat messages kept per room
    #[arg(long, env = "KAIGI_CHAT_HISTORY_CAPACITY", default_value_t = DEFAULT_CHAT_HISTORY_CAPACITY)]
    pub chat_history_capacity: usize,

    /// Seconds between dead-connection sweeps
    #[arg(long, env = "KAIGI_SWEEP_INTERVAL_SECS", default_value_t = 30)]
    pub sweep_interval_secs: u64,

    /// Seconds between keepalive pings
    #[arg(long, env = "KAIGI_PING_INTERVAL_SECS", default_value_t = 30)]
    pub ping_interval_secs: u64,

    /// Messages buffered per connection before new ones are dropped
    #[arg(long, env = "KAIGI_OUTBOUND_QUEUE_CAPACITY", default_value_t = DEFAULT_OUTBOUND_QUEUE_CAPACITY)]
    pub outbound_queue_capacity: usize,

    /// Create rooms with chat disabled
    #[arg(long)]
    pub disable_chat: bool,

    /// Create rooms with screen sharing disabled
    #[arg(long)]
    pub disable_screen_share: bool,

    /// Create rooms with the recording flag set
    #[arg(long)]
    pub enable_recording: bool,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "KAIGI_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Immutable runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub room_defaults: RoomConfig,
    pub chat_history_capacity: usize,
    pub sweep_interval: Duration,
    pub ping_interval: Duration,
    pub outbound_queue_capacity: usize,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            room_defaults: RoomConfig::default(),
            chat_history_capacity: DEFAULT_CHAT_HISTORY_CAPACITY,
            sweep_interval: Duration::from_secs(30),
            ping_interval: Duration::from_secs(30),
            outbound_queue_capacity: DEFAULT_OUTBOUND_QUEUE_CAPACITY,
        }
    }
}

impl From<ServerArgs> for ServerConfig {
    fn from(args: ServerArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            room_defaults: RoomConfig {
                enable_chat: !args.disable_chat,
                enable_screen_share: !args.disable_screen_share,
                enable_recording: args.enable_recording,
                max_participants: args.max_participants,
            },
            chat_history_capacity: args.chat_history_capacity,
            // Zero would make tokio's interval panic.
            sweep_interval: Duration::from_secs(args.sweep_interval_secs.max(1)),
            ping_interval: Duration::from_secs(args.ping_interval_secs.max(1)),
            outbound_queue_capacity: args.outbound_queue_capacity,
        }
    }
}
