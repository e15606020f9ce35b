//! Noughts server library - two-player tic-tac-toe over WebSocket
//!
//! # Architecture
//!
//! - **Session**: one board, two connections, a turn marker, its own lock
//! - **Registry**: every live session by id, behind a separate lock
//! - **Handler**: per-connection command parsing and dispatch
//! - **Server**: axum WebSocket endpoint feeding frames to handlers
//!
//! # Example
//!
//! ```no_run
//! use noughts_server::{GameServer, MatchMode, ServerConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::default().with_port(52301).with_mode(MatchMode::Auto);
//! GameServer::new(config).run().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
mod config;
mod connection;
mod error;
mod handler;
mod protocol;
mod registry;
mod server;
mod session;

// Crate-level exports - Configuration
pub use config::{MatchMode, ServerConfig};

// Crate-level exports - Errors
pub use error::{ConfigError, ProtocolError, SessionError};

// Crate-level exports - Connections and wire protocol
pub use connection::{Connection, ConnectionId, Outbound};
pub use protocol::{Command, ServerMessage};

// Crate-level exports - Sessions
pub use registry::{Matched, SessionRegistry};
pub use session::{GameSession, MoveOutcome, Outcome, Role, SessionId, SessionStatus};

// Crate-level exports - Protocol handler and transport
pub use handler::{Flow, ProtocolHandler};
pub use server::GameServer;
