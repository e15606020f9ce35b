//! Error types for the game server.
//!
//! The `Display` text of [`SessionError`] and [`ProtocolError`] is what the
//! client sees after `ERROR: `.

use derive_more::{Display, Error, From};
use noughts_board::BoardError;
use tracing::instrument;

/// A rejected game operation. No state is mutated when one is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From)]
pub enum SessionError {
    /// The session already has two players.
    #[display("cannot join")]
    AlreadyFull,
    /// A session with this id is already registered.
    #[display("id exists")]
    IdAlreadyExists,
    /// No session is registered under this id.
    #[display("id not found")]
    NotFound,
    /// The session is not accepting moves (waiting, finished or abandoned).
    #[display("game not ready")]
    GameNotReady,
    /// The sender is not the turn holder.
    #[display("wrong turn")]
    NotYourTurn,
    /// The sender is not seated in this session.
    #[display("not a player")]
    NotAPlayer,
    /// A player left before the session filled.
    #[display("game abandoned")]
    Abandoned,
    /// The connection is already seated in a session.
    #[display("already in a game")]
    AlreadySeated,
    /// Named create/join is disabled while the server auto-matches.
    #[display("matchmaking is automatic")]
    ManualMatchDisabled,
    /// The board refused the mark.
    #[display("{_0}")]
    #[from]
    Board(#[error(source)] BoardError),
}

/// A frame that does not parse into a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum ProtocolError {
    /// First tokens do not name a known command.
    #[display("unknown command")]
    UnknownCommand,
    /// The command is missing a required token.
    #[display("missing argument")]
    MissingArgument,
    /// The command has more tokens than it takes.
    #[display("unexpected argument")]
    UnexpectedArgument,
    /// A row or column token is not an integer.
    #[display("invalid number")]
    InvalidNumber,
    /// A binary frame arrived on a text protocol.
    #[display("text frames only")]
    BinaryFrame,
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
