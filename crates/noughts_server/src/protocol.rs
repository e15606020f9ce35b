//! Wire protocol: inbound commands and outbound messages.
//!
//! Frames are UTF-8 text with whitespace-separated, case-sensitive tokens.
//!
//! | Inbound             | Outbound                         |
//! |---------------------|----------------------------------|
//! | `CREATE GAME <id>`  | `GAME CREATED <id>`              |
//! | `JOIN GAME <id>`    | `GAME START <id>` (both players) |
//! | `MOVE <row> <col>`  | `MOVE <mark> <row> <col>`        |
//! |                     | `GAME OVER <mark> WIN`           |
//! |                     | `GAME OVER DRAW`                 |
//! |                     | `PLAYER 1` / `PLAYER 2`          |
//! |                     | `ERROR: <reason>`                |

use crate::error::ProtocolError;
use crate::session::{Outcome, Role};
use noughts_board::Mark;
use std::fmt;
use std::num::{IntErrorKind, ParseIntError};
use std::str::FromStr;

/// A parsed client frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `CREATE GAME <id>`
    CreateGame(String),
    /// `JOIN GAME <id>`
    JoinGame(String),
    /// `MOVE <row> <col>`; bounds are checked by the board, not the parser.
    Move {
        /// Row index as sent.
        row: i64,
        /// Column index as sent.
        col: i64,
    },
}

impl FromStr for Command {
    type Err = ProtocolError;

    fn from_str(frame: &str) -> Result<Self, Self::Err> {
        let mut tokens = frame.split_whitespace();
        let command = match tokens.next() {
            Some("CREATE") => {
                expect_game_keyword(&mut tokens)?;
                Command::CreateGame(required(&mut tokens)?.to_string())
            }
            Some("JOIN") => {
                expect_game_keyword(&mut tokens)?;
                Command::JoinGame(required(&mut tokens)?.to_string())
            }
            Some("MOVE") => {
                let row = number(required(&mut tokens)?)?;
                let col = number(required(&mut tokens)?)?;
                Command::Move { row, col }
            }
            _ => return Err(ProtocolError::UnknownCommand),
        };

        if tokens.next().is_some() {
            return Err(ProtocolError::UnexpectedArgument);
        }
        Ok(command)
    }
}

fn expect_game_keyword<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<(), ProtocolError> {
    match tokens.next() {
        Some("GAME") => Ok(()),
        Some(_) => Err(ProtocolError::UnknownCommand),
        None => Err(ProtocolError::MissingArgument),
    }
}

fn required<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<&'a str, ProtocolError> {
    tokens.next().ok_or(ProtocolError::MissingArgument)
}

/// Integers too wide for `i64` saturate so the board reports them as out of bounds.
fn number(token: &str) -> Result<i64, ProtocolError> {
    token.parse().or_else(|e: ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow => Ok(i64::MAX),
        IntErrorKind::NegOverflow => Ok(i64::MIN),
        _ => Err(ProtocolError::InvalidNumber),
    })
}

/// A frame sent to a client. `Display` renders the wire text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Seat assigned by auto-matchmaking.
    Player(Role),
    /// Named game registered.
    GameCreated(String),
    /// Named game has both players.
    GameStart(String),
    /// A non-terminal move was applied.
    Moved {
        /// Mark just placed.
        mark: Mark,
        /// Row of the move.
        row: usize,
        /// Column of the move.
        col: usize,
    },
    /// The game reached a terminal state.
    GameOver(Outcome),
    /// A command was rejected.
    Error(String),
}

impl ServerMessage {
    /// Builds an `ERROR:` frame from any rejection reason.
    pub fn error(reason: impl fmt::Display) -> Self {
        Self::Error(reason.to_string())
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerMessage::Player(role) => write!(f, "PLAYER {}", role.number()),
            ServerMessage::GameCreated(id) => write!(f, "GAME CREATED {id}"),
            ServerMessage::GameStart(id) => write!(f, "GAME START {id}"),
            ServerMessage::Moved { mark, row, col } => write!(f, "MOVE {mark} {row} {col}"),
            ServerMessage::GameOver(Outcome::Win(mark)) => write!(f, "GAME OVER {mark} WIN"),
            ServerMessage::GameOver(Outcome::Draw) => write!(f, "GAME OVER DRAW"),
            ServerMessage::Error(reason) => write!(f, "ERROR: {reason}"),
        }
    }
}
