//! Game session: one board shared by two connections.
//!
//! Every operation runs under the session's own mutex, so moves from the two
//! players are applied in a single total order. Frames produced by a move are
//! queued to both players before the lock is released, which keeps every
//! client's view in the same order the moves were applied.

use crate::connection::{Connection, ConnectionId};
use crate::error::SessionError;
use crate::protocol::ServerMessage;
use noughts_board::{Board, Coord, Mark};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Seat in a session. Player A creates the game and plays X.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The creator; moves first.
    PlayerA,
    /// The joiner.
    PlayerB,
}

impl Role {
    /// Mark played from this seat.
    pub fn mark(self) -> Mark {
        match self {
            Role::PlayerA => Mark::X,
            Role::PlayerB => Mark::O,
        }
    }

    /// Seat number announced on the wire (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            Role::PlayerA => 1,
            Role::PlayerB => 2,
        }
    }

    /// The other seat.
    pub fn other(self) -> Self {
        match self {
            Role::PlayerA => Role::PlayerB,
            Role::PlayerB => Role::PlayerA,
        }
    }
}

/// Lifecycle of a session. Nothing leaves `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum SessionStatus {
    /// Player A is seated, player B is not.
    WaitingForOpponent,
    /// Both seated, moves accepted.
    InProgress,
    /// Won or drawn.
    Finished,
}

/// Terminal result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// A mark completed a line.
    Win(Mark),
    /// The board filled with no line.
    Draw,
}

/// Result of an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Play continues with the other player.
    Ongoing {
        /// Mark just placed.
        mark: Mark,
        /// Row of the move.
        row: usize,
        /// Column of the move.
        col: usize,
    },
    /// The move ended the game.
    GameOver(Outcome),
}

#[derive(Debug)]
struct SessionState {
    player_a: Connection,
    player_b: Option<Connection>,
    board: Board,
    turn: Role,
    status: SessionStatus,
    abandoned: bool,
}

impl SessionState {
    fn role_of(&self, conn: &Connection) -> Option<Role> {
        if self.player_a == *conn {
            Some(Role::PlayerA)
        } else if self.player_b.as_ref() == Some(conn) {
            Some(Role::PlayerB)
        } else {
            None
        }
    }

    fn broadcast(&self, msg: &ServerMessage) {
        self.player_a.send(msg.clone());
        if let Some(b) = &self.player_b {
            b.send(msg.clone());
        }
    }

    fn close_all(&self) {
        self.player_a.close();
        if let Some(b) = &self.player_b {
            b.close();
        }
    }
}

/// A two-player match.
#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    state: Mutex<SessionState>,
}

impl GameSession {
    /// Creates a session waiting for an opponent, with `player_a` seated.
    #[instrument(skip(player_a), fields(connection_id = %player_a.id()))]
    pub fn new(id: SessionId, player_a: Connection) -> Self {
        info!(session_id = %id, "Creating new game session");
        Self {
            id,
            state: Mutex::new(SessionState {
                player_a,
                player_b: None,
                board: Board::new(),
                turn: Role::PlayerA,
                status: SessionStatus::WaitingForOpponent,
                abandoned: false,
            }),
        }
    }

    /// Session id.
    pub fn id(&self) -> &str {
        &self.id
    }

    // A panicking worker must not wedge the other player.
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seats `conn` as player B and starts the game.
    ///
    /// `greet` runs under the session lock with (player A, player B) once the
    /// seat is taken, so greetings are queued before any move can be
    /// broadcast. Of two concurrent joins only the first succeeds.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Abandoned`] if player A already left.
    /// - [`SessionError::AlreadyFull`] if player B is seated.
    #[instrument(skip(self, conn, greet), fields(session_id = %self.id, connection_id = %conn.id()))]
    pub fn join(
        &self,
        conn: Connection,
        greet: impl FnOnce(&Connection, &Connection),
    ) -> Result<(), SessionError> {
        let mut guard = self.lock();
        let state = &mut *guard;
        if state.abandoned {
            warn!("Join attempted on abandoned session");
            return Err(SessionError::Abandoned);
        }
        if state.player_b.is_some() {
            warn!("Session already has 2 players");
            return Err(SessionError::AlreadyFull);
        }
        if state.player_a == conn {
            warn!("Player tried to join their own session");
            return Err(SessionError::AlreadySeated);
        }

        state.status = SessionStatus::InProgress;
        state.turn = Role::PlayerA;
        let player_b = state.player_b.insert(conn);
        greet(&state.player_a, player_b);

        info!("Player B joined, game in progress");
        Ok(())
    }

    /// Applies a move from `conn` at (`row`, `col`).
    ///
    /// On success the resulting `MOVE` or `GAME OVER` frame is queued to both
    /// players; a terminal move also asks both writers to close.
    ///
    /// # Errors
    ///
    /// - [`SessionError::GameNotReady`] unless the game is in progress.
    /// - [`SessionError::NotAPlayer`] if `conn` is not seated here.
    /// - [`SessionError::NotYourTurn`] if `conn` is not the turn holder.
    /// - [`SessionError::Board`] for out-of-bounds or occupied cells.
    #[instrument(skip(self, conn), fields(session_id = %self.id, connection_id = %conn.id()))]
    pub fn make_move(
        &self,
        conn: &Connection,
        row: i64,
        col: i64,
    ) -> Result<MoveOutcome, SessionError> {
        let mut state = self.lock();

        if state.abandoned || state.status != SessionStatus::InProgress {
            debug!(status = %state.status, abandoned = state.abandoned, "Move while not in progress");
            return Err(SessionError::GameNotReady);
        }

        let role = state.role_of(conn).ok_or_else(|| {
            warn!("Unknown connection attempted move");
            SessionError::NotAPlayer
        })?;

        if role != state.turn {
            warn!(expected = ?state.turn, actual = ?role, "Player tried to move out of turn");
            return Err(SessionError::NotYourTurn);
        }

        let coord = Coord::new(row, col).map_err(|e| {
            warn!(error = %e, "Invalid move");
            SessionError::from(e)
        })?;
        let mark = role.mark();
        state.board.place_at(coord, mark).map_err(|e| {
            warn!(error = %e, "Invalid move");
            SessionError::from(e)
        })?;

        debug!(board = %state.board.render(), "Board after move");

        let outcome = if let Some(winner) = state.board.winner() {
            MoveOutcome::GameOver(Outcome::Win(winner))
        } else if state.board.is_draw() {
            MoveOutcome::GameOver(Outcome::Draw)
        } else {
            MoveOutcome::Ongoing {
                mark,
                row: coord.row(),
                col: coord.col(),
            }
        };

        match outcome {
            MoveOutcome::GameOver(result) => {
                state.status = SessionStatus::Finished;
                state.broadcast(&ServerMessage::GameOver(result));
                state.close_all();
                info!(?result, "Game finished");
            }
            MoveOutcome::Ongoing { mark, row, col } => {
                state.turn = role.other();
                state.broadcast(&ServerMessage::Moved { mark, row, col });
                info!(?mark, row, col, "Move completed successfully");
            }
        }

        Ok(outcome)
    }

    /// Marks the session as abandoned after `conn` went away.
    ///
    /// The remaining player is not sent a protocol message; further moves are
    /// rejected with `game not ready`.
    #[instrument(skip(self, conn), fields(session_id = %self.id, connection_id = %conn.id()))]
    pub fn disconnect(&self, conn: &Connection) {
        let mut state = self.lock();
        if state.role_of(conn).is_none() {
            debug!("Disconnect from a connection not seated here");
            return;
        }
        state.abandoned = true;
        info!(status = %state.status, "Session abandoned");
    }

    /// Current lifecycle status.
    pub fn status(&self) -> SessionStatus {
        self.lock().status
    }

    /// True once a player has disconnected.
    pub fn is_abandoned(&self) -> bool {
        self.lock().abandoned
    }

    /// Snapshot of the board.
    pub fn board(&self) -> Board {
        self.lock().board.clone()
    }

    /// Seat currently allowed to move.
    pub fn turn(&self) -> Role {
        self.lock().turn
    }

    /// Seat held by `conn`, if any.
    pub fn role_of(&self, conn: &Connection) -> Option<Role> {
        self.lock().role_of(conn)
    }

    /// Ids of player A and (if seated) player B.
    pub fn player_ids(&self) -> (ConnectionId, Option<ConnectionId>) {
        let state = self.lock();
        (
            state.player_a.id(),
            state.player_b.as_ref().map(Connection::id),
        )
    }
}
