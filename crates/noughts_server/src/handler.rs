//! Per-connection protocol handler.
//!
//! The handler owns no socket. The transport feeds it one text frame at a
//! time and stops reading when it answers [`Flow::Close`]; replies travel
//! through the connection's outbound queue.

use crate::config::MatchMode;
use crate::connection::Connection;
use crate::error::{ProtocolError, SessionError};
use crate::protocol::{Command, ServerMessage};
use crate::registry::SessionRegistry;
use crate::session::{GameSession, MoveOutcome, Role, SessionStatus};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Whether the read loop should keep going after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next frame.
    Continue,
    /// The game ended; stop reading.
    Close,
}

/// Protocol state for one client.
#[derive(Debug, derive_new::new)]
pub struct ProtocolHandler {
    registry: SessionRegistry,
    mode: MatchMode,
    conn: Connection,
    #[new(default)]
    seat: Option<Arc<GameSession>>,
}

impl ProtocolHandler {
    /// The session this connection is seated in, if any.
    pub fn session(&self) -> Option<&Arc<GameSession>> {
        self.seat.as_ref()
    }

    /// Runs matchmaking on connect. A no-op unless the server auto-matches.
    #[instrument(skip(self), fields(connection_id = %self.conn.id()))]
    pub fn on_connect(&mut self) -> Option<Role> {
        if self.mode != MatchMode::Auto {
            return None;
        }
        let matched = self.registry.create_or_match(self.conn.clone());
        let role = *matched.role();
        info!(session_id = %matched.session().id(), ?role, "Seated by matchmaking");
        self.seat = Some(Arc::clone(matched.session()));
        Some(role)
    }

    /// Handles one inbound text frame.
    #[instrument(skip(self), fields(connection_id = %self.conn.id()))]
    pub fn handle_frame(&mut self, frame: &str) -> Flow {
        debug!("Received frame");
        match frame.parse::<Command>() {
            Ok(command) => self.dispatch(command),
            Err(e) => {
                warn!(error = %e, "Malformed frame");
                self.reject(e);
                Flow::Continue
            }
        }
    }

    /// Answers a binary frame, which this protocol does not use.
    pub fn handle_binary(&mut self) -> Flow {
        warn!(connection_id = %self.conn.id(), "Received binary frame");
        self.reject(ProtocolError::BinaryFrame);
        Flow::Continue
    }

    fn dispatch(&mut self, command: Command) -> Flow {
        let result = match command {
            Command::CreateGame(id) => self.create(id),
            Command::JoinGame(id) => self.join(&id),
            Command::Move { row, col } => self.make_move(row, col),
        };
        result.unwrap_or_else(|e| {
            self.reject(e);
            Flow::Continue
        })
    }

    fn ensure_manual_entry(&mut self) -> Result<(), SessionError> {
        if self.mode == MatchMode::Auto {
            return Err(SessionError::ManualMatchDisabled);
        }
        // A seat in a dead session can be given up for a new game.
        if let Some(session) = &self.seat {
            let over = session.is_abandoned() || session.status() == SessionStatus::Finished;
            if !over {
                return Err(SessionError::AlreadySeated);
            }
            self.registry.release(session);
            self.seat = None;
        }
        Ok(())
    }

    fn create(&mut self, id: String) -> Result<Flow, SessionError> {
        self.ensure_manual_entry()?;
        let session = self.registry.create_named(id, self.conn.clone())?;
        self.seat = Some(session);
        Ok(Flow::Continue)
    }

    fn join(&mut self, id: &str) -> Result<Flow, SessionError> {
        self.ensure_manual_entry()?;
        let session = self.registry.join_named(id, self.conn.clone())?;
        self.seat = Some(session);
        Ok(Flow::Continue)
    }

    fn make_move(&mut self, row: i64, col: i64) -> Result<Flow, SessionError> {
        let session = self.seat.as_ref().ok_or(SessionError::GameNotReady)?;
        match session.make_move(&self.conn, row, col)? {
            MoveOutcome::Ongoing { .. } => Ok(Flow::Continue),
            MoveOutcome::GameOver(_) => Ok(Flow::Close),
        }
    }

    fn reject(&self, reason: impl std::fmt::Display) {
        self.conn.send(ServerMessage::error(reason));
    }

    /// Cleans up after the read loop ends, whatever the reason.
    ///
    /// Marks the session abandoned and drops it from the registry. The peer is
    /// not notified beyond what its own socket reports.
    #[instrument(skip(self), fields(connection_id = %self.conn.id()))]
    pub fn finish(mut self) {
        if let Some(session) = self.seat.take() {
            session.disconnect(&self.conn);
            self.registry.release(&session);
        }
        info!("Connection finished");
    }
}
