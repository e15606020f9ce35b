//! Process-wide directory of game sessions.
//!
//! The registry lock guards only the map and the queue of joinable ids. It is
//! always released before a session lock is taken, so a worker joining a game
//! and a worker moving inside it can never deadlock.

use crate::connection::Connection;
use crate::error::SessionError;
use crate::protocol::ServerMessage;
use crate::session::{GameSession, Role, SessionId};
use derive_getters::Getters;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

/// A seat obtained through auto-matchmaking.
#[derive(Debug, Clone, Getters)]
pub struct Matched {
    /// The session the connection now sits in.
    session: Arc<GameSession>,
    /// Which seat it took.
    role: Role,
}

#[derive(Debug, Default)]
struct RegistryState {
    sessions: HashMap<SessionId, Arc<GameSession>>,
    /// Ids of sessions still waiting for player B, oldest first.
    open: VecDeque<SessionId>,
    next_id: u64,
}

impl RegistryState {
    fn fresh_id(&mut self) -> SessionId {
        loop {
            self.next_id += 1;
            let id = self.next_id.to_string();
            if !self.sessions.contains_key(&id) {
                return id;
            }
        }
    }

    fn forget_open(&mut self, id: &str) {
        self.open.retain(|open| open != id);
    }
}

/// Manages all game sessions.
///
/// Cloning is cheap; all clones share one map.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<Mutex<RegistryState>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session registry");
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seats `conn` in the oldest waiting session, or opens a new one.
    ///
    /// A new session gets a fresh numeric id and `conn` is told `PLAYER 1`
    /// before the session becomes visible. A joiner is told `PLAYER 2` under
    /// the session lock.
    #[instrument(skip(self, conn), fields(connection_id = %conn.id()))]
    pub fn create_or_match(&self, conn: Connection) -> Matched {
        loop {
            let candidate = {
                let mut state = self.lock();
                let mut found = None;
                while let Some(id) = state.open.pop_front() {
                    if let Some(session) = state.sessions.get(&id) {
                        found = Some(Arc::clone(session));
                        break;
                    }
                }

                match found {
                    Some(session) => session,
                    None => {
                        let id = state.fresh_id();
                        let session = Arc::new(GameSession::new(id.clone(), conn.clone()));
                        conn.send(ServerMessage::Player(Role::PlayerA));
                        state.sessions.insert(id.clone(), Arc::clone(&session));
                        state.open.push_back(id);
                        info!(session_id = %session.id(), "Opened session, waiting for opponent");
                        return Matched {
                            session,
                            role: Role::PlayerA,
                        };
                    }
                }
            };

            // Registry lock released; now take the session lock.
            let joined = candidate.join(conn.clone(), |_, player_b| {
                player_b.send(ServerMessage::Player(Role::PlayerB));
            });
            match joined {
                Ok(()) => {
                    info!(session_id = %candidate.id(), "Matched with waiting player");
                    return Matched {
                        session: candidate,
                        role: Role::PlayerB,
                    };
                }
                Err(e) => {
                    debug!(session_id = %candidate.id(), error = %e, "Candidate gone, retrying");
                }
            }
        }
    }

    /// Registers a session under a client-chosen id with `conn` as player A.
    ///
    /// `conn` is told `GAME CREATED <id>` before the session becomes visible.
    ///
    /// # Errors
    ///
    /// [`SessionError::IdAlreadyExists`] if `id` is taken; the existing
    /// session is untouched.
    #[instrument(skip(self, conn), fields(connection_id = %conn.id()))]
    pub fn create_named(
        &self,
        id: SessionId,
        conn: Connection,
    ) -> Result<Arc<GameSession>, SessionError> {
        let mut state = self.lock();
        if state.sessions.contains_key(&id) {
            warn!(session_id = %id, "Session already exists");
            return Err(SessionError::IdAlreadyExists);
        }

        conn.send(ServerMessage::GameCreated(id.clone()));
        let session = Arc::new(GameSession::new(id.clone(), conn));
        state.sessions.insert(id.clone(), Arc::clone(&session));
        state.open.push_back(id.clone());

        info!(session_id = %id, "Created named session");
        Ok(session)
    }

    /// Seats `conn` as player B of the session named `id`.
    ///
    /// Both players are told `GAME START <id>`.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotFound`] if no session is registered under `id`.
    /// - [`SessionError::AlreadyFull`] if player B is already seated.
    /// - [`SessionError::Abandoned`] if player A left mid-join.
    #[instrument(skip(self, conn), fields(connection_id = %conn.id()))]
    pub fn join_named(
        &self,
        id: &str,
        conn: Connection,
    ) -> Result<Arc<GameSession>, SessionError> {
        let session = self.get(id).ok_or_else(|| {
            debug!(session_id = id, "Session not found");
            SessionError::NotFound
        })?;

        session.join(conn, |player_a, player_b| {
            let start = ServerMessage::GameStart(id.to_string());
            player_a.send(start.clone());
            player_b.send(start);
        })?;

        // A rejected join leaves the session matchable.
        let mut state = self.lock();
        if state
            .sessions
            .get(id)
            .is_some_and(|current| Arc::ptr_eq(current, &session))
        {
            state.forget_open(id);
        }
        Ok(session)
    }

    /// Deletes the entry for `id`. Removing an absent id is a no-op.
    #[instrument(skip(self))]
    pub fn remove(&self, id: &str) {
        let mut state = self.lock();
        state.forget_open(id);
        if state.sessions.remove(id).is_some() {
            info!(session_id = id, "Removed session");
        }
    }

    /// Deletes `session` only if it is still the entry registered under its id.
    ///
    /// A finished game's id may already have been reused by a new session;
    /// that newer session is left alone.
    #[instrument(skip(self, session), fields(session_id = %session.id()))]
    pub fn release(&self, session: &Arc<GameSession>) {
        let mut state = self.lock();
        let same = state
            .sessions
            .get(session.id())
            .is_some_and(|current| Arc::ptr_eq(current, session));
        if same {
            state.sessions.remove(session.id());
            state.forget_open(session.id());
            info!("Released session");
        }
    }

    /// Looks up a session by id.
    pub fn get(&self, id: &str) -> Option<Arc<GameSession>> {
        self.lock().sessions.get(id).cloned()
    }

    /// Lists all registered session ids.
    pub fn ids(&self) -> Vec<SessionId> {
        self.lock().sessions.keys().cloned().collect()
    }

    /// Number of registered sessions.
    pub fn len(&self) -> usize {
        self.lock().sessions.len()
    }

    /// True when no sessions are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ids_skip_taken_names() {
        let registry = SessionRegistry::new();
        let (a, _rx_a) = Connection::new();
        registry.create_named("1".into(), a).unwrap();

        let (b, _rx_b) = Connection::new();
        let matched = registry.create_or_match(b);
        // "1" is a named session waiting for an opponent, so b joins it.
        assert_eq!(matched.session().id(), "1");

        let (c, _rx_c) = Connection::new();
        let matched = registry.create_or_match(c);
        assert_eq!(matched.session().id(), "2");
        assert_eq!(*matched.role(), Role::PlayerA);
    }

    #[test]
    fn test_release_ignores_replaced_session() {
        let registry = SessionRegistry::new();
        let (a, _rx_a) = Connection::new();
        let old = registry.create_named("abc".into(), a).unwrap();
        registry.remove("abc");

        let (b, _rx_b) = Connection::new();
        let new = registry.create_named("abc".into(), b).unwrap();
        registry.release(&old);
        assert!(Arc::ptr_eq(&registry.get("abc").unwrap(), &new));

        registry.release(&new);
        assert!(registry.is_empty());
    }
}
