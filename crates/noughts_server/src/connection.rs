//! Connection handles shared between a socket worker and its game session.

use crate::protocol::ServerMessage;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, trace};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique id of one client connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("conn-{_0}")]
pub struct ConnectionId(u64);

impl ConnectionId {
    fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Instruction for the socket writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Send one text frame.
    Frame(ServerMessage),
    /// Send a close frame and stop writing.
    Close,
}

/// Handle to one client's outbound channel.
///
/// The socket itself stays with the worker that accepted it. Sessions hold
/// clones of this handle to tell the players apart and to queue frames for
/// them. Queueing never blocks.
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<Outbound>,
}

impl Connection {
    /// Creates a handle and the receiver its writer drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = Self {
            id: ConnectionId::next(),
            tx,
        };
        debug!(connection_id = %conn.id, "Opened connection handle");
        (conn, rx)
    }

    /// Returns the connection id.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queues a frame. Returns `false` if the writer has gone away.
    pub fn send(&self, msg: ServerMessage) -> bool {
        trace!(connection_id = %self.id, %msg, "Queueing frame");
        let delivered = self.tx.send(Outbound::Frame(msg)).is_ok();
        if !delivered {
            debug!(connection_id = %self.id, "Writer gone, frame dropped");
        }
        delivered
    }

    /// Asks the writer to close the socket after draining queued frames.
    pub fn close(&self) {
        // A closed writer needs no close request.
        let _ = self.tx.send(Outbound::Close);
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Connection {}
