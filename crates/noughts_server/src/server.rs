//! WebSocket transport: listener, upgrade route and per-socket workers.

use crate::config::{MatchMode, ServerConfig};
use crate::connection::{Connection, Outbound};
use crate::handler::{Flow, ProtocolHandler};
use crate::registry::SessionRegistry;
use axum::Router;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{ConnectInfo, State};
use axum::response::Response;
use axum::routing::get;
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone)]
struct AppState {
    registry: SessionRegistry,
    mode: MatchMode,
}

/// Game server bound to one registry.
#[derive(Debug, Clone)]
pub struct GameServer {
    config: ServerConfig,
    registry: SessionRegistry,
}

impl GameServer {
    /// Creates a server with an empty registry.
    #[instrument(skip(config))]
    pub fn new(config: ServerConfig) -> Self {
        Self::with_registry(config, SessionRegistry::new())
    }

    /// Creates a server that shares an existing registry.
    pub fn with_registry(config: ServerConfig, registry: SessionRegistry) -> Self {
        Self { config, registry }
    }

    /// The registry all connections share.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Builds the router with the single upgrade route.
    ///
    /// No origin check is applied; any page may connect.
    pub fn router(&self) -> Router {
        let state = AppState {
            registry: self.registry.clone(),
            mode: *self.config.mode(),
        };
        Router::new()
            .route(self.config.path(), get(upgrade))
            .with_state(state)
    }

    /// Binds the configured address and serves until the process exits.
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        self.serve(listener).await
    }

    /// Serves on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> anyhow::Result<()> {
        let addr = listener.local_addr()?;
        info!(
            %addr,
            path = %self.config.path(),
            mode = %self.config.mode(),
            "WebSocket server listening on ws://{}{}",
            addr,
            self.config.path()
        );
        let app = self.router();
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;
        Ok(())
    }
}

async fn upgrade(
    ws: WebSocketUpgrade,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> Response {
    info!(%remote, "Client connected");
    ws.on_upgrade(move |socket| handle_socket(socket, state, remote))
}

/// Runs one client: a writer task draining the outbound queue and this task
/// reading frames into the protocol handler.
#[instrument(skip(socket, state))]
async fn handle_socket(socket: WebSocket, state: AppState, remote: SocketAddr) {
    let (conn, outbound) = Connection::new();
    let (sink, mut stream) = socket.split();
    let mut writer = tokio::spawn(write_frames(sink, outbound));
    let mut writer_done = false;

    let mut handler = ProtocolHandler::new(state.registry, state.mode, conn.clone());
    handler.on_connect();

    loop {
        tokio::select! {
            frame = stream.next() => {
                let flow = match frame {
                    Some(Ok(Message::Text(text))) => handler.handle_frame(text.as_str()),
                    Some(Ok(Message::Binary(_))) => handler.handle_binary(),
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("Client closed connection");
                        break;
                    }
                    Some(Ok(_)) => Flow::Continue,
                    Some(Err(e)) => {
                        debug!(error = %e, "Error reading frame");
                        break;
                    }
                };
                if flow == Flow::Close {
                    break;
                }
            }
            _ = &mut writer => {
                writer_done = true;
                break;
            }
        }
    }

    handler.finish();
    conn.close();
    if !writer_done && let Err(e) = writer.await {
        warn!(error = %e, "Writer task failed");
    }
    info!(%remote, "Client disconnected");
}

async fn write_frames(
    mut sink: futures::stream::SplitSink<WebSocket, Message>,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
) {
    while let Some(next) = outbound.recv().await {
        match next {
            Outbound::Frame(msg) => {
                if sink.send(Message::Text(msg.to_string().into())).await.is_err() {
                    debug!("WebSocket send failed, closing");
                    break;
                }
            }
            Outbound::Close => {
                let _ = sink.send(Message::Close(None)).await;
                break;
            }
        }
    }
    let _ = sink.close().await;
}
