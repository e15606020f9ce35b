//! End-to-end games over real WebSocket connections.

use futures::{SinkExt, StreamExt};
use noughts_server::{GameServer, MatchMode, ServerConfig};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_server(mode: MatchMode) -> (SocketAddr, GameServer) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let config = ServerConfig::default()
        .with_host("127.0.0.1")
        .with_port(addr.port())
        .with_mode(mode);
    let server = GameServer::new(config);
    let running = server.clone();
    tokio::spawn(async move {
        running.serve(listener).await.unwrap();
    });
    (addr, server)
}

async fn connect(addr: SocketAddr) -> Socket {
    let (socket, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    socket
}

async fn send(socket: &mut Socket, frame: &str) {
    socket.send(Message::text(frame)).await.unwrap();
}

/// Next text frame, or `None` once the server closes.
async fn recv(socket: &mut Socket) -> Option<String> {
    loop {
        let next = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("timed out waiting for frame");
        match next {
            Some(Ok(Message::Text(text))) => return Some(text.as_str().to_string()),
            Some(Ok(Message::Close(_))) | None | Some(Err(_)) => return None,
            Some(Ok(_)) => continue,
        }
    }
}

#[tokio::test]
async fn test_named_game_to_win() {
    let (addr, server) = start_server(MatchMode::Named).await;
    let mut alice = connect(addr).await;
    let mut bob = connect(addr).await;

    send(&mut alice, "CREATE GAME abc").await;
    assert_eq!(recv(&mut alice).await.as_deref(), Some("GAME CREATED abc"));
    send(&mut bob, "JOIN GAME abc").await;
    assert_eq!(recv(&mut alice).await.as_deref(), Some("GAME START abc"));
    assert_eq!(recv(&mut bob).await.as_deref(), Some("GAME START abc"));

    send(&mut alice, "MOVE 0 0").await;
    assert_eq!(recv(&mut alice).await.as_deref(), Some("MOVE X 0 0"));
    assert_eq!(recv(&mut bob).await.as_deref(), Some("MOVE X 0 0"));

    send(&mut bob, "MOVE 0 0").await;
    assert_eq!(recv(&mut bob).await.as_deref(), Some("ERROR: occupied"));

    for (mover, frame) in [("b", "MOVE 1 0"), ("a", "MOVE 0 1"), ("b", "MOVE 1 1")] {
        let socket = if mover == "a" { &mut alice } else { &mut bob };
        send(socket, frame).await;
        let expected = format!("MOVE {} {}", if mover == "a" { "X" } else { "O" }, &frame[5..]);
        assert_eq!(recv(&mut alice).await, Some(expected.clone()));
        assert_eq!(recv(&mut bob).await, Some(expected));
    }

    send(&mut alice, "MOVE 0 2").await;
    assert_eq!(recv(&mut alice).await.as_deref(), Some("GAME OVER X WIN"));
    assert_eq!(recv(&mut bob).await.as_deref(), Some("GAME OVER X WIN"));
    assert_eq!(recv(&mut alice).await, None);
    assert_eq!(recv(&mut bob).await, None);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(server.registry().is_empty());
}

#[tokio::test]
async fn test_auto_match_announces_players() {
    let (addr, server) = start_server(MatchMode::Auto).await;
    let mut first = connect(addr).await;
    assert_eq!(recv(&mut first).await.as_deref(), Some("PLAYER 1"));
    let mut second = connect(addr).await;
    assert_eq!(recv(&mut second).await.as_deref(), Some("PLAYER 2"));

    send(&mut second, "MOVE 1 1").await;
    assert_eq!(recv(&mut second).await.as_deref(), Some("ERROR: wrong turn"));
    send(&mut first, "MOVE 1 1").await;
    assert_eq!(recv(&mut second).await.as_deref(), Some("MOVE X 1 1"));

    first.close(None).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(server.registry().is_empty());

    send(&mut second, "MOVE 0 0").await;
    assert_eq!(recv(&mut second).await.as_deref(), Some("ERROR: game not ready"));
}

#[tokio::test]
async fn test_malformed_frame_keeps_socket_open() {
    let (addr, _server) = start_server(MatchMode::Named).await;
    let mut client = connect(addr).await;

    send(&mut client, "MOVE one two").await;
    assert_eq!(recv(&mut client).await.as_deref(), Some("ERROR: invalid number"));
    send(&mut client, "CREATE GAME again").await;
    assert_eq!(recv(&mut client).await.as_deref(), Some("GAME CREATED again"));
}
