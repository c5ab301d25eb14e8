//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use kaigi_server::config::ServerConfig;
use serde_json::Value;
use tokio::{net::TcpStream, sync::oneshot, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Server running on an ephemeral port for the lifetime of the value.
pub struct TestServer {
    address: std::net::SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    pub async fn start_with(config: ServerConfig) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let address = listener.local_addr().expect("Failed to read local address");
        let (shutdown, signal) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let shutdown_signal = async move {
                let _ = signal.await;
            };
            kaigi_server::ui::serve(listener, config, shutdown_signal)
                .await
                .expect("Server failed");
        });

        Self {
            address,
            shutdown: Some(shutdown),
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.address)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.address)
    }

    pub async fn connect(&self) -> WsClient {
        let (ws, _) = connect_async(self.ws_url())
            .await
            .expect("Failed to connect WebSocket");
        ws
    }

    /// Connect and join `room` as `name`, returning the `room-joined` reply.
    pub async fn join(&self, room: &str, name: &str) -> (WsClient, Value) {
        let mut ws = self.connect().await;
        send_json(
            &mut ws,
            serde_json::json!({"type": "join", "roomCode": room, "participantName": name}),
        )
        .await;
        let joined = recv_json(&mut ws).await;
        assert_eq!(joined["type"], "room-joined", "unexpected reply: {joined}");
        (ws, joined)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.handle.abort();
    }
}

pub async fn send_json(ws: &mut WsClient, value: Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .expect("Failed to send message");
}

/// Next JSON text message, skipping control frames.
pub async fn recv_json(ws: &mut WsClient) -> Value {
    tokio::time::timeout(RECV_TIMEOUT, async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    return serde_json::from_str(text.as_str()).expect("Invalid JSON from server");
                }
                Some(Ok(_)) => continue,
                other => panic!("WebSocket ended unexpectedly: {other:?}"),
            }
        }
    })
    .await
    .expect("Timed out waiting for message")
}

/// Next message whose `type` equals `kind`, discarding others.
pub async fn recv_type(ws: &mut WsClient, kind: &str) -> Value {
    loop {
        let message = recv_json(ws).await;
        if message["type"] == kind {
            return message;
        }
    }
}

/// Assert nothing but control frames arrives within `wait`.
pub async fn assert_silent(ws: &mut WsClient, wait: Duration) {
    let result = tokio::time::timeout(wait, async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => return Some(text.to_string()),
                Some(Ok(_)) => continue,
                _ => return None,
            }
        }
    })
    .await;
    if let Ok(Some(text)) = result {
        panic!("Expected no message, got {text}");
    }
}
