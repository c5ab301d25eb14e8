//! WebSocket connection handler.
//!
//! One task per socket reads frames and dispatches them in arrival order. A
//! second task drains the connection's outbound queue into the socket and
//! sends keepalive pings. Whichever side finishes first ends the session,
//! and the bound participant (if any) leaves its room on the way out.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::{sync::mpsc, time::MissedTickBehavior};
use uuid::Uuid;

use crate::{
    domain::{OutboundPayload, ParticipantConnection},
    infrastructure::connection::ChannelConnection,
    ui::{router::SignalingRouter, state::AppState},
    usecase::{LeaveRoomUseCase, SessionContext},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = Uuid::new_v4();
    tracing::info!("Connection '{}' opened", connection_id);

    let (sender, mut receiver) = socket.split();
    let (connection, outbound) = ChannelConnection::new(state.config.outbound_queue_capacity);
    let handle: Arc<dyn ParticipantConnection> = connection.clone();

    let mut send_task = tokio::spawn(write_loop(
        sender,
        outbound,
        connection.clone(),
        state.config.ping_interval,
        connection_id,
    ));

    let router = SignalingRouter::new(state.repository.clone(), state.notifier.clone());
    let mut session: Option<SessionContext> = None;

    loop {
        tokio::select! {
            frame = receiver.next() => {
                let msg = match frame {
                    Some(Ok(msg)) => msg,
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                        break;
                    }
                    None => break,
                };
                connection.record_activity();

                match msg {
                    Message::Text(text) => {
                        router.handle_text(&mut session, &handle, text.as_str()).await;
                    }
                    Message::Close(_) => {
                        tracing::info!("Connection '{}' sent close", connection_id);
                        break;
                    }
                    Message::Binary(_) => {
                        tracing::debug!("Ignoring binary frame on '{}'", connection_id);
                    }
                    // Pongs only matter as activity; pings are answered by axum.
                    Message::Ping(_) | Message::Pong(_) => {}
                }
            }
            _ = &mut send_task => break,
        }
    }

    if let Some(context) = session.take() {
        LeaveRoomUseCase::new(state.repository.clone(), state.notifier.clone())
            .execute(&context)
            .await;
    }
    connection.close();
    send_task.abort();

    tracing::info!("Connection '{}' closed", connection_id);
}

async fn write_loop(
    mut sender: SplitSink<WebSocket, Message>,
    mut outbound: mpsc::Receiver<OutboundPayload>,
    connection: Arc<ChannelConnection>,
    ping_interval: std::time::Duration,
    connection_id: Uuid,
) {
    let mut closed = connection.subscribe_closed();
    let mut keepalive = tokio::time::interval(ping_interval);
    keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    keepalive.tick().await;

    loop {
        tokio::select! {
            payload = outbound.recv() => {
                let Some(payload) = payload else { break };
                if let Err(e) = sender.send(Message::Text(payload.to_string().into())).await {
                    tracing::warn!("Failed to write to '{}': {}", connection_id, e);
                    connection.mark_dead();
                    break;
                }
            }
            _ = keepalive.tick() => {
                if !connection.begin_ping() {
                    tracing::warn!("Connection '{}' missed keepalive, dropping", connection_id);
                    break;
                }
                if sender.send(Message::Ping(Bytes::new())).await.is_err() {
                    connection.mark_dead();
                    break;
                }
            }
            // Resolve to a plain value so no watch guard is held in the select.
            _ = async { closed.wait_for(|closed| *closed).await.is_ok() } => break,
        }
    }

    let _ = sender.send(Message::Close(None)).await;
}
