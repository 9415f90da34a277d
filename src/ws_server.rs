//! Websocket transport for the bookmark protocol.
//!
//! One JSON envelope per text frame in, one JSON reply per text frame out.
//! A `ready` event is sent as soon as the connection is upgraded.

use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use crate::app::App;
use crate::rpc_handler::handle_message;

/// Builds the router exposing `/ws` and `/health`.
pub fn router(app: Arc<App>) -> Router {
    Router::new()
        .route("/ws", get(handler))
        .route("/health", get(|| async { "ok" }))
        .with_state(app)
}

/// Serve the websocket endpoint on `addr` until `shutdown` resolves.
pub async fn serve_ws(
    addr: SocketAddr,
    app: Arc<App>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening for websocket connections");
    axum::serve(listener, router(app).into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
}

/// Handle the HTTP upgrade and spawn the connection processor.
async fn handler(ws: WebSocketUpgrade, State(app): State<Arc<App>>) -> impl IntoResponse {
    let span = tracing::info_span!("connection", id = %Uuid::new_v4());
    ws.on_upgrade(move |socket| process(socket, app).instrument(span))
}

/// Answer every text frame on the connection until the client goes away.
async fn process(socket: WebSocket, app: Arc<App>) {
    debug!("connection opened");
    let (mut sender, mut receiver) = socket.split();

    let ready = json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")});
    if sender.send(Message::Text(ready.to_string().into())).await.is_err() {
        return;
    }

    while let Some(Ok(msg)) = receiver.next().await {
        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };
        let reply = handle_message(&app, text.as_str()).await;
        let body = match serde_json::to_string(&reply) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "failed to encode reply");
                continue;
            }
        };
        if sender.send(Message::Text(body.into())).await.is_err() {
            break;
        }
    }
    debug!("connection closed");
}
