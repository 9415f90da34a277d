//! Protocol message handler for Tagmark.
//!
//! Transport-independent: both the websocket endpoint and the stdio
//! `tagmark-rpc` binary feed raw messages through [`handle_message`].
//! Every message is checked by the auth gate exactly once, decoded into a
//! [`BookmarkRequest`], and dispatched to the bookmark manager.

use serde_json::Value;
use tracing::{info, warn};

use crate::app::App;
use crate::types::errors::{BookmarkError, ProtocolError};
use crate::types::protocol::{
    failure_tag, BookmarkRequest, Envelope, Reply, BOOKMARK_TYPE, DENIED_TAG, ERROR_TAG,
};

/// Parses a raw JSON message and handles it.
///
/// Always produces a reply; undecodable input yields an `ERROR` reply.
pub async fn handle_message(app: &App, raw: &str) -> Reply {
    match serde_json::from_str::<Envelope>(raw) {
        Ok(envelope) => handle_envelope(app, envelope).await,
        Err(e) => {
            let err = ProtocolError::Malformed(e.to_string());
            warn!(error = %err, "rejecting undecodable message");
            Reply::failure(Value::Null, ERROR_TAG.to_string(), 400, vec![err.to_string()])
        }
    }
}

/// Authorizes, decodes and executes one envelope.
pub async fn handle_envelope(app: &App, envelope: Envelope) -> Reply {
    let Envelope {
        id,
        data_type,
        action,
        request,
        transaction,
    } = envelope;

    if data_type != BOOKMARK_TYPE {
        let err = ProtocolError::UnknownType(data_type);
        return Reply::failure(id, ERROR_TAG.to_string(), 400, vec![err.to_string()]);
    }

    if let Err(e) = app.auth_gate.authorize(&transaction) {
        warn!(%action, "request denied");
        return Reply::failure(id, DENIED_TAG.to_string(), status_code(&e), vec![e.to_string()]);
    }

    let request = match BookmarkRequest::decode(&action, request) {
        Ok(request) => request,
        Err(e) => {
            warn!(%action, error = %e, "rejecting malformed request");
            return Reply::failure(id, failure_tag(&action), 400, vec![e.to_string()]);
        }
    };

    match app.bookmarks.execute(&request).await {
        Ok(result) => {
            let message = success_message(&request);
            info!("{}", message);
            Reply::success(id, request.success_tag(), result, message)
        }
        Err(e) => {
            warn!(action = request.action(), error = %e, "action failed");
            Reply::failure(
                id,
                failure_tag(request.action()),
                status_code(&e),
                vec![format!("Impossible to {} bookmark", request.action()), e.to_string()],
            )
        }
    }
}

/// Numeric status attached to a failure reply.
pub fn status_code(err: &BookmarkError) -> u16 {
    match err {
        BookmarkError::InvalidUrl(_) => 400,
        BookmarkError::Unauthorized => 403,
        BookmarkError::NotFound(_) => 404,
        BookmarkError::CorruptData(_)
        | BookmarkError::NoFileConfigured
        | BookmarkError::IoError(_) => 500,
    }
}

fn success_message(request: &BookmarkRequest) -> String {
    match request {
        BookmarkRequest::Create { url, .. } => format!("Created bookmark for {}", url),
        BookmarkRequest::Update { url, .. } => format!("Updated bookmark for {}", url),
        BookmarkRequest::Delete { url } => format!("Deleted bookmark for {}", url),
        BookmarkRequest::Retrieve { url: Some(url) } => format!("Retrieved bookmark for {}", url),
        BookmarkRequest::Retrieve { url: None } => "Retrieved all bookmarks".to_string(),
    }
}
