//! The webhook route and its request handler.
//!
//! The handler validates and classifies the request through the configured
//! [`WebhookDecoder`], hands push events to the [`Dispatcher`], and answers
//! immediately. Nothing in the response tells the sender why a request was
//! rejected or how a run went; that is in the server log only.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use runner::Dispatcher;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, warn};
use trigger::{WebhookDecoder, WebhookEvent, WebhookRequest};

/// Largest accepted request body. GitHub caps deliveries at 25 MB.
pub const MAX_PAYLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Shared state of the webhook route.
#[derive(Clone)]
pub struct WebhookState {
    decoder: Arc<dyn WebhookDecoder>,
    dispatcher: Dispatcher,
}

impl WebhookState {
    /// Creates the state from the provider decoder and the dispatcher.
    pub fn new(decoder: Arc<dyn WebhookDecoder>, dispatcher: Dispatcher) -> Self {
        Self {
            decoder,
            dispatcher,
        }
    }
}

/// Builds the router exposing the single `POST <route_path>` route.
///
/// `route_path` must start with `/`; [`trigger::TriggerConfig::validate`]
/// guarantees this for configured paths.
pub fn router(route_path: &str, state: WebhookState) -> Router {
    Router::new()
        .route(route_path, post(receive_webhook))
        .layer(DefaultBodyLimit::max(MAX_PAYLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn receive_webhook(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let request = webhook_request(&headers, body);
    let delivery = state.decoder.delivery(&request);
    let span = info_span!(
        "webhook",
        provider = state.decoder.provider(),
        delivery = delivery.as_ref().map(|d| d.as_str()).unwrap_or("-"),
    );
    span.in_scope(|| handle(&state, &request))
}

fn handle(state: &WebhookState, request: &WebhookRequest) -> StatusCode {
    match state.decoder.decode(request) {
        WebhookEvent::Push(event) => {
            info!(
                git_ref = event.git_ref.as_deref().unwrap_or("-"),
                "received a push event"
            );
            state.dispatcher.dispatch(&event);
            StatusCode::OK
        }
        WebhookEvent::Other(kind) => {
            info!(event_type = %kind, "unknown event type");
            StatusCode::OK
        }
        WebhookEvent::Invalid(reason) => {
            warn!(reason = %reason, "error validating webhook request");
            if reason.is_authentication_failure() {
                StatusCode::UNAUTHORIZED
            } else {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

/// Copies the headers that are valid UTF-8 into a [`WebhookRequest`].
fn webhook_request(headers: &HeaderMap, body: Bytes) -> WebhookRequest {
    let pairs = headers
        .iter()
        .filter_map(|(name, value)| Some((name.as_str(), value.to_str().ok()?)));
    WebhookRequest::new(pairs, body)
}

#[cfg(test)]
#[path = "receiver_tests.rs"]
mod tests;
