//! GitHub webhook decoder.
//!
//! GitHub names the event in `X-GitHub-Event` and signs the raw body with
//! HMAC-SHA256, sending `sha256=<hex>` in `X-Hub-Signature-256`. Only
//! `application/json` deliveries are understood.

use serde::Deserialize;
use trigger::{
    DeliveryId, InvalidReason, ProviderKind, PushEvent, WebhookDecoder, WebhookEvent,
    WebhookRequest, WebhookSecret,
};

use crate::{parse_payload, read_event_kind, signature};

// ---------------------------------------------------------------------------
// Payload shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PushPayload {
    #[serde(rename = "ref")]
    git_ref: String,
    after: Option<String>,
    repository: Option<Repository>,
    pusher: Option<Pusher>,
    head_commit: Option<HeadCommit>,
}

#[derive(Debug, Deserialize)]
struct Repository {
    full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Pusher {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HeadCommit {
    id: Option<String>,
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// Decodes GitHub `push` deliveries.
#[derive(Debug, Clone)]
pub struct GithubDecoder {
    secret: WebhookSecret,
}

impl GithubDecoder {
    /// Header naming the event.
    pub const EVENT_HEADER: &'static str = "X-GitHub-Event";
    /// Header carrying the body signature.
    pub const SIGNATURE_HEADER: &'static str = "X-Hub-Signature-256";
    /// Header carrying the delivery GUID.
    pub const DELIVERY_HEADER: &'static str = "X-GitHub-Delivery";
    /// Event name of a push.
    pub const PUSH_EVENT: &'static str = "push";

    /// Creates a decoder that checks signatures against `secret`.
    pub fn new(secret: WebhookSecret) -> Self {
        Self { secret }
    }

    fn authenticate(&self, request: &WebhookRequest) -> Result<(), InvalidReason> {
        if self.secret.is_empty() {
            return Ok(());
        }
        let signature = request
            .header(Self::SIGNATURE_HEADER)
            .ok_or(InvalidReason::MissingSignature {
                header: Self::SIGNATURE_HEADER,
            })?;
        signature::verify_sha256(self.secret.expose(), signature, request.body())
    }

    fn classify(&self, request: &WebhookRequest) -> Result<WebhookEvent, InvalidReason> {
        let kind = read_event_kind(request, Self::EVENT_HEADER)?;
        self.authenticate(request)?;

        if kind.as_str() != Self::PUSH_EVENT {
            return Ok(WebhookEvent::Other(kind));
        }

        let payload: PushPayload = parse_payload(request.body())?;
        let head_commit = payload
            .head_commit
            .and_then(|c| c.id)
            .or(payload.after);

        Ok(WebhookEvent::Push(PushEvent {
            provider: ProviderKind::Github,
            delivery: self.delivery(request),
            git_ref: Some(payload.git_ref),
            repository: payload.repository.and_then(|r| r.full_name),
            head_commit,
            pusher: payload.pusher.and_then(|p| p.name),
        }))
    }
}

impl WebhookDecoder for GithubDecoder {
    fn provider(&self) -> &str {
        ProviderKind::Github.as_str()
    }

    fn delivery(&self, request: &WebhookRequest) -> Option<DeliveryId> {
        request.header(Self::DELIVERY_HEADER).and_then(DeliveryId::new)
    }

    fn decode(&self, request: &WebhookRequest) -> WebhookEvent {
        self.classify(request).unwrap_or_else(WebhookEvent::Invalid)
    }
}

#[cfg(test)]
#[path = "github_tests.rs"]
mod tests;
