//! Bitbucket Cloud webhook decoder.
//!
//! Bitbucket does not sign payloads. Each webhook has a UUID which is sent in
//! `X-Hook-UUID`; the configured secret is compared against it. The event is
//! named in `X-Event-Key`.

use serde::Deserialize;
use trigger::{
    DeliveryId, InvalidReason, ProviderKind, PushEvent, WebhookDecoder, WebhookEvent,
    WebhookRequest, WebhookSecret,
};

use crate::{parse_payload, read_event_kind, signature};

#[derive(Debug, Deserialize)]
struct PushPayload {
    push: Push,
    repository: Option<Repository>,
    actor: Option<Actor>,
}

#[derive(Debug, Deserialize)]
struct Push {
    #[serde(default)]
    changes: Vec<Change>,
}

#[derive(Debug, Deserialize)]
struct Change {
    new: Option<RefState>,
}

#[derive(Debug, Deserialize)]
struct RefState {
    name: Option<String>,
    target: Option<Target>,
}

#[derive(Debug, Deserialize)]
struct Target {
    hash: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Repository {
    full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Actor {
    display_name: Option<String>,
}

/// Decodes Bitbucket `repo:push` deliveries.
#[derive(Debug, Clone)]
pub struct BitbucketDecoder {
    uuid: WebhookSecret,
}

impl BitbucketDecoder {
    /// Header naming the event.
    pub const EVENT_HEADER: &'static str = "X-Event-Key";
    /// Header carrying the webhook UUID.
    pub const UUID_HEADER: &'static str = "X-Hook-UUID";
    /// Header carrying the request UUID.
    pub const DELIVERY_HEADER: &'static str = "X-Request-UUID";
    /// Event name of a push.
    pub const PUSH_EVENT: &'static str = "repo:push";

    /// Creates a decoder that expects the webhook UUID `uuid`.
    pub fn new(uuid: WebhookSecret) -> Self {
        Self { uuid }
    }

    fn classify(&self, request: &WebhookRequest) -> Result<WebhookEvent, InvalidReason> {
        let kind = read_event_kind(request, Self::EVENT_HEADER)?;
        signature::verify_token(&self.uuid, request, Self::UUID_HEADER)?;

        if kind.as_str() != Self::PUSH_EVENT {
            return Ok(WebhookEvent::Other(kind));
        }

        let payload: PushPayload = parse_payload(request.body())?;
        // Branch deletions have no `new` state; the first surviving ref wins.
        let new_state = payload.push.changes.into_iter().find_map(|c| c.new);
        let (git_ref, head_commit) = match new_state {
            Some(state) => (state.name, state.target.and_then(|t| t.hash)),
            None => (None, None),
        };

        Ok(WebhookEvent::Push(PushEvent {
            provider: ProviderKind::Bitbucket,
            delivery: self.delivery(request),
            git_ref,
            repository: payload.repository.and_then(|r| r.full_name),
            head_commit,
            pusher: payload.actor.and_then(|a| a.display_name),
        }))
    }
}

impl WebhookDecoder for BitbucketDecoder {
    fn provider(&self) -> &str {
        ProviderKind::Bitbucket.as_str()
    }

    fn delivery(&self, request: &WebhookRequest) -> Option<DeliveryId> {
        request.header(Self::DELIVERY_HEADER).and_then(DeliveryId::new)
    }

    fn decode(&self, request: &WebhookRequest) -> WebhookEvent {
        self.classify(request).unwrap_or_else(WebhookEvent::Invalid)
    }
}

#[cfg(test)]
#[path = "bitbucket_tests.rs"]
mod tests;
