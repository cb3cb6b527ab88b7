//! GitLab webhook decoder.
//!
//! GitLab sends the configured secret token verbatim in `X-Gitlab-Token` and
//! names the event in `X-Gitlab-Event`.

use serde::Deserialize;
use trigger::{
    DeliveryId, InvalidReason, ProviderKind, PushEvent, WebhookDecoder, WebhookEvent,
    WebhookRequest, WebhookSecret,
};

use crate::{parse_payload, read_event_kind, signature};

#[derive(Debug, Deserialize)]
struct PushPayload {
    #[serde(rename = "ref")]
    git_ref: String,
    checkout_sha: Option<String>,
    after: Option<String>,
    user_name: Option<String>,
    project: Option<Project>,
}

#[derive(Debug, Deserialize)]
struct Project {
    path_with_namespace: Option<String>,
}

/// Decodes GitLab `Push Hook` deliveries.
#[derive(Debug, Clone)]
pub struct GitlabDecoder {
    secret: WebhookSecret,
}

impl GitlabDecoder {
    /// Header naming the event.
    pub const EVENT_HEADER: &'static str = "X-Gitlab-Event";
    /// Header carrying the secret token.
    pub const TOKEN_HEADER: &'static str = "X-Gitlab-Token";
    /// Header carrying the delivery UUID.
    pub const DELIVERY_HEADER: &'static str = "X-Gitlab-Event-UUID";
    /// Event name of a push.
    pub const PUSH_EVENT: &'static str = "Push Hook";

    /// Creates a decoder that expects `secret` as the token.
    pub fn new(secret: WebhookSecret) -> Self {
        Self { secret }
    }

    fn classify(&self, request: &WebhookRequest) -> Result<WebhookEvent, InvalidReason> {
        let kind = read_event_kind(request, Self::EVENT_HEADER)?;
        signature::verify_token(&self.secret, request, Self::TOKEN_HEADER)?;

        if kind.as_str() != Self::PUSH_EVENT {
            return Ok(WebhookEvent::Other(kind));
        }

        let payload: PushPayload = parse_payload(request.body())?;

        Ok(WebhookEvent::Push(PushEvent {
            provider: ProviderKind::Gitlab,
            delivery: self.delivery(request),
            git_ref: Some(payload.git_ref),
            repository: payload.project.and_then(|p| p.path_with_namespace),
            head_commit: payload.checkout_sha.or(payload.after),
            pusher: payload.user_name,
        }))
    }
}

impl WebhookDecoder for GitlabDecoder {
    fn provider(&self) -> &str {
        ProviderKind::Gitlab.as_str()
    }

    fn delivery(&self, request: &WebhookRequest) -> Option<DeliveryId> {
        request.header(Self::DELIVERY_HEADER).and_then(DeliveryId::new)
    }

    fn decode(&self, request: &WebhookRequest) -> WebhookEvent {
        self.classify(request).unwrap_or_else(WebhookEvent::Invalid)
    }
}

#[cfg(test)]
#[path = "gitlab_tests.rs"]
mod tests;
