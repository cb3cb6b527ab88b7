//! ansihook webhook provider adapters.
//!
//! Implements the [`trigger::WebhookDecoder`] trait once per supported
//! hosting service:
//!
//! | Provider | Decoder | Authenticity | Push event |
//! |----------|---------|--------------|------------|
//! | GitHub | [`GithubDecoder`] | HMAC-SHA256 in `X-Hub-Signature-256` | `X-GitHub-Event: push` |
//! | GitLab | [`GitlabDecoder`] | token in `X-Gitlab-Token` | `X-Gitlab-Event: Push Hook` |
//! | Bitbucket | [`BitbucketDecoder`] | UUID in `X-Hook-UUID` | `X-Event-Key: repo:push` |
//!
//! The decoder is selected once at startup by [`decoder_for`]. A provider
//! name this crate does not know yields an [`UnsupportedProvider`] decoder
//! that rejects every request, so a misconfigured server still runs and says
//! why in its logs.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Header names, payload shapes and signature schemes
//! live here; the [`trigger`] crate sees only [`trigger::WebhookEvent`].

pub mod bitbucket;
pub mod github;
pub mod gitlab;
pub mod signature;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::warn;
use trigger::{
    EventKind, InvalidReason, ProviderKind, WebhookDecoder, WebhookEvent, WebhookRequest,
    WebhookSecret,
};

pub use bitbucket::BitbucketDecoder;
pub use github::GithubDecoder;
pub use gitlab::GitlabDecoder;

/// Selects the decoder for the provider named `service`.
///
/// Names are matched case-insensitively. An unknown name is logged and
/// produces an [`UnsupportedProvider`] decoder.
pub fn decoder_for(service: &str, secret: WebhookSecret) -> Arc<dyn WebhookDecoder> {
    match service.parse::<ProviderKind>() {
        Ok(ProviderKind::Github) => Arc::new(GithubDecoder::new(secret)),
        Ok(ProviderKind::Gitlab) => Arc::new(GitlabDecoder::new(secret)),
        Ok(ProviderKind::Bitbucket) => Arc::new(BitbucketDecoder::new(secret)),
        Err(e) => {
            warn!(error = %e, "webhook provider not supported; all requests will be rejected");
            Arc::new(UnsupportedProvider::new(e.value()))
        }
    }
}

/// Decoder for a provider name that did not match any known service.
#[derive(Debug, Clone)]
pub struct UnsupportedProvider {
    name: String,
}

impl UnsupportedProvider {
    /// Creates a decoder that rejects everything on behalf of `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl WebhookDecoder for UnsupportedProvider {
    fn provider(&self) -> &str {
        &self.name
    }

    fn decode(&self, _request: &WebhookRequest) -> WebhookEvent {
        WebhookEvent::Invalid(InvalidReason::UnsupportedProvider {
            name: self.name.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers shared by the decoders
// ---------------------------------------------------------------------------

/// Reads the event name from `header`; absent or blank counts as missing.
pub(crate) fn read_event_kind(
    request: &WebhookRequest,
    header: &'static str,
) -> Result<EventKind, InvalidReason> {
    request
        .header(header)
        .map(str::trim)
        .and_then(EventKind::new)
        .ok_or(InvalidReason::MissingEventHeader { header })
}

/// Deserialises a JSON push payload.
pub(crate) fn parse_payload<T: DeserializeOwned>(body: &[u8]) -> Result<T, InvalidReason> {
    serde_json::from_slice(body).map_err(|e| InvalidReason::MalformedPayload {
        message: e.to_string(),
    })
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
