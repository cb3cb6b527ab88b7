//! Inbound webhook request and the typed event decoded from it.
//!
//! A [`WebhookRequest`] is the raw material handed over by the HTTP layer;
//! a [`WebhookEvent`] is what a [`crate::WebhookDecoder`] turns it into. The
//! event lives only as long as the request that produced it and is dropped
//! once the dispatch decision has been made.

use std::collections::HashMap;

use bytes::Bytes;
use thiserror::Error;

use crate::{DeliveryId, EventKind, ProviderKind};

// ---------------------------------------------------------------------------
// Raw request
// ---------------------------------------------------------------------------

/// Raw HTTP webhook request data: headers and the unparsed body.
///
/// Header names are stored lower-cased so lookups are case-insensitive, which
/// matches how HTTP treats them on the wire.
#[derive(Debug, Clone, Default)]
pub struct WebhookRequest {
    headers: HashMap<String, String>,
    body: Bytes,
}

impl WebhookRequest {
    /// Creates a request from header pairs and a body.
    ///
    /// When the same header appears more than once the last value wins.
    pub fn new<I, K, V>(headers: I, body: impl Into<Bytes>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.into()))
            .collect();

        Self {
            headers,
            body: body.into(),
        }
    }

    /// Returns the value of `name`, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns the raw payload bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

// ---------------------------------------------------------------------------
// Decoded event
// ---------------------------------------------------------------------------

/// Outcome of decoding one webhook request.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEvent {
    /// Authentic push notification from the configured provider.
    Push(PushEvent),

    /// Authentic notification of some other kind (e.g. `pull_request`, `ping`).
    /// Logged and discarded.
    Other(EventKind),

    /// The request failed validation and must not trigger anything.
    Invalid(InvalidReason),
}

impl WebhookEvent {
    /// Returns `true` if this event should launch a playbook run.
    pub fn is_push(&self) -> bool {
        matches!(self, Self::Push(_))
    }
}

/// Summary of a push notification.
///
/// Everything except the provider is best effort: providers differ in what
/// they send and the values are only used for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushEvent {
    /// Provider that sent the notification.
    pub provider: ProviderKind,
    /// Delivery identifier from the provider's delivery header, if present.
    pub delivery: Option<DeliveryId>,
    /// Pushed ref, e.g. `refs/heads/main`.
    pub git_ref: Option<String>,
    /// Repository in `owner/name` form.
    pub repository: Option<String>,
    /// Commit id the ref now points at.
    pub head_commit: Option<String>,
    /// Display name of whoever pushed.
    pub pusher: Option<String>,
}

impl PushEvent {
    /// Creates a push event carrying only the provider.
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            delivery: None,
            git_ref: None,
            repository: None,
            head_commit: None,
            pusher: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation failures
// ---------------------------------------------------------------------------

/// Why a webhook request was rejected.
///
/// These are never fatal: the request is logged and answered with a 4xx
/// status that carries no detail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidReason {
    /// The header naming the event type was absent.
    #[error("missing {header} header")]
    MissingEventHeader {
        /// Name of the expected header.
        header: &'static str,
    },

    /// A secret is configured but the request carried no signature or token.
    #[error("missing {header} header")]
    MissingSignature {
        /// Name of the expected header.
        header: &'static str,
    },

    /// The signature header was present but not in the expected format.
    #[error("malformed signature: {detail}")]
    MalformedSignature {
        /// What was wrong with it.
        detail: String,
    },

    /// The signature or token did not match the configured secret.
    #[error("signature does not match the configured secret")]
    SignatureMismatch,

    /// The body is not a valid push payload for the provider.
    #[error("malformed payload: {message}")]
    MalformedPayload {
        /// Parser diagnostic.
        message: String,
    },

    /// The configured provider name is not one this build understands.
    #[error("webhook provider '{name}' is not supported")]
    UnsupportedProvider {
        /// The configured name.
        name: String,
    },
}

impl InvalidReason {
    /// Returns `true` if the request failed the authenticity check, as
    /// opposed to being structurally broken.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingSignature { .. } | Self::MalformedSignature { .. } | Self::SignatureMismatch
        )
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
