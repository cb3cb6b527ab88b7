//! Port traits implemented by the infrastructure crates.
//!
//! | Trait | Implemented by |
//! |-------|----------------|
//! | [`WebhookDecoder`] | `providers` (one implementation per hosting service) |
//! | [`PlaybookRunner`] | `runner` (`AnsiblePlaybook`) and test doubles |

use async_trait::async_trait;

use crate::{DeliveryId, ExecutionAttempt, RunError, RunOutcome, WebhookEvent, WebhookRequest};

/// Validates and classifies inbound webhook requests for one provider.
///
/// A decoder is chosen once at startup from the configured provider name and
/// shared by every request. Decoding never fails: problems are reported as
/// [`WebhookEvent::Invalid`].
pub trait WebhookDecoder: Send + Sync {
    /// Name of the provider this decoder handles, for logging.
    fn provider(&self) -> &str;

    /// Delivery identifier the provider attached to `request`, if any.
    ///
    /// Read before validation so that rejected requests can be correlated
    /// with the provider's delivery log.
    fn delivery(&self, _request: &WebhookRequest) -> Option<DeliveryId> {
        None
    }

    /// Validates `request` and decodes it into a [`WebhookEvent`].
    ///
    /// Authenticity is checked before the event kind is looked at, so a
    /// forged request is always [`WebhookEvent::Invalid`] regardless of the
    /// event it claims to be.
    fn decode(&self, request: &WebhookRequest) -> WebhookEvent;
}

/// Executes one playbook run to completion.
///
/// Called from a detached task; implementations may block for as long as the
/// run takes.
#[async_trait]
pub trait PlaybookRunner: Send + Sync {
    /// Runs `attempt` and reports how it ended.
    async fn run(&self, attempt: &ExecutionAttempt) -> Result<RunOutcome, RunError>;
}
