//! ansihook webhook receiver.
//!
//! Exposes a single `POST` route. Each request is handed to the configured
//! [`trigger::WebhookDecoder`]; push events go to the [`runner::Dispatcher`]
//! and the response is sent without waiting for the playbook run.
//!
//! | Outcome | Status |
//! |---------|--------|
//! | Push event, run dispatched | `200 OK` |
//! | Other event type, ignored | `200 OK` |
//! | Missing or wrong signature or token | `401 Unauthorized` |
//! | Any other invalid request | `400 Bad Request` |
//! | Wrong method on the route | `405 Method Not Allowed` |
//! | Any other path | `404 Not Found` |
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport and the server lifecycle live here.
//! The [`trigger`] crate sees only decoded [`trigger::WebhookEvent`]s.

pub mod receiver;
pub mod server;

pub use receiver::{router, WebhookState, MAX_PAYLOAD_BYTES};
pub use server::{bind, serve, ListenerError};
