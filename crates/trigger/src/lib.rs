//! Core domain for ansihook.
//!
//! This crate contains every domain concept shared by the webhook receiver and
//! the trigger dispatcher: the typed [`WebhookEvent`] a request decodes into,
//! the [`ExecutionAttempt`] a push event turns into, the immutable
//! [`TriggerConfig`], and the error taxonomy. Infrastructure crates implement
//! the traits defined here; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`RunId`, `DeliveryId`, `EventKind`, ...) |
//! | [`event`] | `WebhookRequest`, `WebhookEvent`, `PushEvent`, `InvalidReason` |
//! | [`types`] | Provider and log sink selection, `PlaybookSpec`, `ExecutionAttempt` |
//! | [`config`] | `TriggerConfig` and `WebhookSecret` |
//! | [`ports`] | `WebhookDecoder` and `PlaybookRunner` traits |
//! | [`errors`] | Startup and run error types |

pub mod config;
pub mod errors;
pub mod event;
pub mod identifiers;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::{TriggerConfig, WebhookSecret};
pub use errors::{ConfigError, ParseSelectionError, RunError};
pub use event::{InvalidReason, PushEvent, WebhookEvent, WebhookRequest};
pub use identifiers::{DeliveryId, EventKind, ExecutionUser, RunId};
pub use ports::{PlaybookRunner, WebhookDecoder};
pub use types::{ExecutionAttempt, LogSink, PlaybookSpec, ProviderKind, RunOutcome, Timestamp};
