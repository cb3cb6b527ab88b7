//! ansihook trigger dispatcher and automation tool adapter.
//!
//! - [`Dispatcher`] turns a [`trigger::PushEvent`] into an
//!   [`trigger::ExecutionAttempt`] and spawns it as a detached Tokio task.
//!   The caller (the webhook handler) never waits for the run.
//! - [`AnsiblePlaybook`] implements [`trigger::PlaybookRunner`] by spawning
//!   `ansible-playbook` with a local connection and a fixed user.
//! - [`locate_tool`] resolves the executable once at startup.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Process spawning, output capture and the optional
//! run timeout live here; the [`trigger`] crate sees only
//! [`trigger::PlaybookRunner`].

pub mod ansible;
pub mod dispatcher;
pub mod locate;

pub use ansible::AnsiblePlaybook;
pub use dispatcher::Dispatcher;
pub use locate::locate_tool;
