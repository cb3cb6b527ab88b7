//! Newtype domain identifiers.
//!
//! Every concept that has an identity is represented as a distinct newtype
//! wrapping a primitive, so a [`DeliveryId`] can never be passed where an
//! [`EventKind`] is expected even though both are strings under the hood.

use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers - UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single playbook run.
///
/// Generated fresh for every dispatched push event and attached to the spans
/// of the detached task, so the "dispatched" line and the eventual
/// success/failure line of one run can be correlated in the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(Uuid);

impl RunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers - String-backed (provider headers / configuration)
// ---------------------------------------------------------------------------

string_id! {
    /// The event name a provider reports in its event header.
    ///
    /// Examples: `"push"`, `"pull_request"` (GitHub), `"Push Hook"` (GitLab),
    /// `"repo:push"` (Bitbucket).
    EventKind
}

string_id! {
    /// Provider-assigned identifier of one webhook delivery.
    ///
    /// Taken from `X-GitHub-Delivery`, `X-Gitlab-Event-UUID` or
    /// `X-Request-UUID`. Only used for log correlation.
    DeliveryId
}

string_id! {
    /// The remote user ansible connects as (`--user`).
    ExecutionUser
}
