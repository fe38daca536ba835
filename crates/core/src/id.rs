// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier newtypes.
//!
//! Agent and task ids are assigned by the backend and treated as opaque.
//! The prefix only matters for ids generated locally (fakes, tests).

/// Returns a string slice truncated to at most `n` bytes, or the whole
/// string when `n` does not fall on a character boundary.
pub fn short(s: &str, n: usize) -> &str {
    s.get(..n).unwrap_or(s)
}

/// Define an opaque id newtype around `SmolStr`.
///
/// Generates `new()` for wrapping an existing id, `generate()` for a random
/// `{prefix}{nanoid}` id, `as_str()`, `Display`, `From<String>`, `From<&str>`,
/// `AsRef<str>`, `Borrow<str>`, and `PartialEq<str>` implementations.
///
/// ```ignore
/// define_id! {
///     /// Doc comment for the id type.
///     pub struct AgentId("agt-");
/// }
/// ```
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident($prefix:literal);
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(smol_str::SmolStr);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            /// Wrap an id issued elsewhere
            pub fn new(id: impl Into<smol_str::SmolStr>) -> Self {
                Self(id.into())
            }

            /// Generate a random id with the type prefix
            pub fn generate() -> Self {
                Self(smol_str::SmolStr::new(format!("{}{}", Self::PREFIX, nanoid::nanoid!(12))))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

define_id! {
    /// Backend-assigned identifier of a launched agent.
    pub struct AgentId("agt-");
}

define_id! {
    /// Identifier of a node in an agent's task tree.
    pub struct TaskId("task-");
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
