#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
//! Scoped temporary directories with recursive cleanup, plus the small
//! utilities that tend to travel with them.
//!
//! The core type is [`ScopedDir`]: a handle to a uniquely named directory
//! under the system temp area, removed recursively on request with either a
//! best-effort or a strict failure policy, and optionally cleaned up at
//! normal process shutdown through the explicit [`exit`] registry. The
//! [`JdbcUrl`] parser and [`require`] precondition guard are standalone leaf
//! utilities.

/// Precondition helpers.
mod check;
/// Connection-string parsing.
mod conn;
/// Error types shared across the crate.
mod error;
/// Exit-time cleanup registry.
pub mod exit;
/// The scoped temporary-directory handle.
mod scope;
/// Post-order removal walk shared by the deletion policies.
mod walk;

pub use check::require;
pub use conn::JdbcUrl;
pub use error::{Result, ScopeDirError};
pub use exit::{ExitRegistry, HookId};
pub use scope::ScopedDir;
