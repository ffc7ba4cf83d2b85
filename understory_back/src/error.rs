// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors for registry lifecycle misuse.
//!
//! Registration and dispatch never fail. Only calling the startup/shutdown pair out of
//! order is reported.

use thiserror::Error;

/// Out-of-order calls to [`initialize`](crate::registry::BackRegistry::initialize) or
/// [`late_dispose`](crate::registry::BackRegistry::late_dispose).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum LifecycleError {
    /// `initialize` was called while the dispatch callback was already subscribed.
    #[error("back registry is already initialized")]
    AlreadyInitialized,
    /// `initialize` was called after the registry was disposed.
    #[error("back registry has been disposed and cannot be initialized again")]
    Disposed,
    /// `late_dispose` was called a second time.
    #[error("back registry is already disposed")]
    AlreadyDisposed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages() {
        assert_eq!(
            LifecycleError::AlreadyInitialized.to_string(),
            "back registry is already initialized"
        );
        assert_eq!(
            LifecycleError::AlreadyDisposed.to_string(),
            "back registry is already disposed"
        );
    }
}
