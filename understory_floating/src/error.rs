// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use alloc::string::{String, ToString};

/// No target node could be resolved when an engine instance was about to be created.
///
/// Raised when neither an explicit target nor a [`TargetResolver`](crate::TargetResolver)
/// yields a node. The controller catches it, keeps the floating element in its pending
/// style, and retries on the next update or mount.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
#[error("no target node is available to anchor the floating element to")]
pub struct MissingTargetError;

/// A string did not name a known [`Placement`](crate::Placement).
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("unknown placement `{input}`")]
pub struct ParsePlacementError {
    input: String,
}

impl ParsePlacementError {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }

    /// The rejected input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}
