// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty checking of successive geometry snapshots.
//!
//! Engines recompute on every scroll tick and resize, far more often than the floating
//! element actually moves. Only offsets decide whether a pass is worth a re-render;
//! placement, styles, and the hide flag ride along with the next offset change.

use crate::snapshot::GeometrySnapshot;

/// Outcome of checking one computation pass against the published snapshot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PassDecision {
    /// The pass differs from what is rendered and replaces the published snapshot.
    Publish,
    /// The pass matches what is rendered and is dropped.
    Discard,
}

/// Returns `true` if `next` should replace `previous`.
///
/// Compares [`GeometrySnapshot::offsets`] with [`Offsets::same_as`](crate::Offsets::same_as),
/// so repeated NaN offsets count as unchanged. With nothing published yet every pass is dirty.
#[must_use]
pub fn is_dirty(previous: Option<&GeometrySnapshot>, next: &GeometrySnapshot) -> bool {
    previous.is_none_or(|prev| !prev.offsets.same_as(&next.offsets))
}

/// Classifies a pass as [`PassDecision::Publish`] or [`PassDecision::Discard`].
#[must_use]
pub fn decide(previous: Option<&GeometrySnapshot>, next: &GeometrySnapshot) -> PassDecision {
    if is_dirty(previous, next) {
        PassDecision::Publish
    } else {
        PassDecision::Discard
    }
}
