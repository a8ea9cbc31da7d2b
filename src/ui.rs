// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidemark-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidemark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Host-binding seam between a controller and its owning view.
//!
//! A host registers a [`HostBinding`] and re-renders when notified; the notification is delivered
//! from the resolution point of an asynchronous fetch, after the controller's state lock has been
//! released, so implementations may re-enter controller accessors.

use std::sync::atomic::{AtomicU64, Ordering};

/// Receives controller state-change notifications.
pub trait HostBinding: Send + Sync {
    fn data_changed(&self);
}

/// A host that ignores notifications, for controllers driven purely by polling accessors.
#[derive(Debug, Default)]
pub struct NullHost;

impl HostBinding for NullHost {
    fn data_changed(&self) {}
}

/// A bumped revision counter. Frame-loop hosts compare `rev()` against the last value they drew
/// to decide whether anything changed.
#[derive(Debug, Default)]
pub struct ChangeSignal {
    rev: AtomicU64,
}

impl ChangeSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rev(&self) -> u64 {
        self.rev.load(Ordering::Acquire)
    }
}

impl HostBinding for ChangeSignal {
    fn data_changed(&self) {
        self.rev.fetch_add(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeSignal, HostBinding};

    #[test]
    fn change_signal_bumps_on_every_notification() {
        let signal = ChangeSignal::new();
        assert_eq!(signal.rev(), 0);
        signal.data_changed();
        signal.data_changed();
        assert_eq!(signal.rev(), 2);
    }
}
