// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidemark-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidemark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use crate::api::{ApiError, Envelope};

#[derive(Debug, Clone)]
pub(crate) enum SlotState<T> {
    NotStarted,
    Pending,
    Loaded(Arc<Envelope<T>>),
    Failed(ApiError),
}

/// One fetch attempt's status and its sequence token.
///
/// A slot accepts a completion only while it is pending *and* the completion carries the sequence
/// recorded at issue time; anything else has been superseded and is dropped by the caller.
#[derive(Debug)]
pub(crate) struct RequestSlot<T> {
    sequence: u64,
    state: SlotState<T>,
}

impl<T> RequestSlot<T> {
    pub(crate) fn new() -> Self {
        Self { sequence: 0, state: SlotState::NotStarted }
    }

    pub(crate) fn begin(&mut self, sequence: u64) {
        self.sequence = sequence;
        self.state = SlotState::Pending;
    }

    pub(crate) fn accepts(&self, sequence: u64) -> bool {
        self.sequence == sequence && matches!(self.state, SlotState::Pending)
    }

    pub(crate) fn complete_loaded(&mut self, envelope: Arc<Envelope<T>>) {
        self.state = SlotState::Loaded(envelope);
    }

    pub(crate) fn complete_failed(&mut self, error: ApiError) {
        self.state = SlotState::Failed(error);
    }

    pub(crate) fn has_started(&self) -> bool {
        !matches!(self.state, SlotState::NotStarted)
    }

    pub(crate) fn is_pending(&self) -> bool {
        matches!(self.state, SlotState::Pending)
    }

    pub(crate) fn error(&self) -> Option<&ApiError> {
        match &self.state {
            SlotState::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub(crate) fn state(&self) -> &SlotState<T> {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::RequestSlot;
    use crate::api::{ApiError, Envelope, PageCursors};

    fn envelope() -> Arc<Envelope<Vec<&'static str>>> {
        Arc::new(Envelope { data: vec!["c1"], pagination: PageCursors::default() })
    }

    #[test]
    fn accepts_only_the_issued_sequence_while_pending() {
        let mut slot: RequestSlot<Vec<&str>> = RequestSlot::new();
        assert!(!slot.accepts(0));

        slot.begin(3);
        assert!(slot.accepts(3));
        assert!(!slot.accepts(2));

        // a newer issue supersedes the old sequence outright
        slot.begin(5);
        assert!(!slot.accepts(3));
        assert!(slot.accepts(5));
    }

    #[test]
    fn a_completed_slot_accepts_nothing() {
        let mut slot = RequestSlot::new();
        slot.begin(1);
        slot.complete_loaded(envelope());
        assert!(!slot.accepts(1));

        slot.begin(2);
        slot.complete_failed(ApiError::new(Some(503), "unavailable"));
        assert!(!slot.accepts(2));
        assert_eq!(slot.error().map(|error| error.status_code), Some(Some(503)));
    }
}
