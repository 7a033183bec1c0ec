//! Single-slot in-flight lock for sign-in attempts.
//!
//! At most one resolution runs at a time. The slot holds the running
//! attempt's [`CancellationToken`] so a caller can abort it; the slot empties
//! when the [`InFlightPermit`] is dropped, however the attempt ends.

use std::sync::{Mutex, PoisonError};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
pub struct InFlight {
    slot: Mutex<Option<CancellationToken>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot, or `None` if an attempt is already running
    pub fn try_acquire(&self) -> Option<InFlightPermit<'_>> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return None;
        }
        let token = CancellationToken::new();
        *slot = Some(token.clone());
        Some(InFlightPermit { owner: self, token })
    }

    /// Cancel the running attempt. Returns false when nothing was running.
    pub fn cancel(&self) -> bool {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

/// Proof of holding the slot
#[derive(Debug)]
pub struct InFlightPermit<'a> {
    owner: &'a InFlight,
    token: CancellationToken,
}

impl InFlightPermit<'_> {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for InFlightPermit<'_> {
    fn drop(&mut self) {
        let mut slot = self
            .owner
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }
}
