//! Single-flight guard for operations that must not overlap.

use std::sync::atomic::{AtomicBool, Ordering};

/// A flag that admits at most one holder at a time.
///
/// A second caller is turned away instead of queued.
#[derive(Debug, Default)]
pub struct InFlight {
    busy: AtomicBool,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the flag, or returns `None` when another operation holds it.
    pub fn try_begin(&self) -> Option<InFlightTicket<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightTicket { flag: &self.busy })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Proof of holding an [`InFlight`] flag. Releases it when dropped, on every
/// exit path.
#[derive(Debug)]
pub struct InFlightTicket<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightTicket<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_claim_is_refused_until_release() {
        let guard = InFlight::new();
        let ticket = guard.try_begin().expect("first claim");
        assert!(guard.is_busy());
        assert!(guard.try_begin().is_none());
        drop(ticket);
        assert!(!guard.is_busy());
        assert!(guard.try_begin().is_some());
    }
}
