//! # Request Sequencing
//!
//! Responses are applied in completion order, which is not request order.
//! Each store stamps outgoing requests with a [`Ticket`] and only lets a
//! response through if its ticket is newer than the last one applied.
//!
//! ```text
//!   issue() ─► #1 ──────────────────────────► admit(#1)  ✗ (3 already applied)
//!   issue() ─► #2 ─────────► admit(#2) ✓
//!   issue() ─► #3 ──────────────► admit(#3) ✓
//! ```
//!
//! A store can also issue-and-admit a ticket with no request behind it to
//! invalidate everything in flight (logout does this).

use std::sync::atomic::{AtomicU64, Ordering};

/// Sequence number of one outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Issues tickets and remembers the newest one admitted.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    next: AtomicU64,
    applied: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next ticket. The first ticket is `1`.
    pub fn issue(&self) -> Ticket {
        Ticket(self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Marks `ticket` applied if it is newer than every ticket admitted so far.
    ///
    /// Returns `false` for a stale ticket; its response must be dropped.
    pub fn admit(&self, ticket: Ticket) -> bool {
        self.applied.fetch_max(ticket.0, Ordering::SeqCst) < ticket.0
    }

    /// Whether a response for `ticket` would still be admitted.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.applied.load(Ordering::SeqCst) < ticket.0
    }

    /// Issues and admits a fresh ticket, making every outstanding one stale.
    pub fn invalidate(&self) -> Ticket {
        let ticket = self.issue();
        self.admit(ticket);
        ticket
    }
}
