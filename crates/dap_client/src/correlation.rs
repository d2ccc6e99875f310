//! C3: outbound `seq` allocation and the pending-request table.

use std::collections::HashMap;

use crate::client::ClientState;

/// A request that has been sent but not yet answered.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    /// The command name, for resolving the originating command of a response
    /// even without re-inspecting the request body.
    pub command: String,
    /// The client state at the moment the request was issued.
    pub issued_in: ClientState,
}

/// Monotonic `seq` counter plus the table of unanswered requests.
///
/// Owned exclusively by a single [`crate::client::Client`] instance; nothing
/// else observes or mutates it.
#[derive(Debug, Default)]
pub struct Correlator {
    next_seq: u64,
    pending: HashMap<u64, PendingRequest>,
}

impl Correlator {
    /// Start a correlator whose first allocated `seq` is `first_seq`.
    pub fn starting_at(first_seq: u64) -> Self {
        Self {
            next_seq: first_seq,
            pending: HashMap::new(),
        }
    }

    /// Allocate the next outbound `seq`. Never reused, never decremented.
    pub fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Record a just-sent request so a later response can be correlated.
    pub fn insert_pending(&mut self, seq: u64, command: impl Into<String>, issued_in: ClientState) {
        self.pending.insert(
            seq,
            PendingRequest {
                command: command.into(),
                issued_in,
            },
        );
    }

    /// Remove and return the pending entry for `request_seq`, if any.
    ///
    /// Returns `None` for an unsolicited response -- the table is left
    /// untouched in that case, per the correlation contract.
    pub fn take_pending(&mut self, request_seq: u64) -> Option<PendingRequest> {
        self.pending.remove(&request_seq)
    }

    /// Number of requests awaiting a response.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
