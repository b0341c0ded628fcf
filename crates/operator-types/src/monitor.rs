//! The monitor set: addresses entitled to suspend the operator.

use std::collections::BTreeSet;

/// A 20-byte address, as used by the upstream chain's account model.
pub type Address20 = [u8; 20];

/// `curr`: the monitor addresses the upstream currently reports.
/// `all`: the cumulative union of every address ever observed — suspend
/// authorisation checks against `all`, since monitors never lose
/// authority after rotation off the active list.
#[derive(Debug, Clone, Default)]
pub struct MonitorSet {
    pub curr: BTreeSet<Address20>,
    pub all: BTreeSet<Address20>,
}

impl MonitorSet {
    /// Replace `curr` with a freshly observed set, folding any new
    /// members into `all`. Returns whether `curr` actually changed.
    pub fn observe(&mut self, latest: BTreeSet<Address20>) -> bool {
        let changed = latest != self.curr;
        self.all.extend(latest.iter().copied());
        self.curr = latest;
        changed
    }

    pub fn is_authorised(&self, addr: &Address20) -> bool {
        self.all.contains(addr)
    }
}
