//! Monotone one-shot suspend flag: once set, stays set for the process's
//! lifetime. No reset operation exists by design.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
pub struct SuspendFlag(AtomicBool);

impl SuspendFlag {
    pub fn new() -> Self {
        SuspendFlag(AtomicBool::new(false))
    }

    pub fn is_suspended(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Sets the flag. Returns `true` if this call was the one that
    /// actually flipped it (useful for logging "suspended by X" once).
    pub fn set(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unset_and_stays_set_once_flipped() {
        let flag = SuspendFlag::new();
        assert!(!flag.is_suspended());
        assert!(flag.set());
        assert!(flag.is_suspended());
        assert!(!flag.set(), "second set() call did not flip anything new");
        assert!(flag.is_suspended());
    }
}
