//! Monotonic "now" source.
//!
//! The enclave's host-provided wall clock can be skewed by an untrusted
//! host, so release-time and settle-delay comparisons derive `now` from
//! the CPU's own timestamp counter rather than `SystemTime::now()`. RDTSC
//! gives a monotonic cycle count; we calibrate it once against the OS
//! clock at startup and convert cycles to seconds from there.

use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

pub trait Clock: Send + Sync {
    fn now_unix(&self) -> u64;
}

/// RDTSC-derived wall-clock seconds, calibrated once per process.
pub struct TscClock {
    epoch_unix: u64,
    epoch_tsc: u64,
    tsc_hz: u64,
}

impl TscClock {
    pub fn calibrate() -> Self {
        let epoch_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let epoch_tsc = read_tsc();
        TscClock {
            epoch_unix,
            epoch_tsc,
            tsc_hz: estimate_tsc_hz(),
        }
    }
}

impl Clock for TscClock {
    fn now_unix(&self) -> u64 {
        if self.tsc_hz == 0 {
            return self.epoch_unix;
        }
        let elapsed_cycles = read_tsc().saturating_sub(self.epoch_tsc);
        self.epoch_unix + elapsed_cycles / self.tsc_hz
    }
}

/// The OS wall clock, used outside the enclave target (tests, plain
/// mode) where RDTSC calibration isn't worth the complexity.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

#[cfg(target_arch = "x86_64")]
fn read_tsc() -> u64 {
    use std::arch::x86_64::_rdtsc;
    // SAFETY: RDTSC is available on every x86_64 target this enclave runs on.
    unsafe { _rdtsc() }
}

#[cfg(not(target_arch = "x86_64"))]
fn read_tsc() -> u64 {
    0
}

static TSC_HZ: OnceLock<u64> = OnceLock::new();

/// Estimates the TSC frequency by sleeping a short, fixed interval and
/// measuring elapsed cycles against the OS clock. Cached for the life of
/// the process since the frequency is fixed per core on modern x86_64.
fn estimate_tsc_hz() -> u64 {
    *TSC_HZ.get_or_init(|| {
        #[cfg(target_arch = "x86_64")]
        {
            let start = read_tsc();
            std::thread::sleep(std::time::Duration::from_millis(20));
            let end = read_tsc();
            let cycles = end.saturating_sub(start);
            cycles.saturating_mul(50) // 20ms -> Hz
        }
        #[cfg(not(target_arch = "x86_64"))]
        {
            0
        }
    })
}

/// A clock fixed to whatever value the caller sets, used by tests that
/// need to force a settle-delay or publicity-period boundary without
/// sleeping real time.
pub struct FixedClock(std::sync::atomic::AtomicU64);

impl FixedClock {
    pub fn new(now: u64) -> Self {
        FixedClock(std::sync::atomic::AtomicU64::new(now))
    }

    pub fn set(&self, now: u64) {
        self.0.store(now, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn advance(&self, delta: u64) {
        self.0.fetch_add(delta, std::sync::atomic::Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_unix(&self) -> u64 {
        self.0.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let clock = FixedClock::new(100);
        assert_eq!(clock.now_unix(), 100);
        clock.advance(30);
        assert_eq!(clock.now_unix(), 130);
    }

    #[test]
    fn system_clock_is_plausible() {
        let now = SystemClock.now_unix();
        assert!(now > 1_700_000_000);
    }
}
