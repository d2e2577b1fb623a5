//! Process-wide terminal error state (spec.md §7: "a single process-wide
//! flag checked at every primitive's entry").
//!
//! Self-test and pairwise-consistency-test failures are unrecoverable: once
//! either happens, every subsequent `gtls-pk` primitive must refuse to run
//! rather than silently operate on a library that may have broken crypto.
//! Every `sign`/`verify`/`encrypt`/`decrypt`/`derive` entry point in this
//! crate calls [`check`] before doing any work.

use core::sync::atomic::{AtomicU8, Ordering};

const OK: u8 = 0;
const SELF_TEST_FAILED: u8 = 1;
const PCT_FAILED: u8 = 2;

static STATE: AtomicU8 = AtomicU8::new(OK);

/// Why the library was poisoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoisonReason {
    SelfTestFailed,
    PctFailed,
}

/// `true` if no self-test or PCT failure has poisoned the library.
pub fn is_operational() -> bool {
    STATE.load(Ordering::SeqCst) == OK
}

/// Transition the library to a terminal error state. Idempotent: once
/// poisoned, later calls (even with a different reason) leave the state
/// poisoned rather than un-poisoning it.
pub fn poison(reason: PoisonReason) {
    let value = match reason {
        PoisonReason::SelfTestFailed => SELF_TEST_FAILED,
        PoisonReason::PctFailed => PCT_FAILED,
    };
    crate::fmt::error!("gtls-pk: library entering terminal error state");
    // Only overwrite OK; a second poison call after the first is a no-op,
    // which keeps whichever reason hit first.
    let _ = STATE.compare_exchange(OK, value, Ordering::SeqCst, Ordering::SeqCst);
}

/// Guard every public entry point with this: returns `Err(LibraryPoisoned)`
/// once the library has transitioned to a terminal state.
pub(crate) fn check() -> crate::error::Result<()> {
    if is_operational() {
        Ok(())
    } else {
        Err(crate::error::Error::LibraryPoisoned)
    }
}

// No unit tests here: `STATE` is a process-wide global shared with every
// other test in this crate's test binary, and poisoning it would leak
// across unrelated tests running in the same process. `conformance-tests`
// exercises `poison`/`is_operational` in its own process instead.
