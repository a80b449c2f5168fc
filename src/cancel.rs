use crate::errors::ShellResult;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A flag raised from a signal handler and observed by cancellation tokens.
#[derive(Debug)]
pub struct InterruptFlag(AtomicBool);

impl InterruptFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Raised by SIGINT.
static INTERRUPTED: InterruptFlag = InterruptFlag::new();

extern "C" fn on_interrupt(_sig: nix::libc::c_int) {
    INTERRUPTED.raise();
}

/// Keep the shell alive across Ctrl-C and turn it into pipeline cancellation.
///
/// Children get the default disposition back when they exec, so external
/// stages still die from the terminal's interrupt.
pub fn install_interrupt_handler() -> ShellResult<()> {
    let action = SigAction::new(
        SigHandler::Handler(on_interrupt),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    // SAFETY: the handler only stores to an atomic.
    unsafe { sigaction(Signal::SIGINT, &action) }?;
    Ok(())
}

/// Forget an interrupt that arrived while no pipeline was running.
pub fn clear_interrupt() {
    INTERRUPTED.clear();
}

/// Shared flag a pipeline raises to ask its built-in stages to stop.
#[derive(Debug, Clone)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    interrupt: &'static InterruptFlag,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::watching(&INTERRUPTED)
    }
}

impl CancelToken {
    /// A token that also reports cancelled after Ctrl-C.
    pub fn new() -> Self {
        Self::default()
    }

    /// A token tied to `interrupt` instead of the SIGINT flag.
    pub fn watching(interrupt: &'static InterruptFlag) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            interrupt,
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// True once the pipeline cancelled itself or the interrupt was raised.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst) || self.interrupt.is_raised()
    }
}
