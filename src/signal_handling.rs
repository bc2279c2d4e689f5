//! Cooperative handling of termination signals. SIGINT and SIGTERM only raise a flag which
//! [`crate::algorithm::IterativeAlgorithm`] polls between two steps; the process is not
//! terminated, so the driver can still emit its best solution.

use log::warn;
use signal_hook::consts::{SIGINT, SIGTERM};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

static TERMINATE: OnceLock<Arc<AtomicBool>> = OnceLock::new();

fn flag() -> &'static Arc<AtomicBool> {
    TERMINATE.get_or_init(|| Arc::new(AtomicBool::new(false)))
}

/// Registers the handlers for SIGINT and SIGTERM. Calling it more than once is harmless.
pub fn initialize() {
    for signal in [SIGINT, SIGTERM] {
        if let Err(e) = signal_hook::flag::register(signal, Arc::clone(flag())) {
            warn!("Cannot register handler for signal {}: {}", signal, e);
        }
    }
}

/// Returns true iff a termination signal was received since the start of the process
pub fn received_ctrl_c() -> bool {
    flag().load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_is_initially_clear() {
        initialize();
        assert!(!received_ctrl_c());
    }
}
