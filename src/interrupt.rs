use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Set once SIGINT or SIGTERM arrives; registering replaces the default
/// termination so shutdown can run first.
#[derive(Debug, Clone, Default)]
pub(crate) struct InterruptFlag {
    raised: Arc<AtomicBool>,
}

impl InterruptFlag {
    pub(crate) fn register_process_signals() -> Result<Self, String> {
        let flag = Self::default();
        for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
            signal_hook::flag::register(signal, Arc::clone(&flag.raised))
                .map_err(|error| format!("Failed to register handler for signal {signal}: {error}"))?;
        }
        Ok(flag)
    }

    pub(crate) fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    pub(crate) fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }
}
