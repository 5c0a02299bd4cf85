use nix::unistd::Pid;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

/// Raw value meaning "no foreground process". No process ever has pid -1.
const NO_PROCESS: i32 = -1;

/// Pid of the command the shell is currently waiting on, if any.
///
/// The launcher writes it and the signal router reads it from another
/// thread. Each access is a single atomic load or store, and nothing else is
/// kept consistent with it.
#[derive(Debug, Clone)]
pub struct ForegroundHandle {
    pid: Arc<AtomicI32>,
}

impl ForegroundHandle {
    pub fn new() -> Self {
        ForegroundHandle {
            pid: Arc::new(AtomicI32::new(NO_PROCESS)),
        }
    }

    pub fn set(&self, pid: Pid) {
        self.pid.store(pid.as_raw(), Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.pid.store(NO_PROCESS, Ordering::SeqCst);
    }

    /// Returns the foreground pid, or `None` when the shell is idle.
    pub fn get(&self) -> Option<Pid> {
        match self.pid.load(Ordering::SeqCst) {
            raw if raw > 0 => Some(Pid::from_raw(raw)),
            _ => None,
        }
    }
}

impl Default for ForegroundHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        assert_eq!(ForegroundHandle::new().get(), None);
    }

    #[test]
    fn test_clones_share_state() {
        let handle = ForegroundHandle::new();
        let router_view = handle.clone();
        handle.set(Pid::from_raw(1234));
        assert_eq!(router_view.get(), Some(Pid::from_raw(1234)));
        handle.clear();
        assert_eq!(router_view.get(), None);
    }
}
