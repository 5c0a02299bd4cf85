use std::sync::{Mutex, MutexGuard};

/// Serializes tests that fork or reap children. The reaper collects any
/// child of the test process, so parallel tests would steal each other's.
pub(crate) fn process_lock() -> MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) fn argv(words: &[&str]) -> Vec<String> {
    words.iter().map(|word| word.to_string()).collect()
}
