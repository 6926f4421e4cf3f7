use std::sync::{LazyLock, Mutex};

///
/// Counters
/// Process-global operation counters, windowed by [`reset_all`].
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Counters {
    pub farmers_created: u64,
    pub farmers_updated: u64,
    pub farmers_deleted: u64,
    pub fields_created: u64,
    pub fields_updated: u64,
    pub fields_deleted: u64,
    pub geometry_rejections: u64,
    pub overlap_rejections: u64,
    pub history_appends: u64,
}

static STATE: LazyLock<Mutex<Counters>> = LazyLock::new(|| Mutex::new(Counters::default()));

pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut Counters) -> R) -> R {
    let mut state = STATE.lock().expect("metrics state mutex poisoned");

    f(&mut state)
}

/// Snapshot the current counters for endpoint/test plumbing.
#[must_use]
pub fn report() -> Counters {
    *STATE.lock().expect("metrics state mutex poisoned")
}

/// Reset all counters.
pub fn reset_all() {
    *STATE.lock().expect("metrics state mutex poisoned") = Counters::default();
}
