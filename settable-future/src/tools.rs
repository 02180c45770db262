use super::*;

//////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Instant at which a wait of `timeout` starting now expires
/// Returns None if the deadline is not representable, which callers treat as 'wait forever'
pub fn deadline_after(timeout: Duration) -> Option<Instant> {
    Instant::now().checked_add(timeout)
}

/// Name of the calling thread for log records
pub fn current_thread_name() -> String {
    let thread = std::thread::current();
    match thread.name() {
        Some(name) => name.to_owned(),
        None => format!("{:?}", thread.id()),
    }
}
