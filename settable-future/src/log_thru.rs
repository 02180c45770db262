// LogThru
// Pass errors through and log them simultaneously via map_err()
// Also contains the log facility for the "future" target

macro_rules! log_future {
    (warn $fmt:literal, $($arg:expr),+) => {
        warn!(target:"future", $fmt, $($arg),+);
    };
    (debug $fmt:literal, $($arg:expr),+) => {
        debug!(target:"future", $fmt, $($arg),+);
    };
    (debug $text:expr) => {debug!(
        target: "future",
        "{}",
        $text,
    )};
    ($fmt:literal, $($arg:expr),+) => {
        trace!(target:"future", $fmt, $($arg),+);
    }
}

macro_rules! logthru_future {
    (debug) => (|e__| {
        debug!(
            target: "future",
            "[{:?}]",
            e__,
        );
        e__
    })
}

pub(crate) use log_future;
pub(crate) use logthru_future;
