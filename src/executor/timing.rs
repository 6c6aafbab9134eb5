//! Wall-clock timing around the transport call.

use std::time::{Duration, Instant};

/// Runs `f` and returns its result with the elapsed time.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

/// Renders a duration for `response.elapsed`, e.g. `152.3ms` or `1.2s`.
pub fn format_elapsed(duration: Duration) -> String {
    format!("{:?}", duration)
}
