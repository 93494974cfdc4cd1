use std::time::{Duration, Instant};

/// Logs the time spent in one step of a timed sequence and returns the new elapsed mark.
pub(crate) fn trace(l_type: &str, l_step: &str, detect: Instant, detect_elapsed: Duration) -> Duration {
    let elapsed = detect.elapsed();
    log::trace!("{} | Total={:.2?} | {}={:.2?}", l_type, elapsed, l_step, elapsed.saturating_sub(detect_elapsed));
    elapsed
}
