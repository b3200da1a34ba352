//! Resume position finalization
//!
//! A position that is "basically finished" or "barely started" is not worth
//! resuming. Both collapse to 0 ticks, which is exactly what the next-up
//! resolver reads as "not in progress".

/// At or past this fraction of the duration the item counts as finished.
pub const FINISHED_THRESHOLD: f64 = 0.9;

/// Below this fraction of the duration the item counts as not started.
pub const BARELY_STARTED_THRESHOLD: f64 = 0.1;

/// Normalizes a resume position against its duration.
///
/// Without a positive duration there is nothing to compare against and the
/// position is kept as is. Applying this twice yields the same result as
/// applying it once.
pub fn finalize_resume_ticks(
    position_ticks: i64,
    duration_ticks: Option<i64>,
) -> i64 {
    let Some(duration) = duration_ticks.filter(|duration| *duration > 0) else {
        return position_ticks;
    };

    let position = position_ticks as f64;
    let duration = duration as f64;
    if position >= duration * FINISHED_THRESHOLD
        || position < duration * BARELY_STARTED_THRESHOLD
    {
        0
    } else {
        position_ticks
    }
}

/// True once a position has crossed the finished threshold.
pub fn is_finished(position_ticks: i64, duration_ticks: Option<i64>) -> bool {
    match duration_ticks {
        Some(duration) if duration > 0 => {
            position_ticks as f64 >= duration as f64 * FINISHED_THRESHOLD
        }
        _ => false,
    }
}
