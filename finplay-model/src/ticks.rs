//! Conversion between server ticks and wall-clock seconds
//!
//! The server counts time in 100-nanosecond ticks. Every position sent to or
//! received from the server is in ticks; every position used for player math
//! (seeking, elapsed comparisons) is in seconds.

/// 1 tick = 100ns.
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Negative input passes through unchanged; callers clamp.
pub fn ticks_to_seconds(ticks: i64) -> f64 {
    ticks as f64 / TICKS_PER_SECOND as f64
}

/// Rounds to the nearest tick. Negative input passes through unchanged.
pub fn seconds_to_ticks(seconds: f64) -> i64 {
    (seconds * TICKS_PER_SECOND as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_stays_within_one_tick() {
        let samples = [
            0_i64,
            1,
            9_999_999,
            10_000_000,
            12_345_678_901,
            72_000_000_000,
            987_654_321_987_654,
        ];
        for ticks in samples {
            let back = seconds_to_ticks(ticks_to_seconds(ticks));
            assert!(
                (back - ticks).abs() <= 1,
                "{ticks} came back as {back}"
            );
        }
    }

    #[test]
    fn conversion_values() {
        assert_eq!(ticks_to_seconds(15_000_000), 1.5);
        assert_eq!(seconds_to_ticks(2.5), 25_000_000);
        assert_eq!(seconds_to_ticks(0.000_000_04), 0);
        assert_eq!(seconds_to_ticks(0.000_000_06), 1);
    }

    #[test]
    fn negatives_pass_through() {
        assert_eq!(ticks_to_seconds(-10_000_000), -1.0);
        assert_eq!(seconds_to_ticks(-1.0), -10_000_000);
    }
}
