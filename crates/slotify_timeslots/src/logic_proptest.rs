#[cfg(test)]
mod tests {
    use crate::logic::tile_windows;
    use chrono::{NaiveTime, Timelike};
    use proptest::prelude::*;

    // Helper function to build a NaiveTime from minutes since midnight
    fn time_from_minutes(minutes: i64) -> NaiveTime {
        NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0).unwrap()
    }

    // Helper function to parse an HH:MM string back into minutes
    fn minutes_from_str(value: &str) -> i64 {
        let parsed = NaiveTime::parse_from_str(value, "%H:%M").expect("Failed to parse HH:MM");
        i64::from(parsed.hour()) * 60 + i64::from(parsed.minute())
    }

    proptest! {
        // Test that every generated window stays inside the day window
        #[test]
        fn test_windows_stay_inside_the_day(
            day_start_min in 0..1200i64,
            window_len in 1..600i64,
            slot_minutes in 1..120i64,
            buffer_minutes in 0..60i64,
        ) {
            let day_end_min = (day_start_min + window_len).min(1439);
            let windows = tile_windows(
                time_from_minutes(day_start_min),
                time_from_minutes(day_end_min),
                slot_minutes,
                buffer_minutes,
            );

            for (start_str, end_str) in &windows {
                let start = minutes_from_str(start_str);
                let end = minutes_from_str(end_str);

                prop_assert!(start >= day_start_min,
                    "Window should not start before the day window: {} < {}",
                    start, day_start_min);
                prop_assert!(end <= day_end_min,
                    "Window should not end after the day window: {} > {}",
                    end, day_end_min);
            }
        }

        // Test that every window is exactly the requested length
        #[test]
        fn test_windows_have_the_requested_length(
            day_start_min in 0..1200i64,
            window_len in 1..600i64,
            slot_minutes in 1..120i64,
            buffer_minutes in 0..60i64,
        ) {
            let day_end_min = (day_start_min + window_len).min(1439);
            let windows = tile_windows(
                time_from_minutes(day_start_min),
                time_from_minutes(day_end_min),
                slot_minutes,
                buffer_minutes,
            );

            for (start_str, end_str) in &windows {
                let length = minutes_from_str(end_str) - minutes_from_str(start_str);
                prop_assert!(length == slot_minutes,
                    "Window {} to {} should be {} minutes long",
                    start_str, end_str, slot_minutes);
            }
        }

        // Test that consecutive windows never overlap and honor the buffer
        #[test]
        fn test_windows_are_spaced_by_the_buffer(
            day_start_min in 0..1200i64,
            window_len in 1..600i64,
            slot_minutes in 1..120i64,
            buffer_minutes in 0..60i64,
        ) {
            let day_end_min = (day_start_min + window_len).min(1439);
            let windows = tile_windows(
                time_from_minutes(day_start_min),
                time_from_minutes(day_end_min),
                slot_minutes,
                buffer_minutes,
            );

            for pair in windows.windows(2) {
                let prev_end = minutes_from_str(&pair[0].1);
                let next_start = minutes_from_str(&pair[1].0);

                prop_assert!(next_start - prev_end == buffer_minutes,
                    "Gap between {} and {} should be exactly {} minutes",
                    pair[0].1, pair[1].0, buffer_minutes);
            }
        }

        // Test that the tiling fills the window as densely as possible
        #[test]
        fn test_tiling_is_maximal(
            day_start_min in 0..1200i64,
            window_len in 1..600i64,
            slot_minutes in 1..120i64,
            buffer_minutes in 0..60i64,
        ) {
            let day_end_min = (day_start_min + window_len).min(1439);
            let windows = tile_windows(
                time_from_minutes(day_start_min),
                time_from_minutes(day_end_min),
                slot_minutes,
                buffer_minutes,
            );

            // One more window after the last would overrun the day end.
            let next_start = match windows.last() {
                Some((_, end_str)) => minutes_from_str(end_str) + buffer_minutes,
                None => day_start_min,
            };
            prop_assert!(next_start + slot_minutes > day_end_min,
                "Another window starting at {} would still have fit before {}",
                next_start, day_end_min);
        }
    }
}
