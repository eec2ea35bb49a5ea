//! Elapsed-time decomposition and display formatting.

use std::time::Duration;

/// Split a duration into whole hours and leftover minutes.
pub fn split_hours_minutes(d: Duration) -> (u64, u64) {
    let secs = d.as_secs();
    (secs / 3600, (secs % 3600) / 60)
}

/// Format a duration as "Xh Ym" for the recovery panel.
pub fn format_hours_minutes(d: Duration) -> String {
    let (h, m) = split_hours_minutes(d);
    format!("{}h {}m", h, m)
}

/// Format an epoch-seconds timestamp as a UTC wall-clock label (HH:MM:SS).
pub fn format_clock(ts_secs: f64) -> String {
    let day_secs = (ts_secs.max(0.0) as u64) % 86_400;
    format!(
        "{:02}:{:02}:{:02}",
        day_secs / 3600,
        (day_secs % 3600) / 60,
        day_secs % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_hours_minutes() {
        assert_eq!(split_hours_minutes(Duration::from_secs(0)), (0, 0));
        assert_eq!(split_hours_minutes(Duration::from_secs(59)), (0, 0));
        assert_eq!(split_hours_minutes(Duration::from_secs(900)), (0, 15));
        assert_eq!(split_hours_minutes(Duration::from_secs(3600)), (1, 0));
        assert_eq!(split_hours_minutes(Duration::from_secs(7325)), (2, 2));
    }

    #[test]
    fn test_format_hours_minutes() {
        assert_eq!(format_hours_minutes(Duration::from_secs(900)), "0h 15m");
        assert_eq!(format_hours_minutes(Duration::from_secs(5400)), "1h 30m");
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "00:00:00");
        assert_eq!(format_clock(86_399.0), "23:59:59");
        assert_eq!(format_clock(86_400.0 + 61.0), "00:01:01");
    }
}
