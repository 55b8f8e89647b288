//! # Time Utilities
//!
//! Time stamps for refresh bookkeeping using chrono.

use chrono::{DateTime, Utc};

/// Get current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Format a time stamp as `HH:MM:SS` (UTC) for status lines.
pub fn format_clock(time: DateTime<Utc>) -> String {
    time.format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_clock() {
        let time = Utc.with_ymd_and_hms(2024, 8, 17, 9, 5, 3).unwrap();
        assert_eq!(format_clock(time), "09:05:03");
    }
}
