use chrono::{DateTime, Utc};

/// Key in the `meta` table holding the date of the last presence reset.
pub const LAST_RESET_KEY: &str = "last_reset";

/// UTC calendar day (`YYYY-MM-DD`) used as the reset marker value.
pub fn marker_for(now: DateTime<Utc>) -> String {
    now.date_naive().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn marker_uses_the_utc_day() {
        let late = Utc.with_ymd_and_hms(2025, 3, 9, 23, 59, 59).unwrap();
        let next = Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap();
        assert_eq!(marker_for(late), "2025-03-09");
        assert_eq!(marker_for(next), "2025-03-10");
    }
}
