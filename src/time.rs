use chrono::{Duration, NaiveDate, Utc};

/// Date layouts accepted in the first column of a feed
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y%m%d"];

/// Parse a day-resolution date, trying each accepted layout in turn
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Format a date the way the feed writes it
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMATS[0]).to_string()
}

/// The day after `date`, saturating at the calendar maximum
pub fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_signed(Duration::days(1)).unwrap_or(date)
}

/// Current UTC date
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2021, 12, 2).unwrap();
        assert_eq!(parse_date("2021-12-02"), Some(expected));
        assert_eq!(parse_date("  2021-12-02 "), Some(expected));
        assert_eq!(parse_date("20211202"), Some(expected));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date("date"), None);
        assert_eq!(parse_date("2021-13-45"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_format_and_next_day() {
        let date = NaiveDate::from_ymd_opt(2021, 9, 30).unwrap();
        assert_eq!(format_date(date), "2021-09-30");
        assert_eq!(format_date(next_day(date)), "2021-10-01");
        assert_eq!(next_day(NaiveDate::MAX), NaiveDate::MAX);
    }

    #[test]
    fn test_today_is_recent() {
        let epoch = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert!(today() > epoch);
    }
}
