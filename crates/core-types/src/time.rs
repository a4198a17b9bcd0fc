use chrono::{NaiveDate, NaiveDateTime};

/// Timestamp layouts observed in the source dataset, tried in order. The
/// retail export uses US-style `1/13/2018 12:27`; the other layouts cover
/// re-exported snapshots.
const SOURCE_TIMESTAMP_FORMATS: [&str; 3] = [
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

const SOURCE_DATE_FORMAT: &str = "%m/%d/%Y";

/// Coercing timestamp parser for source columns: any value that does not
/// match a known layout becomes `None` instead of failing the row.
pub fn parse_source_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(parsed) = SOURCE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(trimmed, layout).ok())
    {
        return Some(parsed);
    }
    // Date-only values land at midnight.
    NaiveDate::parse_from_str(trimmed, SOURCE_DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_us_style_order_timestamps() {
        let parsed = parse_source_timestamp("1/13/2018 12:27").unwrap();
        assert_eq!(
            (parsed.year(), parsed.month(), parsed.day()),
            (2018, 1, 13)
        );
        assert_eq!((parsed.hour(), parsed.minute()), (12, 27));
    }

    #[test]
    fn parses_date_only_values_at_midnight() {
        let parsed = parse_source_timestamp("2/5/2017").unwrap();
        assert_eq!((parsed.month(), parsed.day(), parsed.hour()), (2, 5, 0));
    }

    #[test]
    fn coerces_garbage_and_blanks_to_none() {
        assert!(parse_source_timestamp("not a date").is_none());
        assert!(parse_source_timestamp("").is_none());
        assert!(parse_source_timestamp("   ").is_none());
    }
}
