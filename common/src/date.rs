//! Plan dates: stored as ISO `YYYY-MM-DD` strings, shown as `DD.MM.YYYY`.

use chrono::NaiveDate;

pub const ISO_FORMAT: &str = "%Y-%m-%d";
pub const DISPLAY_FORMAT: &str = "%d.%m.%Y";

pub fn parse(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), ISO_FORMAT).ok()
}

pub fn is_valid(date: &str) -> bool {
    parse(date).is_some()
}

/// Human form of a stored date; strings that do not parse are returned as-is.
pub fn display(date: &str) -> String {
    match parse(date) {
        Some(parsed) => parsed.format(DISPLAY_FORMAT).to_string(),
        None => date.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_dates_are_accepted_and_reformatted() {
        assert!(is_valid("2024-01-31"));
        assert_eq!(display("2024-01-31"), "31.01.2024");
    }

    #[test]
    fn malformed_dates_are_rejected_and_shown_verbatim() {
        assert!(!is_valid(""));
        assert!(!is_valid("2024-02-30"));
        assert!(!is_valid("31.01.2024"));
        assert_eq!(display("next week"), "next week");
    }
}
