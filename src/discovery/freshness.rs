//! Posting age checks over free-form date text

use chrono::{DateTime, NaiveDate};

const ABSOLUTE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d %b %Y", "%B %d, %Y"];

/// Whether a posting dated `posted` is at most `max_age_days` old.
///
/// Understands relative text ("5 hours ago", "3 days ago", "1 week ago",
/// "2 months ago") and a handful of absolute formats. Missing or
/// unrecognised dates count as fresh.
pub fn is_fresh(posted: Option<&str>, max_age_days: u32, today: NaiveDate) -> bool {
    let text = match posted.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return true,
    };
    let lower = text.to_lowercase();
    let max_age = i64::from(max_age_days);

    if lower.contains("hour") || lower.contains("minute") || lower.contains("second") {
        return true;
    }
    if lower.contains("day") {
        return leading_count(&lower) <= max_age;
    }
    if lower.contains("week") {
        return leading_count(&lower).saturating_mul(7) <= max_age;
    }
    if lower.contains("month") || lower.contains("year") {
        return false;
    }

    match parse_absolute(text) {
        Some(date) => (today - date).num_days() <= max_age,
        None => true,
    }
}

/// All digits in the text read as one number; 1 when there are none ("a week ago").
/// Runs too long for an i64 saturate.
fn leading_count(text: &str) -> i64 {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return 1;
    }
    digits.parse().unwrap_or(i64::MAX)
}

fn parse_absolute(text: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    ABSOLUTE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    #[test]
    fn test_missing_date_is_fresh() {
        assert!(is_fresh(None, 7, today()));
        assert!(is_fresh(Some("  "), 7, today()));
    }

    #[test]
    fn test_relative_dates() {
        assert!(is_fresh(Some("5 hours ago"), 7, today()));
        assert!(is_fresh(Some("3 days ago"), 7, today()));
        assert!(is_fresh(Some("Posted today"), 7, today()));
        assert!(!is_fresh(Some("12 days ago"), 7, today()));
        assert!(is_fresh(Some("1 week ago"), 7, today()));
        assert!(!is_fresh(Some("2 weeks ago"), 7, today()));
        assert!(!is_fresh(Some("1 month ago"), 7, today()));
    }

    #[test]
    fn test_absolute_dates() {
        assert!(is_fresh(Some("2024-05-15"), 7, today()));
        assert!(!is_fresh(Some("2024-05-01"), 7, today()));
        assert!(is_fresh(Some("18 May 2024"), 7, today()));
        assert!(!is_fresh(Some("April 02, 2024"), 7, today()));
        assert!(is_fresh(Some("2024-05-19T10:00:00+05:30"), 7, today()));
    }

    #[test]
    fn test_huge_counts_are_stale() {
        assert!(!is_fresh(Some("2000000000000000000 weeks ago"), 7, today()));
        assert!(!is_fresh(Some("99999999999999999999999 days ago"), 7, today()));
    }

    #[test]
    fn test_unparseable_is_kept() {
        assert!(is_fresh(Some("recently"), 7, today()));
    }
}
