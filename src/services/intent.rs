//! Date extraction from free text: relative words first, then absolute
//! formats on whitespace-separated tokens. Building extraction lives on
//! [`crate::models::RoomRegistry::match_building`].

use chrono::{Duration, NaiveDate};

const DATE_FORMATS: [&str; 3] = ["%Y/%m/%d", "%Y-%m-%d", "%Y%m%d"];

pub fn extract_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let lower = text.to_lowercase();
    if lower.contains("day after tomorrow") {
        return Some(today + Duration::days(2));
    }
    if lower.contains("tomorrow") {
        return Some(today + Duration::days(1));
    }
    if lower.contains("today") {
        return Some(today);
    }
    if lower.contains("next week") {
        return Some(today + Duration::days(7));
    }

    for token in text.split_whitespace() {
        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(token, fmt) {
                return Some(date);
            }
        }
    }
    None
}
