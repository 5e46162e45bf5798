use chrono::{Month, NaiveDate};

use crate::error::InvalidDate;

/// Year every `last_contact_date` is pinned to.
pub const CONTACT_YEAR: i32 = 2022;

/// Drop every `.` and turn `-` into `_`: `"blue-collar"` → `"blue_collar"`.
pub fn clean_job(raw: &str) -> String {
    raw.replace('.', "").replace('-', "_")
}

/// `.` → `_`; a value of `unknown` after substitution becomes missing.
pub fn clean_education(raw: &str) -> Option<String> {
    let cleaned = raw.replace('.', "_");
    (cleaned != "unknown").then_some(cleaned)
}

/// 1 when the value is exactly `yes`, else 0.
pub fn yes_flag(raw: &str) -> u8 {
    u8::from(raw == "yes")
}

/// 1 when the value is exactly `success`, else 0.
pub fn success_flag(raw: &str) -> u8 {
    u8::from(raw == "success")
}

/// Build `2022-MM-DD` from a month abbreviation and a day of month.
///
/// `day` must be bare ASCII digits (no sign, no padding spaces); `month` a
/// three-letter abbreviation in any case.
pub fn last_contact_date(day: &str, month: &str) -> Result<String, InvalidDate> {
    let invalid = || InvalidDate {
        day: day.to_string(),
        month: month.to_string(),
    };

    if day.is_empty() || !day.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let day_num: u32 = day.parse().map_err(|_| invalid())?;
    if month.len() != 3 {
        return Err(invalid());
    }
    let month_num = month
        .parse::<Month>()
        .map_err(|_| invalid())?
        .number_from_month();

    NaiveDate::from_ymd_opt(CONTACT_YEAR, month_num, day_num)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .ok_or_else(invalid)
}
