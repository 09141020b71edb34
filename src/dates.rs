use chrono::NaiveDate;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
}

/// Parses a comma separated list such as `2025-07-20,2025-07-19`.
/// Blank items are skipped.
pub fn parse_date_list(value: &str) -> Result<Vec<NaiveDate>, String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| parse_date(item).map_err(|_| item.to_string()))
        .collect()
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// `July 20, 2025`
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// `Jul 20`
pub fn short_date(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}
