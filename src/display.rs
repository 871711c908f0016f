//! Long-form date rendering for moment cards.

use time::Date;
use time::macros::format_description;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    Ru,
    En,
}

const EN_MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September", "October", "November",
    "December",
];

// Genitive case, as used after a day number.
const RU_MONTHS: [&str; 12] = [
    "января", "февраля", "марта", "апреля", "мая", "июня", "июля", "августа", "сентября", "октября", "ноября",
    "декабря",
];

/// Parse a stored `YYYY-MM-DD` date.
#[must_use]
pub fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw, format_description!("[year]-[month]-[day]")).ok()
}

/// Render `raw` as e.g. `14 февраля 2023` or `February 14, 2023`.
///
/// Input that is not a `YYYY-MM-DD` date is returned unchanged.
#[must_use]
pub fn format_long_date(raw: &str, locale: Locale) -> String {
    let Some(date) = parse_date(raw) else {
        return raw.to_owned();
    };
    let month = usize::from(u8::from(date.month())) - 1;
    match locale {
        Locale::Ru => format!("{} {} {}", date.day(), RU_MONTHS[month], date.year()),
        Locale::En => format!("{} {}, {}", EN_MONTHS[month], date.day(), date.year()),
    }
}

#[cfg(test)]
#[path = "display_test.rs"]
mod tests;
