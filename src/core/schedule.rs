//! Calendar helpers for installment schedules.
//!
//! Month arithmetic follows "build the date from year, month and day, then let
//! the calendar normalize it": adding months to the 31st of a month lands in the
//! following month when the target month is shorter (Jan 31 + 1 month = Mar 3,
//! or Mar 2 in a leap year). Every due date in a schedule is computed from the
//! contract start date, never from the previous installment, so the drift does
//! not accumulate.

use crate::config::Locale;
use chrono::{Datelike, Days, Months, NaiveDate};

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Adds `months` calendar months to `start`, overflowing surplus days into the
/// next month.
///
/// Returns `None` only when the result falls outside chrono's date range.
#[must_use]
pub fn add_months(start: NaiveDate, months: u32) -> Option<NaiveDate> {
    let first_of_month = start.with_day(1)?;
    first_of_month
        .checked_add_months(Months::new(months))?
        .checked_add_days(Days::new(u64::from(start.day0())))
}

/// Due dates of a schedule of `months` installments starting at `start`.
///
/// Non-positive counts yield an empty schedule.
#[must_use]
pub fn due_dates(start: NaiveDate, months: i32) -> Vec<NaiveDate> {
    let count = u32::try_from(months).unwrap_or(0);
    (0..count).map_while(|i| add_months(start, i)).collect()
}

/// Month name and year of `date`, e.g. `"junio de 2025"` or `"June 2025"`.
#[must_use]
pub fn period_label(date: NaiveDate, locale: Locale) -> String {
    match locale {
        Locale::Es => format!("{} de {}", MONTHS_ES[date.month0() as usize], date.year()),
        Locale::En => date.format("%B %Y").to_string(),
    }
}

/// `dd/mm/yyyy`, the format payment tables display dates in.
#[must_use]
pub fn format_human_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
