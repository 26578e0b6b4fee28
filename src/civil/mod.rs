/*!
Calendar tables for the ISO 8601 (proleptic Gregorian) calendar.

Full calendar arithmetic (dates, times and datetimes) is out of scope for this
crate. This module provides the month tables that such arithmetic needs: the
number of days in each month and the day of the year on which each month
begins.
*/

pub use self::month::Month;

mod month;

/// Returns true if and only if the given year is a leap year in the
/// proleptic Gregorian calendar.
///
/// A leap year is a year with 366 days. Typical years have 365 days.
///
/// # Example
///
/// ```
/// use zoneclock::civil::is_leap_year;
///
/// assert!(is_leap_year(2024));
/// assert!(!is_leap_year(1900));
/// assert!(is_leap_year(2000));
/// assert!(is_leap_year(0));
/// assert!(!is_leap_year(-1));
/// ```
pub const fn is_leap_year(year: i64) -> bool {
    // A multiple of 4 that is also a multiple of 25 is a century, and a
    // century is a multiple of 400 exactly when it is a multiple of 16.
    let d = if year % 25 != 0 { 4 } else { 16 };
    (year % d) == 0
}
