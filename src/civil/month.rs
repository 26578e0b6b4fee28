use crate::{util::b, Error};

/// A month of the year in the ISO 8601 (proleptic Gregorian) calendar.
///
/// Months are numbered `1` (January) through `12` (December). All of the
/// table lookups on a `Month` are total, so once a `Month` exists, none of
/// its operations can fail.
///
/// # Example
///
/// ```
/// use zoneclock::civil::Month;
///
/// let month = Month::new(2)?;
/// assert_eq!(month, Month::February);
/// assert_eq!(month.length(true), 29);
/// assert_eq!(month.length(false), 28);
/// assert_eq!(Month::March.first_day_of_year(true), 61);
/// assert_eq!(Month::August.first_month_of_quarter(), Month::July);
/// assert_eq!(Month::November.plus(3), Month::February);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(i8)]
pub enum Month {
    /// The month of January.
    January = 1,
    /// The month of February.
    February = 2,
    /// The month of March.
    March = 3,
    /// The month of April.
    April = 4,
    /// The month of May.
    May = 5,
    /// The month of June.
    June = 6,
    /// The month of July.
    July = 7,
    /// The month of August.
    August = 8,
    /// The month of September.
    September = 9,
    /// The month of October.
    October = 10,
    /// The month of November.
    November = 11,
    /// The month of December.
    December = 12,
}

impl Month {
    /// All months in calendar order.
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Returns the month with the given number, where January is `1`.
    ///
    /// # Errors
    ///
    /// When the number is outside `1..=12`.
    pub fn new(number: i8) -> Result<Month, Error> {
        let number = b::Month::check(number)?;
        Ok(Month::from_index(number - 1))
    }

    /// Returns the number of this month, where January is `1`.
    #[inline]
    pub fn get(self) -> i8 {
        self as i8
    }

    /// Returns the number of days in this month.
    ///
    /// Only February depends on whether the year is a leap year.
    pub fn length(self, leap_year: bool) -> i8 {
        match self {
            Month::February if leap_year => 29,
            Month::February => 28,
            // 31 for odd months up to July, and for even months after it.
            _ => {
                let n = self.get();
                30 | (n ^ n >> 3)
            }
        }
    }

    /// Returns the fewest days this month can have.
    pub fn min_length(self) -> i8 {
        self.length(false)
    }

    /// Returns the most days this month can have.
    pub fn max_length(self) -> i8 {
        self.length(true)
    }

    /// Returns the day of the year, starting at `1`, on which this month
    /// begins.
    pub fn first_day_of_year(self, leap_year: bool) -> i16 {
        let leap = i16::from(leap_year);
        match self {
            Month::January => 1,
            Month::February => 32,
            Month::March => 60 + leap,
            Month::April => 91 + leap,
            Month::May => 121 + leap,
            Month::June => 152 + leap,
            Month::July => 182 + leap,
            Month::August => 213 + leap,
            Month::September => 244 + leap,
            Month::October => 274 + leap,
            Month::November => 305 + leap,
            Month::December => 335 + leap,
        }
    }

    /// Returns the first month of the quarter containing this month.
    pub fn first_month_of_quarter(self) -> Month {
        Month::from_index((self.get() - 1) / 3 * 3)
    }

    /// Returns the month that is the given number of months after this one,
    /// wrapping around the end of the year.
    ///
    /// Negative amounts go backwards.
    pub fn plus(self, months: i64) -> Month {
        // OK because `rem_euclid(12)` is always in `0..12`.
        let amount = months.rem_euclid(12) as i8;
        Month::from_index((self.get() - 1 + amount) % 12)
    }

    /// Returns the month that is the given number of months before this one,
    /// wrapping around the start of the year.
    pub fn minus(self, months: i64) -> Month {
        self.plus(-(months % 12))
    }

    /// Returns the English name of this month.
    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Callers must ensure `0 <= index < 12`.
    fn from_index(index: i8) -> Month {
        Month::ALL[index as usize]
    }
}

impl core::fmt::Display for Month {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths() {
        let common: [i8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        let leap: [i8; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        assert_eq!(Month::ALL.map(|m| m.length(false)), common);
        assert_eq!(Month::ALL.map(|m| m.length(true)), leap);
        for month in Month::ALL {
            assert_eq!(month.min_length(), month.length(false));
            assert_eq!(month.max_length(), month.length(true));
        }
        assert_eq!(Month::February.min_length(), 28);
        assert_eq!(Month::February.max_length(), 29);
    }

    #[test]
    fn first_day_of_year_is_cumulative() {
        for leap in [false, true] {
            let mut day = 1;
            for month in Month::ALL {
                assert_eq!(month.first_day_of_year(leap), day, "{month} {leap}");
                day += i16::from(month.length(leap));
            }
            assert_eq!(day, if leap { 367 } else { 366 });
        }
        assert_eq!(Month::March.first_day_of_year(true), 61);
        assert_eq!(Month::December.first_day_of_year(true), 336);
    }

    #[test]
    fn quarters() {
        let firsts: Vec<Month> =
            Month::ALL.iter().map(|m| m.first_month_of_quarter()).collect();
        use Month::*;
        assert_eq!(
            firsts,
            [
                January, January, January, April, April, April, July, July,
                July, October, October, October,
            ]
        );
    }

    #[test]
    fn numbering() {
        for (i, month) in Month::ALL.into_iter().enumerate() {
            assert_eq!(usize::try_from(month.get()).unwrap(), i + 1);
            assert_eq!(Month::new(month.get()).unwrap(), month);
        }
        for n in [0, 13, -1, i8::MIN, i8::MAX] {
            assert!(Month::new(n).unwrap_err().is_range());
        }
        insta::assert_snapshot!(
            Month::new(0).unwrap_err(),
            @"parameter 'month' is not in the required range of 1..=12",
        );
    }

    #[test]
    fn wrapping() {
        assert_eq!(Month::January.minus(1), Month::December);
        assert_eq!(Month::December.plus(1), Month::January);
        assert_eq!(Month::June.plus(-18), Month::December);
        assert_eq!(Month::June.minus(i64::MIN), Month::February);
        assert_eq!(Month::March.plus(i64::MAX), Month::October);
        assert_eq!(Month::September.to_string(), "September");
    }

    quickcheck::quickcheck! {
        fn prop_plus_minus_inverse(n: i8, months: i64) -> bool {
            let month = Month::ALL[usize::from(n.unsigned_abs()) % 12];
            month.plus(months).minus(months) == month
        }
    }
}
