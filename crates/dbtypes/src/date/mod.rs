//! Calendar date value type.
//!
//! # Responsibility
//! - Represent a calendar day as an instant truncated to midnight.
//! - Provide calendar arithmetic and timezone-insensitive comparison.
//! - Host the boundary codecs (JSON, SQL, binary, form) in submodules.
//!
//! # Invariants
//! - Every constructor and parse path yields zeroed time-of-day fields.
//! - Equality, ordering and hashing use the calendar day in each value's
//!   own offset, so the same day compares equal across offsets.
//! - The zero value is 0001-01-01T00:00:00Z and means "no date".

mod binary;
pub mod error;
mod form;
mod sql;
mod text;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Datelike, Days, FixedOffset, Local, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

pub use error::{DateError, DateResult};

const ZERO_DAY: NaiveDate = match NaiveDate::from_ymd_opt(1, 1, 1) {
    Some(day) => day,
    None => NaiveDate::MIN,
};

/// Calendar date stored as a midnight instant in a fixed offset.
///
/// `Date::default()` is the zero value. Values built by [`Date::new`] carry
/// the local offset, parsed values carry UTC. Two dates are equal when they
/// name the same calendar day, whatever offset each was built in.
#[derive(Debug, Clone, Copy)]
pub struct Date(DateTime<FixedOffset>);

impl Default for Date {
    fn default() -> Self {
        Self(zero_instant())
    }
}

impl Date {
    /// Creates a date at local midnight.
    ///
    /// Month and day roll over the way calendar normalization does: month 13
    /// is January of the next year, day 0 is the last day of the previous
    /// month.
    ///
    /// # Panics
    /// Panics when the normalized date leaves chrono's year range. Use
    /// [`Date::try_new`] to get an error instead.
    pub fn new(year: i32, month: i32, day: i32) -> Self {
        match Self::try_new(year, month, day) {
            Ok(date) => date,
            Err(err) => panic!("Date::new({year}, {month}, {day}): {err}"),
        }
    }

    /// Fallible form of [`Date::new`].
    pub fn try_new(year: i32, month: i32, day: i32) -> DateResult<Self> {
        let civil = normalize_civil(year.into(), month.into(), day.into())
            .ok_or(DateError::OutOfRange)?;
        local_midnight(civil).map(Self).ok_or(DateError::OutOfRange)
    }

    /// Creates a date at midnight in an explicit offset, with the same
    /// rollover rules as [`Date::new`].
    pub fn try_new_in(year: i32, month: i32, day: i32, offset: FixedOffset) -> DateResult<Self> {
        let civil = normalize_civil(year.into(), month.into(), day.into())
            .ok_or(DateError::OutOfRange)?;
        midnight_in(civil, offset).map(Self).ok_or(DateError::OutOfRange)
    }

    /// Returns the current wall-clock date at local midnight.
    pub fn today() -> Self {
        let now = Local::now();
        let midnight = local_midnight(now.date_naive()).unwrap_or_else(|| now.fixed_offset());
        Self(midnight)
    }

    /// Underlying instant.
    pub fn as_datetime(&self) -> DateTime<FixedOffset> {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == zero_instant()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month in `1..=12`.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Formats the date with a chrono strftime pattern.
    ///
    /// Returns an empty string for the zero value.
    ///
    /// # Errors
    /// - Returns [`DateError::InvalidLayout`] when `layout` has an unknown
    ///   specifier.
    pub fn format(&self, layout: &str) -> DateResult<String> {
        if self.is_zero() {
            return Ok(String::new());
        }
        let items = StrftimeItems::new(layout).collect::<Vec<_>>();
        if items.iter().any(|item| matches!(item, Item::Error)) {
            return Err(DateError::InvalidLayout(layout.to_string()));
        }
        Ok(self.0.format_with_items(items.into_iter()).to_string())
    }

    pub fn equals(&self, other: &Date) -> bool {
        self.calendar_day() == other.calendar_day()
    }

    pub fn is_before(&self, other: &Date) -> bool {
        self.calendar_day() < other.calendar_day()
    }

    pub fn is_after(&self, other: &Date) -> bool {
        self.calendar_day() > other.calendar_day()
    }

    /// Adds calendar components with rollover into the following units.
    ///
    /// The result is midnight of the new day in the receiver's offset.
    ///
    /// # Panics
    /// Panics when the result leaves chrono's year range. See
    /// [`Date::checked_add_date`].
    pub fn add_date(&self, years: i32, months: i32, days: i32) -> Self {
        match self.checked_add_date(years, months, days) {
            Some(date) => date,
            None => panic!("{self} + ({years}y, {months}m, {days}d) is out of range"),
        }
    }

    pub fn checked_add_date(&self, years: i32, months: i32, days: i32) -> Option<Self> {
        let day = self.0.date_naive();
        let civil = normalize_civil(
            i64::from(day.year()) + i64::from(years),
            i64::from(day.month()) + i64::from(months),
            i64::from(day.day()) + i64::from(days),
        )?;
        midnight_in(civil, *self.0.offset()).map(Self)
    }

    pub fn add_days(&self, days: i32) -> Self {
        self.add_date(0, 0, days)
    }

    pub fn add_months(&self, months: i32) -> Self {
        self.add_date(0, months, 0)
    }

    pub fn add_years(&self, years: i32) -> Self {
        self.add_date(years, 0, 0)
    }

    /// Number of days in this date's month, taken as day 0 of the next month.
    pub fn days_in_month(&self) -> u32 {
        let day = self.0.date_naive();
        // Only December of chrono's last year fails here, and December has 31 days.
        normalize_civil(i64::from(day.year()), i64::from(day.month()) + 1, 0)
            .map_or(31, |last| last.day())
    }

    pub fn days_in_year(&self) -> u32 {
        let year = self.year();
        if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 {
            366
        } else {
            365
        }
    }

    /// Absolute number of whole days between the two calendar days.
    pub fn days_between(&self, other: &Date) -> i64 {
        (self.calendar_day() - other.calendar_day()).num_days().abs()
    }

    /// Calendar day in the value's own offset; the comparison key.
    fn calendar_day(&self) -> NaiveDate {
        self.0.date_naive()
    }
}

/// Parses `YYYY-MM-DD` into a date at UTC midnight.
///
/// Whitespace-only text yields the zero date, matching the JSON decoder.
///
/// # Errors
/// - [`DateError::EmptyInput`] when `text` is empty.
/// - [`DateError::Format`] when `text` is not a valid `YYYY-MM-DD` day.
pub fn parse_date(text: &str) -> DateResult<Date> {
    if text.is_empty() {
        return Err(DateError::EmptyInput);
    }
    text::parse_lenient(text)
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_date(s)
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year(), self.month(), self.day())
    }
}

impl PartialEq for Date {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Date {}

impl PartialOrd for Date {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Date {
    fn cmp(&self, other: &Self) -> Ordering {
        self.calendar_day().cmp(&other.calendar_day())
    }
}

impl Hash for Date {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.calendar_day().hash(state);
    }
}

impl From<DateTime<FixedOffset>> for Date {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self(value)
    }
}

impl From<DateTime<Utc>> for Date {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value.fixed_offset())
    }
}

impl From<Date> for DateTime<FixedOffset> {
    fn from(value: Date) -> Self {
        value.0
    }
}

fn zero_instant() -> DateTime<FixedOffset> {
    ZERO_DAY.and_time(NaiveTime::MIN).and_utc().fixed_offset()
}

/// Normalizes out-of-range month/day values into a real calendar day.
fn normalize_civil(year: i64, month: i64, day: i64) -> Option<NaiveDate> {
    let month0 = month - 1;
    let year = i32::try_from(year + month0.div_euclid(12)).ok()?;
    let month = u32::try_from(month0.rem_euclid(12) + 1).ok()?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let shift = day - 1;
    if shift >= 0 {
        first.checked_add_days(Days::new(shift.unsigned_abs()))
    } else {
        first.checked_sub_days(Days::new(shift.unsigned_abs()))
    }
}

fn midnight_in(day: NaiveDate, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    day.and_time(NaiveTime::MIN)
        .and_local_timezone(offset)
        .single()
}

fn local_midnight(day: NaiveDate) -> Option<DateTime<FixedOffset>> {
    let midnight = day.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight).earliest() {
        Some(local) => Some(local.fixed_offset()),
        // Midnight skipped by a DST jump: keep the wall clock, take the UTC-side offset.
        None => midnight_in(day, Local.offset_from_utc_datetime(&midnight).fix()),
    }
}

/// Truncates an instant to midnight of its own calendar day and offset.
fn truncate_to_day(instant: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    midnight_in(instant.date_naive(), *instant.offset()).unwrap_or(instant)
}
