use crate::error::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static MONTH_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{2})-([0-9]{4})$").expect("month-year pattern is valid"));

/// A calendar month, written as `MM-YYYY`.
///
/// Internally this is the first day of the month, so ordering and equality
/// follow the calendar and the value maps onto a SQL `DATE` without loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthYear(NaiveDate);

impl MonthYear {
    pub fn new(month: u32, year: i32) -> AppResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| {
                AppError::InvalidDateFormat(format!("{month:02}-{year:04} is not a valid month"))
            })
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn to_date(self) -> NaiveDate {
        self.0
    }

    /// Drops the day component of `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }
}

impl FromStr for MonthYear {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid =
            || AppError::InvalidDateFormat(format!("expected MM-YYYY, got {s:?}"));

        let caps = MONTH_YEAR_RE.captures(s).ok_or_else(invalid)?;
        let month: u32 = caps[1].parse().map_err(|_| invalid())?;
        let year: i32 = caps[2].parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }

        Self::new(month, year)
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month(), self.year())
    }
}

impl From<NaiveDate> for MonthYear {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl From<MonthYear> for NaiveDate {
    fn from(value: MonthYear) -> Self {
        value.to_date()
    }
}

impl Serialize for MonthYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_format() {
        for s in ["01-2024", "12-2024", "07-1999", "10-0042"] {
            let parsed: MonthYear = s.parse().unwrap();
            assert_eq!(parsed.to_string(), s);
        }

        let march: MonthYear = "03-2024".parse().unwrap();
        assert_eq!(march.month(), 3);
        assert_eq!(march.year(), 2024);
        assert_eq!(
            march.to_date(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        for s in [
            "", "2024-01", "13-2024", "00-2024", "1-2024", "01-24", "01/2024", " 01-2024",
            "01-2024 ", "01-20245", "\"01-2024\"", "ab-2024",
        ] {
            assert!(
                matches!(s.parse::<MonthYear>(), Err(AppError::InvalidDateFormat(_))),
                "{s:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_date_pins_first_day() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let month = MonthYear::from_date(date);
        assert_eq!(month.to_string(), "02-2024");
        assert_eq!(month.to_date(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(month, MonthYear::new(2, 2024).unwrap());
    }

    #[test]
    fn test_ordering_is_chronological() {
        let dec: MonthYear = "12-2023".parse().unwrap();
        let jan: MonthYear = "01-2024".parse().unwrap();
        assert!(dec < jan);
        assert_ne!(dec.to_date(), jan.to_date());
    }

    #[test]
    fn test_serde_uses_text_form() {
        let month: MonthYear = serde_json::from_str("\"05-2025\"").unwrap();
        assert_eq!(month, MonthYear::new(5, 2025).unwrap());
        assert_eq!(serde_json::to_string(&month).unwrap(), "\"05-2025\"");

        assert!(serde_json::from_str::<MonthYear>("\"2025-05\"").is_err());
        assert!(serde_json::from_str::<MonthYear>("202505").is_err());
    }
}
